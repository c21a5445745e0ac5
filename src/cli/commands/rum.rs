//! rum command - Real User Monitoring
//!
//! Custom metric writes, retention filter writes, playlists and heatmaps
//! are parsed but fail with [`UnsupportedOperation`](super::UnsupportedOperation).

use anyhow::Result;
use serde_json::{json, Map, Value};

use super::unsupported::unsupported;
use super::{destroy, show};
use crate::cli::args::{
    HeatmapAction, PlaylistAction, RetentionFilterAction, RumAction, RumAppAction,
    RumEventAction, RumMetricAction, RumSessionAction, TimeRange,
};
use crate::client::ApiRequest;
use crate::core::time::parse_time_rfc3339;
use crate::session::Session;

const APPLICATIONS: &str = "/api/v2/rum/applications";

pub async fn run(session: &mut Session, action: RumAction) -> Result<()> {
    match action {
        RumAction::Apps { action } => apps(session, action).await,
        RumAction::Events {
            action: RumEventAction::List { query, range },
        } => {
            let request = ApiRequest::get("/api/v2/rum/events")
                .query("filter[from]", parse_time_rfc3339(&range.from)?)
                .query("filter[to]", parse_time_rfc3339(&range.to)?)
                .query("page[limit]", range.limit)
                .query_opt("filter[query]", query);
            show(session, "rum events list", "list RUM events", request).await
        }
        RumAction::Sessions { action } => sessions(session, action).await,
        RumAction::Metrics { action } => metrics(session, action).await,
        RumAction::RetentionFilters { action } => retention_filters(session, action).await,
        RumAction::Playlists { action } => match action {
            PlaylistAction::List => unsupported("rum playlists list"),
            PlaylistAction::Get { .. } => unsupported("rum playlists get"),
        },
        RumAction::Heatmaps {
            action: HeatmapAction::Query { .. },
        } => unsupported("rum heatmaps query"),
    }
}

/// Name and type attributes, omitting whichever was not given.
fn app_attributes(name: Option<String>, app_type: Option<String>) -> Value {
    let mut attributes = Map::new();
    if let Some(name) = name {
        attributes.insert("name".into(), name.into());
    }
    if let Some(app_type) = app_type {
        attributes.insert("type".into(), app_type.into());
    }
    Value::Object(attributes)
}

async fn apps(session: &mut Session, action: RumAppAction) -> Result<()> {
    match action {
        RumAppAction::List => {
            let request = ApiRequest::get(APPLICATIONS);
            show(session, "rum apps list", "list RUM applications", request).await
        }
        RumAppAction::Get { app_id } => {
            let request = ApiRequest::get(format!("{}/{}", APPLICATIONS, app_id));
            show(session, "rum apps get", "get RUM application", request).await
        }
        RumAppAction::Create { name, app_type } => {
            let body = json!({
                "data": {
                    "type": "rum_application_create",
                    "attributes": app_attributes(Some(name), app_type),
                }
            });
            let request = ApiRequest::post(APPLICATIONS, body);
            show(session, "rum apps create", "create RUM application", request).await
        }
        RumAppAction::Update {
            app_id,
            name,
            app_type,
        } => {
            let body = json!({
                "data": {
                    "type": "rum_application_update",
                    "id": app_id,
                    "attributes": app_attributes(name, app_type),
                }
            });
            let request = ApiRequest::patch(format!("{}/{}", APPLICATIONS, app_id), body);
            show(session, "rum apps update", "update RUM application", request).await
        }
        RumAppAction::Delete { app_id } => {
            destroy(
                session,
                "rum apps delete",
                &format!("Delete RUM application {}?", app_id),
                "delete RUM application",
                ApiRequest::delete(format!("{}/{}", APPLICATIONS, app_id)),
                &format!("RUM application {} deleted.", app_id),
            )
            .await
        }
    }
}

/// Session search scoped to `@type:session`.
fn session_search(query: Option<&str>, range: &TimeRange) -> Result<ApiRequest> {
    let query = match query {
        Some(q) if !q.trim().is_empty() => format!("@type:session {}", q),
        _ => "@type:session".to_string(),
    };
    let body = json!({
        "filter": {
            "query": query,
            "from": parse_time_rfc3339(&range.from)?,
            "to": parse_time_rfc3339(&range.to)?,
        },
        "page": { "limit": range.limit },
        "sort": "-timestamp",
    });
    Ok(ApiRequest::post("/api/v2/rum/events/search", body))
}

async fn sessions(session: &mut Session, action: RumSessionAction) -> Result<()> {
    match action {
        RumSessionAction::List { range } => {
            let request = session_search(None, &range)?;
            show(session, "rum sessions list", "list RUM sessions", request).await
        }
        RumSessionAction::Search { query, range } => {
            let request = session_search(query.as_deref(), &range)?;
            show(session, "rum sessions search", "search RUM sessions", request).await
        }
    }
}

async fn metrics(session: &mut Session, action: RumMetricAction) -> Result<()> {
    match action {
        RumMetricAction::List => {
            let request = ApiRequest::get("/api/v2/rum/metrics");
            show(session, "rum metrics list", "list RUM metrics", request).await
        }
        RumMetricAction::Get { metric_id } => {
            let request = ApiRequest::get(format!("/api/v2/rum/metrics/{}", metric_id));
            show(session, "rum metrics get", "get RUM metric", request).await
        }
        RumMetricAction::Create { .. } => unsupported("rum metrics create"),
        RumMetricAction::Update { .. } => unsupported("rum metrics update"),
        RumMetricAction::Delete { .. } => unsupported("rum metrics delete"),
    }
}

async fn retention_filters(session: &mut Session, action: RetentionFilterAction) -> Result<()> {
    match action {
        RetentionFilterAction::List { app_id } => {
            let request =
                ApiRequest::get(format!("{}/{}/retention_filters", APPLICATIONS, app_id));
            show(
                session,
                "rum retention-filters list",
                "list retention filters",
                request,
            )
            .await
        }
        RetentionFilterAction::Get { app_id, filter_id } => {
            let request = ApiRequest::get(format!(
                "{}/{}/retention_filters/{}",
                APPLICATIONS, app_id, filter_id
            ));
            show(
                session,
                "rum retention-filters get",
                "get retention filter",
                request,
            )
            .await
        }
        RetentionFilterAction::Create { .. } => unsupported("rum retention-filters create"),
        RetentionFilterAction::Update { .. } => unsupported("rum retention-filters update"),
        RetentionFilterAction::Delete { app_id, filter_id } => {
            destroy(
                session,
                "rum retention-filters delete",
                &format!("Delete retention filter {}?", filter_id),
                "delete retention filter",
                ApiRequest::delete(format!(
                    "{}/{}/retention_filters/{}",
                    APPLICATIONS, app_id, filter_id
                )),
                &format!("Retention filter {} deleted.", filter_id),
            )
            .await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn range() -> TimeRange {
        TimeRange {
            from: "1h".into(),
            to: "now".into(),
            limit: 10,
        }
    }

    #[test]
    fn sessions_are_scoped() {
        let request = session_search(None, &range()).unwrap();
        assert_eq!(request.body.unwrap()["filter"]["query"], "@type:session");

        let request = session_search(Some("@view.name:/checkout"), &range()).unwrap();
        assert_eq!(
            request.body.unwrap()["filter"]["query"],
            "@type:session @view.name:/checkout"
        );
    }

    #[test]
    fn app_attributes_skip_missing() {
        assert_eq!(
            app_attributes(Some("shop".into()), None),
            json!({"name": "shop"})
        );
        assert_eq!(app_attributes(None, None), json!({}));
    }
}

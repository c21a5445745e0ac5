//! cicd command - CI Visibility pipelines and tests

use anyhow::Result;
use serde_json::{json, Map, Value};

use super::show;
use crate::cli::args::{
    CiEventAction, CiTestAction, CicdAction, FlakyTestAction, PipelineAction, TimeRange,
};
use crate::client::ApiRequest;
use crate::core::time::parse_time_rfc3339;
use crate::session::Session;

const PIPELINE_SEARCH: &str = "/api/v2/ci/pipelines/events/search";

pub async fn run(session: &mut Session, action: CicdAction) -> Result<()> {
    match action {
        CicdAction::Pipelines { action } => pipelines(session, action).await,
        CicdAction::Tests { action } => tests(session, action).await,
        CicdAction::Events { action } => events(session, action).await,
        CicdAction::FlakyTests { action } => flaky_tests(session, action).await,
    }
}

/// Body for the `events/search` endpoints, newest first.
fn search_body(query: Option<&str>, from: &str, to: &str, limit: u32) -> Result<Value> {
    let mut filter = Map::new();
    filter.insert("from".into(), parse_time_rfc3339(from)?.into());
    filter.insert("to".into(), parse_time_rfc3339(to)?.into());
    if let Some(query) = query {
        filter.insert("query".into(), query.into());
    }
    Ok(json!({
        "filter": filter,
        "page": { "limit": limit },
        "sort": "-timestamp",
    }))
}

fn range_body(query: Option<&str>, range: &TimeRange) -> Result<Value> {
    search_body(query, &range.from, &range.to, range.limit)
}

async fn pipelines(session: &mut Session, action: PipelineAction) -> Result<()> {
    match action {
        PipelineAction::List { query, range } => {
            let body = range_body(query.as_deref(), &range)?;
            let request = ApiRequest::post(PIPELINE_SEARCH, body);
            show(session, "cicd pipelines list", "list pipelines", request).await
        }
        PipelineAction::Get {
            pipeline_id,
            from,
            to,
        } => {
            let query = format!("@ci.pipeline.id:{}", pipeline_id);
            let body = search_body(Some(&query), &from, &to, 100)?;
            let request = ApiRequest::post(PIPELINE_SEARCH, body);
            show(session, "cicd pipelines get", "get pipeline", request).await
        }
    }
}

async fn tests(session: &mut Session, action: CiTestAction) -> Result<()> {
    match action {
        CiTestAction::List { query, range } => {
            let request = ApiRequest::get("/api/v2/ci/tests/events")
                .query("filter[from]", parse_time_rfc3339(&range.from)?)
                .query("filter[to]", parse_time_rfc3339(&range.to)?)
                .query("page[limit]", range.limit)
                .query_opt("filter[query]", query);
            show(session, "cicd tests list", "list test events", request).await
        }
        CiTestAction::Search { query, range } => {
            let body = range_body(Some(&query), &range)?;
            let request = ApiRequest::post("/api/v2/ci/tests/events/search", body);
            show(session, "cicd tests search", "search test events", request).await
        }
    }
}

async fn events(session: &mut Session, action: CiEventAction) -> Result<()> {
    match action {
        CiEventAction::Search { query, range } => {
            let body = range_body(Some(&query), &range)?;
            let request = ApiRequest::post(PIPELINE_SEARCH, body);
            show(session, "cicd events search", "search pipeline events", request).await
        }
        CiEventAction::Aggregate {
            query,
            from,
            to,
            compute,
            group_by,
        } => {
            let mut body = json!({
                "filter": {
                    "query": query,
                    "from": parse_time_rfc3339(&from)?,
                    "to": parse_time_rfc3339(&to)?,
                },
                "compute": [aggregation(&compute)],
            });
            if let Some(facet) = group_by {
                body["group_by"] = json!([{ "facet": facet }]);
            }
            let request = ApiRequest::post("/api/v2/ci/pipelines/analytics/aggregate", body);
            show(session, "cicd events aggregate", "aggregate pipeline events", request).await
        }
    }
}

/// `count` counts events; anything else applies to `@duration`.
fn aggregation(compute: &str) -> Value {
    if compute == "count" {
        json!({ "aggregation": "count" })
    } else {
        json!({ "aggregation": compute, "metric": "@duration" })
    }
}

async fn flaky_tests(session: &mut Session, action: FlakyTestAction) -> Result<()> {
    match action {
        FlakyTestAction::Search { query, limit } => {
            let mut filter = Map::new();
            if let Some(query) = query {
                filter.insert("query".into(), query.into());
            }
            let body = json!({
                "data": {
                    "type": "search_flaky_tests_request",
                    "attributes": {
                        "filter": filter,
                        "page": { "limit": limit },
                    },
                }
            });
            let request = ApiRequest::post("/api/v2/ci/tests/flaky", body);
            show(session, "cicd flaky-tests search", "search flaky tests", request).await
        }
    }
}

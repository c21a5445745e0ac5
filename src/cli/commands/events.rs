//! events command - Query the event stream

use anyhow::Result;
use serde_json::json;

use super::show;
use crate::cli::args::EventAction;
use crate::client::ApiRequest;
use crate::core::time::{parse_time_rfc3339, parse_time_secs};
use crate::session::Session;

pub async fn run(session: &mut Session, action: EventAction) -> Result<()> {
    match action {
        EventAction::List { from, to, tags } => {
            // v1 takes unix seconds
            let request = ApiRequest::get("/api/v1/events")
                .query("start", parse_time_secs(&from)?)
                .query("end", parse_time_secs(&to)?)
                .query_opt("tags", tags);
            show(session, "events list", "list events", request).await
        }
        EventAction::Search {
            query,
            from,
            to,
            limit,
        } => {
            let body = json!({
                "filter": {
                    "query": query,
                    "from": parse_time_rfc3339(&from)?,
                    "to": parse_time_rfc3339(&to)?,
                },
                "page": { "limit": limit },
                "sort": "-timestamp",
            });
            let request = ApiRequest::post("/api/v2/events/search", body);
            show(session, "events search", "search events", request).await
        }
        EventAction::Get { event_id } => {
            let request = ApiRequest::get(format!("/api/v1/events/{}", event_id));
            show(session, "events get", "get event", request).await
        }
    }
}

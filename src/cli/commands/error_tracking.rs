//! error-tracking command - Error tracking issues

use anyhow::Result;
use serde_json::json;

use super::show;
use crate::cli::args::{ErrorTrackingAction, IssueAction};
use crate::client::ApiRequest;
use crate::core::time::parse_time_millis;
use crate::session::Session;

pub async fn run(session: &mut Session, action: ErrorTrackingAction) -> Result<()> {
    let ErrorTrackingAction::Issues { action } = action;
    match action {
        IssueAction::Search { query, range } => {
            let body = json!({
                "data": {
                    "type": "search_request",
                    "attributes": {
                        "query": query.unwrap_or_else(|| "*".to_string()),
                        "from": parse_time_millis(&range.from)?,
                        "to": parse_time_millis(&range.to)?,
                    },
                }
            });
            let request = ApiRequest::post("/api/v2/error-tracking/issues/search", body)
                .query("page[limit]", range.limit);
            show(session, "error-tracking issues search", "search issues", request).await
        }
        IssueAction::Get { issue_id } => {
            let request = ApiRequest::get(format!("/api/v2/error-tracking/issues/{}", issue_id));
            show(session, "error-tracking issues get", "get issue", request).await
        }
    }
}

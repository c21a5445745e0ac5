//! synthetics command - Synthetic tests and locations

use anyhow::Result;

use super::show;
use crate::cli::args::{ListOnly, SyntheticTestAction, SyntheticsAction};
use crate::client::ApiRequest;
use crate::session::Session;

pub async fn run(session: &mut Session, action: SyntheticsAction) -> Result<()> {
    match action {
        SyntheticsAction::Tests { action } => match action {
            SyntheticTestAction::List => {
                let request = ApiRequest::get("/api/v1/synthetics/tests");
                show(session, "synthetics tests list", "list synthetic tests", request).await
            }
            SyntheticTestAction::Get { public_id } => {
                let request = ApiRequest::get(format!("/api/v1/synthetics/tests/{}", public_id));
                show(session, "synthetics tests get", "get synthetic test", request).await
            }
            SyntheticTestAction::Search { text, count } => {
                let request = ApiRequest::get("/api/v1/synthetics/tests/search")
                    .query_opt("text", text)
                    .query("count", count)
                    .query("start", 0);
                show(
                    session,
                    "synthetics tests search",
                    "search synthetic tests",
                    request,
                )
                .await
            }
        },
        SyntheticsAction::Locations {
            action: ListOnly::List,
        } => {
            let request = ApiRequest::get("/api/v1/synthetics/locations");
            show(
                session,
                "synthetics locations list",
                "list synthetic locations",
                request,
            )
            .await
        }
    }
}

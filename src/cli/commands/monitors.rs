//! monitors command - List, search, inspect, and delete monitors

use anyhow::Result;

use super::{destroy, show};
use crate::cli::args::MonitorAction;
use crate::client::ApiRequest;
use crate::session::Session;

/// The list endpoint rejects page sizes above this.
const MAX_PAGE_SIZE: u32 = 1000;

pub async fn run(session: &mut Session, action: MonitorAction) -> Result<()> {
    match action {
        MonitorAction::List { name, tags, limit } => {
            let request = ApiRequest::get("/api/v1/monitor")
                .query_opt("name", name)
                .query_opt("monitor_tags", tags)
                .query("page_size", limit.clamp(1, MAX_PAGE_SIZE))
                .query("page", 0);
            show(session, "monitors list", "list monitors", request).await
        }
        MonitorAction::Get { monitor_id } => {
            let request = ApiRequest::get(format!("/api/v1/monitor/{}", monitor_id));
            show(session, "monitors get", "get monitor", request).await
        }
        MonitorAction::Search { query } => {
            let request = ApiRequest::get("/api/v1/monitor/search").query_opt("query", query);
            show(session, "monitors search", "search monitors", request).await
        }
        MonitorAction::Delete { monitor_id } => {
            destroy(
                session,
                "monitors delete",
                &format!("Delete monitor {}?", monitor_id),
                "delete monitor",
                ApiRequest::delete(format!("/api/v1/monitor/{}", monitor_id)),
                &format!("Monitor {} deleted.", monitor_id),
            )
            .await
        }
    }
}

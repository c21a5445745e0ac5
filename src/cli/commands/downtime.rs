//! downtime command - Schedule and cancel monitor downtimes

use anyhow::Result;

use super::{destroy, show};
use crate::cli::args::DowntimeAction;
use crate::client::ApiRequest;
use crate::session::Session;

pub async fn run(session: &mut Session, action: DowntimeAction) -> Result<()> {
    match action {
        DowntimeAction::List { current_only } => {
            let request = ApiRequest::get("/api/v2/downtime")
                .query_opt("current_only", current_only.then_some(true));
            show(session, "downtime list", "list downtimes", request).await
        }
        DowntimeAction::Get { downtime_id } => {
            let request = ApiRequest::get(format!("/api/v2/downtime/{}", downtime_id));
            show(session, "downtime get", "get downtime", request).await
        }
        DowntimeAction::Create { file } => {
            let body = session.read_body(&file)?;
            let request = ApiRequest::post("/api/v2/downtime", body);
            show(session, "downtime create", "create downtime", request).await
        }
        DowntimeAction::Cancel { downtime_id } => {
            destroy(
                session,
                "downtime cancel",
                &format!("Cancel downtime {}?", downtime_id),
                "cancel downtime",
                ApiRequest::delete(format!("/api/v2/downtime/{}", downtime_id)),
                &format!("Downtime {} cancelled.", downtime_id),
            )
            .await
        }
    }
}

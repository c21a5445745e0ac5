//! slos command - Service level objectives

use anyhow::Result;

use super::{destroy, show};
use crate::cli::args::SloAction;
use crate::client::ApiRequest;
use crate::core::time::parse_time_secs;
use crate::session::Session;

pub async fn run(session: &mut Session, action: SloAction) -> Result<()> {
    match action {
        SloAction::List => {
            let request = ApiRequest::get("/api/v1/slo");
            show(session, "slos list", "list SLOs", request).await
        }
        SloAction::Get { slo_id } => {
            let request = ApiRequest::get(format!("/api/v1/slo/{}", slo_id));
            show(session, "slos get", "get SLO", request).await
        }
        SloAction::Create { file } => {
            let body = session.read_body(&file)?;
            let request = ApiRequest::post("/api/v1/slo", body);
            show(session, "slos create", "create SLO", request).await
        }
        SloAction::Update { slo_id, file } => {
            let body = session.read_body(&file)?;
            let request = ApiRequest::put(format!("/api/v1/slo/{}", slo_id), body);
            show(session, "slos update", "update SLO", request).await
        }
        SloAction::Delete { slo_id } => {
            destroy(
                session,
                "slos delete",
                &format!("Delete SLO {}?", slo_id),
                "delete SLO",
                ApiRequest::delete(format!("/api/v1/slo/{}", slo_id)),
                &format!("SLO {} deleted.", slo_id),
            )
            .await
        }
        SloAction::Status { slo_id, from, to } => {
            let request = ApiRequest::get(format!("/api/v2/slo/{}/status", slo_id))
                .query("from_ts", parse_time_secs(&from)?)
                .query("to_ts", parse_time_secs(&to)?);
            show(session, "slos status", "get SLO status", request).await
        }
    }
}

//! dashboards command - Manage dashboards

use anyhow::Result;

use super::{destroy, show};
use crate::cli::args::DashboardAction;
use crate::client::ApiRequest;
use crate::session::Session;

pub async fn run(session: &mut Session, action: DashboardAction) -> Result<()> {
    match action {
        DashboardAction::List => {
            let request = ApiRequest::get("/api/v1/dashboard");
            show(session, "dashboards list", "list dashboards", request).await
        }
        DashboardAction::Get { dashboard_id } => {
            let request = ApiRequest::get(format!("/api/v1/dashboard/{}", dashboard_id));
            show(session, "dashboards get", "get dashboard", request).await
        }
        DashboardAction::Create { file } => {
            let body = session.read_body(&file)?;
            let request = ApiRequest::post("/api/v1/dashboard", body);
            show(session, "dashboards create", "create dashboard", request).await
        }
        DashboardAction::Update { dashboard_id, file } => {
            let body = session.read_body(&file)?;
            let request = ApiRequest::put(format!("/api/v1/dashboard/{}", dashboard_id), body);
            show(session, "dashboards update", "update dashboard", request).await
        }
        DashboardAction::Delete { dashboard_id } => {
            destroy(
                session,
                "dashboards delete",
                &format!("Delete dashboard {}?", dashboard_id),
                "delete dashboard",
                ApiRequest::delete(format!("/api/v1/dashboard/{}", dashboard_id)),
                &format!("Dashboard {} deleted.", dashboard_id),
            )
            .await
        }
    }
}

//! cloud command - Cloud provider integrations

use anyhow::Result;

use super::{destroy, show};
use crate::cli::args::{CloudAction, ListOnly, OciAction, TenancyAction};
use crate::client::ApiRequest;
use crate::session::Session;

const OCI_TENANCIES: &str = "/api/v2/integration/oci/tenancy_configs";

pub async fn run(session: &mut Session, action: CloudAction) -> Result<()> {
    match action {
        CloudAction::Aws {
            action: ListOnly::List,
        } => {
            let request = ApiRequest::get("/api/v1/integration/aws");
            show(session, "cloud aws list", "list AWS accounts", request).await
        }
        CloudAction::Gcp {
            action: ListOnly::List,
        } => {
            let request = ApiRequest::get("/api/v1/integration/gcp");
            show(session, "cloud gcp list", "list GCP accounts", request).await
        }
        CloudAction::Azure {
            action: ListOnly::List,
        } => {
            let request = ApiRequest::get("/api/v1/integration/azure");
            show(session, "cloud azure list", "list Azure accounts", request).await
        }
        CloudAction::Oci {
            action: OciAction::Tenancies { action },
        } => tenancies(session, action).await,
    }
}

async fn tenancies(session: &mut Session, action: TenancyAction) -> Result<()> {
    match action {
        TenancyAction::List => {
            let request = ApiRequest::get(OCI_TENANCIES);
            show(session, "cloud oci tenancies list", "list OCI tenancies", request).await
        }
        TenancyAction::Get { tenancy_id } => {
            let request = ApiRequest::get(format!("{}/{}", OCI_TENANCIES, tenancy_id));
            show(session, "cloud oci tenancies get", "get OCI tenancy", request).await
        }
        TenancyAction::Delete { tenancy_id } => {
            destroy(
                session,
                "cloud oci tenancies delete",
                &format!("Delete OCI tenancy '{}'?", tenancy_id),
                "delete OCI tenancy",
                ApiRequest::delete(format!("{}/{}", OCI_TENANCIES, tenancy_id)),
                &format!("OCI tenancy '{}' deleted.", tenancy_id),
            )
            .await
        }
    }
}

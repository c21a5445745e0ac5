//! notebooks command - Manage notebooks

use anyhow::Result;

use super::{destroy, show};
use crate::cli::args::NotebookAction;
use crate::client::ApiRequest;
use crate::session::Session;

pub async fn run(session: &mut Session, action: NotebookAction) -> Result<()> {
    match action {
        NotebookAction::List => {
            let request = ApiRequest::get("/api/v1/notebooks");
            show(session, "notebooks list", "list notebooks", request).await
        }
        NotebookAction::Get { notebook_id } => {
            let request = ApiRequest::get(format!("/api/v1/notebooks/{}", notebook_id));
            show(session, "notebooks get", "get notebook", request).await
        }
        NotebookAction::Create { file } => {
            let body = session.read_body(&file)?;
            let request = ApiRequest::post("/api/v1/notebooks", body);
            show(session, "notebooks create", "create notebook", request).await
        }
        NotebookAction::Update { notebook_id, file } => {
            let body = session.read_body(&file)?;
            let request = ApiRequest::put(format!("/api/v1/notebooks/{}", notebook_id), body);
            show(session, "notebooks update", "update notebook", request).await
        }
        NotebookAction::Delete { notebook_id } => {
            destroy(
                session,
                "notebooks delete",
                &format!("Delete notebook {}?", notebook_id),
                "delete notebook",
                ApiRequest::delete(format!("/api/v1/notebooks/{}", notebook_id)),
                &format!("Notebook {} deleted.", notebook_id),
            )
            .await
        }
    }
}

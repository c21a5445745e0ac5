//! cases command - Case management
//!
//! State changes (archive, assign, priority, status) are POSTs to
//! `/api/v2/cases/{id}/<action>` with a JSON:API body of type `case`.

use anyhow::Result;
use serde_json::{json, Value};

use super::{destroy, json_api, show};
use crate::cli::args::{CaseAction, CaseProjectAction};
use crate::client::ApiRequest;
use crate::session::Session;

const CASE_TYPE: &str = "case";

fn case_action(case_id: &str, action: &str, body: Value) -> ApiRequest {
    ApiRequest::post(format!("/api/v2/cases/{}/{}", case_id, action), body)
}

pub async fn run(session: &mut Session, action: CaseAction) -> Result<()> {
    match action {
        CaseAction::Search { query, page_size } => {
            let request = ApiRequest::get("/api/v2/cases")
                .query("page[size]", page_size)
                .query_opt("filter", query);
            show(session, "cases search", "search cases", request).await
        }
        CaseAction::Get { case_id } => {
            let request = ApiRequest::get(format!("/api/v2/cases/{}", case_id));
            show(session, "cases get", "get case", request).await
        }
        CaseAction::Create { file } => {
            let body = session.read_body(&file)?;
            let request = ApiRequest::post("/api/v2/cases", body);
            show(session, "cases create", "create case", request).await
        }
        CaseAction::Archive { case_id } => {
            let body = json!({ "data": { "type": CASE_TYPE } });
            destroy(
                session,
                "cases archive",
                &format!("Archive case {}?", case_id),
                "archive case",
                case_action(&case_id, "archive", body),
                &format!("Case {} archived.", case_id),
            )
            .await
        }
        CaseAction::Unarchive { case_id } => {
            let body = json!({ "data": { "type": CASE_TYPE } });
            let request = case_action(&case_id, "unarchive", body);
            show(session, "cases unarchive", "unarchive case", request).await
        }
        CaseAction::Assign { case_id, user_id } => {
            let body = json_api(CASE_TYPE, json!({ "assignee_id": user_id }));
            let request = case_action(&case_id, "assign", body);
            show(session, "cases assign", "assign case", request).await
        }
        CaseAction::UpdatePriority { case_id, priority } => {
            let body = json_api(CASE_TYPE, json!({ "priority": priority.as_str() }));
            let request = case_action(&case_id, "priority", body);
            show(session, "cases update-priority", "update case priority", request).await
        }
        CaseAction::UpdateStatus { case_id, status } => {
            let body = json_api(CASE_TYPE, json!({ "status": status.as_str() }));
            let request = case_action(&case_id, "status", body);
            show(session, "cases update-status", "update case status", request).await
        }
        CaseAction::Projects { action } => projects(session, action).await,
    }
}

async fn projects(session: &mut Session, action: CaseProjectAction) -> Result<()> {
    match action {
        CaseProjectAction::List => {
            let request = ApiRequest::get("/api/v2/cases/projects");
            show(session, "cases projects list", "list projects", request).await
        }
        CaseProjectAction::Get { project_id } => {
            let request = ApiRequest::get(format!("/api/v2/cases/projects/{}", project_id));
            show(session, "cases projects get", "get project", request).await
        }
        CaseProjectAction::Create { name, key } => {
            let body = json_api("project", json!({ "name": name, "key": key }));
            let request = ApiRequest::post("/api/v2/cases/projects", body);
            show(session, "cases projects create", "create project", request).await
        }
        CaseProjectAction::Delete { project_id } => {
            destroy(
                session,
                "cases projects delete",
                &format!("Delete project {}?", project_id),
                "delete project",
                ApiRequest::delete(format!("/api/v2/cases/projects/{}", project_id)),
                &format!("Project {} deleted.", project_id),
            )
            .await
        }
    }
}

//! on-call command - Teams and memberships

use anyhow::Result;
use serde_json::json;

use super::{destroy, json_api, show};
use crate::cli::args::{MembershipAction, OnCallAction, TeamAction, TeamRole};
use crate::client::ApiRequest;
use crate::session::Session;

pub async fn run(session: &mut Session, action: OnCallAction) -> Result<()> {
    match action {
        OnCallAction::Teams { action } => teams(session, action).await,
        OnCallAction::Memberships { action } => memberships(session, action).await,
    }
}

async fn teams(session: &mut Session, action: TeamAction) -> Result<()> {
    match action {
        TeamAction::List => {
            let request = ApiRequest::get("/api/v2/team");
            show(session, "on-call teams list", "list teams", request).await
        }
        TeamAction::Get { team_id } => {
            let request = ApiRequest::get(format!("/api/v2/team/{}", team_id));
            show(session, "on-call teams get", "get team", request).await
        }
        TeamAction::Create { name, handle } => {
            let body = json_api("team", json!({ "name": name, "handle": handle }));
            let request = ApiRequest::post("/api/v2/team", body);
            show(session, "on-call teams create", "create team", request).await
        }
        TeamAction::Update {
            team_id,
            name,
            handle,
        } => {
            let body = json_api("team", json!({ "name": name, "handle": handle }));
            let request = ApiRequest::patch(format!("/api/v2/team/{}", team_id), body);
            show(session, "on-call teams update", "update team", request).await
        }
        TeamAction::Delete { team_id } => {
            destroy(
                session,
                "on-call teams delete",
                &format!("Delete team '{}'?", team_id),
                "delete team",
                ApiRequest::delete(format!("/api/v2/team/{}", team_id)),
                &format!("Team '{}' deleted.", team_id),
            )
            .await
        }
    }
}

async fn memberships(session: &mut Session, action: MembershipAction) -> Result<()> {
    match action {
        MembershipAction::List { team_id, page_size } => {
            let request = ApiRequest::get(format!("/api/v2/team/{}/memberships", team_id))
                .query("page[size]", page_size);
            show(session, "on-call memberships list", "list team members", request).await
        }
        MembershipAction::Add {
            team_id,
            user_id,
            role,
        } => {
            let role = match role {
                TeamRole::Member => None,
                TeamRole::Admin => Some("admin"),
            };
            let body = json!({
                "data": {
                    "type": "team_memberships",
                    "attributes": { "role": role },
                    "relationships": {
                        "user": { "data": { "type": "users", "id": user_id } }
                    },
                }
            });
            let request =
                ApiRequest::post(format!("/api/v2/team/{}/memberships", team_id), body);
            show(session, "on-call memberships add", "add team member", request).await
        }
        MembershipAction::Remove { team_id, user_id } => {
            destroy(
                session,
                "on-call memberships remove",
                &format!("Remove user {} from team {}?", user_id, team_id),
                "remove team member",
                ApiRequest::delete(format!("/api/v2/team/{}/memberships/{}", team_id, user_id)),
                &format!("User {} removed from team {}.", user_id, team_id),
            )
            .await
        }
    }
}

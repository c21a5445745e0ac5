//! api-keys command - Manage organization API keys
//!
//! These endpoints reject bearer tokens, so every call here goes through
//! the API-key client.

use anyhow::Result;
use serde_json::json;

use super::{destroy, json_api, show};
use crate::cli::args::ApiKeyAction;
use crate::client::ApiRequest;
use crate::session::Session;

pub async fn run(session: &mut Session, action: ApiKeyAction) -> Result<()> {
    match action {
        ApiKeyAction::List => {
            let request = ApiRequest::get("/api/v2/api_keys");
            show(session, "api-keys list", "list API keys", request).await
        }
        ApiKeyAction::Get { key_id } => {
            let request = ApiRequest::get(format!("/api/v2/api_keys/{}", key_id));
            show(session, "api-keys get", "get API key", request).await
        }
        ApiKeyAction::Create { name } => {
            let body = json_api("api_keys", json!({ "name": name }));
            let request = ApiRequest::post("/api/v2/api_keys", body);
            show(session, "api-keys create", "create API key", request).await
        }
        ApiKeyAction::Delete { key_id } => {
            destroy(
                session,
                "api-keys delete",
                &format!("Delete API key {}? Applications using it will stop working.", key_id),
                "delete API key",
                ApiRequest::delete(format!("/api/v2/api_keys/{}", key_id)),
                &format!("API key {} deleted.", key_id),
            )
            .await
        }
    }
}

//! security command - Detection rules, signals, findings, content packs

use anyhow::Result;
use serde_json::json;

use super::show;
use crate::cli::args::{
    ContentPackAction, FindingAction, RiskScoreAction, RuleAction, SecurityAction, SignalAction,
};
use crate::client::ApiRequest;
use crate::core::time::parse_time_rfc3339;
use crate::session::Session;

const RULES: &str = "/api/v2/security_monitoring/rules";
const CONTENT_PACKS: &str = "/api/v2/security_monitoring/content_packs";

pub async fn run(session: &mut Session, action: SecurityAction) -> Result<()> {
    match action {
        SecurityAction::Rules { action } => match action {
            RuleAction::List => {
                let request = ApiRequest::get(RULES);
                show(session, "security rules list", "list security rules", request).await
            }
            RuleAction::Get { rule_id } => {
                let request = ApiRequest::get(format!("{}/{}", RULES, rule_id));
                show(session, "security rules get", "get security rule", request).await
            }
        },
        SecurityAction::Signals {
            action: SignalAction::Search { query, range },
        } => {
            let body = json!({
                "filter": {
                    "query": query,
                    "from": parse_time_rfc3339(&range.from)?,
                    "to": parse_time_rfc3339(&range.to)?,
                },
                "page": { "limit": range.limit },
                "sort": "-timestamp",
            });
            let request = ApiRequest::post("/api/v2/security_monitoring/signals/search", body);
            show(session, "security signals search", "search security signals", request).await
        }
        SecurityAction::Findings {
            action: FindingAction::Search { query, limit },
        } => {
            let request = ApiRequest::get("/api/v2/posture_management/findings")
                .query("page[limit]", limit)
                .query_opt("filter[tags]", query);
            show(session, "security findings search", "search findings", request).await
        }
        SecurityAction::ContentPacks { action } => match action {
            ContentPackAction::List => {
                let request = ApiRequest::get(CONTENT_PACKS);
                show(
                    session,
                    "security content-packs list",
                    "list content packs",
                    request,
                )
                .await
            }
            ContentPackAction::Activate { pack_id } => {
                toggle_pack(session, &pack_id, "activate").await
            }
            ContentPackAction::Deactivate { pack_id } => {
                toggle_pack(session, &pack_id, "deactivate").await
            }
        },
        SecurityAction::RiskScores {
            action: RiskScoreAction::List { query },
        } => {
            let request =
                ApiRequest::get("/api/v2/entity_risk_scores").query_opt("filter[query]", query);
            show(session, "security risk-scores list", "list risk scores", request).await
        }
    }
}

async fn toggle_pack(session: &mut Session, pack_id: &str, verb: &str) -> Result<()> {
    let request = ApiRequest::post(format!("{}/{}/{}", CONTENT_PACKS, pack_id, verb), json!({}));
    let data = session
        .call(&format!("{} content pack", verb), request)
        .await?;
    if data.is_null() {
        session.println(format!("Content pack {} {}d.", pack_id, verb))
    } else {
        session.emit_for(&format!("security content-packs {}", verb), &data)
    }
}

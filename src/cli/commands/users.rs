use serde_json::json;

use crate::cli::utils::output_success;
use crate::cli::OutputFormat;
use crate::database::models::Role;
use crate::state::AppState;

pub async fn set_role(
    state: &AppState,
    email: &str,
    role: Role,
    output_format: OutputFormat,
) -> anyhow::Result<()> {
    let user = state
        .auth
        .set_role(email, role)
        .await
        .map_err(|e| anyhow::anyhow!("{}", e))?;
    output_success(
        &output_format,
        &format!("{} is now {}", user.email, user.role),
        Some(json!({ "user": user })),
    )
}

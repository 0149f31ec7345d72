use serde_json::json;

use crate::cli::utils::output_success;
use crate::cli::OutputFormat;
use crate::database::DatabaseManager;
use crate::state::AppState;

pub async fn migrate(db: &DatabaseManager, output_format: OutputFormat) -> anyhow::Result<()> {
    db.migrate().await?;
    output_success(&output_format, "Migrations applied", None)
}

pub async fn purge_sessions(state: &AppState, output_format: OutputFormat) -> anyhow::Result<()> {
    let removed = state
        .auth
        .purge_expired()
        .await
        .map_err(|e| anyhow::anyhow!("{}", e))?;
    output_success(
        &output_format,
        &format!("Removed {} expired session(s)", removed),
        Some(json!({ "removed": removed })),
    )
}

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Request body for capturing a backup.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BackupRequest {
    /// Name of the database to snapshot. Must match `^[A-Za-z0-9_-]{1,63}$`.
    pub db_name: String,
}

/// Envelope returned by the restore endpoint, for success and failure alike.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RestoreResponse {
    pub success: bool,
    pub message: String,
}

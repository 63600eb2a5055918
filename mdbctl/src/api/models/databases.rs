use crate::db::catalog::DatabaseInfo;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A user database as reported by the deployment.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DatabaseResponse {
    pub name: String,
    /// Total size on disk, in bytes.
    pub size_on_disk: u64,
    pub empty: bool,
}

impl DatabaseResponse {
    pub fn from_info(info: &DatabaseInfo) -> Self {
        Self {
            name: info.name.clone(),
            size_on_disk: info.size_on_disk,
            empty: info.empty,
        }
    }
}

/// Request body for provisioning a database.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateDatabaseRequest {
    /// Name of the database to create. Must match `^[A-Za-z0-9_-]{1,63}$`.
    pub database_name: String,
    /// Optional comma-separated list of initial collections. When omitted, a
    /// single `default_collection` is created to materialize the database.
    pub collections: Option<String>,
}

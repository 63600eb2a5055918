pub mod backups;
pub mod collections;
pub mod databases;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Simple confirmation payload for provisioning operations.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

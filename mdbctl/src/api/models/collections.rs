use crate::db::catalog::{CollectionInfo, CollectionKind};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum CollectionTypeResponse {
    Collection,
    View,
}

/// A collection or view within a database.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CollectionResponse {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: CollectionTypeResponse,
}

impl CollectionResponse {
    pub fn from_info(info: &CollectionInfo) -> Self {
        Self {
            name: info.name.clone(),
            kind: match info.kind {
                CollectionKind::View => CollectionTypeResponse::View,
                CollectionKind::Collection => CollectionTypeResponse::Collection,
            },
        }
    }
}

/// Result of a JSON import.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ImportResponse {
    pub inserted_count: u64,
}

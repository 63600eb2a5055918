//! OpenAPI documentation for the management API at `/admin/api/v1/*`.

use crate::api;
use crate::api::models::backups::{BackupRequest, RestoreResponse};
use crate::api::models::collections::{CollectionResponse, CollectionTypeResponse, ImportResponse};
use crate::api::models::databases::{CreateDatabaseRequest, DatabaseResponse};
use crate::api::models::MessageResponse;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "mdbctl Management API",
        description = "Provisioning, inspection, backup and restore for MongoDB deployments"
    ),
    servers(
        (url = "/admin/api/v1", description = "Management API")
    ),
    paths(
        api::handlers::backups::create_backup,
        api::handlers::backups::restore_backup,
        api::handlers::databases::list_databases,
        api::handlers::databases::create_database,
        api::handlers::databases::delete_database,
        api::handlers::collections::list_collections,
        api::handlers::collections::export_collection,
        api::handlers::collections::import_collection,
    ),
    components(
        schemas(
            BackupRequest,
            RestoreResponse,
            DatabaseResponse,
            CreateDatabaseRequest,
            MessageResponse,
            CollectionResponse,
            CollectionTypeResponse,
            ImportResponse,
        )
    ),
    tags(
        (name = "backups", description = "Snapshot capture and restore"),
        (name = "databases", description = "Database provisioning and listing"),
        (name = "collections", description = "Collection listing and JSON transfer")
    )
)]
pub struct ApiDoc;

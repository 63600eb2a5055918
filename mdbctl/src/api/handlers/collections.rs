use crate::api::models::collections::{CollectionResponse, ImportResponse};
use crate::errors::{Error, Result};
use crate::types::{CollectionName, DatabaseName};
use crate::AppState;
use axum::{
    extract::{Path, State},
    http::{header, HeaderValue},
    response::{IntoResponse, Response},
    Json,
};

#[utoipa::path(
    get,
    path = "/databases/{db}/collections",
    tag = "collections",
    summary = "List collections",
    responses(
        (status = 200, description = "Collections and views of the database", body = [CollectionResponse]),
        (status = 400, description = "Invalid database name")
    ),
    params(
        ("db" = String, Path, description = "Database to inspect")
    )
)]
pub async fn list_collections(State(state): State<AppState>, Path(db): Path<String>) -> Result<Json<Vec<CollectionResponse>>> {
    let database = DatabaseName::new(db)?;

    let collections = state.catalog.list_collections(&database).await?;
    Ok(Json(collections.iter().map(CollectionResponse::from_info).collect()))
}

#[utoipa::path(
    get,
    path = "/databases/{db}/collections/{collection}/documents",
    tag = "collections",
    summary = "Export collection as JSON",
    description = "Returns every document as relaxed Extended JSON, served as a download. \
                   An empty collection exports as `{\"empty\": true}`.",
    responses(
        (status = 200, description = "Exported documents", body = serde_json::Value),
        (status = 400, description = "Invalid identifier")
    ),
    params(
        ("db" = String, Path, description = "Database to export from"),
        ("collection" = String, Path, description = "Collection to export")
    )
)]
pub async fn export_collection(State(state): State<AppState>, Path((db, collection)): Path<(String, String)>) -> Result<Response> {
    let database = DatabaseName::new(db)?;
    let collection = CollectionName::new(collection)?;

    let documents = state.catalog.export_collection(&database, &collection).await?;

    let filename = format!("{database}_{collection}_export.json");
    let disposition = HeaderValue::from_str(&format!("attachment; filename=\"{filename}\""))
        .map_err(|err| Error::Other(anyhow::anyhow!("invalid content-disposition header: {err}")))?;

    Ok(([(header::CONTENT_DISPOSITION, disposition)], Json(documents)).into_response())
}

#[utoipa::path(
    post,
    path = "/databases/{db}/collections/{collection}/documents",
    tag = "collections",
    summary = "Import JSON documents",
    description = "Insert the posted JSON object, or array of objects, into the collection.",
    request_body = serde_json::Value,
    responses(
        (status = 200, description = "Documents inserted", body = ImportResponse),
        (status = 400, description = "Invalid identifier or payload")
    ),
    params(
        ("db" = String, Path, description = "Target database"),
        ("collection" = String, Path, description = "Target collection")
    )
)]
pub async fn import_collection(
    State(state): State<AppState>,
    Path((db, collection)): Path<(String, String)>,
    Json(payload): Json<serde_json::Value>,
) -> Result<Json<ImportResponse>> {
    let database = DatabaseName::new(db)?;
    let collection = CollectionName::new(collection)?;

    let inserted_count = state.catalog.import_collection(&database, &collection, payload).await?;

    Ok(Json(ImportResponse { inserted_count }))
}

use crate::api::models::databases::{CreateDatabaseRequest, DatabaseResponse};
use crate::api::models::MessageResponse;
use crate::errors::Result;
use crate::types::{CollectionName, DatabaseName};
use crate::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

#[utoipa::path(
    get,
    path = "/databases",
    tag = "databases",
    summary = "List databases",
    description = "Returns the user databases of the managed deployment. System databases are filtered out.",
    responses(
        (status = 200, description = "List of databases", body = [DatabaseResponse]),
        (status = 503, description = "Deployment unreachable")
    )
)]
pub async fn list_databases(State(state): State<AppState>) -> Result<Json<Vec<DatabaseResponse>>> {
    let databases = state.catalog.list_databases().await?;
    Ok(Json(databases.iter().map(DatabaseResponse::from_info).collect()))
}

#[utoipa::path(
    post,
    path = "/databases",
    tag = "databases",
    summary = "Create database",
    description = "Create a database with the given initial collections (or a single placeholder collection).",
    request_body = CreateDatabaseRequest,
    responses(
        (status = 201, description = "Database created", body = MessageResponse),
        (status = 400, description = "Invalid database or collection name")
    )
)]
pub async fn create_database(
    State(state): State<AppState>,
    Json(request): Json<CreateDatabaseRequest>,
) -> Result<(StatusCode, Json<MessageResponse>)> {
    let database = DatabaseName::new(&request.database_name)?;

    let collections = request
        .collections
        .as_deref()
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(CollectionName::new)
        .collect::<std::result::Result<Vec<_>, _>>()?;

    state.catalog.create_database(&database, &collections).await?;

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse {
            message: format!("Database {database} created"),
        }),
    ))
}

#[utoipa::path(
    delete,
    path = "/databases/{db}",
    tag = "databases",
    summary = "Drop database",
    responses(
        (status = 200, description = "Database dropped", body = MessageResponse),
        (status = 400, description = "Invalid database name")
    ),
    params(
        ("db" = String, Path, description = "Name of the database to drop")
    )
)]
pub async fn delete_database(State(state): State<AppState>, Path(db): Path<String>) -> Result<Json<MessageResponse>> {
    let database = DatabaseName::new(db)?;

    state.catalog.drop_database(&database).await?;

    Ok(Json(MessageResponse {
        message: format!("Database {database} dropped"),
    }))
}

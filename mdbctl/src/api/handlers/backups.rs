use crate::api::models::backups::{BackupRequest, RestoreResponse};
use crate::errors::{Error, Result};
use crate::ops::scratch::ScratchFile;
use crate::types::DatabaseName;
use crate::AppState;
use axum::{
    extract::{Multipart, State},
    http::{header, HeaderValue},
    response::{IntoResponse, Response},
    Json,
};
use std::path::Path;

#[utoipa::path(
    post,
    path = "/backups",
    tag = "backups",
    summary = "Capture a backup",
    description = "Dump the named database into a compressed archive and return it as a binary download.",
    request_body = BackupRequest,
    responses(
        (status = 200, description = "Archive bytes", content_type = "application/gzip", body = Vec<u8>),
        (status = 400, description = "Invalid database name"),
        (status = 502, description = "The dump tool failed", body = RestoreResponse)
    )
)]
pub async fn create_backup(State(state): State<AppState>, Json(request): Json<BackupRequest>) -> Result<Response> {
    let database = DatabaseName::new(&request.db_name)?;

    let artifact = state.backups.capture(&database).await?;

    let filename = format!("{database}_{}.gz", artifact.id);
    let disposition = HeaderValue::from_str(&format!("attachment; filename=\"{filename}\""))
        .map_err(|err| Error::Other(anyhow::anyhow!("invalid content-disposition header: {err}")))?;

    let headers = [
        (header::CONTENT_TYPE, HeaderValue::from_static("application/gzip")),
        (header::CONTENT_DISPOSITION, disposition),
    ];
    Ok((headers, artifact.content).into_response())
}

#[utoipa::path(
    post,
    path = "/backups/restore",
    tag = "backups",
    summary = "Restore from an uploaded backup",
    description = "Apply an uploaded archive to the named database, replacing its existing collections.",
    request_body(
        content_type = "multipart/form-data",
        description = "Form fields: `dbName` (target database) and `backupFile` (the archive)"
    ),
    responses(
        (status = 200, description = "Restore completed", body = RestoreResponse),
        (status = 400, description = "Missing or invalid form fields"),
        (status = 502, description = "The restore tool failed", body = RestoreResponse)
    )
)]
pub async fn restore_backup(State(state): State<AppState>, mut multipart: Multipart) -> Result<Json<RestoreResponse>> {
    let mut db_name: Option<String> = None;
    let mut upload: Option<(String, bytes::Bytes)> = None;

    while let Some(field) = multipart.next_field().await.map_err(|err| Error::BadRequest {
        message: format!("Failed to parse multipart data: {err}"),
    })? {
        let field_name = field.name().unwrap_or("").to_string();

        match field_name.as_str() {
            "dbName" => {
                db_name = Some(field.text().await.map_err(|err| Error::BadRequest {
                    message: format!("Failed to read dbName: {err}"),
                })?);
            }
            "backupFile" => {
                let original_name = field
                    .file_name()
                    .map(|name| name.to_string())
                    .unwrap_or_else(|| "backup.gz".to_string());
                let bytes = field.bytes().await.map_err(|err| Error::BadRequest {
                    message: format!("Failed to read backupFile: {err}"),
                })?;
                upload = Some((original_name, bytes));
            }
            _ => {
                // Ignore unknown fields (forward compatibility)
            }
        }
    }

    let db_name = db_name.ok_or_else(|| Error::BadRequest {
        message: "Missing required field: 'dbName'".to_string(),
    })?;
    let database = DatabaseName::new(db_name)?;

    let (original_name, bytes) = upload.ok_or_else(|| Error::BadRequest {
        message: "Missing required field: 'backupFile'".to_string(),
    })?;
    if bytes.is_empty() {
        return Err(Error::BadRequest {
            message: "Uploaded archive is empty".to_string(),
        });
    }

    // The upload keeps its original extension so the remote scratch path
    // computed by the pipeline matches the archive format.
    let extension = Path::new(&original_name)
        .extension()
        .map(|ext| ext.to_string_lossy().into_owned())
        .unwrap_or_else(|| "gz".to_string());

    // The handler owns the local scratch copy; the guard removes it on every
    // exit path, including pipeline failure.
    let scratch = ScratchFile::unique_in_dir(&state.config.backup.scratch_dir, "upload", &extension);
    scratch
        .write(&bytes)
        .await
        .map_err(|err| Error::Other(anyhow::anyhow!("failed to stage uploaded archive: {err}")))?;

    tracing::info!(database = %database, bytes = bytes.len(), "received restore archive");

    state.restores.restore(&database, scratch.path()).await?;
    scratch.remove().await;

    Ok(Json(RestoreResponse {
        success: true,
        message: format!("Database {database} restored"),
    }))
}

//! API layer for HTTP request handling and data models.
//!
//! - **[`handlers`]**: Axum route handlers for all API endpoints
//! - **[`models`]**: Request/response data structures for API communication
//!
//! The management API lives under `/admin/api/v1`:
//!
//! - **Backups** (`/backups`, `/backups/restore`): snapshot capture and
//!   restore-from-upload
//! - **Databases** (`/databases/*`): listing, provisioning, deletion
//! - **Collections** (`/databases/{db}/collections/*`): listing, JSON export
//!   and import
//!
//! All endpoints are documented with OpenAPI annotations using `utoipa`;
//! the rendered documentation is served at `/admin/docs`.

pub mod handlers;
pub mod models;

//! Backup and restore orchestration.
//!
//! This module owns the one genuinely stateful workflow in the service:
//! capturing a database snapshot through an external dump tool and applying
//! an uploaded snapshot through a restore tool running inside a container.
//! Everything here is built around three rules:
//!
//! - **Structured invocations.** External commands are argument vectors
//!   ([`command::ToolCommand`]), never shell strings, and the database name
//!   slot only accepts the validated [`crate::types::DatabaseName`].
//! - **Scratch discipline.** Transient archives are owned by a
//!   [`scratch::ScratchFile`] guard and are removed on every exit path.
//! - **Distrust of exit codes.** Both pipelines apply post-condition checks
//!   (output file existence, diagnostic-stream scan) because the tools can
//!   exit zero while having failed.
//!
//! # Modules
//!
//! - [`command`]: command construction, the [`command::ToolRunner`] seam and
//!   the real [`command::SystemRunner`]
//! - [`scratch`]: scoped temporary files
//! - [`capture`]: the backup capture service
//! - [`restore`]: the restore pipeline

pub mod capture;
pub mod command;
pub mod restore;
pub mod scratch;

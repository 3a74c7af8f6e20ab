//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate remote and repository calls into use-case level APIs.
//! - Keep callers decoupled from storage and transport details.
//!
//! # See also
//! - docs/architecture/upload.md

pub mod quest_upload;

//! Remote note service contracts.

pub mod note_api;

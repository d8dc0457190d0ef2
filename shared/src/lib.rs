//! Shared types for the menu server
//!
//! Common types used by the server and its HTTP clients: menu and settings
//! models, error codes and response structures.

pub mod error;
pub mod models;

// Re-exports
pub use axum::{Json, body};
pub use http;
pub use serde::{Deserialize, Serialize};

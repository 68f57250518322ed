//! HTTP server for the built search UI
//!
//! Serves static assets and falls back to the index document for any path
//! that is not an asset, so client-side routes resolve.

pub mod models;
pub mod server;

pub use server::{router, serve};

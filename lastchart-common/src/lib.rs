//! Shared library for the LastChart services
//!
//! Holds the pieces every member needs: the common error type, root folder
//! and database path resolution, database initialization, the catalog store,
//! and the API payload types exchanged between server and web client.

pub mod api;
pub mod config;
pub mod db;
pub mod error;

pub use error::{Error, Result};

//! Shared API payload types

pub mod types;

//! HTTP API handlers for lastchart-server

pub mod artists;
pub mod auth;
pub mod health;
pub mod ui;

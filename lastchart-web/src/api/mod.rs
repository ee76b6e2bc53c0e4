//! HTTP handlers for lastchart-web

pub mod health;
pub mod ui;

//! Database access layer shared by the LastChart services

pub mod catalog;
mod init;

pub use init::{init_database, init_in_memory};

//! CLI command handlers

pub mod diag;
pub mod embed;
pub mod init;
pub mod projects;
pub mod search;
pub mod seed;
pub mod status;

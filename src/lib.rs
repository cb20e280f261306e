pub mod api;
pub mod backend;
pub mod config;
pub mod errorlog;
pub mod humanize;
pub mod import;
pub mod observability;

//! Kudu REST API
//!
//! [`client::KuduClient`] carries the transport; the other modules add the
//! endpoint-specific operations to it.

pub mod app_settings;
pub mod client;
pub mod command;
pub mod vfs;
pub mod zip_deploy;

//! Local filesystem helpers

pub mod archive;
pub mod file;

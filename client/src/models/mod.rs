//! Wire models of the Kudu API

pub mod command;
pub mod vfs;

//! CLI command implementations.

pub mod explain;
pub mod init;
pub mod run;
pub mod validate;

//! Pipeline configuration for pipesim.
//!
//! This crate provides:
//! - YAML loading into raw documents
//! - Conversion into the typed [`Module`] / [`TestCase`] model
//! - Validation of names, references, and durations
//!
//! # Example
//!
//! ```rust,ignore
//! use pipesim_config::PipelineConfig;
//!
//! let config = PipelineConfig::from_yaml_str(r#"
//! modules:
//!   - name: core
//!     payload: "src@abc123"
//! tests:
//!   - name: unit-core
//!     module: core
//! "#)?;
//! assert_eq!(config.modules.len(), 1);
//! ```

#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod error;
pub mod loader;
pub mod model;
pub mod validate;

pub use error::{Error, Result};
pub use loader::{DEFAULT_MODULE_SECONDS, DEFAULT_TEST_SECONDS};
pub use model::{Module, PipelineConfig, TestCase};
pub use validate::validate;

//! Error types for pipeline configuration.

use thiserror::Error;

/// Errors that can occur while loading or validating a pipeline config.
#[derive(Debug, Error)]
pub enum Error {
    /// The YAML document is not a mapping at the top level.
    #[error("top-level YAML must be a mapping")]
    NotMapping,

    /// A module has an empty or missing name.
    #[error("all modules must have a non-empty 'name'")]
    EmptyModuleName,

    /// Two or more modules share a name.
    #[error("duplicate module names: {0:?}")]
    DuplicateModuleNames(Vec<String>),

    /// A module has no payload.
    #[error("module '{0}' missing 'payload'")]
    MissingPayload(String),

    /// A module duration is negative or not a finite number.
    #[error("module '{module}' has invalid 'seconds': {seconds}")]
    InvalidModuleSeconds {
        /// Module name.
        module: String,
        /// Offending value.
        seconds: f64,
    },

    /// A test has an empty or missing name.
    #[error("all tests must have a non-empty 'name'")]
    EmptyTestName,

    /// Two or more tests share a name.
    #[error("duplicate test names: {0:?}")]
    DuplicateTestNames(Vec<String>),

    /// A test references a module that is not declared.
    #[error("test '{test}' references unknown module '{module}'")]
    UnknownModuleRef {
        /// Test name.
        test: String,
        /// The module name that failed to resolve.
        module: String,
    },

    /// A test duration is negative or not a finite number.
    #[error("test '{test}' has invalid 'seconds': {seconds}")]
    InvalidTestSeconds {
        /// Test name.
        test: String,
        /// Offending value.
        seconds: f64,
    },

    /// Malformed YAML or wrong field types.
    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    /// I/O error reading the config file.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Result type alias for configuration operations.
pub type Result<T> = std::result::Result<T, Error>;

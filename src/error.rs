use std::path::PathBuf;
use thiserror::Error;

/// doc2md error types
#[derive(Error, Debug)]
pub enum Error {
    #[error("Usage: {program} <file.py>")]
    Usage { program: String },

    #[error("Failed to import '{path}': {message}")]
    Load { path: PathBuf, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Config validation error: {0}")]
    ConfigValidation(String),

    #[error("Parser error: {0}")]
    Parser(String),
}

/// Result type alias for doc2md operations
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a usage error for the given program name
    pub fn usage(program: impl Into<String>) -> Self {
        Error::Usage {
            program: program.into(),
        }
    }

    /// Create a module load error
    pub fn load(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Error::Load {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a config validation error
    pub fn config_validation(msg: impl Into<String>) -> Self {
        Error::ConfigValidation(msg.into())
    }

    /// Create a parser error
    pub fn parser(msg: impl Into<String>) -> Self {
        Error::Parser(msg.into())
    }

    /// Process exit status for this error.
    ///
    /// Load failures exit with 2, everything else with 1.
    pub fn exit_code(&self) -> u8 {
        match self {
            Error::Load { .. } => 2,
            _ => 1,
        }
    }
}

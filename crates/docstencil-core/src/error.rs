use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    // Resolution errors
    #[error("VARIABLE_NOT_FOUND: no value for identifier '{identifier}'")]
    VariableNotFound { identifier: String },

    #[error("INCORRECT_IDENTIFIER: '{identifier}': {reason}")]
    IncorrectIdentifier { identifier: String, reason: String },

    #[error("INCORRECT_TYPE: '{identifier}': expected {expected}, found {found}")]
    IncorrectType {
        identifier: String,
        expected: &'static str,
        found: &'static str,
    },

    // Replacement errors
    #[error("PICTURE_SOURCE_INVALID: '{identifier}': {reason}")]
    PictureSource { identifier: String, reason: String },

    #[error("DEPTH_EXCEEDED: deferred work nested past {limit} levels")]
    DepthExceeded { limit: u32 },

    // Config errors
    #[error("CONFIG_PARSE_ERROR: {0}")]
    ConfigParseError(String),

    // Data errors
    #[error("DATA_PARSE_ERROR: {0}")]
    DataParseError(String),
}

impl From<serde_json::Error> for EngineError {
    fn from(err: serde_json::Error) -> Self {
        EngineError::DataParseError(format!("JSON error: {}", err))
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;

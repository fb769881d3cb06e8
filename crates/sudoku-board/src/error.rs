use std::fmt;

/// Errors from direct board manipulation
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BoardError {
    #[error("cell value {0} out of range 0-9")]
    InvalidValue(u8),

    #[error("position ({row}, {col}) is off the board")]
    OutOfBounds { row: usize, col: usize },
}

/// The four remote actions the board depends on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ServiceAction {
    Generate,
    Solve,
    Validate,
    Recognize,
}

impl ServiceAction {
    /// Generic description used when the service answers with a failure status
    pub fn failure_description(&self) -> &'static str {
        match self {
            ServiceAction::Generate => "Failed to generate puzzle",
            ServiceAction::Solve => "Failed to solve puzzle",
            ServiceAction::Validate => "Failed to validate board",
            ServiceAction::Recognize => "Failed to process image",
        }
    }

    /// Prefix for the user-visible message when the action fails
    pub fn error_prefix(&self) -> &'static str {
        match self {
            ServiceAction::Generate => "Error generating puzzle",
            ServiceAction::Solve => "Error solving puzzle",
            ServiceAction::Validate => "Error validating board",
            ServiceAction::Recognize => "Error processing image",
        }
    }
}

impl fmt::Display for ServiceAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ServiceAction::Generate => "generate",
            ServiceAction::Solve => "solve",
            ServiceAction::Validate => "validate",
            ServiceAction::Recognize => "recognize",
        };
        f.write_str(name)
    }
}

/// Failure of a call to the puzzle service
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// Connection or transport failure
    #[error("{0}")]
    Transport(String),

    /// The service answered with a non-success status
    #[error("{}", .action.failure_description())]
    Status { action: ServiceAction, status: u16 },

    /// The response body did not match the contract
    #[error("malformed response: {0}")]
    Decode(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ServiceError {
    #[must_use]
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport(message.into())
    }

    #[must_use]
    pub fn status(action: ServiceAction, status: u16) -> Self {
        Self::Status { action, status }
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;

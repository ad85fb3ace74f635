use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    ValidationError,
    InvalidStatusTransition,
    CycleDetected,
    UnknownStep,
    ConfigError,
    IoError,
    ScriptError,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ValidationError => "VALIDATION_ERROR",
            Self::InvalidStatusTransition => "INVALID_STATUS_TRANSITION",
            Self::CycleDetected => "CYCLE_DETECTED",
            Self::UnknownStep => "UNKNOWN_STEP",
            Self::ConfigError => "CONFIG_ERROR",
            Self::IoError => "IO_ERROR",
            Self::ScriptError => "SCRIPT_ERROR",
        }
    }
}

#[derive(Debug, Error)]
#[error("{message}")]
pub struct TaskdeskError {
    pub code: ErrorCode,
    pub message: String,
}

impl TaskdeskError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ValidationError, message)
    }

    pub fn ids_exhausted(prefix: &str) -> Self {
        Self::validation(format!("No {prefix}- ids left to mint"))
    }

    pub fn invalid_transition(from: &str, to: &str) -> Self {
        Self::new(
            ErrorCode::InvalidStatusTransition,
            format!("Invalid status transition: {from} → {to}"),
        )
    }

    pub fn cycle_detected() -> Self {
        Self::new(ErrorCode::CycleDetected, "Step dependency cycle detected")
    }

    pub fn unknown_step(step: &str) -> Self {
        Self::new(
            ErrorCode::UnknownStep,
            format!("Dependent step {step} does not match any staged task"),
        )
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConfigError, message)
    }

    pub fn io(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::IoError, message)
    }

    pub fn script(line: usize, message: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::ScriptError,
            format!("line {line}: {}", message.into()),
        )
    }
}

impl From<std::io::Error> for TaskdeskError {
    fn from(e: std::io::Error) -> Self {
        Self::io(e.to_string())
    }
}

//! Error handling for the SysY compiler
//!
//! This module defines the top-level error type that the driver reports.
//! Phase-specific errors convert into it.

use thiserror::Error;

/// Main compiler error type that encompasses all phases of compilation
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CompilerError {
    #[error("IR construction error: {message}")]
    IrConstruction { message: String },

    #[error("Unknown sample '{name}' (run `sysc list` to see the available samples)")]
    UnknownSample { name: String },

    #[error("IO error: {message}")]
    IoError { message: String },

    #[error("Internal compiler error: {message}")]
    InternalError { message: String },
}

impl CompilerError {
    /// Create an IR construction error
    pub fn ir_error(message: String) -> Self {
        CompilerError::IrConstruction { message }
    }

    pub fn unknown_sample(name: &str) -> Self {
        CompilerError::UnknownSample { name: name.to_string() }
    }
}

/// Convert from std::io::Error
impl From<std::io::Error> for CompilerError {
    fn from(err: std::io::Error) -> Self {
        CompilerError::IoError {
            message: err.to_string(),
        }
    }
}

/// Convert from String (for simple error cases)
impl From<String> for CompilerError {
    fn from(message: String) -> Self {
        CompilerError::InternalError { message }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CompilerError::ir_error("bad operand".to_string());
        assert_eq!(err.to_string(), "IR construction error: bad operand");

        let err = CompilerError::unknown_sample("loop");
        assert!(err.to_string().starts_with("Unknown sample 'loop'"));
    }

    #[test]
    fn test_conversions() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        assert_eq!(
            CompilerError::from(io),
            CompilerError::IoError { message: "missing".to_string() }
        );

        let internal: CompilerError = "oops".to_string().into();
        assert_eq!(internal, CompilerError::InternalError { message: "oops".to_string() });
    }
}

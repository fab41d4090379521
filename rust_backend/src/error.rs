//! Error types for the histogram engine.
//!
//! Data-quality problems (malformed rows, missing workflows, degenerate ranges)
//! never surface here: they degrade gracefully inside the engine. Only invalid
//! configuration and unreadable payloads are reported to the caller.

use std::fmt;

/// Result type for engine operations
pub type EngineResult<T> = Result<T, EngineError>;

/// Structured context for engine errors.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ErrorContext {
    /// The operation being performed (e.g., "load_config", "parse_payload")
    pub operation: Option<String>,
    /// The column involved, if any
    pub column: Option<String>,
    /// The workflow involved, if any
    pub workflow: Option<String>,
    /// Additional details about the error
    pub details: Option<String>,
}

impl ErrorContext {
    /// Create a new error context with an operation name.
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            operation: Some(operation.into()),
            ..Default::default()
        }
    }

    /// Set the column name.
    pub fn with_column(mut self, column: impl Into<String>) -> Self {
        self.column = Some(column.into());
        self
    }

    /// Set the workflow identifier.
    pub fn with_workflow(mut self, workflow: impl ToString) -> Self {
        self.workflow = Some(workflow.to_string());
        self
    }

    /// Set additional details.
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if let Some(ref op) = self.operation {
            parts.push(format!("operation={}", op));
        }
        if let Some(ref column) = self.column {
            parts.push(format!("column={}", column));
        }
        if let Some(ref workflow) = self.workflow {
            parts.push(format!("workflow={}", workflow));
        }
        if let Some(ref details) = self.details {
            parts.push(format!("details={}", details));
        }
        write!(f, "[{}]", parts.join(", "))
    }
}

/// Error type for engine operations
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Invalid engine configuration (e.g. a bin count of zero).
    /// Raised before any data is processed.
    #[error("Configuration error: {message} {context}")]
    ConfigurationError {
        message: String,
        context: ErrorContext,
    },

    /// A comparison payload could not be decoded.
    #[error("Parse error: {message} {context}")]
    ParseError {
        message: String,
        context: ErrorContext,
    },
}

impl EngineError {
    /// Create a configuration error with context.
    pub fn configuration_with_context(message: impl Into<String>, context: ErrorContext) -> Self {
        Self::ConfigurationError {
            message: message.into(),
            context,
        }
    }

    /// Create a parse error with context.
    pub fn parse_with_context(message: impl Into<String>, context: ErrorContext) -> Self {
        Self::ParseError {
            message: message.into(),
            context,
        }
    }

    /// Get the error context.
    pub fn context(&self) -> &ErrorContext {
        match self {
            Self::ConfigurationError { context, .. } => context,
            Self::ParseError { context, .. } => context,
        }
    }

    /// Whether this error stems from configuration rather than data.
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::ConfigurationError { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_display() {
        let ctx = ErrorContext::new("parse_payload")
            .with_column("accuracy")
            .with_workflow("run-1")
            .with_details("workflows[0].state");

        assert_eq!(
            ctx.to_string(),
            "[operation=parse_payload, column=accuracy, workflow=run-1, details=workflows[0].state]"
        );
    }

    #[test]
    fn test_empty_context_display() {
        assert_eq!(ErrorContext::default().to_string(), "[]");
    }

    #[test]
    fn test_configuration_error_display() {
        let err = EngineError::configuration_with_context(
            "bin_count must be positive",
            ErrorContext::new("validate_config").with_details("bin_count"),
        );

        assert!(err.is_configuration());
        assert_eq!(err.context().operation.as_deref(), Some("validate_config"));
        assert_eq!(
            err.to_string(),
            "Configuration error: bin_count must be positive [operation=validate_config, details=bin_count]"
        );
    }

    #[test]
    fn test_parse_error_is_not_configuration() {
        let err = EngineError::parse_with_context("bad json", ErrorContext::new("parse_payload"));
        assert!(!err.is_configuration());
    }
}

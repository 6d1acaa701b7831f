//! Error types for the Ohmlab circuit solver.
//!
//! This module provides a unified error type [`OhmlabError`] that covers
//! netlist parsing, schematic construction, and the failure kinds a DC solve
//! can report.

use thiserror::Error;

/// Result type alias using [`OhmlabError`].
pub type Result<T> = std::result::Result<T, OhmlabError>;

/// Unified error type for all Ohmlab operations.
#[derive(Error, Debug)]
pub enum OhmlabError {
    // ============ Netlist Errors ============
    /// Error during lexical analysis
    #[error("Lexer error at line {line}, column {column}: {message}")]
    LexerError {
        line: usize,
        column: usize,
        message: String,
    },

    /// Error during parsing
    #[error("Parse error at line {line}: {message}")]
    ParseError { line: usize, message: String },

    /// Invalid component definition
    #[error("Invalid component '{name}' at line {line}: {message}")]
    InvalidComponent {
        name: String,
        line: usize,
        message: String,
    },

    /// Unknown component type
    #[error("Unknown component type '{component_type}' at line {line}")]
    UnknownComponentType { component_type: String, line: usize },

    /// Invalid parameter value supplied by an edit
    #[error("Invalid parameter '{param}' for component '{component}': {message}")]
    InvalidParameter {
        component: String,
        param: String,
        message: String,
    },

    // ============ Schematic Errors ============
    /// Duplicate component name
    #[error("Duplicate component name '{name}'")]
    DuplicateComponent { name: String },

    /// Component lookup by name failed
    #[error("Component '{name}' not found in schematic")]
    ComponentNotFound { name: String },

    /// A connection or reference names a terminal of a component that does not exist
    #[error("Terminal {terminal} does not belong to any of the {component_count} components")]
    UnknownTerminal {
        terminal: String,
        component_count: usize,
    },

    // ============ Solve Failures ============
    /// No non-reference node exists, so there is nothing to solve for
    #[error("Circuit has no topology to solve - add components and connect them")]
    NoTopology,

    /// The assembled system has no unique solution
    #[error("Singular system - circuit has contradictory or shorted voltage sources")]
    SingularSystem,

    /// A component parameter cannot be interpreted at all
    #[error("Malformed component '{component}': {message}")]
    MalformedComponent { component: String, message: String },

    /// Invalid solve-call parameter (e.g. a non-finite supply voltage)
    #[error("Invalid solve parameter: {message}")]
    InvalidSolveParam { message: String },

    // ============ I/O Errors ============
    /// Error reading netlist file
    #[error("Failed to read netlist file '{path}': {source}")]
    FileReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl OhmlabError {
    /// Create a lexer error
    pub fn lexer(line: usize, column: usize, message: impl Into<String>) -> Self {
        Self::LexerError {
            line,
            column,
            message: message.into(),
        }
    }

    /// Create a parse error
    pub fn parse(line: usize, message: impl Into<String>) -> Self {
        Self::ParseError {
            line,
            message: message.into(),
        }
    }

    /// Create an invalid component error
    pub fn invalid_component(name: impl Into<String>, line: usize, message: impl Into<String>) -> Self {
        Self::InvalidComponent {
            name: name.into(),
            line,
            message: message.into(),
        }
    }

    /// Create a malformed component failure
    pub fn malformed(component: impl Into<String>, message: impl Into<String>) -> Self {
        Self::MalformedComponent {
            component: component.into(),
            message: message.into(),
        }
    }

    /// Whether this error is one of the solve-time failure kinds, as opposed to
    /// an input or I/O error raised before solving starts.
    pub fn is_solve_failure(&self) -> bool {
        matches!(
            self,
            Self::NoTopology
                | Self::SingularSystem
                | Self::MalformedComponent { .. }
                | Self::InvalidSolveParam { .. }
        )
    }
}

use thiserror::Error;

use super::Bounds;

/// A single breach of the diagram contract found after parsing.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DiagramViolation {
    #[error("duplicate element id '{0}'")]
    DuplicateElementId(String),

    #[error("duplicate connection id '{0}'")]
    DuplicateConnectionId(String),

    #[error("arrow '{0}' has no matching connection")]
    ArrowWithoutConnection(String),

    #[error("arrow '{arrow_id}' is referenced by {count} connections")]
    ArrowWithMultipleConnections { arrow_id: String, count: usize },

    #[error("connection '{connection_id}' references missing arrow '{arrow_id}'")]
    MissingArrow {
        connection_id: String,
        arrow_id: String,
    },

    #[error("connection '{connection_id}' uses '{element_id}' as its arrow, but it is not an arrow")]
    NotAConnector {
        connection_id: String,
        element_id: String,
    },

    #[error("arrow '{arrow_id}' points at connection '{declared}', expected '{expected}'")]
    ConnectionIdMismatch {
        arrow_id: String,
        declared: String,
        expected: String,
    },

    #[error("connection '{connection_id}' references missing element '{element_id}'")]
    UnknownEndpoint {
        connection_id: String,
        element_id: String,
    },

    #[error("arrow '{arrow_id}' has {count} point(s), needs at least 2")]
    TooFewPoints { arrow_id: String, count: usize },

    #[error("arrow '{arrow_id}' bounding box {declared} does not match its points {expected}")]
    BoundingBoxMismatch {
        arrow_id: String,
        declared: Bounds,
        expected: Bounds,
    },

    #[error("arrow '{arrow_id}' {field} is not a copy of its {position} point")]
    EndpointMismatch {
        arrow_id: String,
        field: &'static str,
        position: &'static str,
    },

    #[error("diamond '{element_id}' is not square (width {width}, height {height})")]
    DiamondNotSquare {
        element_id: String,
        width: f64,
        height: f64,
    },
}

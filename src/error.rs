use thiserror::Error;

/// Faults that make a validator (or one of its handlers) unusable.
///
/// Request-level violations are never reported through this type; see
/// [`crate::ValidationError`].
#[derive(Error, Debug)]
pub enum SpecError {
    #[error("Invalid Swagger document: {0}")]
    InvalidDocument(String),

    #[error("Invalid validator option: {0}")]
    InvalidOption(String),

    #[error("No operation declared for {method} {path}")]
    UnknownOperation { method: String, path: String },

    #[error("URL '{url}' matches more than one path template: {}", templates.join(", "))]
    AmbiguousRoute { url: String, templates: Vec<String> },

    #[error("Reference not found: {0}")]
    UnresolvedReference(String),

    #[error("Reference cycle detected while resolving: {0}")]
    CyclicReference(String),

    #[error("Invalid path template '{template}': {reason}")]
    InvalidPathTemplate { template: String, reason: String },

    #[error("Failed to read Swagger document: {0}")]
    Io(#[from] std::io::Error),
}

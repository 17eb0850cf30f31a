pub mod body;
pub mod parameter;
pub mod primitive;
pub mod request;
pub mod structural;

pub use primitive::check_primitive;
pub use request::{validate_request, RequestData};
pub use structural::{check_schema, has_extra_fields};

/// Policy every check receives explicitly
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationPolicy {
    /// Reject request fields the document does not declare
    pub strict: bool,
    /// Accept an explicit `null` for any body field
    pub allow_null: bool,
}

impl Default for ValidationPolicy {
    fn default() -> Self {
        Self {
            strict: false,
            allow_null: true,
        }
    }
}

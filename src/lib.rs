pub mod api_validator;
pub mod error;
pub mod handler;
pub mod spec;
pub mod validation_helpers;
pub mod validators;
pub mod violation;

pub use api_validator::{ApiValidator, HttpMethod, ValidatorOptions};
pub use error::SpecError;
pub use handler::{
    ErrorHandler, HttpResponse, OperationHandler, Outcome, Rejection, RequestParts, RouteHandler,
};
pub use spec::{
    load_swagger_spec, ParameterLocation, ParameterSpec, PathMatcherRegistry, PathTemplate,
    PrimitiveKind, ScalarKind, SchemaDocument, SchemaNode,
};
pub use validation_helpers::{normalize_path_syntax, render_errors};
pub use validators::ValidationPolicy;
pub use violation::{ValidationError, ViolationKind};

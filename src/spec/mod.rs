pub mod builder;
pub mod document;
pub mod loader;
pub mod path_matcher;
pub mod reference_resolver;
pub mod swagger;

pub use builder::build_schema_document;
pub use document::{
    OperationMap, ParameterLocation, ParameterSpec, PrimitiveKind, ScalarKind, SchemaDocument,
    SchemaNode,
};
pub use loader::load_swagger_spec;
pub use path_matcher::{PathMatcherRegistry, PathTemplate};
pub use reference_resolver::ResolveReference;

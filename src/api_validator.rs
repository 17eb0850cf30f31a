use crate::error::SpecError;
use crate::handler::{ErrorHandler, HttpResponse, OperationHandler, RequestParts, RouteHandler};
use crate::spec::{ParameterSpec, PathMatcherRegistry, SchemaDocument};
use crate::validation_helpers::normalize_path_syntax;
use crate::validators::{validate_request, RequestData, ValidationPolicy};
use crate::violation::ValidationError;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::str::FromStr;
use std::sync::Arc;

/// HTTP methods a Swagger 2.0 path item can declare
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    GET,
    POST,
    PUT,
    DELETE,
    PATCH,
    HEAD,
    OPTIONS,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::GET => "GET",
            Self::POST => "POST",
            Self::PUT => "PUT",
            Self::DELETE => "DELETE",
            Self::PATCH => "PATCH",
            Self::HEAD => "HEAD",
            Self::OPTIONS => "OPTIONS",
        }
    }
}

impl FromStr for HttpMethod {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "GET" => Ok(Self::GET),
            "POST" => Ok(Self::POST),
            "PUT" => Ok(Self::PUT),
            "DELETE" => Ok(Self::DELETE),
            "PATCH" => Ok(Self::PATCH),
            "HEAD" => Ok(Self::HEAD),
            "OPTIONS" => Ok(Self::OPTIONS),
            _ => Err(()),
        }
    }
}

/// Validator configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
pub struct ValidatorOptions {
    /// Reject undeclared query, path, form and body fields
    pub strict: bool,
    /// Accept an explicit `null` for any body field
    pub allow_null: bool,
}

impl Default for ValidatorOptions {
    fn default() -> Self {
        Self {
            strict: false,
            allow_null: true,
        }
    }
}

impl ValidatorOptions {
    /// Reads options from a loosely typed object such as
    /// `{"strict": true, "allowNull": false}`. Missing keys keep their
    /// defaults; unknown keys and wrong-typed values are rejected.
    pub fn from_value(value: &Value) -> Result<Self, SpecError> {
        if !value.is_object() {
            return Err(SpecError::InvalidOption(
                "options must be an object".to_string(),
            ));
        }

        serde_json::from_value(value.clone()).map_err(|e| SpecError::InvalidOption(e.to_string()))
    }

    pub fn policy(&self) -> ValidationPolicy {
        ValidationPolicy {
            strict: self.strict,
            allow_null: self.allow_null,
        }
    }
}

/// Validates requests against a Swagger 2.0 document.
///
/// Everything is built at construction and never mutated afterwards, so
/// one instance can serve concurrent requests without locking.
pub struct ApiValidator {
    document: SchemaDocument,
    registry: PathMatcherRegistry,
    options: ValidatorOptions,
    error_handler: Option<ErrorHandler>,
}

impl ApiValidator {
    pub fn new(document: &Value, options: ValidatorOptions) -> Result<Self, SpecError> {
        Self::from_document(SchemaDocument::from_value(document)?, options)
    }

    /// Builds a validator from a document and a loosely typed options object
    pub fn from_values(document: &Value, options: &Value) -> Result<Self, SpecError> {
        Self::new(document, ValidatorOptions::from_value(options)?)
    }

    pub fn from_document(
        document: SchemaDocument,
        options: ValidatorOptions,
    ) -> Result<Self, SpecError> {
        let registry = PathMatcherRegistry::compile(document.templates(), document.base_path())?;

        Ok(Self {
            document,
            registry,
            options,
            error_handler: None,
        })
    }

    /// Hands rejected requests to `handler` instead of returning
    /// [`crate::Outcome::Rejected`]
    pub fn with_error_handler<F>(mut self, handler: F) -> Self
    where
        F: Fn(&[ValidationError], &RequestParts) -> HttpResponse + Send + Sync + 'static,
    {
        self.error_handler = Some(Arc::new(handler));
        self
    }

    pub fn document(&self) -> &SchemaDocument {
        &self.document
    }

    pub fn registry(&self) -> &PathMatcherRegistry {
        &self.registry
    }

    pub fn options(&self) -> ValidatorOptions {
        self.options
    }

    pub(crate) fn error_handler(&self) -> Option<&ErrorHandler> {
        self.error_handler.as_ref()
    }

    /// Checks `request` against the operation declared for `method` on
    /// `template` (`{id}` or `:id` syntax).
    pub fn validate(
        &self,
        method: HttpMethod,
        template: &str,
        request: &RequestParts,
    ) -> Result<Vec<ValidationError>, SpecError> {
        let parameters = self.document.parameters(method, template)?;
        self.validate_operation(parameters, &normalize_path_syntax(template), request)
    }

    pub(crate) fn validate_operation(
        &self,
        parameters: &[ParameterSpec],
        template: &str,
        request: &RequestParts,
    ) -> Result<Vec<ValidationError>, SpecError> {
        let extracted;
        let path = match &request.path_params {
            Some(params) => params,
            None => {
                extracted = self.path_variables(template, &request.url);
                &extracted
            }
        };

        let data = RequestData {
            query: &request.query,
            path,
            body: &request.body,
        };
        validate_request(&self.document, self.options.policy(), parameters, data)
    }

    fn path_variables(&self, template: &str, url: &str) -> Map<String, Value> {
        self.registry
            .get(template)
            .map(|t| {
                self.registry
                    .extract_variables(url, t)
                    .into_iter()
                    .map(|(name, value)| (name, Value::String(value)))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Handler for one declared operation. Fails immediately when the
    /// document does not declare it.
    pub fn for_method(
        &self,
        method: HttpMethod,
        template: &str,
    ) -> Result<OperationHandler<'_>, SpecError> {
        let parameters = self.document.parameters(method, template)?;
        Ok(OperationHandler::new(
            self,
            method,
            normalize_path_syntax(template).into_owned(),
            parameters,
        ))
    }

    pub fn get(&self, template: &str) -> Result<OperationHandler<'_>, SpecError> {
        self.for_method(HttpMethod::GET, template)
    }

    pub fn post(&self, template: &str) -> Result<OperationHandler<'_>, SpecError> {
        self.for_method(HttpMethod::POST, template)
    }

    pub fn put(&self, template: &str) -> Result<OperationHandler<'_>, SpecError> {
        self.for_method(HttpMethod::PUT, template)
    }

    pub fn delete(&self, template: &str) -> Result<OperationHandler<'_>, SpecError> {
        self.for_method(HttpMethod::DELETE, template)
    }

    pub fn patch(&self, template: &str) -> Result<OperationHandler<'_>, SpecError> {
        self.for_method(HttpMethod::PATCH, template)
    }

    pub fn head(&self, template: &str) -> Result<OperationHandler<'_>, SpecError> {
        self.for_method(HttpMethod::HEAD, template)
    }

    /// Handler that picks the operation from the request URL
    pub fn all(&self) -> RouteHandler<'_> {
        RouteHandler::new(self)
    }
}

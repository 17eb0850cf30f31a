use std::fmt;

/// Name used in messages for a body parameter that carries the whole payload.
pub const PAYLOAD_LABEL: &str = "the payload within the body";

/// Category of a per-request contract violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViolationKind {
    NotSpecified,
    TypeMismatch,
    UnauthorizedValue,
    ExtraValues,
}

impl ViolationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotSpecified => "PARAMETER_NOT_SPECIFIED",
            Self::TypeMismatch => "PARAMETER_TYPE_MISMATCH",
            Self::UnauthorizedValue => "PARAMETER_UNAUTHORIZED_VALUE",
            Self::ExtraValues => "PARAMETER_EXTRA_VALUES",
        }
    }

    fn describe(&self) -> &'static str {
        match self {
            Self::NotSpecified => "is not specified",
            Self::TypeMismatch => "does not respect its type",
            Self::UnauthorizedValue => "has an unauthorized value",
            Self::ExtraValues => "contains extra values",
        }
    }
}

/// A single violation found while checking one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub kind: ViolationKind,
    pub parameter: String,
}

impl ValidationError {
    pub fn new(kind: ViolationKind, parameter: impl Into<String>) -> Self {
        Self {
            kind,
            parameter: parameter.into(),
        }
    }

    pub fn not_specified(parameter: impl Into<String>) -> Self {
        Self::new(ViolationKind::NotSpecified, parameter)
    }

    pub fn type_mismatch(parameter: impl Into<String>) -> Self {
        Self::new(ViolationKind::TypeMismatch, parameter)
    }

    pub fn unauthorized_value(parameter: impl Into<String>) -> Self {
        Self::new(ViolationKind::UnauthorizedValue, parameter)
    }

    pub fn extra_values(parameter: impl Into<String>) -> Self {
        Self::new(ViolationKind::ExtraValues, parameter)
    }

    /// Human-readable message, e.g. `Parameter : id does not respect its type.`
    pub fn message(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Parameter : {} {}.", self.parameter, self.kind.describe())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn messages_follow_the_wire_format() {
        assert_eq!(
            ValidationError::not_specified("latitude").message(),
            "Parameter : latitude is not specified."
        );
        assert_eq!(
            ValidationError::type_mismatch(PAYLOAD_LABEL).message(),
            "Parameter : the payload within the body does not respect its type."
        );
        assert_eq!(
            ValidationError::extra_values("time").to_string(),
            "Parameter : time contains extra values."
        );
    }

    #[test]
    fn kinds_expose_stable_codes() {
        assert_eq!(
            ValidationError::unauthorized_value("status").kind.as_str(),
            "PARAMETER_UNAUTHORIZED_VALUE"
        );
    }
}

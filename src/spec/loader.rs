use crate::error::SpecError;
use serde_json::{Map, Number, Value};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Loads a Swagger document from a YAML or JSON file
pub fn load_swagger_spec(path: &Path) -> Result<Value, SpecError> {
    let file = File::open(path)?;

    let document: serde_yaml::Value = serde_yaml::from_reader(BufReader::new(file)).map_err(|e| {
        SpecError::InvalidDocument(format!("Failed to parse {}: {}", path.display(), e))
    })?;

    yaml_to_json(document)
}

/// YAML allows non-string mapping keys (`200:` under `responses`), JSON
/// does not; such keys are kept in their string form.
fn yaml_to_json(value: serde_yaml::Value) -> Result<Value, SpecError> {
    Ok(match value {
        serde_yaml::Value::Null => Value::Null,
        serde_yaml::Value::Bool(b) => Value::Bool(b),
        serde_yaml::Value::Number(n) => yaml_number(&n)?,
        serde_yaml::Value::String(s) => Value::String(s),
        serde_yaml::Value::Sequence(items) => Value::Array(
            items
                .into_iter()
                .map(yaml_to_json)
                .collect::<Result<_, _>>()?,
        ),
        serde_yaml::Value::Mapping(mapping) => {
            let mut object = Map::new();
            for (key, value) in mapping {
                object.insert(yaml_key(key)?, yaml_to_json(value)?);
            }
            Value::Object(object)
        }
        serde_yaml::Value::Tagged(tagged) => yaml_to_json(tagged.value)?,
    })
}

fn yaml_number(n: &serde_yaml::Number) -> Result<Value, SpecError> {
    if let Some(i) = n.as_i64() {
        Ok(Value::from(i))
    } else if let Some(u) = n.as_u64() {
        Ok(Value::from(u))
    } else {
        n.as_f64()
            .and_then(Number::from_f64)
            .map(Value::Number)
            .ok_or_else(|| SpecError::InvalidDocument(format!("unsupported number: {}", n)))
    }
}

fn yaml_key(key: serde_yaml::Value) -> Result<String, SpecError> {
    match key {
        serde_yaml::Value::String(s) => Ok(s),
        serde_yaml::Value::Bool(b) => Ok(b.to_string()),
        serde_yaml::Value::Number(n) => Ok(n.to_string()),
        other => Err(SpecError::InvalidDocument(format!(
            "unsupported mapping key: {:?}",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::io::Write;

    #[test]
    fn loads_yaml_with_numeric_keys() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
swagger: "2.0"
basePath: /api
paths:
  /ping:
    get:
      responses:
        200:
          description: pong
"#
        )
        .unwrap();

        let document = load_swagger_spec(file.path()).unwrap();
        assert_eq!(document["basePath"], json!("/api"));
        assert_eq!(
            document["paths"]["/ping"]["get"]["responses"]["200"]["description"],
            json!("pong")
        );
    }

    #[test]
    fn loads_json_documents() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"paths": {{"/ping": {{"get": {{}}}}}}}}"#).unwrap();

        let document = load_swagger_spec(file.path()).unwrap();
        assert!(document["paths"]["/ping"]["get"].is_object());
    }

    #[test]
    fn missing_files_are_io_faults() {
        let err = load_swagger_spec(Path::new("/nonexistent/swagger.yaml")).unwrap_err();
        assert!(matches!(err, SpecError::Io(_)));
    }
}

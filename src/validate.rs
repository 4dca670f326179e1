//! Structural checks applied to every operation before it is registered.

use crate::entry::{OperationDescriptor, ParamLocation, ParameterDescriptor};
use crate::error::{Error, Result};

/// Parameter types a Swagger 2.0 parameter may declare.
pub const PARAM_TYPES: [&str; 7] = [
    "string", "integer", "number", "boolean", "array", "object", "file",
];

pub const MAX_PARAM_NAME_LEN: usize = 100;

/// Check an operation against the constraints of the document format.
///
/// The returned error names the first offending field.
pub fn validate(entry: &OperationDescriptor) -> Result<()> {
    if entry.tags.is_empty() {
        return Err(Error::validation("tags", "at least one tag is required"));
    }
    for (i, tag) in entry.tags.iter().enumerate() {
        if tag.is_empty() {
            return Err(Error::validation(format!("tags[{}]", i), "tag must not be empty"));
        }
    }

    for (i, param) in entry.parameters.iter().enumerate() {
        validate_parameter(param).map_err(|err| match err {
            Error::Validation { field, message } => {
                Error::validation(format!("parameters[{}].{}", i, field), message)
            }
            other => other,
        })?;
    }

    if entry.responses.is_empty() {
        return Err(Error::validation("responses", "at least one response is required"));
    }
    Ok(())
}

fn validate_parameter(param: &ParameterDescriptor) -> Result<()> {
    let location = ParamLocation::ALL
        .into_iter()
        .find(|l| l.as_str() == param.location)
        .ok_or_else(|| {
            Error::validation(
                "in",
                format!("'{}' is not one of query, path, formData, body, header", param.location),
            )
        })?;

    if !PARAM_TYPES.contains(&param.param_type.as_str()) {
        return Err(Error::validation(
            "type",
            format!("'{}' is not a valid parameter type", param.param_type),
        ));
    }

    let name_len = param.name.chars().count();
    if name_len == 0 || name_len > MAX_PARAM_NAME_LEN {
        return Err(Error::validation(
            "name",
            format!("length must be between 1 and {}", MAX_PARAM_NAME_LEN),
        ));
    }

    match (location, param.schema.is_some()) {
        (ParamLocation::Body, false) => Err(Error::validation(
            "schema",
            "body parameters must carry a schema",
        )),
        (ParamLocation::Body, true) | (_, false) => Ok(()),
        (_, true) => Err(Error::validation(
            "schema",
            "only body parameters may carry a schema",
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::SchemaNode;

    fn param(location: &str, name: &str, param_type: &str) -> ParameterDescriptor {
        ParameterDescriptor {
            description: String::new(),
            location: location.to_string(),
            name: name.to_string(),
            required: true,
            param_type: param_type.to_string(),
            schema: None,
        }
    }

    fn valid_entry() -> OperationDescriptor {
        let mut entry = OperationDescriptor {
            summary: "List users".to_string(),
            tags: vec!["users".to_string()],
            parameters: vec![param("query", "page", "integer")],
            ..Default::default()
        };
        entry.responses.insert(200, SchemaNode::default());
        entry
    }

    fn failing_field(entry: &OperationDescriptor) -> String {
        match validate(entry) {
            Err(Error::Validation { field, .. }) => field,
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_valid_entry() {
        assert!(validate(&valid_entry()).is_ok());
    }

    #[test]
    fn test_empty_tags() {
        let mut entry = valid_entry();
        entry.tags.clear();
        assert_eq!(failing_field(&entry), "tags");
    }

    #[test]
    fn test_empty_tag_element() {
        let mut entry = valid_entry();
        entry.tags.push(String::new());
        assert_eq!(failing_field(&entry), "tags[1]");
    }

    #[test]
    fn test_missing_responses() {
        let mut entry = valid_entry();
        entry.responses.clear();
        assert_eq!(failing_field(&entry), "responses");
    }

    #[test]
    fn test_invalid_location() {
        let mut entry = valid_entry();
        entry.parameters.push(param("cookie", "session", "string"));
        assert_eq!(failing_field(&entry), "parameters[1].in");
    }

    #[test]
    fn test_invalid_type() {
        let mut entry = valid_entry();
        entry.parameters[0].param_type = "map".to_string();
        assert_eq!(failing_field(&entry), "parameters[0].type");

        entry.parameters[0].param_type = String::new();
        assert_eq!(failing_field(&entry), "parameters[0].type");
    }

    #[test]
    fn test_name_length() {
        let mut entry = valid_entry();
        entry.parameters[0].name = String::new();
        assert_eq!(failing_field(&entry), "parameters[0].name");

        entry.parameters[0].name = "x".repeat(MAX_PARAM_NAME_LEN + 1);
        assert_eq!(failing_field(&entry), "parameters[0].name");

        entry.parameters[0].name = "x".repeat(MAX_PARAM_NAME_LEN);
        assert!(validate(&entry).is_ok());
    }

    #[test]
    fn test_body_requires_schema() {
        let mut entry = valid_entry();
        entry.parameters = vec![param("body", "body", "object")];
        assert_eq!(failing_field(&entry), "parameters[0].schema");

        entry.parameters[0].schema = Some(SchemaNode::default());
        assert!(validate(&entry).is_ok());
    }

    #[test]
    fn test_schema_only_on_body() {
        let mut entry = valid_entry();
        entry.parameters[0].schema = Some(SchemaNode::default());
        assert_eq!(failing_field(&entry), "parameters[0].schema");
    }

    #[test]
    fn test_every_location_is_accepted() {
        for location in ["query", "path", "formData", "header"] {
            let mut entry = valid_entry();
            entry.parameters = vec![param(location, "p", "file")];
            assert!(validate(&entry).is_ok(), "location {} rejected", location);
        }
    }
}

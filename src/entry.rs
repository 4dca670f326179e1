//! Operation descriptions and the builder that assembles them from typed inputs.

use crate::error::{Error, Result};
use crate::reflect::{Reflect, TypeDesc, TypeRef};
use crate::schema::{introspect, SchemaNode};
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Status code under which the declared response is installed.
pub const STATUS_OK: u16 = 200;

/// Where a parameter is carried in the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamLocation {
    Query,
    Path,
    FormData,
    Body,
    Header,
}

impl ParamLocation {
    pub const ALL: [ParamLocation; 5] = [
        ParamLocation::Query,
        ParamLocation::Path,
        ParamLocation::FormData,
        ParamLocation::Body,
        ParamLocation::Header,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ParamLocation::Query => "query",
            ParamLocation::Path => "path",
            ParamLocation::FormData => "formData",
            ParamLocation::Body => "body",
            ParamLocation::Header => "header",
        }
    }
}

/// Swagger 2.0 parameter object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterDescriptor {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    /// Parameter location (query, path, formData, body, header)
    #[serde(rename = "in")]
    pub location: String,
    pub name: String,
    #[serde(default)]
    pub required: bool,
    #[serde(rename = "type", default)]
    pub param_type: String,
    /// Body schema, only set for `in: body`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<SchemaNode>,
}

/// Swagger 2.0 operation object - one HTTP method on one path
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OperationDescriptor {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub parameters: Vec<ParameterDescriptor>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub produces: Vec<String>,
    /// Responses keyed by HTTP status code
    #[serde(default)]
    pub responses: BTreeMap<u16, SchemaNode>,
}

/// Typed description of an operation, turned into an [`OperationDescriptor`] by [`build`].
///
/// ```
/// use swagger_doc::entry::{build, MethodSpec};
///
/// let entry = build(
///     &MethodSpec::new()
///         .tags(["health"])
///         .summary("Liveness probe")
///         .response::<String>(),
/// )
/// .unwrap();
/// assert!(entry.parameters.is_empty());
/// ```
#[derive(Debug, Clone, Default)]
pub struct MethodSpec {
    pub form_data: Option<TypeRef>,
    pub json_data: Option<TypeRef>,
    pub query_data: Option<TypeRef>,
    pub path_data: Option<TypeRef>,
    pub response_data: Option<TypeRef>,
    pub description: String,
    pub summary: String,
    pub tags: Vec<String>,
}

impl MethodSpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn form<T: Reflect + ?Sized + 'static>(mut self) -> Self {
        self.form_data = Some(TypeRef::of::<T>());
        self
    }

    pub fn json<T: Reflect + ?Sized + 'static>(mut self) -> Self {
        self.json_data = Some(TypeRef::of::<T>());
        self
    }

    pub fn query<T: Reflect + ?Sized + 'static>(mut self) -> Self {
        self.query_data = Some(TypeRef::of::<T>());
        self
    }

    pub fn path<T: Reflect + ?Sized + 'static>(mut self) -> Self {
        self.path_data = Some(TypeRef::of::<T>());
        self
    }

    pub fn response<T: Reflect + ?Sized + 'static>(mut self) -> Self {
        self.response_data = Some(TypeRef::of::<T>());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = summary.into();
        self
    }

    pub fn tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }
}

/// Assemble an operation from a typed spec.
///
/// Meant for start-up: every error here is a mistake in the declaration,
/// reported as [`Error::InvalidSpec`].
pub fn build(spec: &MethodSpec) -> Result<OperationDescriptor> {
    if spec.tags.is_empty() {
        return Err(Error::InvalidSpec("at least one tag is required".to_string()));
    }
    if spec.description.is_empty() && spec.summary.is_empty() {
        return Err(Error::InvalidSpec(
            "description or summary must be set".to_string(),
        ));
    }
    let response_data = spec
        .response_data
        .ok_or_else(|| Error::InvalidSpec("response type is required".to_string()))?;
    if spec.json_data.is_some() && spec.form_data.is_some() {
        return Err(Error::InvalidSpec(
            "json data and form data cannot be used together".to_string(),
        ));
    }

    debug!("Building operation for tags {:?}", spec.tags);

    let mut entry = OperationDescriptor {
        description: spec.description.clone(),
        summary: spec.summary.clone(),
        tags: spec.tags.clone(),
        ..Default::default()
    };

    let response = introspect(response_data, "").map_err(invalid_spec)?;
    entry
        .responses
        .insert(STATUS_OK, SchemaNode::wrapping(response));

    if let Some(json_data) = &spec.json_data {
        let schema = record_schema(*json_data, "json")?;
        entry.parameters.push(ParameterDescriptor {
            description: "JSON body".to_string(),
            location: ParamLocation::Body.as_str().to_string(),
            name: "body".to_string(),
            required: true,
            param_type: "object".to_string(),
            schema: Some(schema),
        });
    }

    let flattened = [
        (&spec.form_data, ParamLocation::FormData),
        (&spec.query_data, ParamLocation::Query),
        (&spec.path_data, ParamLocation::Path),
    ];
    for (data, location) in flattened {
        if let Some(ty) = data {
            flatten_parameters(&mut entry, *ty, location)?;
        }
    }

    Ok(entry)
}

/// Introspect an input that must be a record.
fn record_schema(ty: TypeRef, channel: &str) -> Result<SchemaNode> {
    match ty.strip_optional() {
        (_, TypeDesc::Record(_)) => {}
        (_, other) => {
            return Err(Error::InvalidSpec(format!(
                "{} data must be a record, got {}",
                channel,
                other.display_name()
            )))
        }
    }
    introspect(ty, "").map_err(invalid_spec)
}

/// Turn every top-level property of a record into one scalar parameter.
fn flatten_parameters(
    entry: &mut OperationDescriptor,
    ty: TypeRef,
    location: ParamLocation,
) -> Result<()> {
    let schema = record_schema(ty, location.as_str())?;

    for (name, property) in &schema.properties {
        if matches!(property.schema_type.as_str(), "array" | "object") {
            return Err(Error::InvalidSpec(format!(
                "{} parameter '{}' must be a scalar, got {}",
                location.as_str(),
                name,
                property.schema_type
            )));
        }
        debug!("Adding {} parameter: {}", location.as_str(), name);
        entry.parameters.push(ParameterDescriptor {
            description: property.description.clone(),
            location: location.as_str().to_string(),
            name: name.clone(),
            required: schema.is_required(name),
            param_type: property.schema_type.clone(),
            schema: None,
        });
    }
    Ok(())
}

fn invalid_spec(err: Error) -> Error {
    Error::InvalidSpec(err.to_string())
}

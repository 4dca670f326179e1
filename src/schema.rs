use crate::error::{Error, Result};
use crate::reflect::{RecordDesc, Reflect, TypeDesc, TypeRef};
use crate::tag::{resolve_field, FieldName};
use indexmap::IndexMap;
use log::debug;
use serde::{Deserialize, Serialize};
use std::any::TypeId;

/// Property key used for the value schema of a map.
pub const MAP_WILDCARD: &str = ".*";

/// Nesting limit for descriptors that recurse without going through a record.
const MAX_DEPTH: usize = 64;

/// Schema node in the Swagger 2.0 shape
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SchemaNode {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    /// The type of the node (string, integer, object, array, ...)
    #[serde(rename = "type", default, skip_serializing_if = "String::is_empty")]
    pub schema_type: String,
    /// Element schema for array nodes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<SchemaNode>>,
    /// Properties for object nodes, in declaration order
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub properties: IndexMap<String, SchemaNode>,
    /// Required property names for object nodes
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub required: Vec<String>,
    /// Wrapped schema, used by responses
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<Box<SchemaNode>>,
}

impl SchemaNode {
    fn typed(schema_type: &str, description: &str) -> Self {
        Self {
            description: description.to_string(),
            schema_type: schema_type.to_string(),
            ..Default::default()
        }
    }

    /// Generate the schema of `T` with an empty description.
    pub fn of<T: Reflect + ?Sized + 'static>() -> Result<Self> {
        introspect(TypeRef::of::<T>(), "")
    }

    /// Wrap `inner` as the `schema` of an otherwise empty node.
    pub fn wrapping(inner: SchemaNode) -> Self {
        Self {
            schema: Some(Box::new(inner)),
            ..Default::default()
        }
    }

    pub fn is_required(&self, name: &str) -> bool {
        self.required.iter().any(|r| r == name)
    }

    /// Insert a property. A replaced property keeps its position, and
    /// `required` stays a duplicate-free subsequence of `properties`.
    fn add_property(&mut self, name: String, node: SchemaNode, required: bool) {
        let listed = self.is_required(&name);
        match (required, listed) {
            (true, false) => {
                self.properties.insert(name.clone(), node);
                self.required.push(name);
                let properties = &self.properties;
                self.required.sort_by_key(|r| properties.get_index_of(r));
            }
            (false, true) => {
                self.required.retain(|r| r != &name);
                self.properties.insert(name, node);
            }
            _ => {
                self.properties.insert(name, node);
            }
        }
    }
}

/// Generate the schema tree of a type descriptor.
///
/// `doc` becomes the description of the root node. Self-referential records
/// cannot be represented as a tree and fail with [`Error::Schema`].
pub fn introspect(ty: TypeRef, doc: &str) -> Result<SchemaNode> {
    debug!("Generating schema for type: {}", ty.resolve().display_name());
    SchemaGenerator::default().read(ty, doc)
}

/// Walks type descriptors, tracking the records currently being expanded
#[derive(Default)]
struct SchemaGenerator {
    /// Identity and label of each record on the current path
    expanding: Vec<(TypeId, &'static str)>,
    depth: usize,
}

impl SchemaGenerator {
    fn read(&mut self, ty: TypeRef, doc: &str) -> Result<SchemaNode> {
        let desc = ty.resolve();
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(Error::schema(
                desc.display_name(),
                format!("nesting deeper than {} levels", MAX_DEPTH),
            ));
        }
        let node = self.read_inner(ty, desc, doc);
        self.depth -= 1;
        node
    }

    fn read_inner(&mut self, ty: TypeRef, desc: TypeDesc, doc: &str) -> Result<SchemaNode> {
        match desc {
            TypeDesc::Bool => Ok(SchemaNode::typed("boolean", doc)),
            TypeDesc::Integer | TypeDesc::Byte => Ok(SchemaNode::typed("integer", doc)),
            TypeDesc::Number => Ok(SchemaNode::typed("number", doc)),
            TypeDesc::String => Ok(SchemaNode::typed("string", doc)),
            // Pointers add no level of their own
            TypeDesc::Optional(inner) => self.read(inner, doc),
            TypeDesc::Seq(element) => self.read_seq(element, doc),
            TypeDesc::Map(value) => self.read_map(value, doc),
            TypeDesc::Record(record) => {
                let mut node = SchemaNode::typed("object", doc);
                self.read_record(ty.type_id(), &record, &mut node)?;
                Ok(node)
            }
            TypeDesc::Unknown(name) => {
                debug!("No schema mapping for {}, leaving type empty", name);
                Ok(SchemaNode::typed("", doc))
            }
        }
    }

    fn read_seq(&mut self, element: TypeRef, doc: &str) -> Result<SchemaNode> {
        // Byte sequences are opaque strings, also behind pointers
        let (element, desc) = element.strip_optional();
        if let TypeDesc::Byte = desc {
            return Ok(SchemaNode::typed("string", doc));
        }

        let mut node = SchemaNode::typed("array", doc);
        let items = self.read(element, "")?;
        if !items.schema_type.is_empty() {
            node.items = Some(Box::new(items));
        }
        Ok(node)
    }

    fn read_map(&mut self, value: TypeRef, doc: &str) -> Result<SchemaNode> {
        let mut node = SchemaNode::typed("object", doc);
        let value_node = self.read(value, "")?;
        // An unmappable value type leaves an untyped object
        if !value_node.schema_type.is_empty() {
            node.properties.insert(MAP_WILDCARD.to_string(), value_node);
        }
        Ok(node)
    }

    fn read_record(
        &mut self,
        id: TypeId,
        record: &RecordDesc,
        node: &mut SchemaNode,
    ) -> Result<()> {
        if self.expanding.iter().any(|(seen, _)| *seen == id) {
            let path: Vec<_> = self.expanding.iter().map(|(_, name)| *name).collect();
            return Err(Error::schema(
                record.name,
                format!(
                    "cyclic type reference ({} -> {})",
                    path.join(" -> "),
                    record.name
                ),
            ));
        }
        self.expanding.push((id, record.name));
        debug!("Generating record schema for: {}", record.name);

        for field in &record.fields {
            if field.embedded {
                match field.ty.strip_optional() {
                    (inner_ty, TypeDesc::Record(inner)) => {
                        self.read_record(inner_ty.type_id(), &inner, node)?
                    }
                    (_, other) => {
                        return Err(Error::schema(
                            record.name,
                            format!(
                                "embedded field `{}` is a {}, not a record",
                                field.name,
                                other.display_name()
                            ),
                        ))
                    }
                }
                continue;
            }

            let (name, omittable) = match resolve_field(field.name, field.tag) {
                FieldName::Skip => {
                    debug!("Skipping field {}.{}", record.name, field.name);
                    continue;
                }
                FieldName::Exposed { name, omittable } => (name, omittable),
            };

            let property = self.read(field.ty, field.doc)?;
            node.add_property(name, property, !omittable);
        }

        self.expanding.pop();
        Ok(())
    }
}

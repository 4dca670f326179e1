//! Explicit type descriptors for schema generation.
//!
//! Rust has no runtime reflection, so every type that takes part in a
//! documented operation describes itself through [`Reflect`]. Primitive and
//! container types are covered here; records implement the trait by hand with
//! [`RecordDesc`]:
//!
//! ```
//! use swagger_doc::reflect::{FieldDesc, RecordDesc, Reflect, TypeDesc};
//!
//! struct SuccessResp {
//!     message: String,
//!     result: i32,
//! }
//!
//! impl Reflect for SuccessResp {
//!     fn type_desc() -> TypeDesc {
//!         RecordDesc::new("SuccessResp")
//!             .field(FieldDesc::of::<String>("Message").tag("message,omitempty"))
//!             .field(FieldDesc::of::<i32>("Result").tag("result"))
//!             .into()
//!     }
//! }
//! ```
//!
//! Nested types are referenced through [`TypeRef`] and only expanded while a
//! schema is being generated, which lets self-referential records be declared
//! at all and then rejected by the introspector. Record names are labels for
//! humans; a record's identity is the [`TypeId`] carried by its reference.

use std::any::TypeId;
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::rc::Rc;
use std::sync::Arc;

/// A nested type: its identity and a lazy descriptor.
#[derive(Debug, Clone, Copy)]
pub struct TypeRef {
    id: TypeId,
    desc: fn() -> TypeDesc,
}

impl TypeRef {
    pub fn of<T: Reflect + ?Sized + 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            desc: T::type_desc,
        }
    }

    pub fn type_id(&self) -> TypeId {
        self.id
    }

    pub fn resolve(&self) -> TypeDesc {
        (self.desc)()
    }

    /// Follow optional layers to the first type that is not one, returning
    /// that type's reference along with its descriptor.
    pub fn strip_optional(self) -> (TypeRef, TypeDesc) {
        let mut ty = self;
        loop {
            match ty.resolve() {
                TypeDesc::Optional(inner) => ty = inner,
                desc => return (ty, desc),
            }
        }
    }
}

/// The shape of a type as seen by the schema generator.
#[derive(Debug, Clone)]
pub enum TypeDesc {
    Bool,
    Integer,
    /// An 8-bit unsigned integer. Maps to `integer` on its own, but a sequence
    /// of bytes is an opaque string.
    Byte,
    Number,
    String,
    /// A homogeneous sequence
    Seq(TypeRef),
    /// A string-keyed map; the function describes the value type
    Map(TypeRef),
    Record(RecordDesc),
    /// A pointer-like or optional wrapper, transparent for schemas
    Optional(TypeRef),
    /// A type without a schema mapping
    Unknown(&'static str),
}

impl TypeDesc {
    /// Human readable name used in log lines and errors.
    pub fn display_name(&self) -> &'static str {
        match self {
            TypeDesc::Bool => "bool",
            TypeDesc::Integer => "integer",
            TypeDesc::Byte => "u8",
            TypeDesc::Number => "number",
            TypeDesc::String => "string",
            TypeDesc::Seq(_) => "sequence",
            TypeDesc::Map(_) => "map",
            TypeDesc::Record(record) => record.name,
            TypeDesc::Optional(_) => "optional",
            TypeDesc::Unknown(name) => *name,
        }
    }

    /// Strip every optional layer.
    pub fn strip_optional(self) -> TypeDesc {
        let mut desc = self;
        while let TypeDesc::Optional(inner) = desc {
            desc = inner.resolve();
        }
        desc
    }
}

/// A structured record: a name and its declared fields in order.
#[derive(Debug, Clone)]
pub struct RecordDesc {
    pub name: &'static str,
    pub fields: Vec<FieldDesc>,
}

impl RecordDesc {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            fields: Vec::new(),
        }
    }

    pub fn field(mut self, field: FieldDesc) -> Self {
        self.fields.push(field);
        self
    }

    /// Inline the fields of `T` into this record.
    pub fn embed<T: Reflect + 'static>(mut self) -> Self {
        self.fields.push(FieldDesc {
            name: std::any::type_name::<T>(),
            tag: "",
            doc: "",
            embedded: true,
            ty: TypeRef::of::<T>(),
        });
        self
    }
}

impl From<RecordDesc> for TypeDesc {
    fn from(record: RecordDesc) -> Self {
        TypeDesc::Record(record)
    }
}

/// One declared field of a record.
#[derive(Debug, Clone)]
pub struct FieldDesc {
    /// The field name as declared in code
    pub name: &'static str,
    /// Serialization tag, e.g. `"user_name,omitempty"`
    pub tag: &'static str,
    /// Documentation attached to the generated property
    pub doc: &'static str,
    /// Whether the field is flattened into its parent
    pub embedded: bool,
    pub ty: TypeRef,
}

impl FieldDesc {
    pub fn of<T: Reflect + 'static>(name: &'static str) -> Self {
        Self {
            name,
            tag: "",
            doc: "",
            embedded: false,
            ty: TypeRef::of::<T>(),
        }
    }

    pub fn tag(mut self, tag: &'static str) -> Self {
        self.tag = tag;
        self
    }

    pub fn doc(mut self, doc: &'static str) -> Self {
        self.doc = doc;
        self
    }
}

/// Types that can describe their own shape.
pub trait Reflect {
    fn type_desc() -> TypeDesc;
}

macro_rules! reflect_as {
    ($desc:expr => $($ty:ty),+ $(,)?) => {
        $(
            impl Reflect for $ty {
                fn type_desc() -> TypeDesc {
                    $desc
                }
            }
        )+
    };
}

reflect_as!(TypeDesc::Bool => bool);
reflect_as!(TypeDesc::Integer => i8, i16, i32, i64, i128, isize, u16, u32, u64, u128, usize);
reflect_as!(TypeDesc::Byte => u8);
reflect_as!(TypeDesc::Number => f32, f64);
reflect_as!(TypeDesc::String => String, str, char);
reflect_as!(TypeDesc::Unknown("()") => ());
reflect_as!(TypeDesc::Unknown("serde_json::Value") => serde_json::Value);

impl<T: Reflect + 'static> Reflect for Vec<T> {
    fn type_desc() -> TypeDesc {
        TypeDesc::Seq(TypeRef::of::<T>())
    }
}

impl<T: Reflect + 'static> Reflect for VecDeque<T> {
    fn type_desc() -> TypeDesc {
        TypeDesc::Seq(TypeRef::of::<T>())
    }
}

impl<T: Reflect + 'static> Reflect for [T] {
    fn type_desc() -> TypeDesc {
        TypeDesc::Seq(TypeRef::of::<T>())
    }
}

impl<T: Reflect + 'static, const N: usize> Reflect for [T; N] {
    fn type_desc() -> TypeDesc {
        TypeDesc::Seq(TypeRef::of::<T>())
    }
}

impl<K, V: Reflect + 'static, S> Reflect for HashMap<K, V, S> {
    fn type_desc() -> TypeDesc {
        TypeDesc::Map(TypeRef::of::<V>())
    }
}

impl<K, V: Reflect + 'static> Reflect for BTreeMap<K, V> {
    fn type_desc() -> TypeDesc {
        TypeDesc::Map(TypeRef::of::<V>())
    }
}

impl<K, V: Reflect + 'static, S> Reflect for indexmap::IndexMap<K, V, S> {
    fn type_desc() -> TypeDesc {
        TypeDesc::Map(TypeRef::of::<V>())
    }
}

impl<T: Reflect + 'static> Reflect for Option<T> {
    fn type_desc() -> TypeDesc {
        TypeDesc::Optional(TypeRef::of::<T>())
    }
}

impl<T: Reflect + ?Sized + 'static> Reflect for Box<T> {
    fn type_desc() -> TypeDesc {
        TypeDesc::Optional(TypeRef::of::<T>())
    }
}

impl<T: Reflect + ?Sized + 'static> Reflect for Rc<T> {
    fn type_desc() -> TypeDesc {
        TypeDesc::Optional(TypeRef::of::<T>())
    }
}

impl<T: Reflect + ?Sized + 'static> Reflect for Arc<T> {
    fn type_desc() -> TypeDesc {
        TypeDesc::Optional(TypeRef::of::<T>())
    }
}

impl<T: Reflect + ?Sized + 'static> Reflect for &T {
    fn type_desc() -> TypeDesc {
        TypeDesc::Optional(TypeRef::of::<T>())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primitive_descriptors() {
        assert!(matches!(bool::type_desc(), TypeDesc::Bool));
        assert!(matches!(i64::type_desc(), TypeDesc::Integer));
        assert!(matches!(u8::type_desc(), TypeDesc::Byte));
        assert!(matches!(f32::type_desc(), TypeDesc::Number));
        assert!(matches!(String::type_desc(), TypeDesc::String));
        assert!(matches!(<()>::type_desc(), TypeDesc::Unknown("()")));
    }

    #[test]
    fn test_containers_are_lazy() {
        match <Vec<u8>>::type_desc() {
            TypeDesc::Seq(inner) => assert!(matches!(inner.resolve(), TypeDesc::Byte)),
            other => panic!("expected sequence, got {:?}", other),
        }
        match <HashMap<String, f64>>::type_desc() {
            TypeDesc::Map(inner) => assert!(matches!(inner.resolve(), TypeDesc::Number)),
            other => panic!("expected map, got {:?}", other),
        }
    }

    #[test]
    fn test_strip_optional_removes_every_layer() {
        let desc = <Option<Box<Arc<String>>>>::type_desc().strip_optional();
        assert!(matches!(desc, TypeDesc::String));
    }

    #[test]
    fn test_type_ref_identity() {
        assert_eq!(TypeRef::of::<u32>().type_id(), TypeId::of::<u32>());
        assert_ne!(
            TypeRef::of::<Vec<u32>>().type_id(),
            TypeRef::of::<u32>().type_id()
        );

        let (inner, desc) = TypeRef::of::<Option<Arc<u8>>>().strip_optional();
        assert_eq!(inner.type_id(), TypeId::of::<u8>());
        assert!(matches!(desc, TypeDesc::Byte));
    }

    #[test]
    fn test_record_builder_keeps_order() {
        let record = RecordDesc::new("User")
            .field(FieldDesc::of::<u32>("Id").doc("user id"))
            .field(FieldDesc::of::<String>("Name").tag("name,omitempty"));

        let names: Vec<_> = record.fields.iter().map(|f| f.name).collect();
        assert_eq!(names, vec!["Id", "Name"]);
        assert_eq!(record.fields[0].doc, "user id");
        assert_eq!(record.fields[1].tag, "name,omitempty");
        assert!(!record.fields[1].embedded);
    }
}

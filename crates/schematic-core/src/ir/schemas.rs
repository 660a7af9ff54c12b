/// A target-language-neutral type, as computed by the type mapper.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeDescriptor {
    Boolean,
    Integer,
    Number,
    String,
    /// A string carrying a `date-time` format hint.
    DateTime,
    /// Dynamic/untyped value.
    Any,
    Array(Box<TypeDescriptor>),
    /// String-keyed dictionary with a single value type.
    Map(Box<TypeDescriptor>),
    /// Inline record built from declared properties.
    Record(Vec<FieldDescriptor>),
    /// Reference to a generated named type.
    Named(String),
    Optional(Box<TypeDescriptor>),
}

impl TypeDescriptor {
    pub fn optional(inner: TypeDescriptor) -> Self {
        TypeDescriptor::Optional(Box::new(inner))
    }

    pub fn is_optional(&self) -> bool {
        matches!(self, TypeDescriptor::Optional(_))
    }

    /// Collections, maps and dynamic values are already nilable.
    pub fn is_naturally_nilable(&self) -> bool {
        matches!(
            self,
            TypeDescriptor::Array(_) | TypeDescriptor::Map(_) | TypeDescriptor::Any
        )
    }

    pub fn is_record(&self) -> bool {
        matches!(self, TypeDescriptor::Record(_))
    }

    /// Strip one level of optional wrapping, reporting whether it was present.
    pub fn into_required(self) -> (TypeDescriptor, bool) {
        match self {
            TypeDescriptor::Optional(inner) => (*inner, false),
            other => (other, true),
        }
    }

    pub fn contains_date_time(&self) -> bool {
        match self {
            TypeDescriptor::DateTime => true,
            TypeDescriptor::Array(inner)
            | TypeDescriptor::Map(inner)
            | TypeDescriptor::Optional(inner) => inner.contains_date_time(),
            TypeDescriptor::Record(fields) => fields.iter().any(|f| f.field_type.contains_date_time()),
            _ => false,
        }
    }
}

/// A field of an inline record.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDescriptor {
    /// Property name exactly as declared in the schema.
    pub name: String,
    pub field_type: TypeDescriptor,
    pub required: bool,
    pub description: Option<String>,
}

/// A synthesized named type declaration (options or result type).
#[derive(Debug, Clone, PartialEq)]
pub struct NamedType {
    pub name: String,
    pub definition: TypeDescriptor,
}

use std::collections::HashMap;

use crate::error::TypeError;
use crate::graph::{Additional, Document, SchemaId};
use crate::ir::{FieldDescriptor, TypeDescriptor};
use crate::parse::ref_resolve::RefResolver;

/// Vocabulary of the `type` keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TypeTag {
    Boolean,
    Integer,
    Number,
    String,
    Any,
    Array,
    Object,
    Null,
}

impl TypeTag {
    fn parse(tag: &str) -> Option<Self> {
        match tag {
            "boolean" => Some(TypeTag::Boolean),
            "integer" => Some(TypeTag::Integer),
            "number" => Some(TypeTag::Number),
            "string" => Some(TypeTag::String),
            "any" => Some(TypeTag::Any),
            "array" => Some(TypeTag::Array),
            "object" => Some(TypeTag::Object),
            "null" => Some(TypeTag::Null),
            _ => None,
        }
    }
}

/// Maps schema nodes to [`TypeDescriptor`]s.
///
/// Nodes registered with [`TypeMapper::register`] are rendered as a pointer
/// to [`TypeDescriptor::Named`] when they recur inside their own expansion.
pub struct TypeMapper<'a> {
    doc: &'a Document,
    named: HashMap<SchemaId, String>,
}

impl<'a> TypeMapper<'a> {
    pub fn new(doc: &'a Document) -> Self {
        Self {
            doc,
            named: HashMap::new(),
        }
    }

    pub fn register(&mut self, id: SchemaId, name: impl Into<String>) {
        self.named.insert(id, name.into());
    }

    /// `required` marks the value as always present; `force` additionally
    /// makes every nested record field required. Array items inherit both.
    ///
    /// An object with several `patternProperties` is mapped by the first
    /// declared pattern only; the others are ignored with a warning.
    pub fn type_of(
        &self,
        id: SchemaId,
        required: bool,
        force: bool,
    ) -> Result<TypeDescriptor, TypeError> {
        let mut stack = Vec::new();
        self.map(id, required, force, &mut stack)
    }

    /// Whether the node's only declared tag is `null`.
    pub fn is_null_only(&self, id: SchemaId) -> Result<bool, TypeError> {
        let id = RefResolver::new(self.doc).resolve(id)?;
        Ok(match self.doc.node(id).type_tags() {
            Some(tags) => !tags.is_empty() && tags.iter().all(|t| *t == "null"),
            None => false,
        })
    }

    fn map(
        &self,
        id: SchemaId,
        required: bool,
        force: bool,
        stack: &mut Vec<SchemaId>,
    ) -> Result<TypeDescriptor, TypeError> {
        let id = RefResolver::new(self.doc).resolve(id)?;
        // A back-reference into an enclosing expansion is always a pointer.
        if stack.contains(&id) {
            return match self.named.get(&id) {
                Some(name) => Ok(TypeDescriptor::optional(TypeDescriptor::Named(name.clone()))),
                None => Err(TypeError::RecursiveType(self.doc.arena.fragment(id))),
            };
        }

        let (tag, nullable) = self.classify(id)?;
        stack.push(id);
        let base = self.expand(id, tag, required, force, stack);
        stack.pop();
        let base = base?;

        if (nullable || !(required || force)) && !base.is_naturally_nilable() {
            Ok(TypeDescriptor::optional(base))
        } else {
            Ok(base)
        }
    }

    fn expand(
        &self,
        id: SchemaId,
        tag: TypeTag,
        required: bool,
        force: bool,
        stack: &mut Vec<SchemaId>,
    ) -> Result<TypeDescriptor, TypeError> {
        let node = self.doc.node(id);
        let ty = match tag {
            TypeTag::Boolean => TypeDescriptor::Boolean,
            TypeTag::Integer => TypeDescriptor::Integer,
            TypeTag::Number => TypeDescriptor::Number,
            TypeTag::String => match node.format.as_deref() {
                Some("date-time") => TypeDescriptor::DateTime,
                _ => TypeDescriptor::String,
            },
            TypeTag::Any | TypeTag::Null => TypeDescriptor::Any,
            TypeTag::Array => match node.items {
                Some(items) => TypeDescriptor::Array(Box::new(self.map(items, required, force, stack)?)),
                None => TypeDescriptor::Array(Box::new(TypeDescriptor::Any)),
            },
            TypeTag::Object => {
                if let Some((pattern, &value)) = node.pattern_properties.first() {
                    if node.pattern_properties.len() > 1 {
                        log::warn!(
                            "{} pattern properties declared, using '{}' only",
                            node.pattern_properties.len(),
                            pattern
                        );
                    }
                    TypeDescriptor::Map(Box::new(self.map(value, true, true, stack)?))
                } else if !node.properties.is_empty() {
                    let mut names: Vec<&String> = node.properties.keys().collect();
                    names.sort();
                    let mut fields = Vec::with_capacity(names.len());
                    for name in names {
                        let child = node.properties[name];
                        let field_required = node.is_required(name) || force;
                        let field_type = self.map(child, field_required, force, stack)?;
                        let target = RefResolver::new(self.doc).resolve(child)?;
                        fields.push(FieldDescriptor {
                            name: name.clone(),
                            field_type,
                            required: field_required,
                            description: self.doc.node(target).description.clone(),
                        });
                    }
                    TypeDescriptor::Record(fields)
                } else {
                    match node.additional_properties {
                        Some(Additional::Schema(value)) => {
                            TypeDescriptor::Map(Box::new(self.map(value, true, true, stack)?))
                        }
                        Some(Additional::Allowed(true)) => {
                            TypeDescriptor::Map(Box::new(TypeDescriptor::Any))
                        }
                        _ => TypeDescriptor::Record(Vec::new()),
                    }
                }
            }
        };
        Ok(ty)
    }

    /// Pick the single tag the node is mapped by, and whether it is nullable.
    fn classify(&self, id: SchemaId) -> Result<(TypeTag, bool), TypeError> {
        let node = self.doc.node(id);
        let Some(tags) = node.type_tags() else {
            return if !node.properties.is_empty() || !node.pattern_properties.is_empty() {
                Ok((TypeTag::Object, false))
            } else if node.items.is_some() {
                Ok((TypeTag::Array, false))
            } else {
                Err(TypeError::AmbiguousOrMissingType(self.doc.arena.fragment(id)))
            };
        };

        let mut nullable = false;
        let mut kinds: Vec<TypeTag> = Vec::new();
        for tag in tags {
            let kind = TypeTag::parse(tag).ok_or_else(|| TypeError::UnknownTypeTag {
                tag: tag.to_string(),
                fragment: self.doc.arena.fragment(id),
            })?;
            if kind == TypeTag::Null {
                nullable = true;
            } else if !kinds.contains(&kind) {
                kinds.push(kind);
            }
        }

        match kinds.as_slice() {
            [] => Err(TypeError::AmbiguousOrMissingType(self.doc.arena.fragment(id))),
            [single] => Ok((*single, nullable)),
            _ => {
                log::debug!(
                    "multiple type tags on {}, mapping to a dynamic value",
                    self.doc.arena.fragment(id)
                );
                Ok((TypeTag::Any, nullable))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse;
    use crate::transform::resolve_pass::resolve_document;

    fn document(json: &str) -> Document {
        let mut doc = Document::from_raw(parse::from_json(json).unwrap());
        resolve_document(&mut doc).unwrap();
        doc
    }

    fn type_of(json: &str, required: bool, force: bool) -> Result<TypeDescriptor, TypeError> {
        let doc = document(json);
        TypeMapper::new(&doc).type_of(doc.root, required, force)
    }

    #[test]
    fn test_primitive_tags() {
        assert_eq!(type_of(r#"{"type": "boolean"}"#, true, false).unwrap(), TypeDescriptor::Boolean);
        assert_eq!(type_of(r#"{"type": "integer"}"#, true, false).unwrap(), TypeDescriptor::Integer);
        assert_eq!(type_of(r#"{"type": "number"}"#, true, false).unwrap(), TypeDescriptor::Number);
        assert_eq!(type_of(r#"{"type": "string"}"#, true, false).unwrap(), TypeDescriptor::String);
        assert_eq!(type_of(r#"{"type": "any"}"#, true, false).unwrap(), TypeDescriptor::Any);
    }

    #[test]
    fn test_date_time_format() {
        assert_eq!(
            type_of(r#"{"type": "string", "format": "date-time"}"#, true, false).unwrap(),
            TypeDescriptor::DateTime
        );
        assert_eq!(
            type_of(r#"{"type": "string", "format": "uuid"}"#, true, false).unwrap(),
            TypeDescriptor::String
        );
    }

    #[test]
    fn test_array_of_strings() {
        assert_eq!(
            type_of(r#"{"type": "array", "items": {"type": "string"}}"#, true, false).unwrap(),
            TypeDescriptor::Array(Box::new(TypeDescriptor::String))
        );
        assert_eq!(
            type_of(r#"{"type": "array"}"#, true, false).unwrap(),
            TypeDescriptor::Array(Box::new(TypeDescriptor::Any))
        );
    }

    #[test]
    fn test_nullable_tags() {
        assert_eq!(
            type_of(r#"{"type": ["null", "string"]}"#, true, false).unwrap(),
            TypeDescriptor::optional(TypeDescriptor::String)
        );
        assert_eq!(
            type_of(r#"{"type": ["null", "array"], "items": {"type": "integer"}}"#, true, false)
                .unwrap(),
            TypeDescriptor::Array(Box::new(TypeDescriptor::Integer))
        );
    }

    #[test]
    fn test_optional_unless_required_or_forced() {
        assert_eq!(
            type_of(r#"{"type": "integer"}"#, false, false).unwrap(),
            TypeDescriptor::optional(TypeDescriptor::Integer)
        );
        assert_eq!(type_of(r#"{"type": "integer"}"#, false, true).unwrap(), TypeDescriptor::Integer);
    }

    #[test]
    fn test_record_fields_sorted_and_required() {
        let ty = type_of(
            r#"{
                "type": ["object"],
                "required": ["name"],
                "properties": {
                    "size": {"type": "integer"},
                    "name": {"type": "string", "description": "the name"}
                }
            }"#,
            true,
            false,
        )
        .unwrap();
        let TypeDescriptor::Record(fields) = ty else {
            panic!("expected record");
        };
        assert_eq!(fields[0].name, "name");
        assert!(fields[0].required);
        assert_eq!(fields[0].field_type, TypeDescriptor::String);
        assert_eq!(fields[0].description.as_deref(), Some("the name"));
        assert_eq!(fields[1].name, "size");
        assert!(!fields[1].required);
        assert_eq!(fields[1].field_type, TypeDescriptor::optional(TypeDescriptor::Integer));
    }

    #[test]
    fn test_force_makes_fields_required() {
        let ty = type_of(
            r#"{"type": ["object"], "properties": {"size": {"type": "integer"}}}"#,
            true,
            true,
        )
        .unwrap();
        let TypeDescriptor::Record(fields) = ty else {
            panic!("expected record");
        };
        assert_eq!(fields[0].field_type, TypeDescriptor::Integer);
    }

    #[test]
    fn test_pattern_properties_take_precedence() {
        let ty = type_of(
            r#"{
                "type": ["object"],
                "patternProperties": {"^\\w+$": {"type": ["string", "null"]}},
                "properties": {"ignored": {"type": "integer"}}
            }"#,
            true,
            false,
        )
        .unwrap();
        assert_eq!(
            ty,
            TypeDescriptor::Map(Box::new(TypeDescriptor::optional(TypeDescriptor::String)))
        );
    }

    #[test]
    fn test_pattern_properties_plain_value() {
        assert_eq!(
            type_of(
                r#"{"type": ["object"], "patternProperties": {"^\\w+$": {"type": "string"}}}"#,
                true,
                false
            )
            .unwrap(),
            TypeDescriptor::Map(Box::new(TypeDescriptor::String))
        );
    }

    #[test]
    fn test_optional_array_items_follow_field() {
        let ty = type_of(
            r#"{"type": "object", "properties": {"tags": {"type": "array", "items": {"type": "string"}}}}"#,
            true,
            false,
        )
        .unwrap();
        let TypeDescriptor::Record(fields) = ty else {
            panic!("expected record");
        };
        assert!(!fields[0].required);
        assert_eq!(
            fields[0].field_type,
            TypeDescriptor::Array(Box::new(TypeDescriptor::optional(TypeDescriptor::String)))
        );

        let forced = type_of(
            r#"{"type": "object", "properties": {"tags": {"type": "array", "items": {"type": "string"}}}}"#,
            true,
            true,
        )
        .unwrap();
        let TypeDescriptor::Record(fields) = forced else {
            panic!("expected record");
        };
        assert_eq!(
            fields[0].field_type,
            TypeDescriptor::Array(Box::new(TypeDescriptor::String))
        );
    }

    #[test]
    fn test_additional_properties() {
        assert_eq!(
            type_of(
                r#"{"type": "object", "additionalProperties": {"type": "integer"}}"#,
                true,
                false
            )
            .unwrap(),
            TypeDescriptor::Map(Box::new(TypeDescriptor::Integer))
        );
        assert_eq!(
            type_of(r#"{"type": "object", "additionalProperties": true}"#, true, false).unwrap(),
            TypeDescriptor::Map(Box::new(TypeDescriptor::Any))
        );
        assert_eq!(
            type_of(r#"{"type": "object"}"#, true, false).unwrap(),
            TypeDescriptor::Record(Vec::new())
        );
    }

    #[test]
    fn test_untyped_nodes_are_inferred() {
        assert!(matches!(
            type_of(r#"{"properties": {"a": {"type": "string"}}}"#, true, false).unwrap(),
            TypeDescriptor::Record(_)
        ));
        assert_eq!(
            type_of(r#"{"items": {"type": "string"}}"#, true, false).unwrap(),
            TypeDescriptor::Array(Box::new(TypeDescriptor::String))
        );
    }

    #[test]
    fn test_missing_type() {
        let err = type_of(r#"{"description": "nothing here"}"#, true, false).unwrap_err();
        assert!(matches!(err, TypeError::AmbiguousOrMissingType(ref f) if f.contains("nothing here")));

        let err = type_of(r#"{"type": "null"}"#, true, false).unwrap_err();
        assert!(matches!(err, TypeError::AmbiguousOrMissingType(_)));
    }

    #[test]
    fn test_unknown_tag() {
        let err = type_of(r#"{"type": "strnig"}"#, true, false).unwrap_err();
        assert!(matches!(err, TypeError::UnknownTypeTag { ref tag, .. } if tag == "strnig"));
    }

    #[test]
    fn test_multiple_tags_map_to_any() {
        assert_eq!(
            type_of(r#"{"type": ["string", "integer"]}"#, true, false).unwrap(),
            TypeDescriptor::Any
        );
    }

    #[test]
    fn test_self_reference_uses_registered_name() {
        let doc = document(
            r##"{
                "definitions": {
                    "blog": {
                        "type": ["object"],
                        "properties": {
                            "title": {"type": "string"},
                            "parent": {"$ref": "#/definitions/blog"}
                        }
                    }
                }
            }"##,
        );
        let blog = doc.root_node().definitions["blog"];

        let mut mapper = TypeMapper::new(&doc);
        mapper.register(blog, "Blog");
        let TypeDescriptor::Record(fields) = mapper.type_of(blog, true, false).unwrap() else {
            panic!("expected record");
        };
        assert_eq!(fields[0].name, "parent");
        assert_eq!(
            fields[0].field_type,
            TypeDescriptor::optional(TypeDescriptor::Named("Blog".to_string()))
        );

        let err = TypeMapper::new(&doc).type_of(blog, true, false).unwrap_err();
        assert!(matches!(err, TypeError::RecursiveType(_)));
    }
}

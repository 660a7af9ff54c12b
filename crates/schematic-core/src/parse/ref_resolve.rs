use std::collections::HashSet;

use indexmap::IndexMap;

use crate::error::ResolveError;
use crate::graph::{Additional, Document, SchemaArena, SchemaId};

/// Keywords whose values are not schema containers. A pointer may name them
/// but never step into them.
const SCALAR_KEYWORDS: &[&str] = &[
    "$ref",
    "$schema",
    "id",
    "title",
    "description",
    "version",
    "type",
    "format",
    "readOnly",
    "required",
    "links",
    "example",
    "pattern",
];

/// Resolves fragment-only JSON pointers (`#/definitions/app`) against the
/// document root.
pub struct RefResolver<'a> {
    arena: &'a SchemaArena,
    root: SchemaId,
}

enum Cursor<'a> {
    Node(SchemaId),
    Map(&'a IndexMap<String, SchemaId>),
    List(&'a [SchemaId]),
}

impl<'a> RefResolver<'a> {
    pub fn new(doc: &'a Document) -> Self {
        Self::with_root(&doc.arena, doc.root)
    }

    pub fn with_root(arena: &'a SchemaArena, root: SchemaId) -> Self {
        Self { arena, root }
    }

    /// Walk a pointer to the node it designates, without dereferencing the
    /// result.
    pub fn lookup(&self, reference: &str) -> Result<SchemaId, ResolveError> {
        let Some(path) = reference.strip_prefix('#') else {
            return Err(ResolveError::UnsupportedReferenceForm(reference.to_string()));
        };
        if path.is_empty() {
            return Ok(self.root);
        }
        let Some(path) = path.strip_prefix('/') else {
            return Err(ResolveError::UnsupportedReferenceForm(reference.to_string()));
        };

        let mut cursor = Cursor::Node(self.root);
        let mut last = String::new();
        for raw in path.split('/') {
            let segment = unescape_segment(raw);
            cursor = self.step(reference, cursor, &segment)?;
            last = segment;
        }

        match cursor {
            Cursor::Node(id) => Ok(id),
            Cursor::Map(_) | Cursor::List(_) => Err(ResolveError::UnresolvableReference {
                reference: reference.to_string(),
                segment: last,
            }),
        }
    }

    /// Look a pointer up and dereference the target down to a direct node.
    pub fn resolve_reference(&self, reference: &str) -> Result<SchemaId, ResolveError> {
        let target = self.lookup(reference)?;
        self.resolve(target)
    }

    /// Follow `$ref`, then the first `oneOf` or `anyOf` alternative, until the
    /// node is direct.
    pub fn resolve(&self, id: SchemaId) -> Result<SchemaId, ResolveError> {
        let mut visited = HashSet::new();
        let mut current = id;
        loop {
            let node = self.arena.get(current);
            let next = if let Some(ref reference) = node.reference {
                self.lookup(reference)?
            } else if let Some(&first) = node.one_of.first() {
                first
            } else if let Some(&first) = node.any_of.first() {
                first
            } else {
                return Ok(current);
            };

            visited.insert(current);
            if visited.contains(&next) {
                let reference = node
                    .reference
                    .clone()
                    .unwrap_or_else(|| self.arena.fragment(current));
                return Err(ResolveError::ReferenceCycle(reference));
            }
            log::trace!("dereferenced node {} -> {}", current.index(), next.index());
            current = next;
        }
    }

    fn step(
        &self,
        reference: &str,
        cursor: Cursor<'a>,
        segment: &str,
    ) -> Result<Cursor<'a>, ResolveError> {
        let missing = || ResolveError::MissingReferenceTarget {
            reference: reference.to_string(),
            segment: segment.to_string(),
        };
        let unresolvable = || ResolveError::UnresolvableReference {
            reference: reference.to_string(),
            segment: segment.to_string(),
        };

        match cursor {
            Cursor::Node(id) => {
                let node = self.arena.get(id);
                match segment {
                    "definitions" => Ok(Cursor::Map(&node.definitions)),
                    "properties" => Ok(Cursor::Map(&node.properties)),
                    "patternProperties" => Ok(Cursor::Map(&node.pattern_properties)),
                    "oneOf" => Ok(Cursor::List(&node.one_of)),
                    "anyOf" => Ok(Cursor::List(&node.any_of)),
                    "items" => node.items.map(Cursor::Node).ok_or_else(missing),
                    "additionalProperties" => match node.additional_properties {
                        Some(Additional::Schema(schema)) => Ok(Cursor::Node(schema)),
                        Some(Additional::Allowed(_)) => Err(unresolvable()),
                        None => Err(missing()),
                    },
                    s if SCALAR_KEYWORDS.contains(&s) => Err(unresolvable()),
                    _ => Err(missing()),
                }
            }
            Cursor::Map(map) => map.get(segment).copied().map(Cursor::Node).ok_or_else(missing),
            Cursor::List(list) => {
                let index: usize = segment.parse().map_err(|_| unresolvable())?;
                list.get(index).copied().map(Cursor::Node).ok_or_else(missing)
            }
        }
    }
}

/// Decode `~1` to `/`, then `~0` to `~`.
fn unescape_segment(segment: &str) -> String {
    segment.replace("~1", "/").replace("~0", "~")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse;

    fn document(json: &str) -> Document {
        Document::from_raw(parse::from_json(json).unwrap())
    }

    const DOC: &str = r##"{
        "definitions": {
            "uuid": {"type": "string", "format": "uuid"},
            "id": {"$ref": "#/definitions/uuid"},
            "a/b": {"type": "integer"},
            "m~n": {"type": "boolean"},
            "identity": {"anyOf": [{"$ref": "#/definitions/id"}, {"type": "integer"}]},
            "choice": {"oneOf": [{"type": "number"}]},
            "list": {"type": "array", "items": {"type": "string"}},
            "loop-a": {"$ref": "#/definitions/loop-b"},
            "loop-b": {"$ref": "#/definitions/loop-a"},
            "elsewhere": {"$ref": "other.json#/definitions/thing"}
        }
    }"##;

    #[test]
    fn test_resolves_definition_to_string() {
        let doc = document(DOC);
        let resolver = RefResolver::new(&doc);
        let id = resolver.resolve_reference("#/definitions/uuid").unwrap();
        assert_eq!(doc.node(id).type_tags(), Some(vec!["string"]));
        assert_eq!(doc.node(id).format.as_deref(), Some("uuid"));
    }

    #[test]
    fn test_hash_alone_is_root() {
        let doc = document(DOC);
        assert_eq!(RefResolver::new(&doc).lookup("#").unwrap(), doc.root);
    }

    #[test]
    fn test_tilde_escapes() {
        let doc = document(DOC);
        let resolver = RefResolver::new(&doc);
        let slash = resolver.lookup("#/definitions/a~1b").unwrap();
        assert_eq!(doc.node(slash).type_tags(), Some(vec!["integer"]));
        let tilde = resolver.lookup("#/definitions/m~0n").unwrap();
        assert_eq!(doc.node(tilde).type_tags(), Some(vec!["boolean"]));
    }

    #[test]
    fn test_follows_ref_chain() {
        let doc = document(DOC);
        let resolver = RefResolver::new(&doc);
        let id = resolver.resolve_reference("#/definitions/id").unwrap();
        let uuid = resolver.lookup("#/definitions/uuid").unwrap();
        assert_eq!(id, uuid);
    }

    #[test]
    fn test_inlines_first_alternative() {
        let doc = document(DOC);
        let resolver = RefResolver::new(&doc);
        let identity = resolver.resolve_reference("#/definitions/identity").unwrap();
        assert_eq!(identity, resolver.lookup("#/definitions/uuid").unwrap());
        let choice = resolver.resolve_reference("#/definitions/choice").unwrap();
        assert_eq!(doc.node(choice).type_tags(), Some(vec!["number"]));
    }

    #[test]
    fn test_keyword_segments() {
        let doc = document(DOC);
        let resolver = RefResolver::new(&doc);
        let items = resolver.lookup("#/definitions/list/items").unwrap();
        assert_eq!(doc.node(items).type_tags(), Some(vec!["string"]));
        let alternative = resolver.lookup("#/definitions/identity/anyOf/1").unwrap();
        assert_eq!(doc.node(alternative).type_tags(), Some(vec!["integer"]));
    }

    #[test]
    fn test_missing_target() {
        let doc = document(DOC);
        let err = RefResolver::new(&doc)
            .lookup("#/definitions/missing")
            .unwrap_err();
        assert!(matches!(
            err,
            ResolveError::MissingReferenceTarget { ref segment, .. } if segment == "missing"
        ));

        let err = RefResolver::new(&doc)
            .lookup("#/definitions/uuid/items")
            .unwrap_err();
        assert!(matches!(err, ResolveError::MissingReferenceTarget { .. }));
    }

    #[test]
    fn test_unresolvable_segment() {
        let doc = document(DOC);
        let resolver = RefResolver::new(&doc);
        let err = resolver.lookup("#/definitions/uuid/format").unwrap_err();
        assert!(matches!(
            err,
            ResolveError::UnresolvableReference { ref segment, .. } if segment == "format"
        ));

        // A pointer that stops on a keyword map designates no schema.
        let err = resolver.lookup("#/definitions").unwrap_err();
        assert!(matches!(err, ResolveError::UnresolvableReference { .. }));

        let err = resolver.lookup("#/definitions/identity/anyOf/first").unwrap_err();
        assert!(matches!(err, ResolveError::UnresolvableReference { .. }));
    }

    #[test]
    fn test_non_fragment_reference() {
        let doc = document(DOC);
        let resolver = RefResolver::new(&doc);
        let err = resolver.resolve_reference("#/definitions/elsewhere").unwrap_err();
        assert!(matches!(err, ResolveError::UnsupportedReferenceForm(ref r) if r.starts_with("other.json")));
        assert!(matches!(
            resolver.lookup("#anchor").unwrap_err(),
            ResolveError::UnsupportedReferenceForm(_)
        ));
    }

    #[test]
    fn test_pure_ref_cycle() {
        let doc = document(DOC);
        let err = RefResolver::new(&doc)
            .resolve_reference("#/definitions/loop-a")
            .unwrap_err();
        assert!(matches!(err, ResolveError::ReferenceCycle(_)));
    }
}

use std::collections::HashSet;

use crate::error::ResolveError;
use crate::graph::{Additional, Document, SchemaId};
use crate::parse::ref_resolve::RefResolver;

/// Nodes whose children have already been visited by the resolve pass.
#[derive(Debug, Default)]
pub struct ResolvedSet(HashSet<SchemaId>);

impl ResolvedSet {
    /// Returns `false` if the node was already marked.
    pub fn mark(&mut self, id: SchemaId) -> bool {
        self.0.insert(id)
    }

    pub fn contains(&self, id: SchemaId) -> bool {
        self.0.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Replace every reference reachable from the root with its target, in place.
///
/// Returns the effective root. Pointer lookups stay anchored at
/// `doc.root`, so the document root itself is left untouched.
pub fn resolve_document(doc: &mut Document) -> Result<SchemaId, ResolveError> {
    let mut pass = ResolvePass::default();
    let start = doc.root;
    let root = pass.walk(doc, start)?;
    log::debug!("resolved {} schema nodes", pass.resolved.len());
    Ok(root)
}

#[derive(Default)]
struct ResolvePass {
    resolved: ResolvedSet,
}

impl ResolvePass {
    fn walk(&mut self, doc: &mut Document, id: SchemaId) -> Result<SchemaId, ResolveError> {
        let id = RefResolver::new(doc).resolve(id)?;
        if !self.resolved.mark(id) {
            return Ok(id);
        }

        let node = doc.arena.get(id);
        let definitions: Vec<(String, SchemaId)> =
            node.definitions.iter().map(|(k, v)| (k.clone(), *v)).collect();
        let properties: Vec<(String, SchemaId)> =
            node.properties.iter().map(|(k, v)| (k.clone(), *v)).collect();
        let pattern_properties: Vec<(String, SchemaId)> = node
            .pattern_properties
            .iter()
            .map(|(k, v)| (k.clone(), *v))
            .collect();
        let additional = node.additional_properties;
        let items = node.items;
        let link_count = node.links.len();

        for (name, child) in definitions {
            let target = self.walk(doc, child)?;
            doc.arena.get_mut(id).definitions.insert(name, target);
        }
        for (name, child) in properties {
            let target = self.walk(doc, child)?;
            doc.arena.get_mut(id).properties.insert(name, target);
        }
        for (pattern, child) in pattern_properties {
            let target = self.walk(doc, child)?;
            doc.arena.get_mut(id).pattern_properties.insert(pattern, target);
        }
        if let Some(Additional::Schema(child)) = additional {
            let target = self.walk(doc, child)?;
            doc.arena.get_mut(id).additional_properties = Some(Additional::Schema(target));
        }
        if let Some(child) = items {
            let target = self.walk(doc, child)?;
            doc.arena.get_mut(id).items = Some(target);
        }

        for index in 0..link_count {
            let link = &doc.arena.get(id).links[index];
            let schema = link.schema;
            let target_schema = link.target_schema;
            let pointers: Vec<String> = link
                .href
                .as_ref()
                .map(|h| h.pointers().to_vec())
                .unwrap_or_default();

            if let Some(child) = schema {
                let target = self.walk(doc, child)?;
                doc.arena.get_mut(id).links[index].schema = Some(target);
            }
            if let Some(child) = target_schema {
                let target = self.walk(doc, child)?;
                doc.arena.get_mut(id).links[index].target_schema = Some(target);
            }
            for pointer in pointers {
                let target = RefResolver::new(doc).lookup(&pointer)?;
                self.walk(doc, target)?;
            }
        }

        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse;

    fn document(json: &str) -> Document {
        Document::from_raw(parse::from_json(json).unwrap())
    }

    const BLOG: &str = r##"{
        "title": "Blog API",
        "definitions": {
            "blog": {
                "type": ["object"],
                "definitions": {
                    "id": {"type": "string", "format": "uuid"},
                    "identity": {"$ref": "#/definitions/blog/definitions/id"}
                },
                "properties": {
                    "id": {"$ref": "#/definitions/blog/definitions/id"},
                    "parent": {"$ref": "#/definitions/blog"}
                },
                "links": [{
                    "title": "Info",
                    "rel": "self",
                    "href": "/blogs/{(%23%2Fdefinitions%2Fblog%2Fdefinitions%2Fidentity)}",
                    "targetSchema": {"$ref": "#/definitions/blog"}
                }]
            }
        },
        "properties": {"blog": {"$ref": "#/definitions/blog"}}
    }"##;

    #[test]
    fn test_replaces_references() {
        let mut doc = document(BLOG);
        let root = resolve_document(&mut doc).unwrap();
        assert_eq!(root, doc.root);

        let root_node = doc.root_node();
        let blog = root_node.definitions["blog"];
        assert_eq!(root_node.properties["blog"], blog);

        let blog_node = doc.node(blog);
        assert_eq!(blog_node.properties["parent"], blog);
        assert_eq!(
            blog_node.properties["id"],
            blog_node.definitions["id"],
            "property shares the definition node"
        );
        assert_eq!(blog_node.links[0].target_schema, Some(blog));
    }

    #[test]
    fn test_second_pass_is_a_no_op() {
        let mut doc = document(BLOG);
        resolve_document(&mut doc).unwrap();
        let first = doc.arena.clone();
        resolve_document(&mut doc).unwrap();
        assert_eq!(doc.arena, first);
    }

    #[test]
    fn test_root_reference_becomes_effective_root() {
        let mut doc = document(
            r##"{
                "$ref": "#/definitions/api",
                "definitions": {"api": {"properties": {"name": {"type": "string"}}}}
            }"##,
        );
        let root = resolve_document(&mut doc).unwrap();
        assert_ne!(root, doc.root);
        assert!(doc.node(root).properties.contains_key("name"));
    }

    #[test]
    fn test_resolves_additional_properties_and_items() {
        let mut doc = document(
            r##"{
                "definitions": {"name": {"type": "string"}},
                "properties": {
                    "labels": {"type": "object", "additionalProperties": {"$ref": "#/definitions/name"}},
                    "names": {"type": "array", "items": {"$ref": "#/definitions/name"}}
                }
            }"##,
        );
        resolve_document(&mut doc).unwrap();
        let root = doc.root_node();
        let name = root.definitions["name"];
        assert_eq!(
            doc.node(root.properties["labels"]).additional_properties,
            Some(Additional::Schema(name))
        );
        assert_eq!(doc.node(root.properties["names"]).items, Some(name));
    }

    #[test]
    fn test_bad_href_pointer_fails() {
        let mut doc = document(
            r##"{
                "definitions": {"app": {"links": [{"title": "Info", "href": "/apps/{(%23%2Fdefinitions%2Fapp%2Fdefinitions%2Fnope)}"}]}}
            }"##,
        );
        let err = resolve_document(&mut doc).unwrap_err();
        assert!(matches!(err, ResolveError::MissingReferenceTarget { .. }));
    }

    #[test]
    fn test_missing_reference_fails() {
        let mut doc = document(r##"{"properties": {"app": {"$ref": "#/definitions/app"}}}"##);
        let err = resolve_document(&mut doc).unwrap_err();
        assert!(matches!(
            err,
            ResolveError::MissingReferenceTarget { ref segment, .. } if segment == "app"
        ));
    }
}

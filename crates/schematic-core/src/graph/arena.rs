use indexmap::IndexMap;
use serde_json::{Map, Value, json};

use super::href::HRefParser;
use super::link::{Link, Relation};
use crate::parse::schema::{AdditionalProperties, RawLink, RawSchema, TypeSet};

/// Stable identity of a schema node inside a [`SchemaArena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SchemaId(usize);

impl SchemaId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// `additionalProperties` after lowering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Additional {
    Allowed(bool),
    Schema(SchemaId),
}

/// One schema node. Children are ids into the owning arena, so shared and
/// self-referential structures never duplicate a subtree.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SchemaNode {
    pub title: Option<String>,
    pub description: Option<String>,
    pub version: Option<String>,
    pub format: Option<String>,
    pub schema_type: Option<TypeSet>,
    pub reference: Option<String>,
    pub read_only: bool,
    pub definitions: IndexMap<String, SchemaId>,
    pub properties: IndexMap<String, SchemaId>,
    pub pattern_properties: IndexMap<String, SchemaId>,
    pub additional_properties: Option<Additional>,
    pub required: Vec<String>,
    pub items: Option<SchemaId>,
    pub one_of: Vec<SchemaId>,
    pub any_of: Vec<SchemaId>,
    pub links: Vec<Link>,
}

impl SchemaNode {
    /// Declared type tags, if the node has a `type` keyword.
    pub fn type_tags(&self) -> Option<Vec<&str>> {
        self.schema_type.as_ref().map(TypeSet::tags)
    }

    /// True when the node declares its own named properties.
    pub fn is_custom_type(&self) -> bool {
        !self.properties.is_empty()
    }

    pub fn is_required(&self, name: &str) -> bool {
        self.required.iter().any(|r| r == name)
    }

    /// True when the node still needs dereferencing before it can be typed.
    pub fn is_indirect(&self) -> bool {
        self.reference.is_some() || !self.one_of.is_empty() || !self.any_of.is_empty()
    }
}

/// Owner of every schema node in a document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SchemaArena {
    nodes: Vec<SchemaNode>,
}

impl SchemaArena {
    pub fn get(&self, id: SchemaId) -> &SchemaNode {
        &self.nodes[id.0]
    }

    pub fn get_mut(&mut self, id: SchemaId) -> &mut SchemaNode {
        &mut self.nodes[id.0]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn push(&mut self, node: SchemaNode) -> SchemaId {
        self.nodes.push(node);
        SchemaId(self.nodes.len() - 1)
    }

    /// Shallow JSON rendering of a node for diagnostics.
    ///
    /// Children are summarised by name only, so this terminates on cyclic
    /// graphs.
    pub fn fragment(&self, id: SchemaId) -> String {
        let node = self.get(id);
        let mut out = Map::new();
        if let Some(ref title) = node.title {
            out.insert("title".into(), json!(title));
        }
        if let Some(ref description) = node.description {
            out.insert("description".into(), json!(description));
        }
        if let Some(ref reference) = node.reference {
            out.insert("$ref".into(), json!(reference));
        }
        if let Some(ref schema_type) = node.schema_type {
            out.insert("type".into(), json!(schema_type));
        }
        if let Some(ref format) = node.format {
            out.insert("format".into(), json!(format));
        }
        if !node.properties.is_empty() {
            let names: Vec<&String> = node.properties.keys().collect();
            out.insert("properties".into(), json!(names));
        }
        if !node.pattern_properties.is_empty() {
            let patterns: Vec<&String> = node.pattern_properties.keys().collect();
            out.insert("patternProperties".into(), json!(patterns));
        }
        if !node.required.is_empty() {
            out.insert("required".into(), json!(node.required));
        }
        if node.items.is_some() {
            out.insert("items".into(), json!("…"));
        }
        if !node.links.is_empty() {
            let titles: Vec<&str> = node.links.iter().map(|l| l.title.as_str()).collect();
            out.insert("links".into(), json!(titles));
        }
        Value::Object(out).to_string()
    }
}

/// A loaded hyper-schema document: the arena plus its root.
#[derive(Debug, Clone)]
pub struct Document {
    pub arena: SchemaArena,
    pub root: SchemaId,
}

impl Document {
    /// Lower a deserialized schema tree into an arena.
    pub fn from_raw(raw: RawSchema) -> Self {
        let mut lowering = Lowering {
            arena: SchemaArena::default(),
            hrefs: HRefParser::new(),
        };
        let root = lowering.lower(raw);
        log::debug!("lowered document into {} schema nodes", lowering.arena.len());
        Self {
            arena: lowering.arena,
            root,
        }
    }

    pub fn node(&self, id: SchemaId) -> &SchemaNode {
        self.arena.get(id)
    }

    pub fn root_node(&self) -> &SchemaNode {
        self.arena.get(self.root)
    }
}

struct Lowering {
    arena: SchemaArena,
    hrefs: HRefParser,
}

impl Lowering {
    fn lower(&mut self, raw: RawSchema) -> SchemaId {
        // Reserve the slot first so parents always precede their children.
        let id = self.arena.push(SchemaNode::default());

        let definitions = self.lower_map(raw.definitions);
        let properties = self.lower_map(raw.properties);
        let pattern_properties = self.lower_map(raw.pattern_properties);
        let additional_properties = raw.additional_properties.map(|ap| match ap {
            AdditionalProperties::Bool(allowed) => Additional::Allowed(allowed),
            AdditionalProperties::Schema(schema) => Additional::Schema(self.lower(*schema)),
        });
        let items = raw.items.map(|items| self.lower(*items));
        let one_of = raw.one_of.into_iter().map(|s| self.lower(s)).collect();
        let any_of = raw.any_of.into_iter().map(|s| self.lower(s)).collect();
        let links = raw.links.into_iter().map(|l| self.lower_link(l)).collect();

        *self.arena.get_mut(id) = SchemaNode {
            title: raw.title,
            description: raw.description,
            version: raw.version,
            format: raw.format,
            schema_type: raw.schema_type,
            reference: raw.reference,
            read_only: raw.read_only,
            definitions,
            properties,
            pattern_properties,
            additional_properties,
            required: raw.required,
            items,
            one_of,
            any_of,
            links,
        };
        id
    }

    fn lower_map(&mut self, map: IndexMap<String, RawSchema>) -> IndexMap<String, SchemaId> {
        map.into_iter()
            .map(|(name, schema)| (name, self.lower(schema)))
            .collect()
    }

    fn lower_link(&mut self, raw: RawLink) -> Link {
        Link {
            title: raw.title.unwrap_or_default(),
            description: raw.description,
            rel: Relation::from(raw.rel.as_deref().unwrap_or_default()),
            method: raw.method.unwrap_or_else(|| "GET".to_string()),
            href: raw.href.map(|h| self.hrefs.parse(&h)),
            schema: raw.schema.map(|s| self.lower(*s)),
            target_schema: raw.target_schema.map(|s| self.lower(*s)),
        }
    }
}

use std::fmt;

use super::arena::SchemaId;
use super::href::HRef;

/// Link relation, dispatched once by the link analyzer.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Relation {
    Self_,
    Create,
    Update,
    Destroy,
    Instances,
    Empty,
    /// Any other relation; treated like a plain read-and-return operation.
    Custom(String),
}

impl From<&str> for Relation {
    fn from(rel: &str) -> Self {
        match rel {
            "self" => Relation::Self_,
            "create" => Relation::Create,
            "update" => Relation::Update,
            "destroy" => Relation::Destroy,
            "instances" => Relation::Instances,
            "empty" => Relation::Empty,
            other => Relation::Custom(other.to_string()),
        }
    }
}

impl Relation {
    pub fn as_str(&self) -> &str {
        match self {
            Relation::Self_ => "self",
            Relation::Create => "create",
            Relation::Update => "update",
            Relation::Destroy => "destroy",
            Relation::Instances => "instances",
            Relation::Empty => "empty",
            Relation::Custom(rel) => rel,
        }
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One API operation declared on a resource.
#[derive(Debug, Clone, PartialEq)]
pub struct Link {
    pub title: String,
    pub description: Option<String>,
    pub rel: Relation,
    pub method: String,
    pub href: Option<HRef>,
    /// Request body schema.
    pub schema: Option<SchemaId>,
    /// Response schema, when it differs from the enclosing resource.
    pub target_schema: Option<SchemaId>,
}

impl Link {
    pub fn is_get(&self) -> bool {
        self.method.eq_ignore_ascii_case("GET")
    }
}

use super::schemas::{NamedType, TypeDescriptor};
use super::types::NormalizedName;

/// HTTP methods the generated client runtime can dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Patch,
}

impl HttpMethod {
    pub fn parse(method: &str) -> Option<Self> {
        match method.to_ascii_uppercase().as_str() {
            "GET" => Some(HttpMethod::Get),
            "POST" => Some(HttpMethod::Post),
            "PUT" => Some(HttpMethod::Put),
            "DELETE" => Some(HttpMethod::Delete),
            "PATCH" => Some(HttpMethod::Patch),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Patch => "PATCH",
        }
    }
}

/// Where an operation parameter comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParameterKind {
    /// Extracted from an href placeholder.
    Path,
    /// The request body.
    Body,
    /// Pagination range for `instances` listings.
    ListRange,
}

/// One parameter of a generated operation.
#[derive(Debug, Clone, PartialEq)]
pub struct IrParameter {
    pub name: String,
    pub kind: ParameterKind,
    pub param_type: TypeDescriptor,
}

/// What an operation returns.
#[derive(Debug, Clone, PartialEq)]
pub enum ReturnDescriptor {
    /// Success/failure only.
    Empty,
    /// The resource's own named type.
    Named { name: String, record: bool },
    /// A collection of the resource's own named type.
    Collection { name: String },
    /// A synthesized `<Resource><Title>Result` type.
    Result {
        name: String,
        definition: TypeDescriptor,
        collection: bool,
    },
    /// A bare type with no named declaration.
    Scalar(TypeDescriptor),
}

/// A fully analyzed link.
#[derive(Debug, Clone)]
pub struct IrOperation {
    pub name: NormalizedName,
    pub title: String,
    pub description: Option<String>,
    pub rel: String,
    pub method: HttpMethod,
    /// Href with every placeholder replaced by `%v`.
    pub href: String,
    /// Path parameter names in placeholder order.
    pub path_args: Vec<String>,
    pub parameters: Vec<IrParameter>,
    pub returns: ReturnDescriptor,
    /// Declaration for a custom request body type.
    pub options_type: Option<NamedType>,
}

impl IrOperation {
    pub fn body_parameter(&self) -> Option<&IrParameter> {
        self.parameters.iter().find(|p| p.kind == ParameterKind::Body)
    }

    pub fn list_range_parameter(&self) -> Option<&IrParameter> {
        self.parameters
            .iter()
            .find(|p| p.kind == ParameterKind::ListRange)
    }
}

use std::fmt;

use super::operations::{IrOperation, ReturnDescriptor};
use super::schemas::TypeDescriptor;

/// A fully resolved, emitter-ready model of one hyper-schema document.
#[derive(Debug, Clone)]
pub struct ClientSpec {
    pub info: IrInfo,
    /// Target package/module name.
    pub package: String,
    /// Base URL taken from the root `self` link.
    pub base_url: String,
    pub resources: Vec<IrResource>,
}

impl ClientSpec {
    pub fn operation_count(&self) -> usize {
        self.resources.iter().map(|r| r.operations.len()).sum()
    }

    /// Whether any emitted type is a timestamp.
    pub fn uses_time(&self) -> bool {
        self.resources.iter().any(|r| {
            r.declaration.contains_date_time()
                || r.operations.iter().any(|op| {
                    op.parameters.iter().any(|p| p.param_type.contains_date_time())
                        || op
                            .options_type
                            .as_ref()
                            .is_some_and(|o| o.definition.contains_date_time())
                        || match &op.returns {
                            ReturnDescriptor::Result { definition, .. } => {
                                definition.contains_date_time()
                            }
                            ReturnDescriptor::Scalar(ty) => ty.contains_date_time(),
                            _ => false,
                        }
                })
        })
    }
}

/// API metadata.
#[derive(Debug, Clone)]
pub struct IrInfo {
    pub title: String,
    pub description: Option<String>,
    pub version: String,
}

/// A top-level resource: one named type plus its operations.
#[derive(Debug, Clone)]
pub struct IrResource {
    pub name: NormalizedName,
    pub description: Option<String>,
    pub declaration: TypeDescriptor,
    pub operations: Vec<IrOperation>,
}

/// A name with its casing variants pre-computed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NormalizedName {
    pub original: String,
    pub pascal_case: String,
    pub camel_case: String,
    pub snake_case: String,
}

impl fmt::Display for NormalizedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.original)
    }
}

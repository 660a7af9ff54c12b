use crate::error::ResolveError;
use crate::graph::{Document, HRef, SchemaId};
use crate::parse::ref_resolve::RefResolver;

use super::name_normalizer::Naming;

/// One href placeholder bound to a parameter name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathParam {
    pub name: String,
    pub pointer: String,
    /// The resolved schema the placeholder designates.
    pub schema: SchemaId,
}

/// Bind every placeholder of `href` to a synthesized parameter name and its
/// resolved schema, in left-to-right order.
///
/// Names that would repeat within one href get a numeric suffix so every
/// placeholder keeps its own argument.
pub fn path_params(
    doc: &Document,
    naming: &Naming,
    href: &HRef,
) -> Result<Vec<PathParam>, ResolveError> {
    let resolver = RefResolver::new(doc);
    let mut params: Vec<PathParam> = Vec::with_capacity(href.placeholder_count());
    for pointer in href.pointers() {
        let schema = resolver.resolve_reference(pointer)?;
        let base = param_name(naming, pointer);
        let mut name = base.clone();
        let mut n = 2;
        while params.iter().any(|p| p.name == name) {
            name = format!("{base}{n}");
            n += 1;
        }
        params.push(PathParam {
            name,
            pointer: pointer.clone(),
            schema,
        });
    }
    Ok(params)
}

/// `#/definitions/app/definitions/identity` becomes `appIdentity`.
pub fn param_name(naming: &Naming, pointer: &str) -> String {
    let parts: Vec<&str> = pointer.split('/').collect();
    let ident = if parts.len() >= 4 {
        format!("{}-{}", parts[parts.len() - 3], parts[parts.len() - 1])
    } else {
        parts.last().copied().unwrap_or_default().to_string()
    };
    naming.initial_low(&ident)
}

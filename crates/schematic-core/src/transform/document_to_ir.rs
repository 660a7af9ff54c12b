use crate::error::{AnalyzeError, TransformError};
use crate::graph::{Document, Link, Relation, SchemaId};
use crate::ir::*;
use crate::parse::ref_resolve::RefResolver;

use super::link_analyzer::{LinkAnalyzer, check_link_titles};
use super::name_normalizer::Naming;
use super::resolve_pass::resolve_document;
use super::type_mapper::TypeMapper;

/// Overrides for values otherwise derived from the document.
#[derive(Debug, Clone, Default)]
pub struct TransformOptions {
    pub package: Option<String>,
    pub base_url: Option<String>,
}

/// Resolve a document and build the client model.
pub fn transform(doc: &mut Document, naming: &Naming) -> Result<ClientSpec, TransformError> {
    transform_with_options(doc, naming, &TransformOptions::default())
}

pub fn transform_with_options(
    doc: &mut Document,
    naming: &Naming,
    options: &TransformOptions,
) -> Result<ClientSpec, TransformError> {
    // Phase 1: replace every reference reachable from the root
    let root = resolve_document(doc)?;
    let doc: &Document = doc;

    // Phase 2: pick the resources and register their names
    let resources = resource_schemas(doc, root)?;
    let mut types = TypeMapper::new(doc);
    for (name, id) in &resources {
        types.register(*id, naming.initial_cap(name));
    }

    // Phase 3: analyze every resource and its links
    let analyzer = LinkAnalyzer::new(doc, naming, &types);
    let mut ir_resources = Vec::with_capacity(resources.len());
    for (name, id) in &resources {
        ir_resources.push(build_resource(doc, naming, &types, &analyzer, name, *id)?);
    }

    // Phase 4: document metadata
    let root_node = doc.node(root);
    let title = root_node.title.clone().unwrap_or_default();
    let info = IrInfo {
        title: title.clone(),
        description: root_node.description.clone(),
        version: root_node.version.clone().unwrap_or_default(),
    };
    let package = options
        .package
        .clone()
        .unwrap_or_else(|| naming.package_name(&title));
    let base_url = options
        .base_url
        .clone()
        .or_else(|| base_url(doc, root))
        .unwrap_or_default();

    let spec = ClientSpec {
        info,
        package,
        base_url,
        resources: ir_resources,
    };
    log::info!(
        "transformed {} resources with {} operations",
        spec.resources.len(),
        spec.operation_count()
    );
    Ok(spec)
}

/// Root properties sorted by name, resolved to their target nodes.
pub fn resolved_properties(
    doc: &Document,
    id: SchemaId,
) -> Result<Vec<(String, SchemaId)>, TransformError> {
    let resolver = RefResolver::new(doc);
    let node = doc.node(resolver.resolve(id)?);
    let mut properties = Vec::with_capacity(node.properties.len());
    for (name, child) in &node.properties {
        properties.push((name.clone(), resolver.resolve(*child)?));
    }
    properties.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(properties)
}

/// Links declared on a node, after dereferencing it.
pub fn links_of(doc: &Document, id: SchemaId) -> Result<&[Link], TransformError> {
    let id = RefResolver::new(doc).resolve(id)?;
    Ok(&doc.node(id).links)
}

/// Root properties that carry links or properties. Falls back to the root's
/// definitions when it declares no properties of its own.
fn resource_schemas(
    doc: &Document,
    root: SchemaId,
) -> Result<Vec<(String, SchemaId)>, TransformError> {
    let mut candidates = resolved_properties(doc, root)?;
    if candidates.is_empty() {
        let resolver = RefResolver::new(doc);
        for (name, child) in &doc.node(root).definitions {
            candidates.push((name.clone(), resolver.resolve(*child)?));
        }
        candidates.sort_by(|a, b| a.0.cmp(&b.0));
    }
    Ok(candidates
        .into_iter()
        .filter(|(name, id)| {
            let node = doc.node(*id);
            let keep = !node.links.is_empty() || !node.properties.is_empty();
            if !keep {
                log::debug!("skipping '{name}': no links or properties");
            }
            keep
        })
        .collect())
}

fn build_resource(
    doc: &Document,
    naming: &Naming,
    types: &TypeMapper<'_>,
    analyzer: &LinkAnalyzer<'_>,
    name: &str,
    id: SchemaId,
) -> Result<IrResource, TransformError> {
    let node = doc.node(id);
    check_link_titles(name, &node.links)?;

    let declaration = types.type_of(node.items.unwrap_or(id), true, true)?;
    let mut operations = Vec::with_capacity(node.links.len());
    for link in &node.links {
        operations.push(build_operation(analyzer, name, id, link)?);
    }
    log::debug!("resource '{name}': {} operations", operations.len());

    Ok(IrResource {
        name: naming.normalize(name),
        description: node.description.clone(),
        declaration,
        operations,
    })
}

fn build_operation(
    analyzer: &LinkAnalyzer<'_>,
    resource: &str,
    id: SchemaId,
    link: &Link,
) -> Result<IrOperation, AnalyzeError> {
    let method = HttpMethod::parse(&link.method).ok_or_else(|| AnalyzeError::UnsupportedMethod {
        link: link.title.clone(),
        method: link.method.clone(),
    })?;
    let href = link
        .href
        .as_ref()
        .ok_or_else(|| AnalyzeError::MissingHRef(link.title.clone()))?;

    let path_args = analyzer
        .path_params(link)?
        .into_iter()
        .map(|p| p.name)
        .collect();
    let parameters = analyzer.parameters(resource, link)?;
    let returns = analyzer.return_shape(id, resource, link)?;
    let options_type = analyzer.options_type(resource, link)?;
    let name = analyzer.operation_name(resource, link);
    log::debug!("link '{}': {} {}", name.pascal_case, method.as_str(), href.raw());

    Ok(IrOperation {
        name,
        title: link.title.clone(),
        description: link.description.clone(),
        rel: link.rel.to_string(),
        method,
        href: href.format_string().to_string(),
        path_args,
        parameters,
        returns,
        options_type,
    })
}

/// Href of the root `self` link.
fn base_url(doc: &Document, root: SchemaId) -> Option<String> {
    doc.node(root)
        .links
        .iter()
        .find(|l| l.rel == Relation::Self_)
        .and_then(|l| l.href.as_ref())
        .map(|h| h.raw().to_string())
}

use std::collections::HashSet;

use crate::error::AnalyzeError;
use crate::graph::{Document, Link, Relation, SchemaId};
use crate::ir::{IrParameter, NamedType, NormalizedName, ParameterKind, ReturnDescriptor, TypeDescriptor};
use crate::parse::ref_resolve::RefResolver;

use super::href::{PathParam, path_params};
use super::name_normalizer::Naming;
use super::type_mapper::TypeMapper;

/// Name of the pagination parameter added to `instances` listings.
pub const LIST_RANGE_PARAM: &str = "lr";
/// Name of the request body parameter.
pub const BODY_PARAM: &str = "o";
/// Named type of the pagination parameter.
pub const LIST_RANGE_TYPE: &str = "ListRange";

/// Fail if two links of one resource share a title, ignoring case.
pub fn check_link_titles(resource: &str, links: &[Link]) -> Result<(), AnalyzeError> {
    let mut seen = HashSet::new();
    for link in links {
        if !seen.insert(link.title.to_lowercase()) {
            return Err(AnalyzeError::DuplicateLinkTitle {
                resource: resource.to_string(),
                title: link.title.clone(),
            });
        }
    }
    Ok(())
}

/// Derives operation signatures from links.
pub struct LinkAnalyzer<'a> {
    doc: &'a Document,
    naming: &'a Naming,
    types: &'a TypeMapper<'a>,
}

impl<'a> LinkAnalyzer<'a> {
    pub fn new(doc: &'a Document, naming: &'a Naming, types: &'a TypeMapper<'a>) -> Self {
        Self { doc, naming, types }
    }

    /// `<Resource><Title>`, e.g. `AppInfo`.
    pub fn operation_name(&self, resource: &str, link: &Link) -> NormalizedName {
        self.naming.normalize(&format!("{resource}-{}", link.title))
    }

    /// `<Resource><Title>Opts`, the named type of a custom request body.
    pub fn options_type_name(&self, resource: &str, link: &Link) -> String {
        self.naming
            .initial_cap(&format!("{resource}-{}-Opts", link.title))
    }

    /// `<Resource><Title>Result`, the named type of a custom response.
    pub fn result_type_name(&self, resource: &str, link: &Link) -> String {
        self.naming
            .initial_cap(&format!("{resource}-{}-Result", link.title))
    }

    pub fn path_params(&self, link: &Link) -> Result<Vec<PathParam>, AnalyzeError> {
        let href = link
            .href
            .as_ref()
            .ok_or_else(|| AnalyzeError::MissingHRef(link.title.clone()))?;
        Ok(path_params(self.doc, self.naming, href)?)
    }

    /// Request body type and whether a body is mandatory.
    ///
    /// The type is never wrapped in `Optional`; optionality is reported
    /// separately.
    pub fn body_type(&self, link: &Link) -> Result<Option<(TypeDescriptor, bool)>, AnalyzeError> {
        let Some(schema) = link.schema else {
            return Ok(None);
        };
        let (inner, required) = self.types.type_of(schema, true, false)?.into_required();
        Ok(Some((inner, required)))
    }

    /// Declaration of the options type, when the body declares its own
    /// properties.
    pub fn options_type(
        &self,
        resource: &str,
        link: &Link,
    ) -> Result<Option<NamedType>, AnalyzeError> {
        let Some(schema) = link.schema else {
            return Ok(None);
        };
        if !self.is_custom(schema)? {
            return Ok(None);
        }
        let (definition, _) = self.types.type_of(schema, true, false)?.into_required();
        Ok(Some(NamedType {
            name: self.options_type_name(resource, link),
            definition,
        }))
    }

    /// Ordered parameter list: path parameters, then `o`, then `lr`.
    pub fn parameters(&self, resource: &str, link: &Link) -> Result<Vec<IrParameter>, AnalyzeError> {
        let mut params = Vec::new();
        for param in self.path_params(link)? {
            params.push(IrParameter {
                param_type: self.types.type_of(param.schema, true, true)?,
                name: param.name,
                kind: ParameterKind::Path,
            });
        }

        if let Some((inner, required)) = self.body_type(link)? {
            let custom = match link.schema {
                Some(schema) => self.is_custom(schema)?,
                None => false,
            };
            let body = if custom {
                TypeDescriptor::Named(self.options_type_name(resource, link))
            } else {
                inner
            };
            let param_type = if required || body.is_naturally_nilable() {
                body
            } else {
                TypeDescriptor::optional(body)
            };
            params.push(IrParameter {
                name: BODY_PARAM.to_string(),
                kind: ParameterKind::Body,
                param_type,
            });
        }

        if link.rel == Relation::Instances && link.is_get() {
            params.push(IrParameter {
                name: LIST_RANGE_PARAM.to_string(),
                kind: ParameterKind::ListRange,
                param_type: TypeDescriptor::optional(TypeDescriptor::Named(
                    LIST_RANGE_TYPE.to_string(),
                )),
            });
        }
        Ok(params)
    }

    /// Classify what a link returns.
    pub fn return_shape(
        &self,
        resource_id: SchemaId,
        resource: &str,
        link: &Link,
    ) -> Result<ReturnDescriptor, AnalyzeError> {
        let resolver = RefResolver::new(self.doc);
        let resource_id = resolver.resolve(resource_id)?;
        let target = link.target_schema.map(|t| resolver.resolve(t)).transpose()?;
        let subject = target.unwrap_or(resource_id);

        if self.is_empty_subject(subject)? {
            return Ok(ReturnDescriptor::Empty);
        }

        let resource_name = self.naming.initial_cap(resource);
        match (target, &link.rel) {
            (None, Relation::Destroy | Relation::Empty) => Ok(ReturnDescriptor::Empty),
            (Some(target), _) => self.target_shape(resource_id, &resource_name, resource, link, target),
            (None, Relation::Instances) => {
                if self.declares_named_type(resource_id) {
                    Ok(ReturnDescriptor::Collection {
                        name: resource_name,
                    })
                } else {
                    let element = self.types.type_of(resource_id, true, true)?;
                    Ok(ReturnDescriptor::Scalar(TypeDescriptor::Array(Box::new(element))))
                }
            }
            (None, _) => {
                if self.declares_named_type(resource_id) {
                    Ok(ReturnDescriptor::Named {
                        name: resource_name,
                        record: self.declares_record(resource_id)?,
                    })
                } else {
                    Ok(ReturnDescriptor::Scalar(
                        self.types.type_of(resource_id, true, true)?,
                    ))
                }
            }
        }
    }

    fn target_shape(
        &self,
        resource_id: SchemaId,
        resource_name: &str,
        resource: &str,
        link: &Link,
        target: SchemaId,
    ) -> Result<ReturnDescriptor, AnalyzeError> {
        // The resource itself is returned under its own name.
        if target == resource_id && self.declares_named_type(resource_id) {
            return Ok(ReturnDescriptor::Named {
                name: resource_name.to_string(),
                record: self.declares_record(resource_id)?,
            });
        }

        let node = self.doc.node(target);
        if node.is_custom_type() {
            return Ok(ReturnDescriptor::Result {
                name: self.result_type_name(resource, link),
                definition: self.types.type_of(target, true, true)?,
                collection: false,
            });
        }

        if let Some(items) = node.items {
            let items = RefResolver::new(self.doc).resolve(items)?;
            if items == resource_id && self.declares_named_type(resource_id) {
                return Ok(ReturnDescriptor::Collection {
                    name: resource_name.to_string(),
                });
            }
            if self.doc.node(items).is_custom_type() {
                return Ok(ReturnDescriptor::Result {
                    name: self.result_type_name(resource, link),
                    definition: self.types.type_of(items, true, true)?,
                    collection: true,
                });
            }
        }

        Ok(ReturnDescriptor::Scalar(self.types.type_of(target, true, true)?))
    }

    fn is_custom(&self, id: SchemaId) -> Result<bool, AnalyzeError> {
        let id = RefResolver::new(self.doc).resolve(id)?;
        Ok(self.doc.node(id).is_custom_type())
    }

    /// Resources with their own properties or pattern properties get a named
    /// declaration.
    fn declares_named_type(&self, id: SchemaId) -> bool {
        let node = self.doc.node(id);
        node.is_custom_type() || !node.pattern_properties.is_empty()
    }

    /// Whether the resource's own declaration is a record.
    fn declares_record(&self, id: SchemaId) -> Result<bool, AnalyzeError> {
        Ok(self.types.type_of(id, true, true)?.is_record())
    }

    /// A subject typed exactly `null`, or one that cannot be typed at all,
    /// returns nothing.
    fn is_empty_subject(&self, id: SchemaId) -> Result<bool, AnalyzeError> {
        if self.types.is_null_only(id)? {
            return Ok(true);
        }
        let node = self.doc.node(id);
        let inferable = node.type_tags().is_some()
            || !node.properties.is_empty()
            || !node.pattern_properties.is_empty()
            || node.items.is_some();
        Ok(!inferable)
    }
}

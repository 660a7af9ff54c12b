pub mod document_to_ir;
pub mod href;
pub mod link_analyzer;
pub mod name_normalizer;
pub mod resolve_pass;
pub mod type_mapper;

pub use document_to_ir::{
    TransformOptions, links_of, resolved_properties, transform, transform_with_options,
};
pub use name_normalizer::Naming;
pub use resolve_pass::{ResolvedSet, resolve_document};

pub mod ref_resolve;
pub mod schema;

use crate::error::ParseError;
use schema::RawSchema;

/// Parse a hyper-schema document from JSON.
pub fn from_json(input: &str) -> Result<RawSchema, ParseError> {
    let schema: RawSchema = serde_json::from_str(input)?;
    Ok(schema)
}

/// Parse a hyper-schema document from YAML.
pub fn from_yaml(input: &str) -> Result<RawSchema, ParseError> {
    let schema: RawSchema = serde_yaml_ng::from_str(input)?;
    Ok(schema)
}

/// Parse a document, picking the format from the source name's extension.
///
/// `.yaml` and `.yml` are read as YAML; everything else (including `-` for
/// standard input) is read as JSON.
pub fn from_source(name: &str, input: &str) -> Result<RawSchema, ParseError> {
    if name.ends_with(".yaml") || name.ends_with(".yml") {
        from_yaml(input)
    } else {
        from_json(input)
    }
}

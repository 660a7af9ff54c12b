use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    #[error("failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("non-fragment references are not supported: {0}")]
    UnsupportedReferenceForm(String),

    #[error("can't find '{segment}' in {reference}")]
    MissingReferenceTarget { reference: String, segment: String },

    #[error("can't follow pointer at '{segment}' in {reference}")]
    UnresolvableReference { reference: String, segment: String },

    #[error("reference cycle detected while following {0}")]
    ReferenceCycle(String),
}

#[derive(Debug, Error)]
pub enum TypeError {
    #[error("type not found for schema element:\n    {0}")]
    AmbiguousOrMissingType(String),

    #[error("unknown type '{tag}' in schema element:\n    {fragment}")]
    UnknownTypeTag { tag: String, fragment: String },

    #[error("recursive type without a named declaration:\n    {0}")]
    RecursiveType(String),

    #[error(transparent)]
    Resolve(#[from] ResolveError),
}

#[derive(Debug, Error)]
pub enum AnalyzeError {
    #[error(
        "duplicate {resource}.links.title '{title}' detected in the schema; links must have distinct titles"
    )]
    DuplicateLinkTitle { resource: String, title: String },

    #[error("no href property declared for link '{0}'")]
    MissingHRef(String),

    #[error("unsupported HTTP method '{method}' on link '{link}'")]
    UnsupportedMethod { link: String, method: String },

    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error(transparent)]
    Type(#[from] TypeError),
}

#[derive(Debug, Error)]
pub enum TransformError {
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("resolve error: {0}")]
    Resolve(#[from] ResolveError),

    #[error("type error: {0}")]
    Type(#[from] TypeError),

    #[error("analysis error: {0}")]
    Analyze(#[from] AnalyzeError),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid config file: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),
}

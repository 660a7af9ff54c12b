use schematic_core::error::ResolveError;
use schematic_core::graph::{Document, Relation};
use schematic_core::parse;
use schematic_core::parse::ref_resolve::RefResolver;
use schematic_core::transform::{links_of, resolve_document, resolved_properties};

const BLOG: &str = include_str!("fixtures/blog.json");
const BLOG_YAML: &str = include_str!("fixtures/blog.yaml");
const PLATFORM: &str = include_str!("fixtures/platform.json");

fn load(source: &str) -> Document {
    Document::from_raw(parse::from_json(source).unwrap())
}

#[test]
fn parse_blog_fixture() {
    let doc = load(BLOG);
    let root = doc.root_node();
    assert_eq!(root.title.as_deref(), Some("Blog Engine API"));
    assert_eq!(root.definitions.len(), 2);
    assert_eq!(root.links.len(), 1);

    let blog = doc.node(root.definitions["blog"]);
    assert_eq!(blog.links.len(), 5);
    assert_eq!(blog.links[2].rel, Relation::Instances);
    assert_eq!(blog.required, vec!["id", "name"]);
}

#[test]
fn parse_yaml_by_extension() {
    let raw = parse::from_source("blog.yaml", BLOG_YAML).unwrap();
    let doc = Document::from_raw(raw);
    assert_eq!(doc.root_node().title.as_deref(), Some("Blog Engine API"));

    let err = parse::from_source("blog.json", BLOG_YAML);
    assert!(err.is_err());
}

#[test]
fn resolve_self_referencing_schema_terminates() {
    let mut doc = load(BLOG);
    let root = resolve_document(&mut doc).unwrap();

    let blog = doc.node(root).definitions["blog"];
    let parent = doc.node(blog).properties["parent"];
    assert_eq!(parent, blog);
}

#[test]
fn href_targets_resolve_through_identity() {
    let mut doc = load(PLATFORM);
    resolve_document(&mut doc).unwrap();

    let resolver = RefResolver::new(&doc);
    let identity = resolver
        .resolve_reference("#/definitions/app/definitions/identity")
        .unwrap();
    let id = resolver
        .lookup("#/definitions/app/definitions/id")
        .unwrap();
    assert_eq!(identity, id);
    assert_eq!(doc.node(id).format.as_deref(), Some("uuid"));
}

#[test]
fn resolved_properties_are_sorted() {
    let mut doc = load(PLATFORM);
    let root = resolve_document(&mut doc).unwrap();
    let names: Vec<String> = resolved_properties(&doc, root)
        .unwrap()
        .into_iter()
        .map(|(name, _)| name)
        .collect();
    assert_eq!(
        names,
        vec!["account", "app", "config-var", "dyno", "oauth-client"]
    );
}

#[test]
fn links_of_follows_references() {
    let doc = load(PLATFORM);
    let app_ref = doc.root_node().properties["app"];
    let links = links_of(&doc, app_ref).unwrap();
    let titles: Vec<&str> = links.iter().map(|l| l.title.as_str()).collect();
    assert_eq!(titles, vec!["Create", "Info", "List", "Delete"]);
}

#[test]
fn missing_reference_names_the_segment() {
    let mut doc = load(
        r##"{"properties": {"app": {"$ref": "#/definitions/app/definitions/nope"}},
            "definitions": {"app": {"definitions": {}}}}"##,
    );
    let err = resolve_document(&mut doc).unwrap_err();
    match err {
        ResolveError::MissingReferenceTarget { reference, segment } => {
            assert_eq!(reference, "#/definitions/app/definitions/nope");
            assert_eq!(segment, "nope");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn external_reference_is_rejected() {
    let mut doc = load(r#"{"properties": {"app": {"$ref": "app.json"}}}"#);
    let err = resolve_document(&mut doc).unwrap_err();
    assert!(matches!(err, ResolveError::UnsupportedReferenceForm(_)));
}

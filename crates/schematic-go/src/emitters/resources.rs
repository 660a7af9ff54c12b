use minijinja::{Environment, context};
use serde::Serialize;

use schematic_core::ir::{HttpMethod, IrOperation, IrResource, NamedType, ReturnDescriptor};
use schematic_core::transform::Naming;

use crate::emitters::comment::as_comment;
use crate::error::GeneratorError;
use crate::type_mapper::GoTypeMapper;

const GO_KEYWORDS: &[&str] = &[
    "break", "case", "chan", "const", "continue", "default", "defer", "else", "fallthrough",
    "for", "func", "go", "goto", "if", "import", "interface", "map", "package", "range",
    "return", "select", "struct", "switch", "type", "var",
];

#[derive(Debug, Serialize)]
struct TypeDecl {
    name: String,
    definition: String,
}

#[derive(Debug, Serialize)]
struct OperationContext {
    comment: String,
    name: String,
    options_type: Option<TypeDecl>,
    result_type: Option<TypeDecl>,
    params: String,
    values: String,
    method: String,
    path: String,
    request_params: String,
    empty: bool,
    var_name: String,
    var_type: String,
    return_expr: String,
}

/// How a non-empty result is declared and handed back.
struct ResultBinding {
    go_type: String,
    pointer: bool,
}

/// Emit the type declaration and service methods for one resource.
pub fn emit_resource(
    resource: &IrResource,
    naming: &Naming,
    comments: bool,
) -> Result<String, GeneratorError> {
    let mut env = Environment::new();
    env.set_trim_blocks(true);
    env.add_template("resource.go.j2", include_str!("../../templates/resource.go.j2"))
        .expect("template should be valid");
    let tmpl = env.get_template("resource.go.j2")?;

    let types = GoTypeMapper::new(naming, comments);
    let (declaration, _) = resource.declaration.clone().into_required();
    let operations: Vec<OperationContext> = resource
        .operations
        .iter()
        .map(|op| build_operation(resource, op, naming, &types, comments))
        .collect();

    let rendered = tmpl.render(context! {
        comment => doc_comment(resource.description.as_deref(), comments),
        name => resource.name.pascal_case.clone(),
        declaration => types.go_type(&declaration),
        operations => operations,
    })?;
    Ok(rendered)
}

fn build_operation(
    resource: &IrResource,
    op: &IrOperation,
    naming: &Naming,
    types: &GoTypeMapper<'_>,
    comments: bool,
) -> OperationContext {
    let params: Vec<String> = op
        .parameters
        .iter()
        .map(|p| format!("{} {}", p.name, types.go_type(&p.param_type)))
        .collect();

    let options_type = op.options_type.as_ref().map(|NamedType { name, definition }| TypeDecl {
        name: name.clone(),
        definition: types.go_type(definition),
    });

    let mut result_type = None;
    let binding = match &op.returns {
        ReturnDescriptor::Empty => None,
        ReturnDescriptor::Named { name, record } => Some(ResultBinding {
            go_type: name.clone(),
            pointer: *record,
        }),
        ReturnDescriptor::Collection { name } => Some(ResultBinding {
            go_type: format!("[]{name}"),
            pointer: false,
        }),
        ReturnDescriptor::Result {
            name,
            definition,
            collection,
        } => {
            let (definition, _) = definition.clone().into_required();
            let record = definition.is_record();
            result_type = Some(TypeDecl {
                name: name.clone(),
                definition: types.go_type(&definition),
            });
            Some(if *collection {
                ResultBinding {
                    go_type: format!("[]{name}"),
                    pointer: false,
                }
            } else {
                ResultBinding {
                    go_type: name.clone(),
                    pointer: record,
                }
            })
        }
        ReturnDescriptor::Scalar(ty) => Some(ResultBinding {
            go_type: types.go_type(ty),
            pointer: false,
        }),
    };

    let var_name = result_var_name(resource, op, naming);
    let (values, var_type, return_expr) = match &binding {
        None => ("error".to_string(), String::new(), String::new()),
        Some(ResultBinding { go_type, pointer: true }) => (
            format!("*{go_type}, error"),
            go_type.clone(),
            format!("&{var_name}"),
        ),
        Some(ResultBinding { go_type, pointer: false }) => (
            format!("{go_type}, error"),
            go_type.clone(),
            var_name.clone(),
        ),
    };

    OperationContext {
        comment: doc_comment(op.description.as_deref(), comments),
        name: op.name.pascal_case.clone(),
        options_type,
        result_type,
        params: params.join(", "),
        values,
        method: naming.method_cap(op.method.as_str()),
        path: path_expr(op),
        request_params: request_params(op),
        empty: binding.is_none(),
        var_name,
        var_type,
        return_expr,
    }
}

fn doc_comment(description: Option<&str>, comments: bool) -> String {
    match description {
        Some(text) if comments && !text.trim().is_empty() => as_comment(text.trim()),
        _ => String::new(),
    }
}

/// Local variable holding the decoded response, named after the resource.
fn result_var_name(resource: &IrResource, op: &IrOperation, naming: &Naming) -> String {
    let base = naming.initial_low(&resource.name.original);
    let base = match op.returns {
        ReturnDescriptor::Collection { .. } => format!("{base}List"),
        _ => base,
    };
    let taken = op.parameters.iter().any(|p| p.name == base);
    if taken || GO_KEYWORDS.contains(&base.as_str()) {
        format!("{base}Result")
    } else {
        base
    }
}

/// Request path: a literal, or `fmt.Sprintf` over the path arguments.
fn path_expr(op: &IrOperation) -> String {
    let literal = go_string(&op.href);
    if op.path_args.is_empty() {
        literal
    } else {
        format!("fmt.Sprintf({literal}, {})", op.path_args.join(", "))
    }
}

/// Trailing arguments for the service dispatch call.
fn request_params(op: &IrOperation) -> String {
    if op.method == HttpMethod::Delete {
        return String::new();
    }
    let body = op.body_parameter().map_or("nil", |p| p.name.as_str());
    let mut out = format!(", {body}");
    if op.method == HttpMethod::Get {
        let range = op.list_range_parameter().map_or("nil", |p| p.name.as_str());
        out.push_str(&format!(", {range}"));
    }
    out
}

fn go_string(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

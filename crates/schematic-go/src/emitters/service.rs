use minijinja::{Environment, context};
use schematic_core::ir::ClientSpec;

use crate::error::GeneratorError;

const STD_IMPORTS: &[&str] = &[
    "bytes",
    "encoding/json",
    "fmt",
    "io",
    "net/http",
    "reflect",
    "runtime",
    "strings",
];

/// Standard library imports of the generated file, sorted.
pub fn imports(ir: &ClientSpec) -> Vec<&'static str> {
    let mut imports = STD_IMPORTS.to_vec();
    if ir.uses_time() {
        imports.push("time");
    }
    imports.sort_unstable();
    imports
}

/// Emit the package header, imports and the fixed service runtime.
pub fn emit_service(ir: &ClientSpec) -> Result<String, GeneratorError> {
    let mut env = Environment::new();
    env.set_trim_blocks(true);
    env.add_template("service.go.j2", include_str!("../../templates/service.go.j2"))
        .expect("template should be valid");
    let tmpl = env.get_template("service.go.j2")?;

    let rendered = tmpl.render(context! {
        package => ir.package.clone(),
        imports => imports(ir),
        version => ir.info.version.clone(),
        base_url => ir.base_url.clone(),
    })?;
    Ok(rendered)
}

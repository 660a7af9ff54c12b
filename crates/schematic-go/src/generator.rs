use schematic_core::ir::ClientSpec;
use schematic_core::transform::Naming;
use schematic_core::{CodeGenerator, GeneratedFile};

use crate::emitters;
use crate::error::GeneratorError;

/// Options for Go output.
#[derive(Debug, Clone)]
pub struct GoClientConfig {
    /// Emit description comments.
    pub comments: bool,
    pub naming: Naming,
}

impl Default for GoClientConfig {
    fn default() -> Self {
        Self {
            comments: true,
            naming: Naming::new(),
        }
    }
}

/// Go client code generator. Produces a single `<package>.go` file.
pub struct GoClientGenerator;

impl GoClientGenerator {
    /// Render the whole client as one source string.
    pub fn render(ir: &ClientSpec, config: &GoClientConfig) -> Result<String, GeneratorError> {
        let mut content = emitters::service::emit_service(ir)?;
        for resource in &ir.resources {
            content.push('\n');
            content.push_str(&emitters::resources::emit_resource(
                resource,
                &config.naming,
                config.comments,
            )?);
        }
        if !content.ends_with('\n') {
            content.push('\n');
        }
        log::debug!(
            "rendered {} resources into {} bytes",
            ir.resources.len(),
            content.len()
        );
        Ok(content)
    }
}

impl CodeGenerator for GoClientGenerator {
    type Config = GoClientConfig;
    type Error = GeneratorError;

    fn generate(
        &self,
        ir: &ClientSpec,
        config: &GoClientConfig,
    ) -> Result<Vec<GeneratedFile>, GeneratorError> {
        Ok(vec![GeneratedFile {
            path: format!("{}.go", ir.package),
            content: Self::render(ir, config)?,
        }])
    }
}

use schematic_core::ir::{FieldDescriptor, TypeDescriptor};
use schematic_core::transform::Naming;

use crate::emitters::comment::as_comment;

/// Renders [`TypeDescriptor`]s as Go type expressions.
pub struct GoTypeMapper<'a> {
    naming: &'a Naming,
    comments: bool,
}

impl<'a> GoTypeMapper<'a> {
    pub fn new(naming: &'a Naming, comments: bool) -> Self {
        Self { naming, comments }
    }

    pub fn go_type(&self, ty: &TypeDescriptor) -> String {
        self.render(ty, 0)
    }

    fn render(&self, ty: &TypeDescriptor, depth: usize) -> String {
        match ty {
            TypeDescriptor::Boolean => "bool".to_string(),
            TypeDescriptor::Integer => "int".to_string(),
            TypeDescriptor::Number => "float64".to_string(),
            TypeDescriptor::String => "string".to_string(),
            TypeDescriptor::DateTime => "time.Time".to_string(),
            TypeDescriptor::Any => "interface{}".to_string(),
            TypeDescriptor::Named(name) => name.clone(),
            TypeDescriptor::Array(inner) => format!("[]{}", self.render(inner, depth)),
            TypeDescriptor::Map(inner) => format!("map[string]{}", self.render(inner, depth)),
            TypeDescriptor::Optional(inner) => format!("*{}", self.render(inner, depth)),
            TypeDescriptor::Record(fields) => self.render_struct(fields, depth),
        }
    }

    fn render_struct(&self, fields: &[FieldDescriptor], depth: usize) -> String {
        if fields.is_empty() {
            return "struct{}".to_string();
        }
        let indent = "\t".repeat(depth + 1);
        let mut out = String::from("struct {\n");
        for field in fields {
            if self.comments
                && let Some(ref description) = field.description
            {
                for line in as_comment(description).lines() {
                    out.push_str(&indent);
                    out.push_str(line);
                    out.push('\n');
                }
            }
            out.push_str(&format!(
                "{indent}{} {} {}\n",
                self.naming.initial_cap(&field.name),
                self.render(&field.field_type, depth + 1),
                field_tag(&field.name, field.required)
            ));
        }
        out.push_str(&"\t".repeat(depth));
        out.push('}');
        out
    }
}

/// `json` and `url` struct tags for a field.
pub fn field_tag(name: &str, required: bool) -> String {
    let omit = if required { "" } else { ",omitempty" };
    format!("`json:\"{name}{omit}\" url:\"{name}{omit},key\"`")
}

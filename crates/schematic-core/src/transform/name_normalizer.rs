use heck::ToSnakeCase;
use regex::Regex;

use crate::ir::NormalizedName;

/// Initialisms that are upper-cased when they end an identifier segment.
pub const DEFAULT_ACRONYMS: &[&str] = &[
    "Url", "Http", "Id", "Io", "Uuid", "Api", "Uri", "Ssl", "Cname", "Oauth", "Otp",
];

/// Identifier casing rules. Built once per run and passed to whatever needs
/// to derive identifiers.
#[derive(Debug, Clone)]
pub struct Naming {
    separators: Regex,
    acronyms: Regex,
}

impl Default for Naming {
    fn default() -> Self {
        Self::new()
    }
}

impl Naming {
    pub fn new() -> Self {
        Self::with_acronyms(&[])
    }

    /// Extend the default initialism list, e.g. with `Ip` or `Sku`.
    pub fn with_acronyms(extra: &[String]) -> Self {
        let words: Vec<String> = DEFAULT_ACRONYMS
            .iter()
            .map(|a| regex::escape(a))
            .chain(extra.iter().map(|a| regex::escape(&capitalize(a))))
            .collect();
        Self {
            separators: Regex::new(r"[-.$/:_{}\s]").expect("separator pattern is valid"),
            acronyms: Regex::new(&format!("({})$", words.join("|")))
                .expect("acronym pattern is valid"),
        }
    }

    /// `provider_id` becomes `ProviderID`.
    pub fn initial_cap(&self, ident: &str) -> String {
        self.depunct(ident, true)
    }

    /// `struct-uuid` becomes `structUUID`.
    pub fn initial_low(&self, ident: &str) -> String {
        self.depunct(ident, false)
    }

    /// `POST` becomes `Post`.
    pub fn method_cap(&self, method: &str) -> String {
        self.initial_cap(&method.to_lowercase())
    }

    pub fn depunct(&self, ident: &str, initial_cap: bool) -> String {
        let mut out = String::with_capacity(ident.len());
        for (i, segment) in self.separators.split(ident).enumerate() {
            let segment = if initial_cap || i > 0 {
                capitalize(segment)
            } else {
                segment.to_string()
            };
            let segment = self.acronyms.replace(&segment, |caps: &regex::Captures| {
                let word = &caps[1];
                if word.len() > 4 {
                    format!("{}{}", word[..2].to_uppercase(), &word[2..])
                } else {
                    word.to_uppercase()
                }
            });
            out.push_str(&segment);
        }
        out
    }

    pub fn normalize(&self, ident: &str) -> NormalizedName {
        NormalizedName {
            original: ident.to_string(),
            pascal_case: self.initial_cap(ident),
            camel_case: self.initial_low(ident),
            snake_case: ident.to_snake_case(),
        }
    }

    /// Package name from the first word of a document title.
    pub fn package_name(&self, title: &str) -> String {
        let name: String = title
            .split_whitespace()
            .next()
            .unwrap_or_default()
            .to_snake_case()
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect();
        if name.is_empty() || name.starts_with(|c: char| c.is_ascii_digit()) {
            "api".to_string()
        } else {
            name
        }
    }
}

fn capitalize(segment: &str) -> String {
    let mut chars = segment.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

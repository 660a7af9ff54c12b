use percent_encoding::percent_decode_str;
use regex::Regex;

/// A link URI template with its embedded JSON-pointer placeholders.
///
/// Placeholders have the form `{(<percent-encoded-pointer>)}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HRef {
    raw: String,
    format: String,
    pointers: Vec<String>,
}

impl HRef {
    /// The template exactly as written in the schema.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// The template with every placeholder replaced by `%v`.
    ///
    /// When the template has placeholders, literal `%` is doubled so the
    /// result is a valid `fmt.Sprintf` format. Without placeholders it is the
    /// path as written.
    pub fn format_string(&self) -> &str {
        &self.format
    }

    /// Decoded pointers, in left-to-right order of appearance.
    pub fn pointers(&self) -> &[String] {
        &self.pointers
    }

    pub fn placeholder_count(&self) -> usize {
        self.pointers.len()
    }
}

/// Parses href templates. Built once per document load.
#[derive(Debug, Clone)]
pub struct HRefParser {
    placeholder: Regex,
}

impl Default for HRefParser {
    fn default() -> Self {
        Self::new()
    }
}

impl HRefParser {
    pub fn new() -> Self {
        Self {
            placeholder: Regex::new(r"\{\(([^)]+)\)\}").expect("placeholder pattern is valid"),
        }
    }

    pub fn parse(&self, raw: &str) -> HRef {
        let pointers: Vec<String> = self
            .placeholder
            .captures_iter(raw)
            .map(|caps| percent_decode_str(&caps[1]).decode_utf8_lossy().into_owned())
            .collect();
        let format = if pointers.is_empty() {
            raw.to_string()
        } else {
            let mut format = String::with_capacity(raw.len());
            let mut last = 0;
            for m in self.placeholder.find_iter(raw) {
                format.push_str(&raw[last..m.start()].replace('%', "%%"));
                format.push_str("%v");
                last = m.end();
            }
            format.push_str(&raw[last..].replace('%', "%%"));
            format
        };
        HRef {
            raw: raw.to_string(),
            format,
            pointers,
        }
    }
}

//! Template rendering
//!
//! Placeholders name a node by a dotted path from the context node:
//!
//! ```text
//! version {{ .version }} / first item {{ .object.array.0 }} / all {{ . }}
//! ```
//!
//! Everything outside placeholders is copied verbatim.

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

use crate::core::error::PathError;
use crate::core::node::Node;
use crate::core::path::extract;

/// Static regex for `{{ .dotted.path }}` placeholders
pub static PLACEHOLDER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\{\{\s*\.([^{}\s]*)\s*\}\}").expect("Invalid PLACEHOLDER_RE regex")
});

#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("template placeholder `{placeholder}`: {source}")]
    Path {
        placeholder: String,
        #[source]
        source: PathError,
    },
}

/// Render `template` against `context`
pub fn render(template: &str, context: &Node) -> Result<String, TemplateError> {
    let mut output = String::with_capacity(template.len());
    let mut last = 0;

    for caps in PLACEHOLDER_RE.captures_iter(template) {
        let Some(whole) = caps.get(0) else {
            continue;
        };
        output.push_str(&template[last..whole.start()]);

        let path = caps.get(1).map_or("", |m| m.as_str()).replace('.', "/");
        let node = extract(context, &path).map_err(|source| TemplateError::Path {
            placeholder: whole.as_str().to_string(),
            source,
        })?;
        output.push_str(&node.to_string());

        last = whole.end();
    }

    output.push_str(&template[last..]);
    Ok(output)
}

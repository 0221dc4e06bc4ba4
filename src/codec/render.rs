//! Renderer module
//!
//! Encodes a node to the output formats: yaml, json, raw

use anyhow::{Context, Result};

use crate::core::node::Node;

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Yaml,
    Json,
    Raw,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "yaml" | "yml" => Ok(OutputFormat::Yaml),
            "json" => Ok(OutputFormat::Json),
            "raw" | "text" => Ok(OutputFormat::Raw),
            _ => Err(format!("Unknown format: {}", s)),
        }
    }
}

/// Render configuration combining format and options
#[derive(Debug, Clone, Copy, Default)]
pub struct RenderConfig {
    pub format: OutputFormat,
    pub pretty: bool,
}

impl RenderConfig {
    /// Create a new render config with pretty option
    pub fn with_pretty(format: OutputFormat, pretty: bool) -> Self {
        Self { format, pretty }
    }
}

/// Renderer for document nodes
pub struct Renderer {
    config: RenderConfig,
}

impl Renderer {
    /// Create a new renderer with render config
    pub fn with_config(config: RenderConfig) -> Self {
        Self { config }
    }

    /// Render a node to a string
    pub fn render(&self, node: &Node) -> Result<String> {
        match self.config.format {
            OutputFormat::Yaml => self.render_yaml(node),
            OutputFormat::Json => self.render_json(node),
            OutputFormat::Raw => Ok(self.render_raw(node)),
        }
    }

    /// Render as a YAML document, with an explicit start marker
    fn render_yaml(&self, node: &Node) -> Result<String> {
        let body = serde_yaml::to_string(node).context("Failed to encode YAML")?;
        Ok(format!("---\n{}", body))
    }

    /// Render as a single JSON value
    fn render_json(&self, node: &Node) -> Result<String> {
        let mut output = if self.config.pretty {
            serde_json::to_string_pretty(node)
        } else {
            serde_json::to_string(node)
        }
        .context("Failed to encode JSON")?;
        output.push('\n');
        Ok(output)
    }

    /// Render scalars bare and structures as compact JSON
    fn render_raw(&self, node: &Node) -> String {
        format!("{}\n", node)
    }
}

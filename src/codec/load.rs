//! Document loading
//!
//! Reads YAML or JSON streams from files or stdin and decodes every document
//! they contain into the tree model. Guards against oversized, binary and
//! non-UTF-8 inputs before decoding.

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use crate::core::node::Node;

/// Default maximum input size in bytes (64 MB)
pub const DEFAULT_MAX_FILE_SIZE: u64 = 64 * 1024 * 1024;

/// Name used for documents read from stdin
pub const STDIN_NAME: &str = "<stdin>";

/// Serialized format of an input stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputFormat {
    #[default]
    Yaml,
    Json,
}

impl std::str::FromStr for InputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "yaml" | "yml" => Ok(InputFormat::Yaml),
            "json" => Ok(InputFormat::Json),
            _ => Err(format!("Unknown input format: {}", s)),
        }
    }
}

impl InputFormat {
    /// Guess the format from a file extension; anything but `.json` is YAML
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => InputFormat::Json,
            _ => InputFormat::Yaml,
        }
    }
}

/// Configuration for loading documents
#[derive(Debug, Clone, Copy)]
pub struct LoadConfig {
    /// Forced input format; detected per file when `None`
    pub format: Option<InputFormat>,

    /// Maximum input size (bytes)
    pub max_file_size: u64,
}

impl Default for LoadConfig {
    fn default() -> Self {
        Self {
            format: None,
            max_file_size: DEFAULT_MAX_FILE_SIZE,
        }
    }
}

/// One decoded document of an input stream
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    /// File name, suffixed with `#N` for the N-th document of a multi-document stream
    pub source: String,

    /// Decoded tree; `None` for an empty or top-level null document
    pub node: Option<Node>,
}

/// Decode every document of a text stream
pub fn decode_str(text: &str, format: InputFormat) -> Result<Vec<Option<Node>>> {
    let nodes = match format {
        InputFormat::Yaml => serde_yaml::Deserializer::from_str(text)
            .map(decode_yaml_document)
            .collect::<Result<Vec<_>, _>>()?,
        InputFormat::Json => serde_json::Deserializer::from_str(text)
            .into_iter::<Node>()
            .collect::<Result<Vec<_>, _>>()?,
    };

    Ok(nodes
        .into_iter()
        .map(|node| if node.is_null() { None } else { Some(node) })
        .collect())
}

/// Decode one YAML document, expanding `<<` merge keys first
fn decode_yaml_document(
    document: serde_yaml::Deserializer<'_>,
) -> Result<Node, serde_yaml::Error> {
    let mut value = serde_yaml::Value::deserialize(document)?;
    value.apply_merge()?;
    Node::deserialize(value)
}

/// Load the documents of every file, in order
pub fn load_files(paths: &[PathBuf], config: &LoadConfig) -> Result<Vec<Document>> {
    let mut documents = Vec::new();
    for path in paths {
        documents.extend(load_file(path, config)?);
    }
    Ok(documents)
}

/// Load the documents of a single file
pub fn load_file(path: &Path, config: &LoadConfig) -> Result<Vec<Document>> {
    let name = path.display().to_string();
    let metadata =
        fs::metadata(path).with_context(|| format!("Error loading {}", name))?;

    if metadata.len() > config.max_file_size {
        bail!(
            "Error loading {}: file exceeds size limit ({} > {} bytes)",
            name,
            metadata.len(),
            config.max_file_size
        );
    }

    let bytes = fs::read(path).with_context(|| format!("Error loading {}", name))?;
    let format = config.format.unwrap_or_else(|| InputFormat::from_path(path));
    decode_bytes(bytes, &name, format)
}

/// Load the documents of a reader (typically stdin)
pub fn load_reader<R: Read>(
    reader: R,
    name: &str,
    config: &LoadConfig,
) -> Result<Vec<Document>> {
    let mut bytes = Vec::new();
    reader
        .take(config.max_file_size.saturating_add(1))
        .read_to_end(&mut bytes)
        .with_context(|| format!("Error reading {}", name))?;

    if bytes.len() as u64 > config.max_file_size {
        bail!(
            "Error loading {}: input exceeds size limit ({} bytes)",
            name,
            config.max_file_size
        );
    }

    decode_bytes(bytes, name, config.format.unwrap_or_default())
}

fn decode_bytes(bytes: Vec<u8>, name: &str, format: InputFormat) -> Result<Vec<Document>> {
    // Binary check on the first 8KB, like a text editor would
    let check_len = std::cmp::min(8192, bytes.len());
    if bytes[..check_len].contains(&0) {
        bail!(
            "Error loading {}: input appears to be binary (contains null bytes)",
            name
        );
    }

    let text = String::from_utf8(bytes)
        .with_context(|| format!("Error loading {}: input is not valid UTF-8", name))?;

    let nodes =
        decode_str(&text, format).with_context(|| format!("Error unmarshalling {}", name))?;
    let multi = nodes.len() > 1;

    tracing::debug!(source = name, documents = nodes.len(), ?format, "decoded input");

    Ok(nodes
        .into_iter()
        .enumerate()
        .map(|(i, node)| Document {
            source: if multi {
                format!("{}#{}", name, i + 1)
            } else {
                name.to_string()
            },
            node,
        })
        .collect())
}

//! CLI module - Command-line interface definition and pipeline

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use std::fs;
use std::io::Write;
use std::path::PathBuf;
use tracing::debug;

use crate::codec::load::{
    load_files, load_reader, Document, InputFormat, LoadConfig, DEFAULT_MAX_FILE_SIZE, STDIN_NAME,
};
use crate::codec::render::{OutputFormat, RenderConfig, Renderer};
use crate::core::{extract, merge_pair, Node};
use crate::template;

/// yyt - merge YAML/JSON documents, select a node, render it.
#[derive(Parser, Debug)]
#[command(name = "yyt")]
#[command(
    author,
    version,
    about,
    long_about = r#"yyt merges every input document into one tree, optionally selects a
node by path, then prints it (yaml by default) or renders it through a template.

Merge rules, applied left to right over the inputs:
- mappings are merged key by key, recursively
- sequences are concatenated
- scalars are overridden by later documents

Examples:
    yyt defaults.yaml site.yaml
    yyt -n object/array/1 data.yaml
    yyt -n object --out-format json --pretty a.yaml b.yaml
    yyt -e 'version {{ .version }}' data.yaml
    cat data.yaml | yyt -n version -f raw
"#
)]
pub struct Cli {
    /// Input files, merged in order. Reads stdin when empty.
    #[arg(
        value_name = "FILES",
        long_help = "Input files, merged in the order given. A YAML file holding several\n\
documents (separated by ---) contributes each of them in turn.\n\n\
When no file is given, documents are read from stdin."
    )]
    pub files: Vec<PathBuf>,

    /// Select the node at PATH (e.g. object/array/1).
    #[arg(
        short,
        long,
        value_name = "PATH",
        long_help = "Select the node at PATH before output or templating.\n\n\
PATH is slash-delimited: mapping keys by name, sequence items by 0-based index.\n\
Example: --node object/array/1"
    )]
    pub node: Option<String>,

    /// Render TEMPLATE with the selected node.
    #[arg(
        short,
        long,
        value_name = "TEMPLATE",
        conflicts_with = "execfile",
        long_help = "Render TEMPLATE with the selected node as context instead of encoding it.\n\n\
Placeholders use a dotted path from the context: {{ .object.member1 }},\n\
{{ .object.array.0 }}, or {{ . }} for the whole node."
    )]
    pub exec: Option<String>,

    /// Render the template read from FILE with the selected node.
    #[arg(long, value_name = "FILE")]
    pub execfile: Option<PathBuf>,

    /// Write output to FILE instead of stdout.
    #[arg(short, long, value_name = "FILE")]
    pub out: Option<PathBuf>,

    /// Output format (yaml/json/raw).
    #[arg(
        short = 'f',
        long,
        env = "YYT_OUT_FORMAT",
        default_value = "yaml",
        value_name = "FORMAT",
        long_help = "Select the output format for the selected node.\n\n\
Supported values:\n\
- yaml (default): YAML document with a leading ---\n\
- json: a single JSON value\n\
- raw: scalars printed bare, structures as compact JSON"
    )]
    pub out_format: String,

    /// Input format (yaml/json). Detected from the file extension by default.
    #[arg(long, env = "YYT_IN_FORMAT", value_name = "FORMAT")]
    pub in_format: Option<String>,

    /// Refuse inputs larger than BYTES.
    #[arg(long, default_value_t = DEFAULT_MAX_FILE_SIZE, value_name = "BYTES")]
    pub max_file_size: u64,

    /// Pretty-print JSON output with indentation.
    #[arg(long)]
    pub pretty: bool,

    /// Disable colored output.
    #[arg(long)]
    pub no_color: bool,

    /// Verbose mode (debug diagnostics on stderr).
    #[arg(
        short,
        long,
        long_help = "Enable debug diagnostics on stderr. The YYT_LOG environment variable\n\
overrides the filter (e.g. YYT_LOG=yyt=trace)."
    )]
    pub verbose: bool,
}

/// Run the CLI with parsed arguments
pub fn run(cli: Cli) -> Result<()> {
    let out_format: OutputFormat = cli.out_format.parse().map_err(anyhow::Error::msg)?;
    let render_config = RenderConfig::with_pretty(out_format, cli.pretty);

    let in_format = cli
        .in_format
        .as_deref()
        .map(str::parse::<InputFormat>)
        .transpose()
        .map_err(anyhow::Error::msg)?;
    let load_config = LoadConfig {
        format: in_format,
        max_file_size: cli.max_file_size,
    };

    let documents = if cli.files.is_empty() {
        debug!("reading documents from stdin");
        load_reader(std::io::stdin().lock(), STDIN_NAME, &load_config)?
    } else {
        load_files(&cli.files, &load_config)?
    };

    let merged = fold_documents(documents)?.ok_or_else(|| anyhow!("no document to process"))?;

    let selected = match cli.node.as_deref() {
        Some(path) => {
            debug!(path, "selecting node");
            extract(&merged, path).with_context(|| format!("Error selecting node {}", path))?
        }
        None => &merged,
    };

    let template = match (cli.exec, cli.execfile.as_ref()) {
        (Some(text), _) => Some(text),
        (None, Some(path)) => Some(
            fs::read_to_string(path)
                .with_context(|| format!("Failed to read template: {}", path.display()))?,
        ),
        (None, None) => None,
    };

    let rendered = match template {
        Some(text) => {
            debug!("executing template");
            template::render(&text, selected)?
        }
        None => Renderer::with_config(render_config).render(selected)?,
    };

    // The destination is only touched once rendering has succeeded
    match cli.out.as_ref() {
        Some(path) => fs::write(path, rendered.as_bytes())
            .with_context(|| format!("Failed to write output file: {}", path.display()))?,
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout
                .write_all(rendered.as_bytes())
                .context("i/o error while writing output")?;
            stdout.flush().context("i/o error while writing output")?;
        }
    }

    Ok(())
}

/// Fold documents left to right; the error names the document that failed
fn fold_documents(documents: Vec<Document>) -> Result<Option<Node>> {
    documents.into_iter().try_fold(None, |acc, document| {
        debug!(source = %document.source, "merging document");
        merge_pair(acc, document.node)
            .with_context(|| format!("Error merging {}", document.source))
    })
}

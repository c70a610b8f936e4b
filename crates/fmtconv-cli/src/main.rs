//! `fmtconv` CLI: convert structured data between JSON, CSV, XML and YAML.
//!
//! ## Usage
//!
//! ```sh
//! # JSON on stdin to CSV on stdout
//! echo '[{"id":1,"name":"Alice"}]' | fmtconv convert --from json --to csv
//!
//! # File to file (the output extension is corrected to match --to)
//! fmtconv convert --from csv --to yaml -i people.csv -o people.txt
//!
//! # Semicolon-separated CSV to XML with a custom document element
//! fmtconv convert --from csv --to xml --delimiter ';' --root-tag people -i people.csv
//!
//! # List the supported formats
//! fmtconv formats
//! ```
//!
//! Diagnostics go to stderr; set `RUST_LOG=fmtconv_core=debug` to trace the
//! pipeline.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use fmtconv_core::{Format, Options, Outcome};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(
    name = "fmtconv",
    version,
    about = "Convert structured data between JSON, CSV, XML and YAML"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a document from one format to another
    Convert {
        /// Source format (json, csv, xml, yaml)
        #[arg(long)]
        from: Format,
        /// Destination format (json, csv, xml, yaml)
        #[arg(long)]
        to: Format,
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<PathBuf>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// CSV field delimiter, used when reading or writing CSV
        #[arg(long, default_value_t = ',')]
        delimiter: char,
        /// Name of the document element when writing XML
        #[arg(long, default_value = "root")]
        root_tag: String,
    },
    /// List the supported formats
    Formats,
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Convert {
            from,
            to,
            input,
            output,
            delimiter,
            root_tag,
        } => {
            let options = Options::new()
                .with_delimiter(delimiter)
                .with_root_tag(root_tag);
            let source = read_input(input.as_deref())?;
            tracing::debug!(%from, %to, bytes = source.len(), "read input");

            let mut rendered = Vec::new();
            let outcome = fmtconv_core::convert(from, to, source.as_slice(), &mut rendered, &options)
                .with_context(|| format!("Failed to convert {} to {}", from, to))?;

            let written = write_output(output.as_deref(), to, &rendered)?;
            if let Outcome::Lossy { flattened_cells } = outcome {
                eprintln!(
                    "warning: {} nested value(s) were flattened into CSV cells; their structure is not preserved",
                    flattened_cells
                );
            }
            if let Some(path) = written {
                eprintln!("Converted {} to {}: {}", from, to, path.display());
            }
        }
        Commands::Formats => {
            for format in Format::ALL {
                println!("{}\t.{}", format, format.extension());
            }
        }
    }

    Ok(())
}

/// Log to stderr so stdout carries only converted output.
fn init_tracing() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "fmtconv=warn".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

fn read_input(path: Option<&Path>) -> Result<Vec<u8>> {
    match path {
        Some(path) => {
            validate_input_file(path)?;
            std::fs::read(path).with_context(|| format!("Failed to read file: {}", path.display()))
        }
        None => {
            let mut buf = Vec::new();
            io::stdin()
                .read_to_end(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}

/// The input must exist, be a regular file, and not be empty.
fn validate_input_file(path: &Path) -> Result<()> {
    let metadata = std::fs::metadata(path)
        .with_context(|| format!("Input file does not exist: {}", path.display()))?;
    if metadata.is_dir() {
        bail!("Input path is a directory, not a file: {}", path.display());
    }
    if metadata.len() == 0 {
        bail!("Input file is empty: {}", path.display());
    }
    Ok(())
}

/// Write to the output file (returning its final path) or to stdout.
fn write_output(path: Option<&Path>, format: Format, content: &[u8]) -> Result<Option<PathBuf>> {
    match path {
        Some(path) => {
            let path = with_format_extension(path, format);
            std::fs::write(&path, content)
                .with_context(|| format!("Failed to write file: {}", path.display()))?;
            Ok(Some(path))
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout
                .write_all(content)
                .and_then(|()| stdout.flush())
                .context("Failed to write to stdout")?;
            Ok(None)
        }
    }
}

/// Replace the extension of `path` unless it already names `format`.
/// `.yml` is accepted for YAML.
fn with_format_extension(path: &Path, format: Format) -> PathBuf {
    let current = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);
    let matches = match (current.as_deref(), format) {
        (Some("yml"), Format::Yaml) => true,
        (Some(ext), _) => ext == format.extension(),
        (None, _) => false,
    };
    if matches {
        path.to_path_buf()
    } else {
        path.with_extension(format.extension())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_is_replaced_when_it_names_another_format() {
        assert_eq!(
            with_format_extension(Path::new("out.txt"), Format::Csv),
            PathBuf::from("out.csv")
        );
        assert_eq!(
            with_format_extension(Path::new("dir/out"), Format::Json),
            PathBuf::from("dir/out.json")
        );
    }

    #[test]
    fn matching_extension_is_kept() {
        assert_eq!(
            with_format_extension(Path::new("a.XML"), Format::Xml),
            PathBuf::from("a.XML")
        );
        assert_eq!(
            with_format_extension(Path::new("a.yml"), Format::Yaml),
            PathBuf::from("a.yml")
        );
    }
}

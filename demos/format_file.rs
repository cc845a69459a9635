//! Formats a file with a preset or a JSON options file.
//!
//! ```text
//! cargo run --example format_file -- page.html --preset html5 --wrap-css-over 3
//! cargo run --example format_file -- data.xml --options markfmt.json
//! ```

use clap::{Parser, ValueEnum};
use markfmt::{FormatOptions, MarkfmtError, format_with_options};
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Preset {
    Xml,
    Html5,
    Xhtml,
}

#[derive(Parser, Debug)]
#[command(about = "Reformat an XML or HTML document")]
struct Args {
    /// Document to format
    input: PathBuf,

    /// Preset to start from; ignored when --options is given
    #[arg(long, value_enum, default_value = "xml")]
    preset: Preset,

    /// JSON file with formatter options
    #[arg(long)]
    options: Option<PathBuf>,

    /// Spaces per indentation level
    #[arg(long)]
    indent: Option<usize>,

    /// Wrap style attributes with more declarations than this
    #[arg(long)]
    wrap_css_over: Option<usize>,

    /// Write the result here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn main() -> Result<(), MarkfmtError> {
    env_logger::init();
    let args = Args::parse();

    let mut options = match &args.options {
        Some(path) => FormatOptions::from_json(&fs::read_to_string(path)?)?,
        None => FormatOptions {
            flavor: match args.preset {
                Preset::Xml => markfmt::Flavor::Xml,
                Preset::Html5 => markfmt::Flavor::Html5,
                Preset::Xhtml => markfmt::Flavor::Xhtml,
            },
            ..Default::default()
        },
    };
    if args.indent.is_some() {
        options.indent_size = args.indent;
    }
    if args.wrap_css_over.is_some() {
        options.wrap_css_over = args.wrap_css_over;
    }

    let source = fs::read_to_string(&args.input)?;
    let formatted = format_with_options(&source, &options)?;
    match &args.output {
        Some(path) => fs::write(path, formatted + "\n")?,
        None => println!("{}", formatted),
    }
    Ok(())
}

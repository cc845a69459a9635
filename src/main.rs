use markfmt::{MarkfmtError, format_str, presets};
use std::env;
use std::fs;
use std::process;

struct Args {
    input: String,
    html5: bool,
    indent: Option<usize>,
}

fn parse_args(args: &[String]) -> Option<Args> {
    let mut input = None;
    let mut html5 = false;
    let mut indent = None;
    let mut rest = args.iter().skip(1);
    while let Some(arg) = rest.next() {
        match arg.as_str() {
            "--html5" => html5 = true,
            "--indent" => indent = Some(rest.next()?.parse().ok()?),
            _ if input.is_none() && !arg.starts_with("--") => input = Some(arg.clone()),
            _ => return None,
        }
    }
    Some(Args {
        input: input?,
        html5,
        indent,
    })
}

fn run(args: &Args) -> Result<String, MarkfmtError> {
    let source = fs::read_to_string(&args.input)?;
    let mut builder = if args.html5 {
        presets::html5()
    } else {
        presets::xml()
    };
    if let Some(size) = args.indent {
        builder = builder.with_indent_size(size);
    }
    format_str(&source, &builder.build()?)
}

/// Formats an XML or HTML file and prints the result.
fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let Some(parsed) = parse_args(&args) else {
        let program = args.first().map(String::as_str).unwrap_or("markfmt");
        eprintln!("Reformats an XML or HTML document.");
        eprintln!();
        eprintln!("Usage: {} <input-file> [--html5] [--indent N]", program);
        eprintln!();
        eprintln!("Set RUST_LOG=debug to see each formatting phase.");
        process::exit(2);
    };

    match run(&parsed) {
        Ok(output) => println!("{}", output),
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}

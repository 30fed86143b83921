mod snapshot;

use std::path::Path;
use std::process;

use clap::{Parser, Subcommand};
use codespan_reporting::files::SimpleFiles;
use codespan_reporting::term;
use codespan_reporting::term::termcolor::{ColorChoice, StandardStream};

use markxs::Severity;

const SUBCOMMANDS: &[&str] = &["parse", "test", "help"];

#[derive(Parser)]
#[command(name = "markxs", version, about = "MarkXS document parser")]
struct Cli {
    /// Disable colored diagnostic output
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Parse a document and print its canonical JSON to stdout
    Parse(ParseArgs),

    /// Compare fixture documents against stored snapshots
    Test(TestArgs),
}

#[derive(clap::Args)]
struct ParseArgs {
    /// MarkXS document to parse
    file: String,

    /// Parse only, don't print JSON; exit non-zero on any error diagnostic
    #[arg(long)]
    check: bool,

    /// Also render diagnostics to stderr
    #[arg(short, long)]
    diagnostics: bool,
}

#[derive(clap::Args)]
struct TestArgs {
    /// Path to a .xs fixture or a directory containing them
    path: String,

    /// Write/overwrite expected snapshots instead of comparing
    #[arg(long)]
    bless: bool,
}

fn main() {
    // Backwards compatibility: if the first positional arg is not a known
    // subcommand, inject "parse" so `markxs doc.xs` works like
    // `markxs parse doc.xs`.
    let mut args: Vec<String> = std::env::args().collect();
    if let Some(first_pos) = args.iter().skip(1).find(|a| !a.starts_with('-')) {
        let first_pos = first_pos.clone();
        if !SUBCOMMANDS.contains(&first_pos.as_str()) {
            let pos = args.iter().position(|a| *a == first_pos).unwrap();
            args.insert(pos, "parse".to_string());
        }
    }

    let cli = Cli::parse_from(&args);

    match cli.command {
        Command::Parse(parse_args) => do_parse(parse_args, cli.no_color),
        Command::Test(test_args) => {
            let exit_code =
                snapshot::run_snapshots(Path::new(&test_args.path), cli.no_color, test_args.bless);
            process::exit(exit_code);
        }
    }
}

fn do_parse(args: ParseArgs, no_color: bool) {
    let source = match std::fs::read_to_string(&args.file) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: cannot read '{}': {}", args.file, e);
            process::exit(1);
        }
    };

    let lines: Vec<String> = source.lines().map(str::to_string).collect();
    let document = markxs::Parser::new(lines).parse();

    if args.check {
        emit_diagnostics(&args.file, &source, &document, no_color);
        let has_errors = document
            .diagnostics
            .iter()
            .any(|d| d.severity == Severity::Error);
        if has_errors {
            process::exit(1);
        }
        eprintln!("ok: {} parsed successfully", args.file);
        return;
    }

    let json = match serde_json::to_string_pretty(&document) {
        Ok(json) => json,
        Err(e) => {
            eprintln!("error: cannot serialize document: {}", e);
            process::exit(1);
        }
    };
    println!("{}", json);

    if args.diagnostics {
        emit_diagnostics(&args.file, &source, &document, no_color);
    }
}

/// Render the document's diagnostics to stderr through codespan-reporting.
fn emit_diagnostics(path: &str, source: &str, document: &markxs::Document, no_color: bool) {
    if document.diagnostics.is_empty() {
        return;
    }
    let color_choice = if no_color {
        ColorChoice::Never
    } else {
        ColorChoice::Auto
    };
    let mut files = SimpleFiles::new();
    let file_id = files.add(path.to_string(), source.to_string());
    let writer = StandardStream::stderr(color_choice);
    let config = term::Config::default();
    for diagnostic in &document.diagnostics {
        let report = diagnostic.to_report(file_id, source);
        let _ = term::emit_to_write_style(&mut writer.lock(), &config, &files, &report);
    }
}

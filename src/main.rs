//! CLI for potx-inspect - presentation slide summary

use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use potx_inspect::{
    find_default_input, ConvertOptions, FormatConverter, InspectOptions, PresentationInspector,
};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(author, version, about = "Inspect a .pptx/.potx file", long_about = None)]
struct Args {
    /// Path to .pptx/.potx/.odp (defaults to disco-template.pptx|potx|odp)
    file: Option<PathBuf>,

    /// Converter used for .potx/.odp inputs
    #[arg(long, default_value = "soffice")]
    soffice: PathBuf,

    /// Open .potx/.odp inputs directly instead of converting them
    #[arg(long)]
    no_convert: bool,

    /// Maximum characters of shape text to print
    #[arg(long, default_value_t = 300)]
    text_limit: usize,

    /// Maximum characters of speaker notes to print
    #[arg(long, default_value_t = 400)]
    notes_limit: usize,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .target(env_logger::Target::Stderr)
        .init();

    let args = Args::parse();

    let input = match args.file.or_else(|| find_default_input(Path::new("."))) {
        Some(input) => input,
        None => Args::command()
            .error(
                ErrorKind::MissingRequiredArgument,
                "no input file provided and no disco-template.* found",
            )
            .exit(),
    };

    let converter = FormatConverter::new(ConvertOptions {
        program: args.soffice,
        enabled: !args.no_convert,
    });
    let prepared = match converter.prepare(&input) {
        Ok(prepared) => prepared,
        Err(e) => {
            eprintln!("Error preparing {}: {}", input.display(), e);
            std::process::exit(1);
        }
    };
    if let Some(notice) = prepared.notice() {
        println!("{}", notice);
    }

    let inspector = PresentationInspector::new(InspectOptions {
        text_limit: args.text_limit,
        notes_limit: args.notes_limit,
    });
    let result = inspector.inspect(prepared.path());

    // Removes the conversion directory before any exit below.
    drop(prepared);

    match result {
        Ok(summary) => print!("{}", summary),
        Err(e) => {
            eprintln!("Error inspecting presentation: {}", e);
            std::process::exit(1);
        }
    }
}

//! JSON command-line tool for validating JSON documents and printing the
//! parsed value tree.
//!
//! Usage: json [OPTIONS] [FILE|DIR|-]
//!
//! Options:
//!   -o, --output <FILE>    Write the value tree to specified file
//!   --check                Check if input is valid (exit 0 if valid, 1 if invalid)
//!   --max-depth <N>        Maximum nesting depth, 0 for unbounded [default: 128]
//!   -v, --verbose          Log parser activity to stderr
//!   -h, --help             Print help
//!   -V, --version          Print version

use libjson::{ParseOptions, Parser, DEFAULT_MAX_DEPTH};
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use std::process;
use tracing::debug;

/// Settings shared by every input processed in one run.
struct Settings {
    output_file: Option<String>,
    check_only: bool,
    max_depth: Option<usize>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            output_file: None,
            check_only: false,
            max_depth: Some(DEFAULT_MAX_DEPTH),
        }
    }
}

fn main() {
    let args: Vec<String> = std::env::args().collect();

    let mut settings = Settings::default();
    let mut verbose = false;
    let mut input_path: Option<&str> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-h" | "--help" => {
                print_help();
                return;
            }
            "-V" | "--version" => {
                println!("json {}", env!("CARGO_PKG_VERSION"));
                return;
            }
            "-o" | "--output" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("Error: --output requires an argument");
                    process::exit(1);
                }
                settings.output_file = Some(args[i].clone());
            }
            "--check" => {
                settings.check_only = true;
            }
            "--max-depth" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("Error: --max-depth requires a number");
                    process::exit(1);
                }
                settings.max_depth = match args[i].parse::<usize>() {
                    Ok(0) => None,
                    Ok(n) => Some(n),
                    Err(_) => {
                        eprintln!("Error: Invalid depth: {}", args[i]);
                        process::exit(1);
                    }
                };
            }
            "-v" | "--verbose" => {
                verbose = true;
            }
            "-" => {
                // Explicit stdin
                // input_path stays None, which means stdin
            }
            arg if arg.starts_with('-') => {
                eprintln!("Error: Unknown option: {}", arg);
                process::exit(1);
            }
            _ => {
                if input_path.is_some() {
                    eprintln!("Error: Multiple input paths not supported");
                    process::exit(1);
                }
                input_path = Some(&args[i]);
            }
        }
        i += 1;
    }

    if verbose {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_writer(io::stderr)
            .init();
    }

    if let Some(path) = input_path {
        if Path::new(path).is_dir() {
            if settings.output_file.is_some() {
                eprintln!("Error: --output cannot be used with directory input");
                process::exit(1);
            }
            process::exit(process_directory(path, &settings));
        }
    }

    process::exit(process_input(input_path, &settings));
}

/// Process every `*.json` file in a directory, in name order.
fn process_directory(dir_path: &str, settings: &Settings) -> i32 {
    let entries = match fs::read_dir(dir_path) {
        Ok(e) => e,
        Err(e) => {
            eprintln!("Error reading directory {}: {}", dir_path, e);
            return 1;
        }
    };

    let mut paths: Vec<PathBuf> = entries
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| path.extension().map(|e| e == "json").unwrap_or(false))
        .collect();
    paths.sort();
    debug!(directory = dir_path, files = paths.len(), "processing directory");

    let mut had_errors = false;
    for path in paths {
        if process_input(Some(&*path.to_string_lossy()), settings) != 0 {
            had_errors = true;
        }
    }

    if had_errors {
        1
    } else {
        0
    }
}

/// Parse one input (a file, or stdin when `input_file` is `None`) and print
/// its value tree. Returns the exit code.
fn process_input(input_file: Option<&str>, settings: &Settings) -> i32 {
    let mut options = ParseOptions::new().with_max_depth(settings.max_depth);
    if let Some(path) = input_file {
        let filename = Path::new(path)
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.to_string());
        options = options.with_filename(filename);
    }

    let result = match input_file {
        Some(path) => match File::open(path) {
            Ok(file) => Parser::from_reader(file).with_options(options).parse(),
            Err(e) => {
                eprintln!("Error reading {}: {}", path, e);
                return 1;
            }
        },
        None => Parser::from_reader(io::stdin().lock())
            .with_options(options)
            .parse(),
    };

    let value = match result {
        Ok(v) => v,
        Err(e) => {
            if let Some(path) = input_file {
                eprintln!("{}: {}", path, e);
            } else {
                eprintln!("Parse error: {}", e);
            }
            return 1;
        }
    };

    if settings.check_only {
        match input_file {
            Some(path) => println!("{}: ok", path),
            None => println!("ok"),
        }
        return 0;
    }

    write_text_output(&format!("{:?}", value), settings.output_file.as_deref())
}

fn write_text_output(output: &str, output_file: Option<&str>) -> i32 {
    if let Some(path) = output_file {
        if let Err(e) = fs::write(path, output) {
            eprintln!("Error writing {}: {}", path, e);
            return 1;
        }
    } else {
        println!("{}", output);
    }
    0
}

fn print_help() {
    println!(
        "json - JSON command-line tool

USAGE:
    json [OPTIONS] [FILE|DIR|-]

ARGS:
    [FILE|DIR|-]    Input file or directory (reads from stdin if not provided)
                    When a directory is given, processes all .json files in it

    Without --check, prints the parsed value tree compactly, with object keys
    sorted. Integers beyond 64 bits carry an 'n' suffix and decimals beyond
    double range an 'm'.

OPTIONS:
    -o, --output <FILE>    Write the value tree to specified file (not valid with directory input)

    --check                Check if input is valid (exit 0 if valid, 1 if invalid)

    --max-depth <N>        Maximum nesting of arrays and objects [default: {}]
                           Use 0 for no limit

    -v, --verbose          Log parser activity to stderr

    -h, --help             Print help

    -V, --version          Print version

EXAMPLES:
    # Validate a JSON file
    json --check config.json

    # Validate all JSON files in a directory
    json --check ./configs/

    # Print the parsed tree
    json data.json

    # Read from stdin
    cat data.json | json -",
        DEFAULT_MAX_DEPTH
    );
}

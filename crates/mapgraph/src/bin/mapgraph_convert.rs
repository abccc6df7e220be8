//! `mapgraph-convert` - re-encode a mapped document (stdin) in another
//! format (stdout).
//!
//! Usage:
//!   mapgraph-convert --from json|xml|yaml --to json|xml|yaml [--flat] [--indent N]

use std::io::{self, Read, Write};
use std::process;

use mapgraph::cli::{convert, Format};
use mapgraph::FormatOptions;

fn fail(message: impl std::fmt::Display) -> ! {
    eprintln!("{message}");
    process::exit(1);
}

fn format_arg(value: Option<&String>, flag: &str) -> Format {
    match value.map(|v| v.parse::<Format>()) {
        Some(Ok(format)) => format,
        Some(Err(e)) => fail(e),
        None => fail(format!("{flag} needs a format")),
    }
}

fn main() {
    let args: Vec<String> = std::env::args().collect();

    let mut from = Format::Json;
    let mut to = Format::Yaml;
    let mut options = FormatOptions::default();
    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--from" => {
                i += 1;
                from = format_arg(args.get(i), "--from");
            }
            "--to" => {
                i += 1;
                to = format_arg(args.get(i), "--to");
            }
            "--flat" => options.inline_single_ref_objects = false,
            "--indent" => {
                i += 1;
                options.indent_spaces = match args.get(i).map(|n| n.parse::<usize>()) {
                    Some(Ok(n)) => n,
                    _ => fail("--indent needs a number"),
                };
            }
            other => fail(format!("unknown argument: {other}")),
        }
        i += 1;
    }

    let mut input = String::new();
    if let Err(e) = io::stdin().read_to_string(&mut input) {
        fail(e);
    }
    match convert(&input, from, to, options) {
        Ok(text) => {
            if let Err(e) = io::stdout().write_all(text.as_bytes()) {
                fail(e);
            }
        }
        Err(e) => fail(e),
    }
}

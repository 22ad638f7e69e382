//! `colcheck` — conformance runner and fixture inspection tool.
//!
//! Three subcommands:
//! - `compare`: decode a data file, render every row, and compare against a
//!   gzip golden fixture (exit 0 on match, 1 on divergence);
//! - `dump-golden`: decompress and print a golden fixture, no assertions;
//! - `dump-rows`: decode a data file and print each rendered row.
//!
//! Data inputs are newline-delimited JSON read through the schema-driven
//! batch adapter; the schema itself comes from a `--schema` JSON file.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use colcheck_error::Result;
use colcheck_json::{render_row, JsonFileSource};
use colcheck_oracle::{
    compare_to_golden, format_divergence, structural_check, GoldenReader,
};
use colcheck_types::{BatchCursor as _, ColumnarSource, FixtureLayout, Schema, DEFAULT_BATCH_CAPACITY};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let exit_code = run_cli(std::env::args_os());
    if exit_code != 0 {
        std::process::exit(exit_code);
    }
}

fn print_help() {
    println!(
        "colcheck — golden-fixture conformance oracle for columnar readers

USAGE:
    colcheck compare --schema <file> --data <file> --golden <file> [--structural]
    colcheck compare --schema <file> --fixture-root <dir> --name <fixture>
    colcheck dump-golden <file>
    colcheck dump-rows --schema <file> --data <file>

OPTIONS:
    --schema <file>        JSON schema file describing the columns
    --data <file>          newline-delimited JSON rows (the reader under test)
    --golden <file>        gzip-compressed golden fixture
    --fixture-root <dir>   resolve --name against this fixture layout
    --name <fixture>       fixture name (data: <name>.jsonl, golden: expected/<name>.jsn.gz)
    --structural           also run the count-only structural check (diagnostic)

EXIT STATUS:
    0  comparison matched (or dump finished)
    1  divergence: content mismatch or cardinality mismatch
    2  usage or runtime error"
    );
}

fn run_cli<I>(os_args: I) -> i32
where
    I: IntoIterator<Item = OsString>,
{
    let raw: Vec<String> = os_args
        .into_iter()
        .map(|a| a.to_string_lossy().into_owned())
        .collect();
    let tail: &[String] = if raw.len() > 1 { &raw[1..] } else { &[] };

    if tail.is_empty() || tail.iter().any(|a| a == "-h" || a == "--help") {
        print_help();
        return 0;
    }

    match tail[0].as_str() {
        "compare" => cmd_compare(&tail[1..]),
        "dump-golden" => cmd_dump_golden(&tail[1..]),
        "dump-rows" => cmd_dump_rows(&tail[1..]),
        other => {
            eprintln!("error: unknown subcommand `{other}`");
            2
        }
    }
}

/// Parsed common flags; each flag takes one value argument.
struct Flags {
    schema: Option<PathBuf>,
    data: Option<PathBuf>,
    golden: Option<PathBuf>,
    fixture_root: Option<PathBuf>,
    name: Option<String>,
    structural: bool,
}

fn parse_flags(args: &[String]) -> Option<Flags> {
    let mut flags = Flags {
        schema: None,
        data: None,
        golden: None,
        fixture_root: None,
        name: None,
        structural: false,
    };
    let mut i = 0;
    while i < args.len() {
        let take_value = |i: &mut usize, flag: &str| -> Option<String> {
            *i += 1;
            let value = args.get(*i).cloned();
            if value.is_none() {
                eprintln!("error: missing value for {flag}");
            }
            value
        };
        match args[i].as_str() {
            "--schema" => flags.schema = Some(take_value(&mut i, "--schema")?.into()),
            "--data" => flags.data = Some(take_value(&mut i, "--data")?.into()),
            "--golden" => flags.golden = Some(take_value(&mut i, "--golden")?.into()),
            "--fixture-root" => {
                flags.fixture_root = Some(take_value(&mut i, "--fixture-root")?.into());
            }
            "--name" => flags.name = Some(take_value(&mut i, "--name")?),
            "--structural" => flags.structural = true,
            other => {
                eprintln!("error: unknown option `{other}`");
                return None;
            }
        }
        i += 1;
    }
    Some(flags)
}

fn load_schema(path: &Path) -> Result<Schema> {
    let text = std::fs::read_to_string(path)?;
    Schema::from_json(&text)
}

fn cmd_compare(args: &[String]) -> i32 {
    let Some(flags) = parse_flags(args) else {
        return 2;
    };

    let Some(schema_path) = flags.schema.as_ref() else {
        eprintln!("error: compare requires --schema");
        return 2;
    };

    // Either explicit paths or a fixture-layout name, never a mix.
    if flags.fixture_root.is_some() && (flags.data.is_some() || flags.golden.is_some()) {
        eprintln!("error: --fixture-root cannot be combined with --data/--golden");
        return 2;
    }
    let (data_path, golden_path) = match (&flags.data, &flags.golden, &flags.fixture_root) {
        (Some(data), Some(golden), None) => (data.clone(), golden.clone()),
        (None, None, Some(root)) => {
            let Some(name) = flags.name.as_ref() else {
                eprintln!("error: --fixture-root requires --name");
                return 2;
            };
            let layout = FixtureLayout::new(root);
            (layout.data_path(name), layout.golden_path(name))
        }
        _ => {
            eprintln!("error: compare requires --data and --golden (or --fixture-root/--name)");
            return 2;
        }
    };

    let run = || -> Result<i32> {
        let schema = load_schema(schema_path)?;
        let mut source = JsonFileSource::open(schema, &data_path)?;

        let outcome = compare_to_golden(&mut source, &golden_path)?;
        println!("{}", format_divergence(&outcome));

        if flags.structural {
            let report = structural_check(&mut source, &golden_path)?;
            println!("{}", report.summary());
        }

        Ok(i32::from(!outcome.is_match()))
    };

    match run() {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err}");
            2
        }
    }
}

fn cmd_dump_golden(args: &[String]) -> i32 {
    let [path] = args else {
        eprintln!("error: dump-golden takes exactly one golden file path");
        return 2;
    };

    let run = || -> Result<()> {
        let mut golden = GoldenReader::open(&PathBuf::from(path))?;
        while let Some(line) = golden.next_line()? {
            println!("{line}");
        }
        Ok(())
    };

    match run() {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("error: {err}");
            2
        }
    }
}

fn cmd_dump_rows(args: &[String]) -> i32 {
    let Some(flags) = parse_flags(args) else {
        return 2;
    };
    let (Some(schema_path), Some(data_path)) = (flags.schema.as_ref(), flags.data.as_ref())
    else {
        eprintln!("error: dump-rows requires --schema and --data");
        return 2;
    };

    let run = || -> Result<()> {
        let schema = load_schema(schema_path)?;
        let mut source = JsonFileSource::open(schema.clone(), data_path)?;
        let mut batch = schema.create_batch(DEFAULT_BATCH_CAPACITY);
        let mut cursor = source.rows()?;
        while cursor.advance(&mut batch)? {
            for row in 0..batch.size() {
                println!("{}", render_row(&batch, &schema, row)?);
            }
        }
        Ok(())
    };

    match run() {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("error: {err}");
            2
        }
    }
}

//! mountfs CLI entry point.
//!
//! Usage:
//!   mountfs name=dir [name=dir ...] ls [path]     # List a directory
//!   mountfs name=dir [name=dir ...] cat <path>    # Print a file
//!   mountfs name=dir [name=dir ...] stat [path]   # Show metadata
//!   mountfs name=dir [name=dir ...] tree [path]   # Recursive listing
//!
//! Each `name=dir` mounts a local directory under `name`. Paths are relative
//! to the union root, `.` by default.

use std::env;
use std::io::{self, Write};
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use mountfs::{walk, DirEntry, EntryType, Filesystem, LocalFs, MountFs, WalkOptions};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn main() -> ExitCode {
    // Initialize tracing (respects RUST_LOG env var)
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(EnvFilter::from_default_env())
        .init();

    match run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:?}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<ExitCode> {
    let args: Vec<String> = env::args().skip(1).collect();

    if args.is_empty() || args.iter().any(|a| a == "--help" || a == "-h") {
        print_help();
        return Ok(ExitCode::SUCCESS);
    }

    // Leading name=dir arguments are mounts; the command follows them
    let split = args
        .iter()
        .position(|a| !a.contains('='))
        .unwrap_or(args.len());
    let (mounts, rest) = args.split_at(split);

    let mut fs = MountFs::new();
    for spec in mounts {
        let (name, dir) = spec
            .split_once('=')
            .context("mount must be name=dir")?;
        if name.is_empty() || name.contains('/') {
            bail!("invalid mount name: {name:?}");
        }
        if fs.mount(name, LocalFs::new(dir)) {
            tracing::warn!(mount = name, "mount given twice, keeping the last");
        }
    }

    let command = rest.first().map(|s| s.as_str()).context("missing command")?;
    let path = rest.get(1).map(|s| s.as_str()).unwrap_or(".");

    let mut out = io::stdout().lock();
    match command {
        "ls" => {
            let entries = fs
                .read_dir(path)
                .with_context(|| format!("ls {path}"))?;
            for entry in entries {
                print_entry(&mut out, entry.as_ref())?;
            }
        }
        "cat" => {
            let data = fs
                .read_file(path)
                .with_context(|| format!("cat {path}"))?;
            out.write_all(&data)?;
        }
        "stat" => {
            let info = fs.stat(path).with_context(|| format!("stat {path}"))?;
            writeln!(out, "  Name: {}", info.name())?;
            writeln!(out, "  Size: {}", info.size())?;
            writeln!(out, "  Mode: {}", info.mode())?;
            writeln!(out, "  Modified: {:?}", info.mod_time())?;
        }
        "tree" => {
            let entries = walk(&fs, path, &WalkOptions::default())
                .with_context(|| format!("tree {path}"))?;
            for entry in entries {
                let indent = "  ".repeat(entry.depth - 1);
                let name = mountfs::path::base_name(&entry.path);
                let suffix = if entry.entry_type == EntryType::Directory { "/" } else { "" };
                writeln!(out, "{indent}{name}{suffix}")?;
            }
        }
        other => {
            eprintln!("unknown command: {other}");
            print_help();
            return Ok(ExitCode::from(2));
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn print_entry(out: &mut impl Write, entry: &dyn DirEntry) -> Result<()> {
    match entry.info() {
        Ok(info) => writeln!(out, "{} {:>10} {}", info.mode(), info.size(), entry.name())?,
        Err(e) => {
            tracing::debug!(entry = entry.name(), error = %e, "stat failed");
            writeln!(out, "?????????? {:>10} {}", "?", entry.name())?
        }
    }
    Ok(())
}

fn print_help() {
    println!(
        r#"mountfs {} - browse local directories as one read-only tree

USAGE:
    mountfs name=dir [name=dir ...] <command> [path]

COMMANDS:
    ls [path]      List a directory (default: the union root)
    cat <path>     Print a file
    stat [path]    Show file metadata
    tree [path]    List everything below a directory

EXAMPLES:
    mountfs docs=./docs src=./src ls
    mountfs docs=./docs cat docs/README.md
    RUST_LOG=mountfs=trace mountfs docs=./docs tree"#,
        env!("CARGO_PKG_VERSION")
    );
}

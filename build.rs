//! Build script generating manual pages from the CLI definition.
//!
//! Renders `framecat(1)` into `target/generated-man`, documenting the
//! `--type` patterns, `--endpoint`, `--bind`, `--subscribe`, `--max-size` and
//! `--verbose`, so the page tracks `src/cli.rs`.

use std::{fs, path::PathBuf};

use clap::CommandFactory;
use clap_mangen::Man;

#[path = "src/cli.rs"]
#[allow(dead_code, reason = "only the command definition is needed here")]
mod cli;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("cargo:rerun-if-changed=src/cli.rs");

    let out_dir = PathBuf::from("target/generated-man");
    fs::create_dir_all(&out_dir)?;

    let cmd = cli::Cli::command();
    let man = Man::new(cmd);
    let mut buf: Vec<u8> = Vec::new();
    man.render(&mut buf)?;
    fs::write(out_dir.join("framecat.1"), buf)?;

    Ok(())
}

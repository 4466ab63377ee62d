//! Embeds every file under `data/` into the library.
//!
//! The table is written to `$OUT_DIR/embedded_data.rs` and pulled in by
//! `src/lib.rs`.

use std::env;
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;

fn main() -> anyhow::Result<()> {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-changed=data");

    let manifest_dir = PathBuf::from(
        env::var_os("CARGO_MANIFEST_DIR").context("CARGO_MANIFEST_DIR must be set")?,
    );
    let out_dir = PathBuf::from(
        env::var_os("OUT_DIR").context("The OUT_DIR environment variable must be set")?,
    );

    let data_dir = manifest_dir.join("data");
    let mut files = Vec::new();
    if data_dir.is_dir() {
        collect_files(&data_dir, &mut files)?;
    }
    files.sort();

    let mut buffer = String::from("static EMBEDDED_DATA: &[EmbeddedFile] = &[\n");
    for file in &files {
        let name = file
            .strip_prefix(&manifest_dir)?
            .components()
            .map(|component| component.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");
        let path = file.display().to_string();

        writeln!(
            buffer,
            "    EmbeddedFile::new({name:?}, include_bytes!({path:?})),"
        )?;
    }
    buffer.push_str("];\n");

    let output = out_dir.join("embedded_data.rs");
    fs::write(&output, buffer).with_context(|| format!("writing {}", output.display()))?;

    Ok(())
}

fn collect_files(dir: &Path, files: &mut Vec<PathBuf>) -> anyhow::Result<()> {
    for entry in fs::read_dir(dir).with_context(|| format!("reading {}", dir.display()))? {
        let entry = entry?;
        let path = entry.path();

        if entry.file_type()?.is_dir() {
            collect_files(&path, files)?;
        } else {
            files.push(path);
        }
    }

    Ok(())
}

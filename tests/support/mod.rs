#![allow(dead_code)]

use anyhow::{Context, Result, bail};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::NamedTempFile;

pub fn repo_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
}

pub fn itemdex_binary() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_itemdex"))
}

pub fn run_command(mut cmd: Command) -> Result<Output> {
    let output = cmd
        .output()
        .with_context(|| format!("failed to run command: {:?}", cmd))?;
    if output.status.success() {
        Ok(output)
    } else {
        bail!(
            "command {:?} failed: status {:?}\nstdout: {}\nstderr: {}",
            cmd,
            output.status.code(),
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        )
    }
}

/// Write `dataset` to a temp file that lives as long as the returned handle.
pub fn write_dataset(dataset: &Value) -> Result<NamedTempFile> {
    let mut file = NamedTempFile::new().context("failed to allocate dataset file")?;
    serde_json::to_writer(&mut file, dataset)?;
    Ok(file)
}

pub fn load_export_schema() -> Result<Value> {
    let path = repo_root().join("schema/item_export.schema.json");
    let raw = fs::read_to_string(&path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("parsing {}", path.display()))
}

pub fn stdout_lines(output: &Output) -> Vec<String> {
    String::from_utf8_lossy(&output.stdout)
        .lines()
        .map(str::to_string)
        .collect()
}

pub fn itemdex(dataset: &Path, state_dir: &Path) -> Command {
    let mut cmd = Command::new(itemdex_binary());
    cmd.arg("--data")
        .arg(dataset)
        .arg("--state-dir")
        .arg(state_dir)
        .env_remove("ITEMDEX_DATASET")
        .env_remove("ITEMDEX_STATE_DIR")
        .env_remove("ITEMDEX_PAGE_SIZE")
        .env_remove("ITEMDEX_FETCH_TIMEOUT_SECS")
        .env("RUST_LOG", "off");
    cmd
}

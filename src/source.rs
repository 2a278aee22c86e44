//! Where dataset text comes from.
//!
//! Local files, stdin, and HTTP(S) URLs all produce plain text that then goes
//! through the same `build_catalog` path, so a dataset behaves identically no
//! matter how it was delivered.

use crate::error::EngineError;
use reqwest::blocking::Client;
use reqwest::header::ACCEPT;
use std::fmt;
use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatasetSource {
    File(PathBuf),
    Url(String),
    Stdin,
}

impl DatasetSource {
    /// Interpret a user-supplied location: `-` is stdin, `http://` and
    /// `https://` prefixes are URLs, anything else is a path.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed == "-" {
            DatasetSource::Stdin
        } else if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            DatasetSource::Url(trimmed.to_string())
        } else {
            DatasetSource::File(PathBuf::from(trimmed))
        }
    }

    /// Read the full dataset text. `timeout` bounds URL fetches only.
    pub fn read_text(&self, timeout: Duration) -> Result<String, EngineError> {
        debug!(source = %self, "reading dataset");
        match self {
            DatasetSource::File(path) => fs::read_to_string(path)
                .map_err(|err| EngineError::io(format!("reading {}", path.display()), err)),
            DatasetSource::Stdin => {
                let mut buf = String::new();
                io::stdin()
                    .read_to_string(&mut buf)
                    .map_err(|err| EngineError::io("reading stdin", err))?;
                Ok(buf)
            }
            DatasetSource::Url(url) => fetch(url, timeout),
        }
    }
}

impl fmt::Display for DatasetSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DatasetSource::File(path) => write!(f, "{}", path.display()),
            DatasetSource::Url(url) => f.write_str(url),
            DatasetSource::Stdin => f.write_str("<stdin>"),
        }
    }
}

fn fetch(url: &str, timeout: Duration) -> Result<String, EngineError> {
    let client = Client::builder().timeout(timeout).build()?;
    let response = client
        .get(url)
        .header(ACCEPT, "application/json")
        .send()?
        .error_for_status()?;
    Ok(response.text()?)
}

//! Detection of external definition file formats
//!
//! Only the first line of a file is inspected: a case-insensitive mention of
//! `raml` or `swagger` decides the format tag sent with the upload.

use serde_yaml::Value;
use std::{
    fmt, fs,
    io::{BufRead, BufReader},
    path::Path,
};

use crate::error::{GatewayError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefinitionFormat {
    Swagger,
    Raml,
}

impl DefinitionFormat {
    /// Value of the `importFileFormat` upload parameter
    pub fn as_str(&self) -> &'static str {
        match self {
            DefinitionFormat::Swagger => "swagger",
            DefinitionFormat::Raml => "raml",
        }
    }
}

impl fmt::Display for DefinitionFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify a first line; `None` means unknown
pub fn detect_line(line: &str) -> Option<DefinitionFormat> {
    let line = line.to_lowercase();
    if line.contains("raml") {
        Some(DefinitionFormat::Raml)
    } else if line.contains("swagger") {
        Some(DefinitionFormat::Swagger)
    } else {
        None
    }
}

/// Read the first line of `path` and classify it
pub fn detect(path: &Path) -> Result<Option<DefinitionFormat>> {
    let file = fs::File::open(path).map_err(|source| GatewayError::DefinitionFile {
        path: path.to_path_buf(),
        source,
    })?;
    let mut first = String::new();
    BufReader::new(file)
        .read_line(&mut first)
        .map_err(|source| GatewayError::DefinitionFile {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(detect_line(&first))
}

/// Like [`detect`], but an unknown format is an error
pub fn require_format(path: &Path) -> Result<DefinitionFormat> {
    detect(path)?.ok_or_else(|| GatewayError::UnknownDefinitionFormat {
        path: path.to_path_buf(),
    })
}

/// Count the resource paths a local definition declares
///
/// Swagger documents list them under `paths`; RAML declares them as
/// top-level keys starting with `/`.
pub fn count_paths(path: &Path, format: DefinitionFormat) -> Result<usize> {
    Ok(declared_paths(path, format)?.len())
}

/// Resource paths the file declares: swagger `paths` keys, or RAML
/// top-level keys starting with `/`
pub fn declared_paths(path: &Path, format: DefinitionFormat) -> Result<Vec<String>> {
    let raw = fs::read_to_string(path).map_err(|source| GatewayError::DefinitionFile {
        path: path.to_path_buf(),
        source,
    })?;
    let doc: Value = serde_yaml::from_str(&raw).map_err(|source| GatewayError::DefinitionParse {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(document_paths(&doc, format))
}

fn document_paths(doc: &Value, format: DefinitionFormat) -> Vec<String> {
    let keys = |map: &serde_yaml::Mapping| -> Vec<String> {
        map.keys()
            .filter_map(|k| k.as_str().map(str::to_string))
            .collect()
    };
    match format {
        DefinitionFormat::Swagger => doc
            .get("paths")
            .and_then(Value::as_mapping)
            .map(keys)
            .unwrap_or_default(),
        DefinitionFormat::Raml => doc
            .as_mapping()
            .map(|root| {
                keys(root)
                    .into_iter()
                    .filter(|k| k.starts_with('/'))
                    .collect()
            })
            .unwrap_or_default(),
    }
}

//! Error taxonomy for gateway operations
//!
//! Errors fall into three families:
//! - input errors (bad gateway name, unreadable or unrecognised definition file)
//! - transport errors (network failures, request signing)
//! - backend rejections (non-200 answers to create, upload or activate)

use std::{io, path::PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GatewayError {
    /// The name search did not return exactly one definition. Zero and many
    /// matches are reported the same way.
    #[error("no unique API definition matches '{name}' ({total} results)")]
    AmbiguousOrMissingReference { name: String, total: u64 },

    #[error("API definition {id} has no versions")]
    NoVersions { id: String },

    #[error("cannot determine definition format of {}: first line mentions neither swagger nor raml", path.display())]
    UnknownDefinitionFormat { path: PathBuf },

    #[error("cannot read definition file {}", path.display())]
    DefinitionFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot parse definition file {}", path.display())]
    DefinitionParse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("request to API gateway failed")]
    Transport(#[from] reqwest::Error),

    #[error("cannot sign request: {0}")]
    Signing(String),

    #[error("{operation} rejected with status {status}: {body}")]
    Rejected {
        operation: &'static str,
        status: u16,
        body: String,
    },
}

impl GatewayError {
    /// True for caller mistakes that no retry can fix
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            GatewayError::AmbiguousOrMissingReference { .. }
                | GatewayError::NoVersions { .. }
                | GatewayError::UnknownDefinitionFormat { .. }
                | GatewayError::DefinitionFile { .. }
                | GatewayError::DefinitionParse { .. }
        )
    }
}

pub type Result<T, E = GatewayError> = std::result::Result<T, E>;

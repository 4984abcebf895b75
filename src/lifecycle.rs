//! Version lifecycle steps shared by the commands
//!
//! Each step is a free function over [`GatewayApi`] so the workflows can run
//! against the HTTP client or an in-memory double.

use bytes::Bytes;
use std::{convert::Infallible, fmt, fs, path::Path, str::FromStr};
use tracing::{debug, info};

use crate::client::{DefinitionUpload, GatewayApi};
use crate::constants::LATEST_VERSION;
use crate::error::{GatewayError, Result};
use crate::format::{self, DefinitionFormat};
use crate::models::{GatewayDefinition, Network, NetworkVersion, RawResponse, ResourcesDetail};

/// Which version a command operates on
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionSelector {
    Latest,
    Exact(String),
}

impl FromStr for VersionSelector {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case(LATEST_VERSION) {
            Ok(VersionSelector::Latest)
        } else {
            Ok(VersionSelector::Exact(s.to_string()))
        }
    }
}

impl fmt::Display for VersionSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VersionSelector::Latest => f.write_str(LATEST_VERSION),
            VersionSelector::Exact(v) => f.write_str(v),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedVersion {
    pub number: String,
    /// Known only when the version list was fetched
    pub gateway_name: Option<String>,
}

/// Resolve a gateway name to its id. Exactly one search hit is required.
pub async fn locate<A: GatewayApi + ?Sized>(api: &A, name: &str) -> Result<String> {
    let search = api.search_endpoints(name).await?;
    if search.total_size != 1 {
        return Err(GatewayError::AmbiguousOrMissingReference {
            name: name.to_string(),
            total: search.total_size,
        });
    }
    let hit = search.api_end_points.into_iter().next().ok_or_else(|| {
        GatewayError::AmbiguousOrMissingReference {
            name: name.to_string(),
            total: 0,
        }
    })?;
    debug!(name, id = %hit.api_end_point_id, "located API definition");
    Ok(hit.api_end_point_id)
}

pub async fn definition<A: GatewayApi + ?Sized>(api: &A, id: &str) -> Result<GatewayDefinition> {
    let list = api.list_versions(id).await?;
    Ok(GatewayDefinition::from_versions(list))
}

/// Latest version number and the definition's display name
pub async fn resolve_latest<A: GatewayApi + ?Sized>(api: &A, id: &str) -> Result<(String, String)> {
    let def = definition(api, id).await?;
    let latest = def
        .latest()
        .ok_or_else(|| GatewayError::NoVersions { id: id.to_string() })?;
    Ok((latest.number.clone(), def.name))
}

/// Explicit versions pass through unchecked; a wrong one surfaces on the next call
pub async fn resolve<A: GatewayApi + ?Sized>(
    api: &A,
    id: &str,
    selector: &VersionSelector,
) -> Result<ResolvedVersion> {
    match selector {
        VersionSelector::Latest => {
            info!("Requested latest version.");
            let (number, name) = resolve_latest(api, id).await?;
            Ok(ResolvedVersion {
                number,
                gateway_name: Some(name),
            })
        }
        VersionSelector::Exact(v) => Ok(ResolvedVersion {
            number: v.clone(),
            gateway_name: None,
        }),
    }
}

pub async fn fetch_detail<A: GatewayApi + ?Sized>(
    api: &A,
    id: &str,
    version: &str,
) -> Result<ResourcesDetail> {
    api.resources_detail(id, version).await
}

/// Current `(status, versionNumber)` of `network`, freshly fetched
pub async fn activation_status<A: GatewayApi + ?Sized>(
    api: &A,
    id: &str,
    version: &str,
    network: Network,
) -> Result<NetworkVersion> {
    let detail = fetch_detail(api, id, version).await?;
    Ok(detail.network(network).clone())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkState {
    pub network: Network,
    pub current: NetworkVersion,
}

pub async fn network_states<A: GatewayApi + ?Sized>(
    api: &A,
    id: &str,
    version: &str,
) -> Result<Vec<NetworkState>> {
    let mut states = Vec::with_capacity(Network::ALL.len());
    for network in Network::ALL {
        let current = activation_status(api, id, version, network).await?;
        states.push(NetworkState { network, current });
    }
    Ok(states)
}

/// Only branch off a version that is live on at least one network
pub fn creation_allowed(target: &str, states: &[NetworkState]) -> bool {
    states
        .iter()
        .any(|s| s.current.version_number.as_deref() == Some(target))
}

pub async fn create_version<A: GatewayApi + ?Sized>(
    api: &A,
    id: &str,
    base_version: &str,
) -> Result<RawResponse> {
    api.clone_version(id, base_version).await
}

/// Upload `path` into `version`, tagged with its detected format
pub async fn upload_definition<A: GatewayApi + ?Sized>(
    api: &A,
    id: &str,
    version: &str,
    path: &Path,
) -> Result<(DefinitionFormat, RawResponse)> {
    let format = format::require_format(path)?;
    let content = fs::read(path).map_err(|source| GatewayError::DefinitionFile {
        path: path.to_path_buf(),
        source,
    })?;
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "definition".to_string());
    let upload = DefinitionUpload {
        file_name,
        format,
        content: Bytes::from(content),
    };
    let resp = api.upload_definition(id, version, &upload).await?;
    Ok((format, resp))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceComparison {
    /// Resources the backend holds for the version
    pub backend: usize,
    /// Paths the local definition declares
    pub local: usize,
    pub backend_paths: Vec<String>,
    pub local_paths: Vec<String>,
}

impl ResourceComparison {
    pub fn matches(&self) -> bool {
        self.backend == self.local
    }

    /// Backend resource paths the local file does not declare
    pub fn backend_only(&self) -> Vec<&str> {
        self.backend_paths
            .iter()
            .filter(|p| !self.local_paths.contains(*p))
            .map(String::as_str)
            .collect()
    }

    /// Local paths the backend version does not hold yet
    pub fn local_only(&self) -> Vec<&str> {
        self.local_paths
            .iter()
            .filter(|p| !self.backend_paths.contains(*p))
            .map(String::as_str)
            .collect()
    }
}

pub async fn compare_resource_counts<A: GatewayApi + ?Sized>(
    api: &A,
    id: &str,
    version: &str,
    path: &Path,
    format: DefinitionFormat,
) -> Result<ResourceComparison> {
    let detail = fetch_detail(api, id, version).await?;
    let local_paths = format::declared_paths(path, format)?;
    let backend_paths = detail
        .api_resources
        .iter()
        .filter_map(|r| r.label().map(str::to_string))
        .collect();
    Ok(ResourceComparison {
        backend: detail.resource_count(),
        local: local_paths.len(),
        backend_paths,
        local_paths,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(network: Network, version: Option<&str>) -> NetworkState {
        NetworkState {
            network,
            current: NetworkVersion {
                status: Default::default(),
                version_number: version.map(str::to_string),
            },
        }
    }

    #[test]
    fn test_creation_allowed_when_any_network_matches() {
        let states = [
            state(Network::Staging, Some("3")),
            state(Network::Production, Some("2")),
        ];
        assert!(creation_allowed("3", &states));
        assert!(creation_allowed("2", &states));
        assert!(!creation_allowed("5", &states));
    }

    #[test]
    fn test_creation_refused_when_nothing_active() {
        let states = [state(Network::Staging, None), state(Network::Production, None)];
        assert!(!creation_allowed("1", &states));
    }

    #[test]
    fn test_version_selector_parse() {
        let parse = |s: &str| s.parse::<VersionSelector>().unwrap();
        assert_eq!(parse("latest"), VersionSelector::Latest);
        assert_eq!(parse("LATEST"), VersionSelector::Latest);
        assert_eq!(parse(" 7 "), VersionSelector::Exact("7".into()));
        assert_eq!(VersionSelector::Exact("7".into()).to_string(), "7");
    }
}

//! Typed records for the API definitions REST surface
//!
//! The backend mixes numeric and string identifiers (endpoint ids and version
//! numbers arrive as JSON numbers), so both are normalised to `String` here and
//! treated as opaque afterwards.

use serde::{Deserialize, Deserializer, Serialize};
use std::{fmt, str::FromStr};

use crate::constants::ACTIVE_STATUS;

/// Deployment target with its own active-version state
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    Staging,
    Production,
}

impl Network {
    pub const ALL: [Network; 2] = [Network::Staging, Network::Production];

    pub fn as_str(&self) -> &'static str {
        match self {
            Network::Staging => "staging",
            Network::Production => "production",
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Network {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "staging" => Ok(Network::Staging),
            "production" => Ok(Network::Production),
            other => Err(format!(
                "unknown network '{other}', expected staging or production"
            )),
        }
    }
}

/// Activation state of a version on one network
#[derive(Deserialize, Debug, Clone, PartialEq, Eq, Default)]
#[serde(from = "Option<String>")]
pub enum ActivationStatus {
    Pending,
    Active,
    Failed,
    Deactivated,
    /// The backend sent `null`: nothing has been activated on this network
    #[default]
    NotActivated,
    Other(String),
}

impl ActivationStatus {
    pub fn is_active(&self) -> bool {
        matches!(self, ActivationStatus::Active)
    }
}

impl From<Option<String>> for ActivationStatus {
    fn from(raw: Option<String>) -> Self {
        match raw.as_deref() {
            None => ActivationStatus::NotActivated,
            Some(ACTIVE_STATUS) => ActivationStatus::Active,
            Some("PENDING") => ActivationStatus::Pending,
            Some("FAILED") => ActivationStatus::Failed,
            Some("DEACTIVATED") => ActivationStatus::Deactivated,
            Some(other) => ActivationStatus::Other(other.to_string()),
        }
    }
}

impl fmt::Display for ActivationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActivationStatus::Pending => f.write_str("PENDING"),
            ActivationStatus::Active => f.write_str(ACTIVE_STATUS),
            ActivationStatus::Failed => f.write_str("FAILED"),
            ActivationStatus::Deactivated => f.write_str("DEACTIVATED"),
            ActivationStatus::NotActivated => f.write_str("NOT_ACTIVATED"),
            ActivationStatus::Other(s) => f.write_str(s),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrNumber {
    String(String),
    Number(serde_json::Number),
}

impl From<StringOrNumber> for String {
    fn from(value: StringOrNumber) -> Self {
        match value {
            StringOrNumber::String(s) => s,
            StringOrNumber::Number(n) => n.to_string(),
        }
    }
}

fn string_or_number<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    StringOrNumber::deserialize(d).map(String::from)
}

fn opt_string_or_number<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    Ok(Option::<StringOrNumber>::deserialize(d)?.map(String::from))
}

/// `GET /api-definitions/v2/endpoints?contains=<name>`
#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct EndpointSearch {
    pub total_size: u64,
    #[serde(default)]
    pub api_end_points: Vec<EndpointSummary>,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct EndpointSummary {
    #[serde(deserialize_with = "string_or_number")]
    pub api_end_point_id: String,
}

/// `GET /api-definitions/v2/endpoints/{id}/versions`
#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct VersionList {
    /// Newest first, as ordered by the backend
    #[serde(default)]
    pub api_versions: Vec<VersionSummary>,
    pub api_end_point_name: String,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct VersionSummary {
    #[serde(deserialize_with = "string_or_number")]
    pub version_number: String,
    #[serde(default)]
    pub resource_count: Option<u64>,
    #[serde(default)]
    pub staging_status: ActivationStatus,
    #[serde(default)]
    pub production_status: ActivationStatus,
}

/// `GET /api-definitions/v2/endpoints/{id}/versions/{version}/resources-detail`
#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ResourcesDetail {
    #[serde(default)]
    pub api_resources: Vec<ApiResource>,
    #[serde(default)]
    pub staging_version: NetworkVersion,
    #[serde(default)]
    pub production_version: NetworkVersion,
}

impl ResourcesDetail {
    pub fn resource_count(&self) -> usize {
        self.api_resources.len()
    }

    pub fn network(&self, network: Network) -> &NetworkVersion {
        match network {
            Network::Staging => &self.staging_version,
            Network::Production => &self.production_version,
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ApiResource {
    #[serde(default)]
    pub api_resource_name: Option<String>,
    #[serde(default)]
    pub resource_path: Option<String>,
}

impl ApiResource {
    /// Path of the resource, or its name when the backend sent no path
    pub fn label(&self) -> Option<&str> {
        self.resource_path
            .as_deref()
            .or(self.api_resource_name.as_deref())
    }
}

/// Status of a network as seen from one version's resource detail
#[derive(Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NetworkVersion {
    #[serde(default)]
    pub status: ActivationStatus,
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub version_number: Option<String>,
}

/// Body of `POST .../versions/{version}/activate`
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ActivationRequest {
    pub networks: Vec<Network>,
    pub notification_recipients: Vec<String>,
    pub notes: String,
}

impl ActivationRequest {
    pub fn new(network: Network, recipients: &[String]) -> Self {
        ActivationRequest {
            networks: vec![network],
            notification_recipients: recipients.to_vec(),
            notes: format!("Activating endpoint on {network} network."),
        }
    }
}

/// Status and raw body of a mutating call, kept for diagnostics
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn is_success(&self) -> bool {
        self.status == 200
    }
}

/// A gateway definition and its versions, newest first
#[derive(Debug, Clone)]
pub struct GatewayDefinition {
    pub name: String,
    pub versions: Vec<VersionRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionRecord {
    pub number: String,
    pub resource_count: Option<u64>,
    pub staging_status: ActivationStatus,
    pub production_status: ActivationStatus,
}

impl GatewayDefinition {
    pub fn from_versions(list: VersionList) -> Self {
        GatewayDefinition {
            name: list.api_end_point_name,
            versions: list
                .api_versions
                .into_iter()
                .map(|v| VersionRecord {
                    number: v.version_number,
                    resource_count: v.resource_count,
                    staging_status: v.staging_status,
                    production_status: v.production_status,
                })
                .collect(),
        }
    }

    /// The first version the backend listed; no local ordering is applied
    pub fn latest(&self) -> Option<&VersionRecord> {
        self.versions.first()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_network_parse_ignores_case() {
        assert_eq!("STAGING".parse::<Network>(), Ok(Network::Staging));
        assert_eq!(" Production ".parse::<Network>(), Ok(Network::Production));
        assert!("preprod".parse::<Network>().is_err());
    }

    #[test]
    fn test_numeric_ids_become_strings() {
        let search: EndpointSearch = serde_json::from_value(json!({
            "totalSize": 1,
            "apiEndPoints": [{ "apiEndPointId": 12345, "apiEndPointName": "Demo API" }]
        }))
        .unwrap();
        assert_eq!(search.api_end_points[0].api_end_point_id, "12345");
    }

    #[test]
    fn test_resources_detail_with_null_network() {
        let detail: ResourcesDetail = serde_json::from_value(json!({
            "apiResources": [{ "apiResourceName": "users", "resourcePath": "/users" }],
            "stagingVersion": { "status": "PENDING", "versionNumber": 7 },
            "productionVersion": { "status": null, "versionNumber": null }
        }))
        .unwrap();
        assert_eq!(detail.resource_count(), 1);
        assert_eq!(detail.api_resources[0].label(), Some("/users"));
        assert_eq!(detail.network(Network::Staging).status, ActivationStatus::Pending);
        assert_eq!(
            detail.network(Network::Staging).version_number.as_deref(),
            Some("7")
        );
        assert_eq!(
            detail.network(Network::Production).status,
            ActivationStatus::NotActivated
        );
        assert_eq!(detail.network(Network::Production).version_number, None);
    }

    #[test]
    fn test_unknown_status_is_preserved() {
        let status = ActivationStatus::from(Some("ACTIVATING".to_string()));
        assert_eq!(status.to_string(), "ACTIVATING");
        assert!(!status.is_active());
    }

    #[test]
    fn test_activation_request_body() {
        let req = ActivationRequest::new(Network::Staging, &["ops@example.com".to_string()]);
        assert_eq!(
            serde_json::to_value(&req).unwrap(),
            json!({
                "networks": ["staging"],
                "notificationRecipients": ["ops@example.com"],
                "notes": "Activating endpoint on staging network."
            })
        );
    }

    #[test]
    fn test_latest_is_first_listed() {
        let list: VersionList = serde_json::from_value(json!({
            "apiEndPointName": "Demo API",
            "apiVersions": [{ "versionNumber": 2 }, { "versionNumber": 9 }]
        }))
        .unwrap();
        let def = GatewayDefinition::from_versions(list);
        assert_eq!(def.latest().map(|v| v.number.as_str()), Some("2"));
    }
}

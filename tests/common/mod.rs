#![allow(dead_code)]

use apigw_ci::client::{DefinitionUpload, GatewayApi};
use apigw_ci::error::{GatewayError, Result};
use apigw_ci::models::{
    ActivationRequest, EndpointSearch, RawResponse, ResourcesDetail, VersionList,
};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::sync::Mutex;

/// In-memory gateway answering from canned responses
///
/// Resource details are served in order; the last one repeats once the
/// script runs out.
pub struct ScriptedGateway {
    pub search: Value,
    pub versions: Value,
    details: Mutex<VecDeque<Value>>,
    last_detail: Mutex<Option<Value>>,
    pub activate_response: RawResponse,
    pub clone_response: RawResponse,
    pub upload_response: RawResponse,
    pub calls: Mutex<Vec<String>>,
    pub activations: Mutex<Vec<ActivationRequest>>,
    pub uploads: Mutex<Vec<DefinitionUpload>>,
}

fn ok() -> RawResponse {
    RawResponse {
        status: 200,
        body: "{}".into(),
    }
}

impl ScriptedGateway {
    pub fn new() -> Self {
        ScriptedGateway {
            search: json!({ "totalSize": 0, "apiEndPoints": [] }),
            versions: json!({ "apiEndPointName": "", "apiVersions": [] }),
            details: Mutex::new(VecDeque::new()),
            last_detail: Mutex::new(None),
            activate_response: ok(),
            clone_response: ok(),
            upload_response: ok(),
            calls: Mutex::new(Vec::new()),
            activations: Mutex::new(Vec::new()),
            uploads: Mutex::new(Vec::new()),
        }
    }

    /// One definition named `name` with id `id`
    pub fn with_definition(mut self, id: u64, name: &str) -> Self {
        self.search = json!({
            "totalSize": 1,
            "apiEndPoints": [{ "apiEndPointId": id, "apiEndPointName": name }]
        });
        self
    }

    pub fn with_search_total(mut self, total: u64) -> Self {
        let hits: Vec<Value> = (0..total)
            .map(|i| json!({ "apiEndPointId": 100 + i }))
            .collect();
        self.search = json!({ "totalSize": total, "apiEndPoints": hits });
        self
    }

    pub fn with_versions(mut self, name: &str, numbers: &[u64]) -> Self {
        let versions: Vec<Value> = numbers
            .iter()
            .map(|n| json!({ "versionNumber": n }))
            .collect();
        self.versions = json!({ "apiEndPointName": name, "apiVersions": versions });
        self
    }

    pub fn with_detail(self, detail: Value) -> Self {
        self.details.lock().unwrap().push_back(detail);
        self
    }

    /// Staging reports `status` with `version`; production is never activated
    pub fn with_staging_status(self, status: &str, version: u64) -> Self {
        self.with_detail(detail(&[], (Some(status), Some(version)), (None, None)))
    }

    pub fn calls_to(&self, prefix: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.starts_with(prefix))
            .count()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

/// Build a resources-detail payload
pub fn detail(
    paths: &[&str],
    staging: (Option<&str>, Option<u64>),
    production: (Option<&str>, Option<u64>),
) -> Value {
    let resources: Vec<Value> = paths
        .iter()
        .map(|p| json!({ "resourcePath": p }))
        .collect();
    json!({
        "apiResources": resources,
        "stagingVersion": { "status": staging.0, "versionNumber": staging.1 },
        "productionVersion": { "status": production.0, "versionNumber": production.1 }
    })
}

#[async_trait]
impl GatewayApi for ScriptedGateway {
    async fn search_endpoints(&self, name: &str) -> Result<EndpointSearch> {
        self.record(format!("search {name}"));
        Ok(serde_json::from_value(self.search.clone()).unwrap())
    }

    async fn list_versions(&self, id: &str) -> Result<VersionList> {
        self.record(format!("versions {id}"));
        Ok(serde_json::from_value(self.versions.clone()).unwrap())
    }

    async fn resources_detail(&self, id: &str, version: &str) -> Result<ResourcesDetail> {
        self.record(format!("detail {id}/{version}"));
        let next = self.details.lock().unwrap().pop_front();
        let value = match next {
            Some(v) => {
                *self.last_detail.lock().unwrap() = Some(v.clone());
                v
            }
            None => self
                .last_detail
                .lock()
                .unwrap()
                .clone()
                .ok_or(GatewayError::Rejected {
                    operation: "resource detail",
                    status: 404,
                    body: "no scripted detail".into(),
                })?,
        };
        Ok(serde_json::from_value(value).unwrap())
    }

    async fn upload_definition(
        &self,
        id: &str,
        version: &str,
        upload: &DefinitionUpload,
    ) -> Result<RawResponse> {
        self.record(format!("upload {id}/{version}"));
        self.uploads.lock().unwrap().push(upload.clone());
        Ok(self.upload_response.clone())
    }

    async fn activate(
        &self,
        id: &str,
        version: &str,
        request: &ActivationRequest,
    ) -> Result<RawResponse> {
        self.record(format!("activate {id}/{version}"));
        self.activations.lock().unwrap().push(request.clone());
        Ok(self.activate_response.clone())
    }

    async fn clone_version(&self, id: &str, version: &str) -> Result<RawResponse> {
        self.record(format!("clone {id}/{version}"));
        Ok(self.clone_response.clone())
    }
}

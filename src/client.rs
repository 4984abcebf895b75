use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{header::CONTENT_TYPE, Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use tracing::debug;
use uuid::Uuid;

use crate::auth::EdgeGridSigner;
use crate::config::Credentials;
use crate::constants::API_DEFINITIONS_PREFIX;
use crate::error::{GatewayError, Result};
use crate::format::DefinitionFormat;
use crate::models::{ActivationRequest, EndpointSearch, RawResponse, ResourcesDetail, VersionList};

/// A definition file ready to be imported into a version
#[derive(Debug, Clone)]
pub struct DefinitionUpload {
    pub file_name: String,
    pub format: DefinitionFormat,
    pub content: Bytes,
}

/// The calls this toolkit makes against the API definitions service
///
/// Lookups decode typed records and turn non-success statuses into
/// [`GatewayError::Rejected`]. Mutating calls hand back the raw status and
/// body so the caller decides how severe a rejection is.
#[async_trait]
pub trait GatewayApi: Send + Sync {
    async fn search_endpoints(&self, name: &str) -> Result<EndpointSearch>;

    async fn list_versions(&self, id: &str) -> Result<VersionList>;

    async fn resources_detail(&self, id: &str, version: &str) -> Result<ResourcesDetail>;

    async fn upload_definition(
        &self,
        id: &str,
        version: &str,
        upload: &DefinitionUpload,
    ) -> Result<RawResponse>;

    async fn activate(
        &self,
        id: &str,
        version: &str,
        request: &ActivationRequest,
    ) -> Result<RawResponse>;

    async fn clone_version(&self, id: &str, version: &str) -> Result<RawResponse>;
}

/// Signed HTTP client bound to one API host
///
/// Built once per invocation and shared by reference with every workflow step.
pub struct GatewayClient {
    pub base_url: String,
    client: Client,
    signer: EdgeGridSigner,
}

impl GatewayClient {
    pub fn new(creds: &Credentials) -> Result<Self> {
        Self::with_base_url(creds.base_url(), EdgeGridSigner::new(creds))
    }

    pub fn with_base_url(base_url: impl Into<String>, signer: EdgeGridSigner) -> Result<Self> {
        let client = Client::builder().build()?;
        let base_url: String = base_url.into();
        Ok(GatewayClient {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            signer,
        })
    }

    fn endpoint_url(&self, tail: &str) -> String {
        format!("{}{}{}", self.base_url, API_DEFINITIONS_PREFIX, tail)
    }

    fn version_url(&self, id: &str, version: &str, action: &str) -> String {
        self.endpoint_url(&format!("/{id}/versions/{version}/{action}"))
    }

    async fn send(&self, builder: RequestBuilder) -> Result<Response> {
        let mut request = builder.build()?;
        self.signer.sign(&mut request)?;
        debug!(method = %request.method(), url = %request.url(), "sending request");
        Ok(self.client.execute(request).await?)
    }

    async fn fetch_json<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        builder: RequestBuilder,
    ) -> Result<T> {
        let resp = self.send(builder).await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(GatewayError::Rejected {
                operation,
                status: status.as_u16(),
                body: resp.text().await.unwrap_or_default(),
            });
        }
        Ok(resp.json().await?)
    }

    async fn fetch_raw(&self, builder: RequestBuilder) -> Result<RawResponse> {
        let resp = self.send(builder).await?;
        let status = resp.status().as_u16();
        let body = resp.text().await?;
        Ok(RawResponse { status, body })
    }
}

#[async_trait]
impl GatewayApi for GatewayClient {
    async fn search_endpoints(&self, name: &str) -> Result<EndpointSearch> {
        let req = self
            .client
            .get(self.endpoint_url(""))
            .query(&[("contains", name)]);
        self.fetch_json("endpoint search", req).await
    }

    async fn list_versions(&self, id: &str) -> Result<VersionList> {
        let req = self.client.get(self.endpoint_url(&format!("/{id}/versions")));
        self.fetch_json("version listing", req).await
    }

    async fn resources_detail(&self, id: &str, version: &str) -> Result<ResourcesDetail> {
        let req = self
            .client
            .get(self.version_url(id, version, "resources-detail"));
        self.fetch_json("resource detail", req).await
    }

    async fn upload_definition(
        &self,
        id: &str,
        version: &str,
        upload: &DefinitionUpload,
    ) -> Result<RawResponse> {
        let boundary = format!("apigw-{}", Uuid::new_v4().simple());
        let req = self
            .client
            .post(self.version_url(id, version, "file"))
            .header(CONTENT_TYPE, format!("multipart/form-data; boundary={boundary}"))
            .body(multipart_body(&boundary, upload));
        self.fetch_raw(req).await
    }

    async fn activate(
        &self,
        id: &str,
        version: &str,
        request: &ActivationRequest,
    ) -> Result<RawResponse> {
        let req = self
            .client
            .post(self.version_url(id, version, "activate"))
            .json(request);
        self.fetch_raw(req).await
    }

    async fn clone_version(&self, id: &str, version: &str) -> Result<RawResponse> {
        let req = self.client.post(self.version_url(id, version, "cloneVersion"));
        self.fetch_raw(req).await
    }
}

/// Encode the `importFileFormat` field and the `importFile` part in memory.
/// The signature covers the body bytes, so the form cannot be streamed.
fn multipart_body(boundary: &str, upload: &DefinitionUpload) -> Vec<u8> {
    let mut body = Vec::with_capacity(upload.content.len() + 512);
    body.extend_from_slice(
        format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"importFileFormat\"\r\n\r\n{}\r\n",
            upload.format.as_str()
        )
        .as_bytes(),
    );
    body.extend_from_slice(
        format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"importFile\"; filename=\"{}\"\r\nContent-Type: application/x-yaml\r\n\r\n",
            upload.file_name.replace('"', "")
        )
        .as_bytes(),
    );
    body.extend_from_slice(&upload.content);
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());
    body
}

//! EdgeGrid (`EG1-HMAC-SHA256`) request signing
//!
//! Every request to the API gateway carries an `Authorization` header derived
//! from the credentials, a timestamp, a nonce and the request itself:
//!
//! 1. signing key = base64(HMAC-SHA256(client_secret, timestamp))
//! 2. data = method, scheme, host, path+query, headers, content hash and the
//!    auth prefix joined by tabs
//! 3. signature = base64(HMAC-SHA256(signing key, data))

use chrono::Utc;
use hmac::{Hmac, Mac};
use reqwest::{
    header::{HeaderValue, AUTHORIZATION},
    Method, Request,
};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::config::Credentials;
use crate::error::{GatewayError, Result};

type HmacSha256 = Hmac<Sha256>;

const ALGORITHM: &str = "EG1-HMAC-SHA256";

#[derive(Clone)]
pub struct EdgeGridSigner {
    client_token: String,
    client_secret: String,
    access_token: String,
    max_body: usize,
}

impl EdgeGridSigner {
    pub fn new(creds: &Credentials) -> Self {
        EdgeGridSigner {
            client_token: creds.client_token.clone(),
            client_secret: creds.client_secret.clone(),
            access_token: creds.access_token.clone(),
            max_body: creds.max_body,
        }
    }

    /// Attach a fresh `Authorization` header to `request`
    pub fn sign(&self, request: &mut Request) -> Result<()> {
        let timestamp = Utc::now().format("%Y%m%dT%H:%M:%S+0000").to_string();
        let nonce = Uuid::new_v4().to_string();
        let header = self.authorization(request, &timestamp, &nonce)?;
        let value =
            HeaderValue::from_str(&header).map_err(|e| GatewayError::Signing(e.to_string()))?;
        request.headers_mut().insert(AUTHORIZATION, value);
        Ok(())
    }

    pub fn authorization(&self, request: &Request, timestamp: &str, nonce: &str) -> Result<String> {
        let prefix = format!(
            "{} client_token={};access_token={};timestamp={};nonce={};",
            ALGORITHM, self.client_token, self.access_token, timestamp, nonce
        );

        let url = request.url();
        let host = url
            .host_str()
            .ok_or_else(|| GatewayError::Signing(format!("URL {url} has no host")))?;
        let authority = match url.port() {
            Some(port) => format!("{host}:{port}"),
            None => host.to_string(),
        };
        let mut relative = url.path().to_string();
        if let Some(query) = url.query() {
            relative.push('?');
            relative.push_str(query);
        }

        let body = request.body().and_then(|b| b.as_bytes()).unwrap_or(&[]);
        let content_hash = self.content_hash(request.method(), body);

        let data = [
            request.method().as_str(),
            url.scheme(),
            authority.as_str(),
            relative.as_str(),
            "",
            content_hash.as_str(),
            prefix.as_str(),
        ]
        .join("\t");

        let signing_key = base64::encode(hmac_sha256(
            self.client_secret.as_bytes(),
            timestamp.as_bytes(),
        )?);
        let signature = base64::encode(hmac_sha256(signing_key.as_bytes(), data.as_bytes())?);
        Ok(format!("{prefix}signature={signature}"))
    }

    /// Only POST bodies are hashed, and only up to `max_body` bytes
    fn content_hash(&self, method: &Method, body: &[u8]) -> String {
        if *method != Method::POST || body.is_empty() {
            return String::new();
        }
        let covered = &body[..body.len().min(self.max_body)];
        base64::encode(Sha256::digest(covered))
    }
}

fn hmac_sha256(key: &[u8], data: &[u8]) -> Result<Vec<u8>> {
    let mut mac = <HmacSha256 as Mac>::new_from_slice(key)
        .map_err(|e| GatewayError::Signing(e.to_string()))?;
    mac.update(data);
    Ok(mac.finalize().into_bytes().to_vec())
}

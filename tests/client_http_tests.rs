use apigw_ci::auth::EdgeGridSigner;
use apigw_ci::client::{DefinitionUpload, GatewayApi, GatewayClient};
use apigw_ci::config::Credentials;
use apigw_ci::error::GatewayError;
use apigw_ci::format::DefinitionFormat;
use apigw_ci::lifecycle;
use apigw_ci::models::{ActivationRequest, ActivationStatus, Network};
use bytes::Bytes;
use httpmock::prelude::*;
use serde_json::json;

fn client_for(server: &MockServer) -> GatewayClient {
    let creds = Credentials {
        host: "unused.example.com".into(),
        client_token: "akab-client".into(),
        client_secret: "c2VjcmV0".into(),
        access_token: "akab-access".into(),
        max_body: 131_072,
    };
    GatewayClient::with_base_url(server.base_url(), EdgeGridSigner::new(&creds)).unwrap()
}

#[tokio::test]
async fn test_search_sends_contains_query_and_signature() {
    let server = MockServer::start_async().await;
    let search = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/api-definitions/v2/endpoints")
                .query_param("contains", "Demo API")
                .header_exists("authorization");
            then.status(200).json_body(json!({
                "totalSize": 1,
                "apiEndPoints": [{ "apiEndPointId": 12345, "apiEndPointName": "Demo API" }]
            }));
        })
        .await;

    let client = client_for(&server);
    let id = lifecycle::locate(&client, "Demo API").await.unwrap();
    assert_eq!(id, "12345");
    search.assert_async().await;
}

#[tokio::test]
async fn test_versions_and_detail_are_decoded() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/api-definitions/v2/endpoints/12345/versions");
            then.status(200).json_body(json!({
                "apiEndPointName": "Demo API",
                "apiVersions": [{ "versionNumber": 7 }, { "versionNumber": 6 }]
            }));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/api-definitions/v2/endpoints/12345/versions/7/resources-detail");
            then.status(200).json_body(json!({
                "apiResources": [{ "resourcePath": "/users" }, { "resourcePath": "/orders" }],
                "stagingVersion": { "status": "ACTIVE", "versionNumber": 7 },
                "productionVersion": { "status": null, "versionNumber": null }
            }));
        })
        .await;

    let client = client_for(&server);
    let (version, name) = lifecycle::resolve_latest(&client, "12345").await.unwrap();
    assert_eq!((version.as_str(), name.as_str()), ("7", "Demo API"));

    let detail = client.resources_detail("12345", "7").await.unwrap();
    assert_eq!(detail.resource_count(), 2);
    assert_eq!(detail.network(Network::Staging).status, ActivationStatus::Active);
    assert_eq!(
        detail.network(Network::Production).status,
        ActivationStatus::NotActivated
    );
}

#[tokio::test]
async fn test_lookup_error_status_is_rejection() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/api-definitions/v2/endpoints/12345/versions/99/resources-detail");
            then.status(404).body("version not found");
        })
        .await;

    let client = client_for(&server);
    let err = client.resources_detail("12345", "99").await.unwrap_err();
    assert!(matches!(
        err,
        GatewayError::Rejected { status: 404, ref body, .. } if body == "version not found"
    ));
}

#[tokio::test]
async fn test_activate_posts_json_payload() {
    let server = MockServer::start_async().await;
    let activate = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/api-definitions/v2/endpoints/12345/versions/7/activate")
                .header_exists("authorization")
                .json_body(json!({
                    "networks": ["production"],
                    "notificationRecipients": ["ops@example.com"],
                    "notes": "Activating endpoint on production network."
                }));
            then.status(200).json_body(json!({ "networks": ["production"] }));
        })
        .await;

    let client = client_for(&server);
    let request = ActivationRequest::new(Network::Production, &["ops@example.com".to_string()]);
    let resp = client.activate("12345", "7", &request).await.unwrap();
    assert!(resp.is_success());
    activate.assert_async().await;
}

#[tokio::test]
async fn test_upload_sends_multipart_and_keeps_error_body() {
    let server = MockServer::start_async().await;
    let upload = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/api-definitions/v2/endpoints/12345/versions/7/file")
                .body_includes("name=\"importFile\"; filename=\"swagger.yaml\"");
            then.status(400).body("unsupported definition");
        })
        .await;

    let client = client_for(&server);
    let file = DefinitionUpload {
        file_name: "swagger.yaml".into(),
        format: DefinitionFormat::Swagger,
        content: Bytes::from_static(b"swagger: \"2.0\"\npaths: {}\n"),
    };
    let resp = client.upload_definition("12345", "7", &file).await.unwrap();
    assert_eq!(resp.status, 400);
    assert_eq!(resp.body, "unsupported definition");
    upload.assert_async().await;
}

#[tokio::test]
async fn test_clone_version_returns_status() {
    let server = MockServer::start_async().await;
    let clone = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/api-definitions/v2/endpoints/12345/versions/7/cloneVersion");
            then.status(200).json_body(json!({ "versionNumber": 8 }));
        })
        .await;

    let client = client_for(&server);
    let resp = lifecycle::create_version(&client, "12345", "7").await.unwrap();
    assert_eq!(resp.status, 200);
    clone.assert_async().await;
}

//! End-to-end tests for the bulk duplicator.
//!
//! Each test starts the real server router on an ephemeral port, pointed at
//! a `wiremock` stand-in for the Shopify Admin GraphQL endpoint, and drives
//! it through the CLI's [`DuplicatorClient`]. No network access is needed.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p bulk-duplicator-integration-tests
//! ```

use std::{
    net::SocketAddr,
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
};

use bulk_duplicator_cli::DuplicatorClient;
use bulk_duplicator_server::{
    config::{DuplicatorConfig, ShopifyAdminConfig},
    routes,
    shopify::AdminClient,
    state::AppState,
};
use secrecy::SecretString;
use serde_json::{Value, json};
use tokio::net::TcpListener;
use wiremock::{
    Mock, MockBuilder, MockServer, Request, ResponseTemplate,
    matchers::{body_partial_json, method, path},
};

/// Path of the mocked Admin GraphQL endpoint.
pub const GRAPHQL_PATH: &str = "/admin/api/2026-01/graphql.json";

/// API key accepted by the test server.
pub const API_KEY: &str = "Zq8#vN2$kLp5@wRt9!mXc3&yHb7^dFg1";

/// Numeric id of the mocked source product.
pub const SOURCE_ID: &str = "4242";

/// A running duplicator server and its mocked Shopify backend.
pub struct TestContext {
    pub shopify: MockServer,
    pub addr: SocketAddr,
    pub client: DuplicatorClient,
}

impl TestContext {
    /// Start a mock Shopify and a duplicator server in front of it.
    ///
    /// # Panics
    ///
    /// Panics if the server cannot bind a local port.
    #[allow(clippy::unwrap_used)]
    pub async fn start() -> Self {
        let shopify = MockServer::start().await;

        let config = DuplicatorConfig {
            host: "127.0.0.1".parse().unwrap(),
            port: 0,
            api_key: SecretString::from(API_KEY),
            shopify: ShopifyAdminConfig {
                store: "test.myshopify.com".to_string(),
                api_version: "2026-01".to_string(),
                access_token: Some(SecretString::from("shpat_test")),
            },
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 1.0,
        };
        let admin = AdminClient::with_endpoint(
            format!("{}{GRAPHQL_PATH}", shopify.uri()),
            config.shopify.access_token.clone(),
        )
        .unwrap();
        let app = routes::router(AppState::new(config, admin));

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        let client =
            DuplicatorClient::new(&format!("http://{addr}"), SecretString::from(API_KEY)).unwrap();

        Self {
            shopify,
            addr,
            client,
        }
    }

    /// Serve the source product for `GetProduct`.
    pub async fn mock_source_product(&self) {
        operation("GetProduct")
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": { "product": source_product() }
            })))
            .mount(&self.shopify)
            .await;
    }

    /// Serve `ProductCreate`, numbering products from 1001. The attempt
    /// numbered `fail_on` (1-based) returns a user error instead.
    pub async fn mock_product_create(&self, fail_on: Option<usize>) {
        let attempts = Arc::new(AtomicUsize::new(0));
        operation("ProductCreate")
            .respond_with(move |_: &Request| {
                let attempt = attempts.fetch_add(1, Ordering::SeqCst) + 1;
                if fail_on == Some(attempt) {
                    return ResponseTemplate::new(200).set_body_json(json!({
                        "data": { "productCreate": {
                            "product": null,
                            "userErrors": [{ "field": ["title"], "message": "Title has already been taken" }]
                        } }
                    }));
                }
                let id = 1000 + attempt;
                ResponseTemplate::new(200).set_body_json(json!({
                    "data": { "productCreate": {
                        "product": {
                            "id": format!("gid://shopify/Product/{id}"),
                            "options": [{ "id": format!("gid://shopify/ProductOption/{id}"), "name": "Size" }],
                            "variants": { "nodes": [{ "id": format!("gid://shopify/ProductVariant/{id}") }] }
                        },
                        "userErrors": []
                    } }
                }))
            })
            .mount(&self.shopify)
            .await;
    }

    /// Serve the variant mutations with empty user errors.
    pub async fn mock_variant_mutations(&self) {
        operation("ProductVariantsBulkCreate")
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": { "productVariantsBulkCreate": {
                    "productVariants": [
                        { "id": "gid://shopify/ProductVariant/1", "price": "10.00" },
                        { "id": "gid://shopify/ProductVariant/2", "price": "12.00" }
                    ],
                    "userErrors": []
                } }
            })))
            .mount(&self.shopify)
            .await;

        operation("ProductVariantsBulkUpdate")
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": { "productVariantsBulkUpdate": { "userErrors": [] } }
            })))
            .mount(&self.shopify)
            .await;
    }

    /// `ProductCreate` request bodies received so far, in order.
    pub async fn product_create_inputs(&self) -> Vec<Value> {
        self.shopify
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .filter_map(|request| request.body_json::<Value>().ok())
            .filter(|body| body["operationName"] == "ProductCreate")
            .map(|body| body["variables"].clone())
            .collect()
    }
}

/// A mock for one GraphQL operation on the Admin endpoint.
pub fn operation(name: &str) -> MockBuilder {
    Mock::given(method("POST"))
        .and(path(GRAPHQL_PATH))
        .and(body_partial_json(json!({ "operationName": name })))
}

/// The source product every test duplicates.
#[must_use]
pub fn source_product() -> Value {
    json!({
        "id": format!("gid://shopify/Product/{SOURCE_ID}"),
        "title": "Classic Tee",
        "descriptionHtml": "<p>Soft cotton</p>",
        "vendor": "Acme",
        "productType": "Shirt",
        "tags": ["cotton"],
        "options": [{
            "id": "gid://shopify/ProductOption/1",
            "name": "Size",
            "optionValues": [
                { "id": "gid://shopify/ProductOptionValue/1", "name": "Small" },
                { "id": "gid://shopify/ProductOptionValue/2", "name": "Large" }
            ]
        }],
        "variants": { "nodes": [
            { "id": "gid://shopify/ProductVariant/1", "price": "10.00",
              "selectedOptions": [{ "name": "Size", "value": "Small" }] },
            { "id": "gid://shopify/ProductVariant/2", "price": "12.00",
              "selectedOptions": [{ "name": "Size", "value": "Large" }] }
        ] },
        "media": { "nodes": [
            { "mediaContentType": "IMAGE", "image": { "url": "https://cdn.test/source.jpg" } }
        ] }
    })
}

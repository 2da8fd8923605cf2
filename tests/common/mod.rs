#![allow(dead_code)]

use anyhow::{Context, Result};
use serde_json::{json, Value};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use carenet_api::config::AppConfig;
use carenet_api::state::AppState;
use carenet_api::supabase::SupabaseClient;

pub const ANON_KEY: &str = "anon-key";
pub const SERVICE_KEY: &str = "service-key";
pub const TOKEN: &str = "caller-token";
pub const USER_ID: &str = "6f1c2d3e-0000-4000-8000-000000000001";
pub const EMAIL: &str = "grace@example.com";

/// Running API instance backed by a mock Supabase project.
pub struct TestServer {
    pub base_url: String,
    pub supabase: MockServer,
    pub client: reqwest::Client,
}

impl TestServer {
    /// Anon and service-role keys both configured
    pub async fn spawn() -> Result<Self> {
        Self::spawn_with(true, Some(SERVICE_KEY)).await
    }

    /// Supabase URL and anon key set; service-role key as given
    pub async fn spawn_with_service_key(service_role_key: Option<&str>) -> Result<Self> {
        Self::spawn_with(true, service_role_key).await
    }

    /// No Supabase configuration at all
    pub async fn spawn_unconfigured() -> Result<Self> {
        Self::spawn_with(false, None).await
    }

    async fn spawn_with(configured: bool, service_role_key: Option<&str>) -> Result<Self> {
        let supabase = MockServer::start().await;

        let mut config = AppConfig::development();
        if configured {
            config.supabase.url = Some(supabase.uri());
            config.supabase.anon_key = Some(ANON_KEY.to_string());
            config.supabase.service_role_key = service_role_key.map(str::to_string);
        }

        let client = SupabaseClient::from_config(&config.supabase)?;
        let state = AppState::new(config, client);

        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
            .await
            .context("failed to bind test listener")?;

        tokio::spawn(async move {
            let _ = axum::serve(listener, carenet_api::app(state)).await;
        });

        Ok(Self {
            base_url: format!("http://127.0.0.1:{}", port),
            supabase,
            client: reqwest::Client::new(),
        })
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn post_authed(&self, path: &str, body: &Value) -> Result<reqwest::Response> {
        Ok(self
            .client
            .post(self.url(path))
            .bearer_auth(TOKEN)
            .json(body)
            .send()
            .await?)
    }

    /// Requests the mock Supabase project received, for asserting what was written.
    pub async fn supabase_requests(&self) -> Vec<wiremock::Request> {
        self.supabase.received_requests().await.unwrap_or_default()
    }

    /// Bodies of POSTs to a PostgREST table, in arrival order.
    pub async fn inserted_rows(&self, table: &str) -> Vec<Value> {
        let table_path = format!("/rest/v1/{}", table);
        self.supabase_requests()
            .await
            .into_iter()
            .filter(|r| r.method.as_str() == "POST" && r.url.path() == table_path)
            .filter_map(|r| serde_json::from_slice(&r.body).ok())
            .collect()
    }

    /// `GET /auth/v1/user` accepts [`TOKEN`] and returns the given metadata.
    pub async fn mock_identity(&self, metadata: Value) {
        Mock::given(method("GET"))
            .and(path("/auth/v1/user"))
            .and(header("Authorization", format!("Bearer {}", TOKEN).as_str()))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": USER_ID,
                "email": EMAIL,
                "user_metadata": metadata,
            })))
            .mount(&self.supabase)
            .await;
    }

    /// Valid [`TOKEN`] for an identity that signed in without an email.
    pub async fn mock_identity_without_email(&self) {
        Mock::given(method("GET"))
            .and(path("/auth/v1/user"))
            .and(header("Authorization", format!("Bearer {}", TOKEN).as_str()))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": USER_ID,
                "phone": "15550100",
                "user_metadata": {},
            })))
            .mount(&self.supabase)
            .await;
    }

    pub async fn mock_rejected_token(&self) {
        Mock::given(method("GET"))
            .and(path("/auth/v1/user"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "code": 401,
                "error_code": "bad_jwt",
                "msg": "invalid JWT: unable to parse or verify signature"
            })))
            .mount(&self.supabase)
            .await;
    }

    /// Elevated lookup of `users` for [`USER_ID`].
    pub async fn mock_existing_profile(&self, row: Option<Value>) {
        let rows = row.map(|r| vec![r]).unwrap_or_default();
        Mock::given(method("GET"))
            .and(path("/rest/v1/users"))
            .and(query_param("id", format!("eq.{}", USER_ID).as_str()))
            .and(header("Authorization", format!("Bearer {}", SERVICE_KEY).as_str()))
            .respond_with(ResponseTemplate::new(200).set_body_json(rows))
            .mount(&self.supabase)
            .await;
    }

    /// Inserts into `table` succeed and echo `row` back.
    pub async fn mock_insert(&self, table: &str, row: Value) {
        Mock::given(method("POST"))
            .and(path(format!("/rest/v1/{}", table).as_str()))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!([row])))
            .mount(&self.supabase)
            .await;
    }

    /// Inserts into `table` fail with a PostgREST error.
    pub async fn mock_insert_failure(&self, table: &str, status: u16, message: &str) {
        Mock::given(method("POST"))
            .and(path(format!("/rest/v1/{}", table).as_str()))
            .respond_with(ResponseTemplate::new(status).set_body_json(json!({
                "code": "42501",
                "message": message,
            })))
            .mount(&self.supabase)
            .await;
    }
}

pub fn user_row(role: &str) -> Value {
    json!({
        "id": USER_ID,
        "email": EMAIL,
        "full_name": "Grace Hopper",
        "avatar_url": null,
        "phone": null,
        "role": role,
        "created_at": "2025-01-01T00:00:00+00:00"
    })
}

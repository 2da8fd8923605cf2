use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use url::Url;

use super::{error_from_response, SupabaseClient, SupabaseError};

/// User record as returned by `GET /auth/v1/user`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Identity {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
    /// Provider metadata (Google supplies `full_name`, `name`, `avatar_url`, `picture`)
    #[serde(default, rename = "user_metadata")]
    pub metadata: Option<Map<String, Value>>,
}

impl Identity {
    fn metadata_str(&self, key: &str) -> Option<&str> {
        self.metadata
            .as_ref()
            .and_then(|m| m.get(key))
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
    }

    pub fn full_name(&self) -> Option<&str> {
        self.metadata_str("full_name")
            .or_else(|| self.metadata_str("name"))
    }

    pub fn avatar_url(&self) -> Option<&str> {
        self.metadata_str("avatar_url")
            .or_else(|| self.metadata_str("picture"))
    }

    /// `None` for phone-only or anonymous sign-ins.
    pub fn email(&self) -> Option<&str> {
        self.email.as_deref().filter(|e| !e.is_empty())
    }
}

/// Token verification and OAuth URLs against GoTrue.
pub struct AuthClient<'a> {
    client: &'a SupabaseClient,
}

impl<'a> AuthClient<'a> {
    pub(super) fn new(client: &'a SupabaseClient) -> Self {
        Self { client }
    }

    /// Resolves an access token to the identity that owns it.
    ///
    /// Every call goes to the provider; nothing is cached. Any 4xx from GoTrue
    /// (expired, malformed, revoked, user deleted) is reported as
    /// [`SupabaseError::InvalidToken`].
    pub async fn get_user(&self, token: &str) -> Result<Identity, SupabaseError> {
        let url = self.client.endpoint("auth/v1/user")?;

        let response = self
            .client
            .http
            .get(url)
            .header("apikey", &self.client.anon_key)
            .bearer_auth(token)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(response.json::<Identity>().await?);
        }

        match error_from_response(response).await {
            SupabaseError::Api { message, .. } if status.is_client_error() => {
                Err(SupabaseError::InvalidToken(message))
            }
            other => Err(other),
        }
    }

    /// Builds the provider redirect URL (`/auth/v1/authorize`).
    ///
    /// The URL is returned to the client to follow; no request is made here.
    pub fn authorize_url(&self, provider: &str, redirect_to: &str) -> Result<Url, SupabaseError> {
        let mut url = self.client.endpoint("auth/v1/authorize")?;
        url.query_pairs_mut()
            .append_pair("provider", provider)
            .append_pair("redirect_to", redirect_to);
        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn identity(metadata: Value) -> Identity {
        serde_json::from_value(json!({
            "id": "user-1",
            "email": "ada@example.com",
            "user_metadata": metadata,
        }))
        .unwrap()
    }

    #[test]
    fn test_avatar_prefers_avatar_url_then_picture() {
        let both = identity(json!({ "avatar_url": "A", "picture": "P" }));
        assert_eq!(both.avatar_url(), Some("A"));

        let picture_only = identity(json!({ "picture": "X" }));
        assert_eq!(picture_only.avatar_url(), Some("X"));

        let empty_avatar = identity(json!({ "avatar_url": "", "picture": "P" }));
        assert_eq!(empty_avatar.avatar_url(), Some("P"));

        let none = identity(json!({}));
        assert_eq!(none.avatar_url(), None);
    }

    #[test]
    fn test_full_name_falls_back_to_name() {
        assert_eq!(identity(json!({ "name": "Ada" })).full_name(), Some("Ada"));
        assert_eq!(
            identity(json!({ "full_name": "Ada Lovelace", "name": "Ada" })).full_name(),
            Some("Ada Lovelace")
        );
    }

    #[test]
    fn test_missing_or_blank_email_is_none() {
        assert_eq!(identity(json!({})).email(), Some("ada@example.com"));

        let no_email: Identity = serde_json::from_value(json!({ "id": "user-2" })).unwrap();
        assert_eq!(no_email.email(), None);

        let blank: Identity = serde_json::from_value(json!({ "id": "user-3", "email": "" })).unwrap();
        assert_eq!(blank.email(), None);
    }

    #[test]
    fn test_null_metadata_is_accepted() {
        let user = identity(Value::Null);
        assert!(user.metadata.is_none());
        assert_eq!(user.avatar_url(), None);
    }

    #[test]
    fn test_authorize_url_encodes_redirect() {
        let client = SupabaseClient::new("https://demo.supabase.co", "anon", None).unwrap();
        let url = client
            .auth()
            .authorize_url("google", "http://localhost:8000/auth/callback")
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://demo.supabase.co/auth/v1/authorize?provider=google&redirect_to=http%3A%2F%2Flocalhost%3A8000%2Fauth%2Fcallback"
        );
    }

    #[tokio::test]
    async fn test_get_user_sends_token_and_apikey() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/auth/v1/user"))
            .and(header("apikey", "anon"))
            .and(header("Authorization", "Bearer good-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "user-1",
                "email": "ada@example.com",
                "user_metadata": { "picture": "X" }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = SupabaseClient::new(&server.uri(), "anon", None).unwrap();
        let user = client.auth().get_user("good-token").await.unwrap();
        assert_eq!(user.id, "user-1");
        assert_eq!(user.avatar_url(), Some("X"));
    }

    #[tokio::test]
    async fn test_get_user_rejects_invalid_token() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/auth/v1/user"))
            .respond_with(ResponseTemplate::new(403).set_body_json(json!({
                "code": 403,
                "error_code": "bad_jwt",
                "msg": "invalid JWT: token is expired"
            })))
            .mount(&server)
            .await;

        let client = SupabaseClient::new(&server.uri(), "anon", None).unwrap();
        let err = client.auth().get_user("stale").await.unwrap_err();
        match err {
            SupabaseError::InvalidToken(message) => assert!(message.contains("expired")),
            other => panic!("expected InvalidToken, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_get_user_server_error_is_not_a_token_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/auth/v1/user"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let client = SupabaseClient::new(&server.uri(), "anon", None).unwrap();
        let err = client.auth().get_user("token").await.unwrap_err();
        assert!(matches!(err, SupabaseError::Api { status: 503, .. }));
    }
}

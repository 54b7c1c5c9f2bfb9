use anyhow::Result;

use super::ApiClient;
use crate::core::model::{AuthToken, Credentials, Message, SignupRequest};

impl ApiClient {
    /// Exchanges credentials for a bearer token.
    pub async fn login(&self, credentials: &Credentials) -> Result<AuthToken> {
        self.post("/api/auth/login", credentials).await
    }

    pub async fn signup(&self, request: &SignupRequest) -> Result<Message> {
        self.post_ack("/api/auth/signup", request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_login_returns_token() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/auth/login"))
            .and(body_json(json!({"email": "ada@example.com", "password": "hunter2"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"token": "abc.def"})))
            .mount(&mock_server)
            .await;

        let client = ApiClient::new(&mock_server.uri()).unwrap();
        let token = client
            .login(&Credentials {
                email: "ada@example.com".to_string(),
                password: "hunter2".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(token.token, "abc.def");
    }

    #[tokio::test]
    async fn test_signup_conflict_message() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/auth/signup"))
            .respond_with(
                ResponseTemplate::new(409).set_body_json(json!({"message": "User already exists"})),
            )
            .mount(&mock_server)
            .await;

        let client = ApiClient::new(&mock_server.uri()).unwrap();
        let err = client
            .signup(&SignupRequest {
                username: "ada".to_string(),
                email: "ada@example.com".to_string(),
                password: "hunter2".to_string(),
            })
            .await
            .unwrap_err();
        assert_eq!(
            crate::api::user_message(&err, "Signup failed"),
            "User already exists"
        );
    }
}

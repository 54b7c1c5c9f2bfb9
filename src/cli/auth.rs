use super::ui;
use crate::api::{self, ApiClient};
use crate::core::model::{Credentials, SignupRequest};
use crate::store::SessionStore;
use anyhow::{Result, bail};
use clap::Args;
use tracing::info;

#[derive(Args, Debug, Clone)]
pub struct LoginArgs {
    #[arg(short, long)]
    pub email: String,
    /// Prompted for when omitted
    #[arg(short, long)]
    pub password: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct SignupArgs {
    #[arg(short, long)]
    pub username: String,
    #[arg(short, long)]
    pub email: String,
    /// Prompted for when omitted
    #[arg(short, long)]
    pub password: Option<String>,
    /// Prompted for when omitted
    #[arg(long)]
    pub confirm_password: Option<String>,
}

fn password_or_prompt(value: Option<String>, prompt: &str) -> Result<String> {
    match value {
        Some(password) => Ok(password),
        None => ui::prompt_password(prompt),
    }
}

/// Exchanges credentials for a token and keeps it for later commands.
pub async fn login(client: &ApiClient, store: &dyn SessionStore, args: LoginArgs) -> Result<()> {
    let password = password_or_prompt(args.password, "Password")?;
    let credentials = Credentials {
        email: args.email.trim().to_string(),
        password,
    };
    if credentials.email.is_empty() || credentials.password.is_empty() {
        bail!("Please fill in all required fields");
    }
    authenticate(client, store, &credentials, "Login failed").await?;
    println!("{}", ui::style_text("Logged in.", ui::StyleType::Success));
    Ok(())
}

async fn authenticate(
    client: &ApiClient,
    store: &dyn SessionStore,
    credentials: &Credentials,
    fallback: &str,
) -> Result<()> {
    let token = client
        .login(credentials)
        .await
        .map_err(|e| api::fail(e, fallback))?;
    store.save_token(&token.token).await?;
    info!(email = %credentials.email, "Session token stored");
    Ok(())
}

pub(crate) fn build_signup(
    args: &SignupArgs,
    password: String,
    confirm_password: &str,
) -> Result<SignupRequest> {
    if password != confirm_password {
        bail!("Passwords do not match");
    }
    let username = args.username.trim();
    let email = args.email.trim();
    if username.is_empty() || email.is_empty() || password.is_empty() {
        bail!("Please fill in all required fields");
    }
    Ok(SignupRequest {
        username: username.to_string(),
        email: email.to_string(),
        password,
    })
}

/// Registers a new user, then logs in with the same credentials.
pub async fn signup(client: &ApiClient, store: &dyn SessionStore, args: SignupArgs) -> Result<()> {
    let password = password_or_prompt(args.password.clone(), "Password")?;
    let confirm = password_or_prompt(args.confirm_password.clone(), "Confirm password")?;
    let request = build_signup(&args, password, &confirm)?;

    client
        .signup(&request)
        .await
        .map_err(|e| api::fail(e, "Signup failed"))?;

    let credentials = Credentials {
        email: request.email,
        password: request.password,
    };
    authenticate(client, store, &credentials, "Signup failed").await?;
    println!(
        "{}",
        ui::style_text("Account registered. Logged in.", ui::StyleType::Success)
    );
    Ok(())
}

pub async fn logout(store: &dyn SessionStore) -> Result<()> {
    store.clear().await?;
    println!("Logged out.");
    Ok(())
}

pub async fn whoami(client: &ApiClient) -> Result<()> {
    let profile = client
        .me()
        .await
        .map_err(|e| api::fail(e, "Failed to load user profile"))?;
    match profile.email {
        Some(email) => println!("{} <{}>", profile.username, email),
        None => println!("{}", profile.username),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemorySessionStore;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn signup_args() -> SignupArgs {
        SignupArgs {
            username: " ana ".to_string(),
            email: "ana@example.com".to_string(),
            password: None,
            confirm_password: None,
        }
    }

    #[test]
    fn test_build_signup_rejects_mismatch() {
        let err = build_signup(&signup_args(), "secret".to_string(), "secrte").unwrap_err();
        assert_eq!(err.to_string(), "Passwords do not match");
    }

    #[test]
    fn test_build_signup_trims() {
        let request = build_signup(&signup_args(), "secret".to_string(), "secret").unwrap();
        assert_eq!(request.username, "ana");
        assert_eq!(request.password, "secret");
    }

    #[tokio::test]
    async fn test_login_stores_token() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/auth/login"))
            .and(body_json(serde_json::json!({
                "email": "ana@example.com",
                "password": "secret"
            })))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"token": "tok"})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = ApiClient::new(&server.uri()).unwrap();
        let store = MemorySessionStore::new();
        let args = LoginArgs {
            email: "ana@example.com".to_string(),
            password: Some("secret".to_string()),
        };
        login(&client, &store, args).await.unwrap();
        assert_eq!(store.load_token().await.unwrap().as_deref(), Some("tok"));
    }

    #[tokio::test]
    async fn test_login_failure_uses_server_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/auth/login"))
            .respond_with(
                ResponseTemplate::new(401)
                    .set_body_json(serde_json::json!({"message": "Invalid credentials"})),
            )
            .mount(&server)
            .await;

        let client = ApiClient::new(&server.uri()).unwrap();
        let store = MemorySessionStore::new();
        let args = LoginArgs {
            email: "ana@example.com".to_string(),
            password: Some("wrong".to_string()),
        };
        let err = login(&client, &store, args).await.unwrap_err();
        assert_eq!(err.to_string(), "Invalid credentials");
        assert!(store.load_token().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_signup_then_login() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/auth/signup"))
            .respond_with(
                ResponseTemplate::new(201)
                    .set_body_json(serde_json::json!({"message": "User registered"})),
            )
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/auth/login"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"token": "new"})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = ApiClient::new(&server.uri()).unwrap();
        let store = MemorySessionStore::new();
        let args = SignupArgs {
            password: Some("secret".to_string()),
            confirm_password: Some("secret".to_string()),
            ..signup_args()
        };
        signup(&client, &store, args).await.unwrap();
        assert_eq!(store.load_token().await.unwrap().as_deref(), Some("new"));
    }

    #[tokio::test]
    async fn test_signup_fallback_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/auth/signup"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let client = ApiClient::new(&server.uri()).unwrap();
        let store = MemorySessionStore::new();
        let args = SignupArgs {
            password: Some("secret".to_string()),
            confirm_password: Some("secret".to_string()),
            ..signup_args()
        };
        let err = signup(&client, &store, args).await.unwrap_err();
        assert_eq!(err.to_string(), "Signup failed");
    }
}

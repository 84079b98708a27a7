//! Integration-style tests for the auth crate
//!
//! Exercises the use cases and the full HTTP surface against an
//! in-memory repository.

use std::sync::{Arc, Mutex};

use crate::application::{
    AuthConfig, AuthenticateUseCase, FederatedProfile, LoginMethod, RegisterInput, RegisterUseCase,
};
use crate::domain::entity::user::User;
use crate::domain::policy::AccessPolicy;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{email::Email, user_name::UserName};
use crate::error::{AuthError, AuthResult};

/// In-memory repository enforcing the same uniqueness rules as the
/// database schema.
#[derive(Clone, Default)]
struct InMemoryUserRepository {
    users: Arc<Mutex<Vec<User>>>,
}

impl InMemoryUserRepository {
    fn new() -> Self {
        Self::default()
    }

    fn count(&self) -> usize {
        self.users.lock().unwrap().len()
    }
}

impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: &User) -> AuthResult<()> {
        let mut users = self.users.lock().unwrap();
        if users.iter().any(|u| u.username == user.username) {
            return Err(AuthError::DuplicateUsername);
        }
        if users.iter().any(|u| u.email == user.email) {
            return Err(AuthError::DuplicateEmail);
        }
        users.push(user.clone());
        Ok(())
    }

    async fn find_by_username(&self, username: &UserName) -> AuthResult<Option<User>> {
        let users = self.users.lock().unwrap();
        Ok(users.iter().find(|u| &u.username == username).cloned())
    }

    async fn exists_by_username(&self, username: &UserName) -> AuthResult<bool> {
        let users = self.users.lock().unwrap();
        Ok(users.iter().any(|u| &u.username == username))
    }

    async fn exists_by_email(&self, email: &Email) -> AuthResult<bool> {
        let users = self.users.lock().unwrap();
        Ok(users.iter().any(|u| &u.email == email))
    }

    async fn find_by_federated(&self, provider: &str, subject: &str) -> AuthResult<Option<User>> {
        let users = self.users.lock().unwrap();
        Ok(users
            .iter()
            .find(|u| {
                u.federated
                    .as_ref()
                    .is_some_and(|f| f.provider == provider && f.subject == subject)
            })
            .cloned())
    }

    async fn create_federated_if_absent(&self, user: &User) -> AuthResult<User> {
        let federated = user
            .federated
            .as_ref()
            .ok_or_else(|| AuthError::Internal("not federated".into()))?;

        let mut users = self.users.lock().unwrap();
        if let Some(existing) = users.iter().find(|u| {
            u.federated
                .as_ref()
                .is_some_and(|f| f.provider == federated.provider && f.subject == federated.subject)
        }) {
            return Ok(existing.clone());
        }
        if users.iter().any(|u| u.username == user.username) {
            return Err(AuthError::DuplicateUsername);
        }
        if users.iter().any(|u| u.email == user.email) {
            return Err(AuthError::DuplicateEmail);
        }
        users.push(user.clone());
        Ok(user.clone())
    }

    async fn list(&self) -> AuthResult<Vec<User>> {
        Ok(self.users.lock().unwrap().clone())
    }

    async fn delete_by_username(&self, username: &UserName) -> AuthResult<()> {
        let mut users = self.users.lock().unwrap();
        let before = users.len();
        users.retain(|u| &u.username != username);
        if users.len() == before {
            return Err(AuthError::UserNotFound);
        }
        Ok(())
    }
}

// ============================================================================
// Use Case Tests
// ============================================================================

#[cfg(test)]
mod use_case_tests {
    use super::*;

    fn setup() -> (
        InMemoryUserRepository,
        AuthenticateUseCase<InMemoryUserRepository>,
        RegisterUseCase<InMemoryUserRepository>,
    ) {
        let repo = InMemoryUserRepository::new();
        let config = Arc::new(AuthConfig::with_random_secret());
        let codec = Arc::new(config.codec());
        let authenticate =
            AuthenticateUseCase::new(Arc::new(repo.clone()), codec, config.clone());
        let register = RegisterUseCase::new(Arc::new(repo.clone()), config);
        (repo, authenticate, register)
    }

    fn register_input(username: &str, email: &str) -> RegisterInput {
        RegisterInput {
            username: username.to_string(),
            email: email.to_string(),
            password: "correct horse battery".to_string(),
            role: None,
        }
    }

    #[tokio::test]
    async fn test_register_then_login() {
        let (_, authenticate, register) = setup();

        register
            .execute(register_input("alice", "alice@example.com"))
            .await
            .unwrap();

        let output = authenticate
            .execute(LoginMethod::Password {
                username: "alice".to_string(),
                password: "correct horse battery".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(output.username, "alice");
        assert!(!output.token.is_empty());
    }

    #[tokio::test]
    async fn test_login_failures_are_uniform() {
        let (_, authenticate, register) = setup();

        register
            .execute(register_input("alice", "alice@example.com"))
            .await
            .unwrap();

        let wrong_password = authenticate
            .execute(LoginMethod::Password {
                username: "alice".to_string(),
                password: "not the password".to_string(),
            })
            .await
            .unwrap_err();

        let unknown_user = authenticate
            .execute(LoginMethod::Password {
                username: "nobody".to_string(),
                password: "not the password".to_string(),
            })
            .await
            .unwrap_err();

        assert!(matches!(wrong_password, AuthError::InvalidCredentials));
        assert!(matches!(unknown_user, AuthError::InvalidCredentials));
        assert_eq!(wrong_password.to_string(), unknown_user.to_string());
    }

    #[tokio::test]
    async fn test_duplicate_registration_rejected() {
        let (_, _, register) = setup();

        register
            .execute(register_input("alice", "alice@example.com"))
            .await
            .unwrap();

        let err = register
            .execute(register_input("alice", "other@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::DuplicateUsername));

        let err = register
            .execute(register_input("alice2", "alice@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::DuplicateEmail));
    }

    #[tokio::test]
    async fn test_password_login_for_federated_only_user_rejected() {
        let (_, authenticate, register) = setup();

        register
            .execute(register_input("alice", "alice@example.com"))
            .await
            .unwrap();

        // A federated-only user cannot password-login, and the error
        // matches the generic credential failure
        let profile = FederatedProfile {
            provider: "google".to_string(),
            subject: "sub-1".to_string(),
            email: "fed@example.com".to_string(),
            display_name: None,
        };
        let output = authenticate
            .execute(LoginMethod::Federated(profile))
            .await
            .unwrap();

        let err = authenticate
            .execute(LoginMethod::Password {
                username: output.username,
                password: "anything at all".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_federated_login_is_idempotent() {
        let (repo, authenticate, _) = setup();

        let profile = FederatedProfile {
            provider: "google".to_string(),
            subject: "sub-42".to_string(),
            email: "carol@example.com".to_string(),
            display_name: Some("Carol".to_string()),
        };

        let first = authenticate
            .execute(LoginMethod::Federated(profile.clone()))
            .await
            .unwrap();
        let second = authenticate
            .execute(LoginMethod::Federated(profile))
            .await
            .unwrap();

        assert_eq!(first.username, second.username);
        assert_eq!(repo.count(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_federated_resolution_yields_one_user() {
        let (repo, authenticate, _) = setup();
        let authenticate = Arc::new(authenticate);

        let mut handles = Vec::new();
        for _ in 0..8 {
            let authenticate = authenticate.clone();
            handles.push(tokio::spawn(async move {
                authenticate
                    .execute(LoginMethod::Federated(FederatedProfile {
                        provider: "google".to_string(),
                        subject: "sub-race".to_string(),
                        email: "dave@example.com".to_string(),
                        display_name: None,
                    }))
                    .await
            }));
        }

        let mut usernames = Vec::new();
        for handle in handles {
            let output = handle.await.unwrap().unwrap();
            usernames.push(output.username);
        }

        usernames.dedup();
        assert_eq!(usernames.len(), 1);
        assert_eq!(repo.count(), 1);
    }
}

// ============================================================================
// HTTP Surface Tests
// ============================================================================

#[cfg(test)]
mod http_tests {
    use super::*;

    use axum::Router;
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use axum::routing::get;
    use chrono::{Duration as ChronoDuration, Utc};
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use crate::domain::token::TokenCodec;
    use crate::domain::value_object::role::{Role, RoleSet};
    use crate::presentation::middleware::AuthLayerState;
    use crate::presentation::router::{admin_router_generic, auth_router_generic};

    fn test_app(config: &AuthConfig) -> (Router, InMemoryUserRepository, Arc<TokenCodec>) {
        let repo = InMemoryUserRepository::new();
        let codec = Arc::new(config.codec());
        let layer_state =
            AuthLayerState::new(codec.clone(), Arc::new(AccessPolicy::defaults()));

        let app = Router::new()
            .nest(
                "/api/auth",
                auth_router_generic(repo.clone(), codec.clone(), config.clone()),
            )
            .nest(
                "/api/admin",
                admin_router_generic(repo.clone(), codec.clone(), config.clone()),
            )
            .route("/api/reader/feed", get(|| async { "feed" }))
            .route("/api/author/drafts", get(|| async { "drafts" }))
            .route("/api/profile", get(|| async { "profile" }))
            .layer(axum::middleware::from_fn_with_state(
                layer_state,
                crate::presentation::middleware::authenticate,
            ));

        (app, repo, codec)
    }

    fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get_request(uri: &str, token: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().method("GET").uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        builder.body(Body::empty()).unwrap()
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_register_login_me_roundtrip() {
        let config = AuthConfig::with_random_secret();
        let (app, _, _) = test_app(&config);

        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/auth/register",
                json!({"username": "alice", "email": "alice@example.com", "password": "correct horse battery"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/auth/login",
                json!({"username": "alice", "password": "correct horse battery"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        let token = body["token"].as_str().unwrap().to_string();
        assert_eq!(body["tokenType"], "Bearer");

        let response = app
            .oneshot(get_request("/api/auth/me", Some(&token)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["username"], "alice");
        assert_eq!(body["roles"][0], "reader");
    }

    #[tokio::test]
    async fn test_login_failure_is_401_for_unknown_and_wrong() {
        let config = AuthConfig::with_random_secret();
        let (app, _, _) = test_app(&config);

        app.clone()
            .oneshot(json_request(
                "POST",
                "/api/auth/register",
                json!({"username": "alice", "email": "alice@example.com", "password": "correct horse battery"}),
            ))
            .await
            .unwrap();

        for (user, pass) in [("alice", "wrong password!"), ("nobody", "wrong password!")] {
            let response = app
                .clone()
                .oneshot(json_request(
                    "POST",
                    "/api/auth/login",
                    json!({"username": user, "password": pass}),
                ))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
            let body = body_json(response).await;
            assert_eq!(body["message"], "Invalid credentials");
        }
    }

    #[tokio::test]
    async fn test_protected_route_requires_token() {
        let config = AuthConfig::with_random_secret();
        let (app, _, codec) = test_app(&config);

        // Anonymous request to a default-protected path
        let response = app
            .clone()
            .oneshot(get_request("/api/profile", None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        // Any authenticated identity passes the default rule
        let token = codec.issue("alice", &RoleSet::single(Role::Reader), Utc::now());
        let response = app
            .oneshot(get_request("/api/profile", Some(&token)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_role_rules_401_vs_403() {
        let config = AuthConfig::with_random_secret();
        let (app, _, codec) = test_app(&config);

        let reader = codec.issue("alice", &RoleSet::single(Role::Reader), Utc::now());
        let admin = codec.issue("root", &RoleSet::single(Role::Admin), Utc::now());

        // Reader reaches the reader area
        let response = app
            .clone()
            .oneshot(get_request("/api/reader/feed", Some(&reader)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        // Reader hitting the admin area: authenticated but lacking the
        // role, so 403
        let response = app
            .clone()
            .oneshot(get_request("/api/admin/users", Some(&reader)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        // Anonymous hitting the admin area: 401
        let response = app
            .clone()
            .oneshot(get_request("/api/admin/users", None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        // Admin passes
        let response = app
            .oneshot(get_request("/api/admin/users", Some(&admin)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_admin_user_lookup_and_deletion() {
        let config = AuthConfig::with_random_secret();
        let (app, repo, codec) = test_app(&config);

        app.clone()
            .oneshot(json_request(
                "POST",
                "/api/auth/register",
                json!({"username": "alice", "email": "alice@example.com", "password": "correct horse battery"}),
            ))
            .await
            .unwrap();

        let admin = codec.issue("root", &RoleSet::single(Role::Admin), Utc::now());

        let response = app
            .clone()
            .oneshot(get_request("/api/admin/users/alice", Some(&admin)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["username"], "alice");
        assert_eq!(body["federated"], false);

        let delete = Request::builder()
            .method("DELETE")
            .uri("/api/admin/users/alice")
            .header(header::AUTHORIZATION, format!("Bearer {admin}"))
            .body(Body::empty())
            .unwrap();
        let response = app.clone().oneshot(delete).await.unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert_eq!(repo.count(), 0);

        // Both lookup and repeated deletion observe the missing user
        let response = app
            .oneshot(get_request("/api/admin/users/alice", Some(&admin)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_expired_token_rejected() {
        let config = AuthConfig::with_random_secret();
        let (app, _, codec) = test_app(&config);

        let issued_at = Utc::now() - ChronoDuration::hours(3);
        let token = codec.issue("alice", &RoleSet::single(Role::Reader), issued_at);

        let response = app
            .oneshot(get_request("/api/profile", Some(&token)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_tampered_token_rejected() {
        let config = AuthConfig::with_random_secret();
        let (app, _, codec) = test_app(&config);

        let token = codec.issue("alice", &RoleSet::single(Role::Reader), Utc::now());
        let tampered = format!("{}A", &token[..token.len() - 1]);

        let response = app
            .oneshot(get_request("/api/profile", Some(&tampered)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_invalid_token_rejected_even_on_public_route() {
        let config = AuthConfig::with_random_secret();
        let (app, _, _) = test_app(&config);

        let mut request = json_request(
            "POST",
            "/api/auth/login",
            json!({"username": "alice", "password": "whatever it is"}),
        );
        request.headers_mut().insert(
            header::AUTHORIZATION,
            "Bearer not.a.token".parse().unwrap(),
        );

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_duplicate_registration_conflict() {
        let config = AuthConfig::with_random_secret();
        let (app, _, _) = test_app(&config);

        let register = json!({"username": "alice", "email": "alice@example.com", "password": "correct horse battery"});

        let response = app
            .clone()
            .oneshot(json_request("POST", "/api/auth/register", register.clone()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let response = app
            .oneshot(json_request("POST", "/api/auth/register", register))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_federated_login_issues_token() {
        let config = AuthConfig::with_random_secret();
        let (app, repo, _) = test_app(&config);

        let request = json!({"provider": "google", "subject": "sub-7", "email": "eve@example.com"});

        let response = app
            .clone()
            .oneshot(json_request("POST", "/api/auth/federated", request.clone()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let first = body_json(response).await;

        let response = app
            .oneshot(json_request("POST", "/api/auth/federated", request))
            .await
            .unwrap();
        let second = body_json(response).await;

        assert_eq!(first["username"], second["username"]);
        assert_eq!(repo.count(), 1);
    }
}

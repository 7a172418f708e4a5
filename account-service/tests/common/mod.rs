use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Mutex;

use account_service::domain::user::errors::MailerError;
use account_service::domain::user::errors::UserError;
use account_service::domain::user::models::DisplayName;
use account_service::domain::user::models::EmailAddress;
use account_service::domain::user::models::NewUser;
use account_service::domain::user::models::User;
use account_service::domain::user::models::UserId;
use account_service::domain::user::models::VerificationToken;
use account_service::domain::user::ports::UserRepository;
use account_service::domain::user::ports::UserServicePort;
use account_service::domain::user::ports::VerificationMailer;
use account_service::domain::user::ports::VerificationTokenRepository;
use account_service::domain::user::service::UserService;
use account_service::inbound::http::router::create_router;
use async_trait::async_trait;
use auth::PasswordHasher;
use auth::Role;
use auth::TokenService;
use chrono::Duration;
use chrono::Utc;

/// Signing secret shared by the spawned server and tokens minted in tests.
pub const TEST_JWT_SECRET: &[u8] = b"test-secret-key-for-jwt-signing-at-least-32-bytes";

/// In-memory user store backing the spawned server.
///
/// Tests reach through it to seed accounts and to look up generated ids
/// without going over HTTP.
pub struct InMemoryUserRepository {
    state: Mutex<UserStoreState>,
}

struct UserStoreState {
    next_id: i64,
    users: HashMap<i64, User>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(UserStoreState {
                next_id: 1,
                users: HashMap::new(),
            }),
        }
    }

    /// Insert a user directly, bypassing registration.
    pub fn insert_user(
        &self,
        name: &str,
        email: &str,
        password_hash: String,
        role: Role,
        email_verified: bool,
    ) -> User {
        let mut state = self.state.lock().unwrap();
        let id = state.next_id;
        state.next_id += 1;

        let user = User {
            id: UserId(id),
            name: DisplayName::new(name.to_string()).expect("Invalid test display name"),
            email: EmailAddress::new(email.to_string()).expect("Invalid test email"),
            password_hash,
            role,
            email_verified,
            created_at: Utc::now(),
        };
        state.users.insert(id, user.clone());
        user
    }

    /// Look up a stored user by email address.
    pub fn user_by_email(&self, email: &str) -> Option<User> {
        let state = self.state.lock().unwrap();
        state
            .users
            .values()
            .find(|user| user.email.as_str() == email)
            .cloned()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: NewUser) -> Result<User, UserError> {
        // Uniqueness check and insert happen under one lock, like the
        // database constraint they stand in for.
        let mut state = self.state.lock().unwrap();
        if state
            .users
            .values()
            .any(|existing| existing.email == user.email)
        {
            return Err(UserError::EmailAlreadyRegistered(
                user.email.as_str().to_string(),
            ));
        }

        let id = state.next_id;
        state.next_id += 1;

        let created = User {
            id: UserId(id),
            name: user.name,
            email: user.email,
            password_hash: user.password_hash,
            role: user.role,
            email_verified: false,
            created_at: Utc::now(),
        };
        state.users.insert(id, created.clone());
        Ok(created)
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError> {
        let state = self.state.lock().unwrap();
        Ok(state.users.get(&id.0).cloned())
    }

    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<User>, UserError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .users
            .values()
            .find(|user| &user.email == email)
            .cloned())
    }

    async fn mark_email_verified(&self, id: &UserId) -> Result<(), UserError> {
        let mut state = self.state.lock().unwrap();
        match state.users.get_mut(&id.0) {
            Some(user) => {
                user.email_verified = true;
                Ok(())
            }
            None => Err(UserError::NotFound(id.to_string())),
        }
    }
}

/// In-memory verification token store with single-use redemption.
pub struct InMemoryVerificationTokenRepository {
    tokens: Mutex<HashMap<String, VerificationToken>>,
}

impl InMemoryVerificationTokenRepository {
    pub fn new() -> Self {
        Self {
            tokens: Mutex::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl VerificationTokenRepository for InMemoryVerificationTokenRepository {
    async fn store(&self, token: &VerificationToken) -> Result<(), UserError> {
        let mut tokens = self.tokens.lock().unwrap();
        tokens.insert(token.token.clone(), token.clone());
        Ok(())
    }

    async fn consume(&self, token: &str) -> Result<Option<UserId>, UserError> {
        // Removal before the expiry check keeps redemption single-use.
        let mut tokens = self.tokens.lock().unwrap();
        match tokens.remove(token) {
            Some(stored) if !stored.is_expired(Utc::now()) => Ok(Some(stored.user_id)),
            _ => Ok(None),
        }
    }
}

/// Mailer that records verification tokens instead of sending mail.
pub struct RecordingMailer {
    sent: Mutex<Vec<(String, String)>>,
}

impl RecordingMailer {
    pub fn new() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
        }
    }

    /// Most recent verification token recorded for the given address.
    pub fn last_token_for(&self, email: &str) -> Option<String> {
        let sent = self.sent.lock().unwrap();
        sent.iter()
            .rev()
            .find(|(recipient, _)| recipient == email)
            .map(|(_, token)| token.clone())
    }
}

#[async_trait]
impl VerificationMailer for RecordingMailer {
    async fn send_verification(
        &self,
        email: &EmailAddress,
        token: &str,
    ) -> Result<(), MailerError> {
        let mut sent = self.sent.lock().unwrap();
        sent.push((email.as_str().to_string(), token.to_string()));
        Ok(())
    }
}

/// Test application that spawns a real server
pub struct TestApp {
    pub address: String,
    pub api_client: reqwest::Client,
    pub users: Arc<InMemoryUserRepository>,
    pub verification_tokens: Arc<InMemoryVerificationTokenRepository>,
    pub mailer: Arc<RecordingMailer>,
    pub token_service: Arc<TokenService>,
}

impl TestApp {
    /// Spawn the application in a background task and return TestApp
    pub async fn spawn() -> Self {
        // Use random port (0 = OS assigns)
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        // Create adapters
        let users = Arc::new(InMemoryUserRepository::new());
        let verification_tokens = Arc::new(InMemoryVerificationTokenRepository::new());
        let mailer = Arc::new(RecordingMailer::new());

        let token_service = Arc::new(TokenService::new(TEST_JWT_SECRET, Duration::hours(24)));

        // Create service
        let account_service: Arc<dyn UserServicePort> = Arc::new(UserService::new(
            Arc::clone(&users),
            Arc::clone(&verification_tokens),
            Arc::clone(&mailer),
            Arc::clone(&token_service),
            Duration::hours(24),
        ));

        // Create router
        let router = create_router(account_service, Arc::clone(&token_service));

        // Spawn server in background
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Server error");
        });

        Self {
            address,
            api_client: reqwest::Client::new(),
            users,
            verification_tokens,
            mailer,
            token_service,
        }
    }

    /// Helper to make GET request
    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.get(format!("{}{}", self.address, path))
    }

    /// Helper to make POST request
    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.post(format!("{}{}", self.address, path))
    }

    /// Helper to make GET request with Bearer token
    pub fn get_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.get(path).bearer_auth(token)
    }

    /// Submit a registration request
    pub async fn register(&self, name: &str, email: &str, password: &str) -> reqwest::Response {
        self.post("/api/auth/register")
            .json(&serde_json::json!({
                "name": name,
                "email": email,
                "password": password,
            }))
            .send()
            .await
            .expect("Failed to execute register request")
    }

    /// Submit a login request
    pub async fn login(&self, email: &str, password: &str) -> reqwest::Response {
        self.post("/api/auth/login")
            .json(&serde_json::json!({
                "email": email,
                "password": password,
            }))
            .send()
            .await
            .expect("Failed to execute login request")
    }

    /// Log in and return the issued access token, asserting success
    pub async fn login_token(&self, email: &str, password: &str) -> String {
        let response = self.login(email, password).await;
        assert_eq!(response.status(), reqwest::StatusCode::OK);

        let body: serde_json::Value = response.json().await.expect("Failed to parse login body");
        body["data"]["token"]
            .as_str()
            .expect("Login response missing token")
            .to_string()
    }

    /// Redeem the most recent verification token mailed to the address
    pub async fn verify_latest_token(&self, email: &str) -> reqwest::Response {
        let token = self
            .mailer
            .last_token_for(email)
            .expect("No verification token recorded for address");

        self.get(&format!("/api/auth/verify-email/{}", token))
            .send()
            .await
            .expect("Failed to execute verify request")
    }

    /// Register an account and redeem its verification token
    pub async fn register_verified(&self, name: &str, email: &str, password: &str) {
        let response = self.register(name, email, password).await;
        assert_eq!(response.status(), reqwest::StatusCode::CREATED);

        let response = self.verify_latest_token(email).await;
        assert_eq!(response.status(), reqwest::StatusCode::OK);
    }

    /// Seed an admin account directly in the store
    pub fn seed_admin(&self, name: &str, email: &str, password: &str) -> User {
        let password_hash = PasswordHasher::new()
            .hash(password)
            .expect("Failed to hash test password");
        self.users
            .insert_user(name, email, password_hash, Role::Admin, true)
    }
}

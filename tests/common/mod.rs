//! Common test utilities for integration tests

#![allow(dead_code)]

use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use axum_test::{TestServer, TestServerConfig};
use tower_cookies::Key;

use phoneauth::{
    routes, AppState, InMemorySessionStore, InMemoryUserStore, SmsError, SmsSender,
};

/// Signing-key material for tests (>= 32 bytes)
const TEST_SECRET: &[u8] = b"integration-test-secret-key-material-0123456789";

/// Mock SMS sender that captures message bodies and can be made to fail
#[derive(Default, Clone)]
pub struct MockSmsSender {
    /// Captured (phone, body) pairs
    pub sent: Arc<RwLock<Vec<(String, String)>>>,
    failure: Arc<RwLock<Option<SmsError>>>,
}

impl MockSmsSender {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the last OTP code sent to a phone number
    pub fn get_code(&self, phone: &str) -> Option<String> {
        self.sent
            .read()
            .unwrap()
            .iter()
            .rev()
            .find(|(p, _)| p == phone)
            .map(|(_, body)| body.rsplit(' ').next().unwrap().to_string())
    }

    pub fn sent_count(&self) -> usize {
        self.sent.read().unwrap().len()
    }

    /// Make every subsequent send fail with the given error
    pub fn fail_with(&self, error: SmsError) {
        *self.failure.write().unwrap() = Some(error);
    }
}

#[async_trait]
impl SmsSender for MockSmsSender {
    async fn send(&self, phone: &str, body: &str) -> Result<(), SmsError> {
        if let Some(error) = self.failure.read().unwrap().clone() {
            return Err(error);
        }
        self.sent
            .write()
            .unwrap()
            .push((phone.to_string(), body.to_string()));
        Ok(())
    }
}

/// Create a test server with a mock SMS sender and a reachable session store
pub fn create_test_server() -> (TestServer, MockSmsSender, Arc<InMemorySessionStore>) {
    let sms_sender = MockSmsSender::new();
    let session_store = Arc::new(InMemorySessionStore::new());

    let state = Arc::new(AppState::new(
        InMemoryUserStore::new(),
        session_store.clone(),
        sms_sender.clone(),
        Key::derive_from(TEST_SECRET),
    ));

    let app = routes::create_router(state);
    let config = TestServerConfig::builder().save_cookies().build();
    let server = TestServer::new_with_config(app, config).expect("Failed to create test server");

    (server, sms_sender, session_store)
}

/// Register a user and assert the redirect back to login
pub async fn register_user(server: &TestServer, username: &str, password: &str, phone: &str) {
    let response = server
        .post("/register")
        .form(&[
            ("username", username),
            ("password", password),
            ("phone", phone),
        ])
        .await;
    assert_eq!(response.status_code(), 303);
    assert_eq!(response.header("location"), "/login");
}

/// Submit credentials; returns the redirect target
pub async fn submit_login(server: &TestServer, username: &str, password: &str) -> String {
    let response = server
        .post("/login")
        .form(&[("username", username), ("password", password)])
        .await;
    assert_eq!(response.status_code(), 303);
    response.header("location").to_str().unwrap().to_string()
}

/// Run the full register → login → verify flow to an authenticated session
pub async fn authenticate(
    server: &TestServer,
    sms_sender: &MockSmsSender,
    username: &str,
    password: &str,
    phone: &str,
) {
    register_user(server, username, password, phone).await;

    let target = submit_login(server, username, password).await;
    assert_eq!(target, "/verify");

    let code = sms_sender.get_code(phone).expect("No OTP sent");
    let response = server.post("/verify").form(&[("code", code.as_str())]).await;
    assert_eq!(response.status_code(), 303);
    assert_eq!(response.header("location"), "/dashboard");
}

/// Fetch a page and return its body text (flash notices render here)
pub async fn page_text(server: &TestServer, path: &str) -> String {
    let response = server.get(path).await;
    assert_eq!(response.status_code(), 200);
    response.text()
}

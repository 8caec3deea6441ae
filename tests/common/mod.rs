use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use tokio::net::TcpListener;

use hostbook::identity::SessionManager;
use hostbook::server::{self, AppState};
use hostbook::store::MemoryStore;

pub struct TestServer {
    pub url: String,
    #[allow(dead_code)]
    pub addr: SocketAddr,
}

impl TestServer {
    pub async fn start() -> Self {
        Self::start_custom(Duration::from_secs(3600), 100).await
    }

    #[allow(dead_code)]
    pub async fn start_custom(session_ttl: Duration, list_limit: usize) -> Self {
        let store = Arc::new(MemoryStore::new());
        let state = AppState {
            users: store.clone(),
            servers: store,
            sessions: Arc::new(SessionManager::new(session_ttl)),
            list_limit,
        };
        let app = server::router(state);

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        // Give server a moment to start
        tokio::time::sleep(Duration::from_millis(100)).await;

        Self {
            url: format!("http://{addr}"),
            addr,
        }
    }
}

/// Register a fresh account and return a bearer token for it.
#[allow(dead_code)]
pub async fn register_and_login(client: &Client, url: &str, email: &str, password: &str) -> String {
    let res = client
        .post(format!("{url}/register"))
        .json(&serde_json::json!({"email": email, "password": password}))
        .send()
        .await
        .expect("register request");
    assert_eq!(res.status(), 200, "register should succeed for {email}");

    let res = client
        .post(format!("{url}/login"))
        .form(&[("username", email), ("password", password)])
        .send()
        .await
        .expect("login request");
    assert_eq!(res.status(), 200, "login should succeed for {email}");

    let body: serde_json::Value = res.json().await.expect("token body");
    assert_eq!(body["token_type"], "bearer");
    body["access_token"].as_str().expect("access_token").to_string()
}

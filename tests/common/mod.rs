#![allow(dead_code)]

use std::process::{Child, Command, Stdio};
use std::sync::OnceLock;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};

static SERVER: OnceLock<TestServer> = OnceLock::new();

/// Accounts with this email are created as administrators by the test server.
pub const ADMIN_EMAIL: &str = "admin@vetclinic.test";
pub const PASSWORD: &str = "correct horse battery";

pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    child: Child,
}

impl TestServer {
    fn spawn() -> Result<Self> {
        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        // Cargo builds the server binary before running integration tests
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_vetclinic-api"));
        cmd.env("PORT", port.to_string())
            .env("HOST", "127.0.0.1")
            .env("APP_ENV", "development")
            .env("ADMIN_EMAILS", ADMIN_EMAIL)
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());

        // DATABASE_URL is inherited (or read from .env by the server)
        let child = cmd.spawn().context("failed to spawn server binary")?;

        Ok(Self { port, base_url, child })
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let client = Client::new();
        let deadline = Instant::now() + timeout;
        loop {
            if Instant::now() > deadline {
                break;
            }
            let url = format!("{}/health", self.base_url);
            if let Ok(resp) = client.get(&url).send().await {
                if resp.status() == StatusCode::OK || resp.status() == StatusCode::SERVICE_UNAVAILABLE {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(150)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

/// These tests need a real Postgres; without one they pass vacuously.
pub fn database_configured() -> bool {
    let _ = dotenvy::dotenv();
    std::env::var("DATABASE_URL").map(|v| !v.is_empty()).unwrap_or(false)
}

pub async fn ensure_server() -> Result<&'static TestServer> {
    let server = SERVER.get_or_init(|| TestServer::spawn().expect("failed to spawn server binary"));
    server.wait_ready(Duration::from_secs(15)).await?;
    Ok(server)
}

pub fn unique_email(prefix: &str) -> String {
    format!("{}-{}@vetclinic.test", prefix, uuid::Uuid::new_v4().simple())
}

/// A cookie-holding client signed in as `email`, created on first use.
pub async fn signed_in(server: &TestServer, email: &str) -> Result<Client> {
    let client = Client::builder().cookie_store(true).build()?;
    let res = client
        .post(server.url("/api/auth/sign-up/email"))
        .json(&json!({ "name": "Test User", "email": email, "password": PASSWORD }))
        .send()
        .await?;

    if res.status() == StatusCode::CONFLICT {
        let res = client
            .post(server.url("/api/auth/sign-in/email"))
            .json(&json!({ "email": email, "password": PASSWORD }))
            .send()
            .await?;
        anyhow::ensure!(res.status() == StatusCode::OK, "sign-in failed: {}", res.status());
    } else {
        anyhow::ensure!(res.status() == StatusCode::CREATED, "sign-up failed: {}", res.status());
    }
    Ok(client)
}

pub async fn admin(server: &TestServer) -> Result<Client> {
    signed_in(server, ADMIN_EMAIL).await
}

pub async fn user(server: &TestServer) -> Result<Client> {
    signed_in(server, &unique_email("user")).await
}

pub async fn create_pet(server: &TestServer, client: &Client, name: &str, species: &str) -> Result<Value> {
    let res = client
        .post(server.url("/api/pets"))
        .json(&json!({ "name": name, "species": species }))
        .send()
        .await?;
    anyhow::ensure!(res.status() == StatusCode::CREATED, "pet create failed: {}", res.status());
    Ok(res.json().await?)
}

#![allow(dead_code)]

use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{RequestBuilder, Response, StatusCode};
use serde_json::{json, Value};

use blood_donation_api::auth::{AuthError, IdentityVerifier, VerifiedIdentity};
use blood_donation_api::config::AppConfig;
use blood_donation_api::database::memory::{MemoryDonorRepository, MemoryRequestRepository};
use blood_donation_api::database::models::Donor;
use blood_donation_api::database::DonorRepository;
use blood_donation_api::types::Role;
use blood_donation_api::AppState;

/// Accepts tokens of the form `token-<local part>` and maps them to
/// `<local part>@example.com`. Anything else is rejected.
struct StubVerifier;

#[async_trait]
impl IdentityVerifier for StubVerifier {
    async fn verify(&self, token: &str) -> Result<VerifiedIdentity, AuthError> {
        let name = token
            .strip_prefix("token-")
            .filter(|n| !n.is_empty())
            .ok_or_else(|| AuthError::InvalidClaims("unknown test token".to_string()))?;
        Ok(VerifiedIdentity {
            uid: format!("uid-{}", name),
            email: email(name),
        })
    }
}

pub fn email(name: &str) -> String {
    format!("{}@example.com", name)
}

pub fn token(name: &str) -> String {
    format!("token-{}", name)
}

/// One server per test, each with its own empty memory store
pub struct TestServer {
    pub base_url: String,
    pub client: reqwest::Client,
    donors: Arc<MemoryDonorRepository>,
}

impl TestServer {
    pub async fn spawn() -> Result<Self> {
        let donors = Arc::new(MemoryDonorRepository::new());
        let state = AppState::new(
            donors.clone(),
            Arc::new(MemoryRequestRepository::new()),
            Arc::new(StubVerifier),
        );

        let mut config = AppConfig::development();
        config.api.enable_request_logging = false;
        let app = blood_donation_api::app(state, &config);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .context("failed to bind test listener")?;
        let addr = listener.local_addr()?;

        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Ok(Self {
            base_url: format!("http://{}", addr),
            client: reqwest::Client::new(),
            donors,
        })
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub fn get(&self, path: &str) -> RequestBuilder {
        self.client.get(self.url(path))
    }

    pub fn post(&self, path: &str) -> RequestBuilder {
        self.client.post(self.url(path))
    }

    pub fn put(&self, path: &str) -> RequestBuilder {
        self.client.put(self.url(path))
    }

    pub fn patch(&self, path: &str) -> RequestBuilder {
        self.client.patch(self.url(path))
    }

    pub fn delete(&self, path: &str) -> RequestBuilder {
        self.client.delete(self.url(path))
    }

    /// Register a donor over HTTP and return its id
    pub async fn register_donor(&self, name: &str, blood_group: &str, district: &str) -> Result<String> {
        let res = self
            .post("/donors")
            .json(&json!({
                "name": name,
                "email": email(name),
                "district": district,
                "upazila": "Savar",
                "bloodGroup": blood_group,
                "image": "https://img.example.com/a.png"
            }))
            .send()
            .await?;
        inserted_id(res).await
    }

    /// Register a donor and promote it to admin directly in the store
    pub async fn register_admin(&self, name: &str) -> Result<String> {
        let id = self.register_donor(name, "AB+", "Dhaka").await?;
        let id_uuid = id.parse().context("inserted id is not a uuid")?;
        self.donors.set_role(id_uuid, Role::Admin).await?;
        Ok(id)
    }

    pub async fn donor_by_email(&self, address: &str) -> Result<Option<Donor>> {
        Ok(self.donors.find_by_email(address).await?)
    }

    pub async fn open_request(&self, requester: &str) -> Result<String> {
        let res = self.post("/requests").json(&request_body(requester)).send().await?;
        inserted_id(res).await
    }
}

pub fn request_body(requester: &str) -> Value {
    json!({
        "requesterName": requester,
        "requesterEmail": email(requester),
        "recipientName": "Karim",
        "hospitalName": "Dhaka Medical College Hospital",
        "address": "Bakshibazar, Dhaka",
        "donationDate": "2026-11-02",
        "donationTime": "10:30",
        "message": "Urgent surgery",
        "bloodGroup": "B+",
        "district": "Dhaka",
        "upazila": "Lalbagh"
    })
}

pub async fn inserted_id(res: Response) -> Result<String> {
    let status = res.status();
    let body: Value = res.json().await?;
    anyhow::ensure!(status == StatusCode::CREATED, "insert failed with {}: {}", status, body);
    anyhow::ensure!(body["acknowledged"] == true, "insert not acknowledged: {}", body);
    body["insertedId"]
        .as_str()
        .map(str::to_string)
        .context("insert ack has no insertedId")
}

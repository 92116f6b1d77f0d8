mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};

use common::{email, token, TestServer};

#[tokio::test]
async fn created_donor_appears_in_listing() -> Result<()> {
    let server = TestServer::spawn().await?;
    let id = server.register_donor("rahim", "O+", "Dhaka").await?;

    let res = server.get("/donors").send().await?;
    assert_eq!(res.status(), StatusCode::OK);

    let donors: Vec<Value> = res.json().await?;
    assert_eq!(donors.len(), 1);
    assert_eq!(donors[0]["id"], id);
    assert_eq!(donors[0]["email"], email("rahim"));
    assert_eq!(donors[0]["bloodGroup"], "O+");
    assert_eq!(donors[0]["role"], "donor");
    assert_eq!(donors[0]["status"], "active");
    Ok(())
}

#[tokio::test]
async fn role_and_status_in_registration_are_rejected() -> Result<()> {
    let server = TestServer::spawn().await?;

    let res = server
        .post("/donors")
        .json(&json!({
            "name": "Mallory",
            "email": email("mallory"),
            "district": "Dhaka",
            "upazila": "Savar",
            "bloodGroup": "A+",
            "role": "admin"
        }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let body: Value = res.json().await?;
    assert_eq!(body["code"], "INVALID_JSON");
    assert!(server.donor_by_email(&email("mallory")).await?.is_none());
    Ok(())
}

#[tokio::test]
async fn invalid_fields_are_reported_per_field() -> Result<()> {
    let server = TestServer::spawn().await?;

    let res = server
        .post("/donors")
        .json(&json!({
            "name": "",
            "email": "not-an-email",
            "district": "Dhaka",
            "upazila": "Savar",
            "bloodGroup": "Q+"
        }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let body: Value = res.json().await?;
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert!(body["field_errors"]["name"].is_string());
    assert!(body["field_errors"]["email"].is_string());
    assert!(body["field_errors"]["bloodGroup"].is_string());
    Ok(())
}

#[tokio::test]
async fn duplicate_email_is_409() -> Result<()> {
    let server = TestServer::spawn().await?;
    server.register_donor("rahim", "O+", "Dhaka").await?;

    let res = server
        .post("/donors")
        .json(&json!({
            "name": "Rahim Again",
            "email": email("rahim"),
            "district": "Khulna",
            "upazila": "Sadar",
            "bloodGroup": "A-"
        }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CONFLICT);
    Ok(())
}

#[tokio::test]
async fn filters_by_blood_group() -> Result<()> {
    let server = TestServer::spawn().await?;
    server.register_donor("rahim", "O+", "Dhaka").await?;
    server.register_donor("karim", "O-", "Dhaka").await?;
    server.register_donor("salma", "O+", "Sylhet").await?;

    let donors: Vec<Value> = server
        .get("/donors")
        .query(&[("bloodGroup", "O+")])
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(donors.len(), 2);
    assert!(donors.iter().all(|d| d["bloodGroup"] == "O+"));

    let donors: Vec<Value> = server
        .get("/donors")
        .query(&[("bloodGroup", "O+"), ("district", "Sylhet")])
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(donors.len(), 1);
    assert_eq!(donors[0]["email"], email("salma"));
    Ok(())
}

#[tokio::test]
async fn filters_by_email() -> Result<()> {
    let server = TestServer::spawn().await?;
    server.register_donor("rahim", "O+", "Dhaka").await?;
    server.register_donor("karim", "O-", "Dhaka").await?;

    let donors: Vec<Value> = server
        .get("/donors")
        .query(&[("email", email("karim"))])
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(donors.len(), 1);
    assert_eq!(donors[0]["bloodGroup"], "O-");
    Ok(())
}

#[tokio::test]
async fn search_without_criteria_is_empty() -> Result<()> {
    let server = TestServer::spawn().await?;
    server.register_donor("rahim", "O+", "Dhaka").await?;

    let res = server.get("/donors/search").send().await?;
    assert_eq!(res.status(), StatusCode::OK);
    let donors: Vec<Value> = res.json().await?;
    assert!(donors.is_empty());

    // blank values count as absent
    let donors: Vec<Value> = server
        .get("/donors/search")
        .query(&[("district", "")])
        .send()
        .await?
        .json()
        .await?;
    assert!(donors.is_empty());
    Ok(())
}

#[tokio::test]
async fn search_matches_location() -> Result<()> {
    let server = TestServer::spawn().await?;
    server.register_donor("rahim", "O+", "Dhaka").await?;
    server.register_donor("salma", "B+", "Sylhet").await?;

    let donors: Vec<Value> = server
        .get("/donors/search")
        .query(&[("district", "Sylhet")])
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(donors.len(), 1);
    assert_eq!(donors[0]["email"], email("salma"));
    Ok(())
}

#[tokio::test]
async fn profile_update_replaces_fields() -> Result<()> {
    let server = TestServer::spawn().await?;
    let id = server.register_donor("rahim", "O+", "Dhaka").await?;
    let before = server.donor_by_email(&email("rahim")).await?.expect("registered");

    let res = server
        .put(&format!("/donors/{}", id))
        .json(&json!({
            "name": "Rahim Uddin",
            "email": email("rahim"),
            "district": "Gazipur",
            "upazila": "Tongi",
            "bloodGroup": "O+",
            "image": "https://img.example.com/new.png"
        }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    let ack: Value = res.json().await?;
    assert_eq!(ack, json!({ "acknowledged": true, "matchedCount": 1, "modifiedCount": 1 }));

    let after = server.donor_by_email(&email("rahim")).await?.expect("still registered");
    assert_eq!(after.name, "Rahim Uddin");
    assert_eq!(after.district, "Gazipur");
    assert_eq!(after.created_at, before.created_at);
    assert!(after.modified_at >= before.modified_at);
    Ok(())
}

#[tokio::test]
async fn malformed_id_is_400() -> Result<()> {
    let server = TestServer::spawn().await?;

    let res = server
        .put("/donors/64f1c2a9e4b0")
        .json(&json!({
            "name": "Rahim",
            "email": email("rahim"),
            "district": "Dhaka",
            "upazila": "Savar",
            "bloodGroup": "O+"
        }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let body: Value = res.json().await?;
    assert_eq!(body["code"], "BAD_REQUEST");
    Ok(())
}

#[tokio::test]
async fn admin_can_block_and_promote() -> Result<()> {
    let server = TestServer::spawn().await?;
    server.register_admin("nasrin").await?;
    let id = server.register_donor("rahim", "O+", "Dhaka").await?;

    let res = server
        .patch(&format!("/donors/{}/status", id))
        .bearer_auth(token("nasrin"))
        .json(&json!({ "status": "blocked" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    let res = server
        .patch(&format!("/donors/{}/role", id))
        .bearer_auth(token("nasrin"))
        .json(&json!({ "role": "admin" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    let donor = server.donor_by_email(&email("rahim")).await?.expect("registered");
    assert_eq!(donor.status.as_str(), "blocked");
    assert_eq!(donor.role.as_str(), "admin");
    Ok(())
}

#[tokio::test]
async fn unknown_status_value_is_rejected() -> Result<()> {
    let server = TestServer::spawn().await?;
    server.register_admin("nasrin").await?;
    let id = server.register_donor("rahim", "O+", "Dhaka").await?;

    let res = server
        .patch(&format!("/donors/{}/status", id))
        .bearer_auth(token("nasrin"))
        .json(&json!({ "status": "suspended" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let donor = server.donor_by_email(&email("rahim")).await?.expect("registered");
    assert_eq!(donor.status.as_str(), "active");
    Ok(())
}

#[tokio::test]
async fn patch_on_unknown_donor_matches_nothing() -> Result<()> {
    let server = TestServer::spawn().await?;
    server.register_admin("nasrin").await?;

    let res = server
        .patch("/donors/00000000-0000-4000-8000-000000000000/status")
        .bearer_auth(token("nasrin"))
        .json(&json!({ "status": "blocked" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    let ack: Value = res.json().await?;
    assert_eq!(ack["matchedCount"], 0);
    Ok(())
}

#[tokio::test]
async fn update_of_unknown_donor_with_taken_email_matches_nothing() -> Result<()> {
    let server = TestServer::spawn().await?;
    server.register_donor("rahim", "O+", "Dhaka").await?;

    let res = server
        .put("/donors/00000000-0000-4000-8000-000000000000")
        .json(&json!({
            "name": "Someone Else",
            "email": email("rahim"),
            "district": "Khulna",
            "upazila": "Sadar",
            "bloodGroup": "A-"
        }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    let ack: Value = res.json().await?;
    assert_eq!(ack, json!({ "acknowledged": true, "matchedCount": 0, "modifiedCount": 0 }));

    let donor = server.donor_by_email(&email("rahim")).await?.expect("still registered");
    assert_eq!(donor.district, "Dhaka");
    Ok(())
}

#[tokio::test]
async fn update_to_another_donors_email_is_409() -> Result<()> {
    let server = TestServer::spawn().await?;
    server.register_donor("rahim", "O+", "Dhaka").await?;
    let id = server.register_donor("karim", "O-", "Dhaka").await?;

    let res = server
        .put(&format!("/donors/{}", id))
        .json(&json!({
            "name": "Karim",
            "email": email("rahim"),
            "district": "Dhaka",
            "upazila": "Savar",
            "bloodGroup": "O-"
        }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CONFLICT);
    Ok(())
}

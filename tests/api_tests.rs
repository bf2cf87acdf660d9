//! API integration tests
//!
//! These run against a live server (`cargo test -- --ignored`).

use std::time::{SystemTime, UNIX_EPOCH};

use reqwest::{multipart, Client};
use serde_json::{json, Value};

const BASE_URL: &str = "http://localhost:3000/api";
const PASSWORD: &str = "Abcdef12";

/// Minimal valid-enough PNG payload for upload tests
const PNG_BYTES: &[u8] = &[
    0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D,
];

fn unique_email(tag: &str) -> String {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("Clock before epoch")
        .as_millis();
    format!("{}-{}@piquante.test", tag, millis)
}

/// Sign up a fresh account and log it in, returning (user_id, token)
async fn signup_and_login(client: &Client, email: &str) -> (String, String) {
    let response = client
        .post(format!("{}/auth/signup", BASE_URL))
        .json(&json!({ "email": email, "password": PASSWORD }))
        .send()
        .await
        .expect("Failed to send signup request");
    assert_eq!(response.status(), 201);

    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({ "email": email, "password": PASSWORD }))
        .send()
        .await
        .expect("Failed to send login request");
    assert_eq!(response.status(), 200);

    let body: Value = response.json().await.expect("Failed to parse login response");
    let user_id = body["userId"].as_str().expect("No userId in response").to_string();
    let token = body["token"].as_str().expect("No token in response").to_string();
    (user_id, token)
}

fn sauce_form(name: &str) -> multipart::Form {
    let payload = json!({
        "name": name,
        "manufacturer": "Test Labs",
        "description": "Integration test sauce",
        "mainPepper": "Habanero",
        "heat": 7
    });
    let image = multipart::Part::bytes(PNG_BYTES.to_vec())
        .file_name("test image.png")
        .mime_str("image/png")
        .expect("Invalid MIME type");
    multipart::Form::new()
        .text("sauce", payload.to_string())
        .part("image", image)
}

/// Create a sauce and return its id, located through the list endpoint
async fn create_sauce(client: &Client, token: &str, name: &str) -> String {
    let response = client
        .post(format!("{}/sauces", BASE_URL))
        .bearer_auth(token)
        .multipart(sauce_form(name))
        .send()
        .await
        .expect("Failed to send create request");
    assert_eq!(response.status(), 201);

    let response = client
        .get(format!("{}/sauces", BASE_URL))
        .bearer_auth(token)
        .send()
        .await
        .expect("Failed to send list request");
    assert_eq!(response.status(), 200);

    let sauces: Vec<Value> = response.json().await.expect("Failed to parse sauce list");
    sauces
        .iter()
        .find(|s| s["name"] == name)
        .and_then(|s| s["id"].as_str())
        .expect("Created sauce not found in list")
        .to_string()
}

#[tokio::test]
#[ignore] // Run with: cargo test -- --ignored
async fn test_health_check() {
    let client = Client::new();

    let response = client
        .get(format!("{}/health", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
#[ignore]
async fn test_signup_login_round_trip() {
    let client = Client::new();
    let email = unique_email("roundtrip");

    let (user_id, token) = signup_and_login(&client, &email).await;
    assert!(!user_id.is_empty());
    assert!(!token.is_empty());

    // Wrong password is rejected
    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({ "email": email, "password": "Wrong123" }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 401);
}

#[tokio::test]
#[ignore]
async fn test_signup_rejects_weak_password() {
    let client = Client::new();

    for password in ["short1A", "nouppercase12", "NODIGITSXX", "Password123"] {
        let response = client
            .post(format!("{}/auth/signup", BASE_URL))
            .json(&json!({ "email": unique_email("weak"), "password": password }))
            .send()
            .await
            .expect("Failed to send request");
        assert_eq!(response.status(), 400, "password {:?} was accepted", password);
    }
}

#[tokio::test]
#[ignore]
async fn test_signup_rejects_invalid_email() {
    let client = Client::new();

    let response = client
        .post(format!("{}/auth/signup", BASE_URL))
        .json(&json!({ "email": "not-an-email", "password": PASSWORD }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 400);
}

#[tokio::test]
#[ignore]
async fn test_signup_rejects_duplicate_email() {
    let client = Client::new();
    let email = unique_email("duplicate");

    let (_, _) = signup_and_login(&client, &email).await;

    let response = client
        .post(format!("{}/auth/signup", BASE_URL))
        .json(&json!({ "email": email, "password": "Other1234" }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 400);

    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["error"].is_string());
}

#[tokio::test]
#[ignore]
async fn test_unauthorized_access() {
    let client = Client::new();

    let response = client
        .get(format!("{}/sauces", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 401);
}

#[tokio::test]
#[ignore]
async fn test_sauce_crud_and_reactions() {
    let client = Client::new();
    let (user_id, token) = signup_and_login(&client, &unique_email("crud")).await;

    let name = format!("Integration Fire {}", unique_email("n"));
    let sauce_id = create_sauce(&client, &token, &name).await;

    // Fresh sauce: owner set, counters at zero
    let sauce: Value = client
        .get(format!("{}/sauces/{}", BASE_URL, sauce_id))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse sauce");
    assert_eq!(sauce["userId"].as_str(), Some(user_id.as_str()));
    assert_eq!(sauce["likes"], 0);
    assert_eq!(sauce["dislikes"], 0);

    // Like it
    let response = client
        .post(format!("{}/sauces/{}/like", BASE_URL, sauce_id))
        .bearer_auth(&token)
        .json(&json!({ "userId": user_id, "like": 1 }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 201);

    let sauce: Value = client
        .get(format!("{}/sauces/{}", BASE_URL, sauce_id))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse sauce");
    assert_eq!(sauce["likes"], 1);
    assert!(sauce["usersLiked"]
        .as_array()
        .expect("usersLiked not an array")
        .iter()
        .any(|u| u.as_str() == Some(user_id.as_str())));

    // Withdraw the like
    let response = client
        .post(format!("{}/sauces/{}/like", BASE_URL, sauce_id))
        .bearer_auth(&token)
        .json(&json!({ "userId": user_id, "like": 0 }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 201);

    let sauce: Value = client
        .get(format!("{}/sauces/{}", BASE_URL, sauce_id))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse sauce");
    assert_eq!(sauce["likes"], 0);
    assert_eq!(sauce["usersLiked"].as_array().map(|a| a.len()), Some(0));

    // Withdrawing again changes nothing but still answers
    let response = client
        .post(format!("{}/sauces/{}/like", BASE_URL, sauce_id))
        .bearer_auth(&token)
        .json(&json!({ "userId": user_id, "like": 0 }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 200);

    // Out-of-range like values are rejected
    let response = client
        .post(format!("{}/sauces/{}/like", BASE_URL, sauce_id))
        .bearer_auth(&token)
        .json(&json!({ "userId": user_id, "like": 5 }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 400);

    // Update via plain JSON
    let response = client
        .put(format!("{}/sauces/{}", BASE_URL, sauce_id))
        .bearer_auth(&token)
        .json(&json!({
            "name": name,
            "manufacturer": "Test Labs",
            "description": "Now even hotter",
            "mainPepper": "Ghost Pepper",
            "heat": 9
        }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 201);

    // Delete and verify it is gone
    let response = client
        .delete(format!("{}/sauces/{}", BASE_URL, sauce_id))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 200);

    let response = client
        .get(format!("{}/sauces/{}", BASE_URL, sauce_id))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 404);
}

#[tokio::test]
#[ignore]
async fn test_mutations_forbidden_for_non_owner() {
    let client = Client::new();
    let (_, owner_token) = signup_and_login(&client, &unique_email("owner")).await;
    let (_, other_token) = signup_and_login(&client, &unique_email("other")).await;

    let name = format!("Guarded Sauce {}", unique_email("n"));
    let sauce_id = create_sauce(&client, &owner_token, &name).await;

    // Another user cannot update
    let response = client
        .put(format!("{}/sauces/{}", BASE_URL, sauce_id))
        .bearer_auth(&other_token)
        .json(&json!({
            "name": "Hijacked",
            "manufacturer": "Test Labs",
            "description": "Should not happen",
            "mainPepper": "Habanero",
            "heat": 1
        }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 403);

    // Another user cannot delete
    let response = client
        .delete(format!("{}/sauces/{}", BASE_URL, sauce_id))
        .bearer_auth(&other_token)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 403);

    // The sauce is untouched
    let sauce: Value = client
        .get(format!("{}/sauces/{}", BASE_URL, sauce_id))
        .bearer_auth(&owner_token)
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse sauce");
    assert_eq!(sauce["name"].as_str(), Some(name.as_str()));

    // Cleanup
    let _ = client
        .delete(format!("{}/sauces/{}", BASE_URL, sauce_id))
        .bearer_auth(&owner_token)
        .send()
        .await;
}

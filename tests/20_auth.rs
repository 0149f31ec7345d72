mod common;

use anyhow::Result;
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};

#[tokio::test]
async fn sign_up_session_and_sign_out() -> Result<()> {
    if !common::database_configured() {
        return Ok(());
    }
    let server = common::ensure_server().await?;
    let email = common::unique_email("auth");
    let client = common::signed_in(server, &email).await?;

    let session: Value = client
        .get(server.url("/api/auth/get-session"))
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(session["user"]["email"], email.as_str());
    assert_eq!(session["user"]["role"], "USER");
    assert!(session["user"].get("passwordHash").is_none());

    let res = client.post(server.url("/api/auth/sign-out")).send().await?;
    assert_eq!(res.status(), StatusCode::OK);

    let res = client.get(server.url("/api/pets/me")).send().await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn duplicate_sign_up_and_bad_password() -> Result<()> {
    if !common::database_configured() {
        return Ok(());
    }
    let server = common::ensure_server().await?;
    let email = common::unique_email("dup");
    common::signed_in(server, &email).await?;

    let anonymous = Client::new();
    let res = anonymous
        .post(server.url("/api/auth/sign-up/email"))
        .json(&json!({ "name": "Again", "email": email, "password": common::PASSWORD }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CONFLICT);

    let res = anonymous
        .post(server.url("/api/auth/sign-in/email"))
        .json(&json!({ "email": email, "password": "not the password" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body: Value = res.json().await?;
    assert_eq!(body["code"], "UNAUTHORIZED");
    Ok(())
}

#[tokio::test]
async fn bootstrap_admin_email_gets_admin_role() -> Result<()> {
    if !common::database_configured() {
        return Ok(());
    }
    let server = common::ensure_server().await?;
    let admin = common::admin(server).await?;

    let session: Value = admin
        .get(server.url("/api/auth/get-session"))
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(session["user"]["role"], "ADMIN");
    Ok(())
}

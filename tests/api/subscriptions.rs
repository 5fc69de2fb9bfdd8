use anyhow::Result;
use reqwest::StatusCode;
use serde_json::json;
use wiremock::{
    matchers::{any, body_json, header, method, path},
    Mock, ResponseTemplate,
};

use crate::helpers::{response_message, TestApp, TestProvider, TEST_API_KEY, TEST_GROUP_ID};

#[tokio::test]
async fn api_subscribe_created() -> Result<()> {
    let app = TestApp::spawn().await?;

    Mock::given(path("/subscribers"))
        .and(method("POST"))
        .and(header("Authorization", format!("Bearer {TEST_API_KEY}").as_str()))
        .and(header("Content-Type", "application/json"))
        .and(body_json(json!({
            "email": "le_guin@gmail.com",
            "groups": [TEST_GROUP_ID],
            "status": "active",
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": { "id": "1" } })))
        .expect(1)
        .mount(&app.provider_server)
        .await;

    let res = app
        .post_subscribe(&json!({ "email": "le_guin@gmail.com" }))
        .await?;

    assert_eq!(
        res.status(),
        StatusCode::CREATED,
        "Wrong response StatusCode: {}",
        res.status()
    );
    assert_eq!(response_message(res).await?, "Successfully subscribed!");

    Ok(())
}

#[tokio::test]
async fn api_subscribe_non_post_method_not_allowed() -> Result<()> {
    let app = TestApp::spawn().await?;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&app.provider_server)
        .await;

    for method in [
        reqwest::Method::GET,
        reqwest::Method::PUT,
        reqwest::Method::PATCH,
        reqwest::Method::DELETE,
    ] {
        let res = app
            .http_client
            .request(method.clone(), app.subscribe_url())
            .json(&json!({ "email": "le_guin@gmail.com" }))
            .send()
            .await?;

        assert_eq!(
            res.status(),
            StatusCode::METHOD_NOT_ALLOWED,
            "Wrong response: ({}); for method: {method}",
            res.status()
        );
        assert_eq!(response_message(res).await?, "Method Not Allowed");
    }

    Ok(())
}

#[tokio::test]
async fn api_subscribe_returns_a_400_when_email_is_invalid() -> Result<()> {
    let app = TestApp::spawn().await?;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&app.provider_server)
        .await;

    let cases = [
        (json!({ "email": "" }), "Empty email"),
        (json!({ "email": "not an email" }), "Whitespace"),
        (json!({ "email": "ursuladomain.com" }), "Missing @"),
        (json!({ "email": "ursula@domain" }), "Missing domain dot"),
        (json!({ "email": "@domain.com" }), "Missing local part"),
        (json!({ "email": null }), "Null email"),
        (json!({ "email": 42 }), "Numeric email"),
        (json!({}), "Missing email"),
    ];

    for (body, description) in cases {
        let res = app.post_subscribe(&body).await?;
        assert_eq!(
            res.status(),
            StatusCode::BAD_REQUEST,
            "The API did not return a 400 BAD REQUEST, the payload was: {description}"
        );
        assert_eq!(response_message(res).await?, "A valid email is required.");
    }

    Ok(())
}

#[tokio::test]
async fn api_subscribe_returns_a_400_when_body_is_not_json() -> Result<()> {
    let app = TestApp::spawn().await?;

    let res = app
        .http_client
        .post(app.subscribe_url())
        .header("Content-Type", "application/json")
        .body("email=le_guin@gmail.com")
        .send()
        .await?;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(response_message(res).await?, "A valid email is required.");

    Ok(())
}

#[tokio::test]
async fn api_subscribe_missing_config_is_server_error() -> Result<()> {
    let cases = [
        (
            TestProvider {
                api_key: None,
                ..Default::default()
            },
            "Missing api key",
        ),
        (
            TestProvider {
                group_id: None,
                ..Default::default()
            },
            "Missing group id",
        ),
        (
            TestProvider {
                api_key: Some(""),
                group_id: Some(""),
                url: None,
            },
            "Empty secrets",
        ),
    ];

    for (provider, description) in cases {
        let app = TestApp::spawn_with(provider).await?;

        Mock::given(any())
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&app.provider_server)
            .await;

        let res = app
            .post_subscribe(&json!({ "email": "le_guin@gmail.com" }))
            .await?;

        assert_eq!(
            res.status(),
            StatusCode::INTERNAL_SERVER_ERROR,
            "Wrong response for: {description}"
        );
        assert_eq!(response_message(res).await?, "Server configuration error.");
    }

    Ok(())
}

#[tokio::test]
async fn api_subscribe_forwards_provider_rejection() -> Result<()> {
    let app = TestApp::spawn().await?;

    Mock::given(path("/subscribers"))
        .respond_with(
            ResponseTemplate::new(422).set_body_json(json!({ "error": { "message": "X" } })),
        )
        .expect(1)
        .mount(&app.provider_server)
        .await;

    let res = app
        .post_subscribe(&json!({ "email": "le_guin@gmail.com" }))
        .await?;

    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(response_message(res).await?, "X");

    Ok(())
}

#[tokio::test]
async fn api_subscribe_provider_rejection_without_message_falls_back() -> Result<()> {
    let cases = [
        (
            ResponseTemplate::new(400).set_body_string("<html>nope</html>"),
            StatusCode::BAD_REQUEST,
        ),
        (
            ResponseTemplate::new(401).set_body_json(json!({ "message": "Unauthenticated." })),
            StatusCode::UNAUTHORIZED,
        ),
        (ResponseTemplate::new(502), StatusCode::BAD_GATEWAY),
    ];

    for (template, expected_status) in cases {
        let app = TestApp::spawn().await?;

        Mock::given(any())
            .respond_with(template)
            .expect(1)
            .mount(&app.provider_server)
            .await;

        let res = app
            .post_subscribe(&json!({ "email": "le_guin@gmail.com" }))
            .await?;

        assert_eq!(res.status(), expected_status);
        assert_eq!(
            response_message(res).await?,
            "Failed to subscribe due to an API error."
        );
    }

    Ok(())
}

#[tokio::test]
async fn api_subscribe_unreachable_provider_is_server_error() -> Result<()> {
    // Bind and drop to get a port nothing listens on.
    let listener = std::net::TcpListener::bind("127.0.0.1:0")?;
    let dead_addr = listener.local_addr()?;
    drop(listener);

    let app = TestApp::spawn_with(TestProvider {
        url: Some(format!("http://{dead_addr}/")),
        ..Default::default()
    })
    .await?;

    let res = app
        .post_subscribe(&json!({ "email": "le_guin@gmail.com" }))
        .await?;

    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        response_message(res).await?,
        "An internal server error occurred."
    );

    // The server is still up after a failed provider call.
    let res = app
        .http_client
        .get(format!("http://{}/health-check", app.addr))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    Ok(())
}

#[tokio::test]
async fn api_subscribe_same_request_twice_calls_provider_twice() -> Result<()> {
    let app = TestApp::spawn().await?;

    Mock::given(path("/subscribers"))
        .and(method("POST"))
        .respond_with(ResponseTemplate::new(201))
        .expect(2)
        .mount(&app.provider_server)
        .await;

    for _ in 0..2 {
        let res = app
            .post_subscribe(&json!({ "email": "le_guin@gmail.com" }))
            .await?;
        assert_eq!(res.status(), StatusCode::CREATED);
    }

    Ok(())
}

#[tokio::test]
async fn api_subscribe_error_responses_carry_a_request_id() -> Result<()> {
    let app = TestApp::spawn().await?;
    let misconfigured = TestApp::spawn_with(TestProvider {
        api_key: None,
        ..Default::default()
    })
    .await?;

    Mock::given(path("/subscribers"))
        .respond_with(
            ResponseTemplate::new(409).set_body_json(json!({ "error": { "message": "Taken" } })),
        )
        .mount(&app.provider_server)
        .await;

    let email = json!({ "email": "le_guin@gmail.com" });
    let responses = [
        (
            app.http_client.get(app.subscribe_url()).send().await?,
            StatusCode::METHOD_NOT_ALLOWED,
        ),
        (
            app.post_subscribe(&json!({ "email": "nope" })).await?,
            StatusCode::BAD_REQUEST,
        ),
        (
            misconfigured.post_subscribe(&email).await?,
            StatusCode::INTERNAL_SERVER_ERROR,
        ),
        (app.post_subscribe(&email).await?, StatusCode::CONFLICT),
    ];

    for (res, expected_status) in responses {
        assert_eq!(res.status(), expected_status);

        let req_id = res
            .headers()
            .get("x-request-id")
            .and_then(|id| id.to_str().ok())
            .map(str::to_string);
        assert!(
            req_id.is_some_and(|id| !id.is_empty()),
            "{expected_status} response is missing the x-request-id header"
        );

        // The mapped body survives alongside the header.
        assert!(!response_message(res).await?.is_empty());
    }

    Ok(())
}

mod common;

use actix_web::test;
use serde_json::{json, Value};

use common::TestApp;

fn prompt() -> Value {
    json!({
        "contents": [
            { "role": "user", "parts": [{ "text": "Suggest three stops in Ponta Delgada" }] }
        ]
    })
}

#[actix_rt::test]
async fn test_gemini_forwards_text() {
    let test_app = TestApp::with_reply("Try the pineapple greenhouses.");
    let app = test::init_service(test_app.create_app()).await;

    let req = test::TestRequest::post()
        .uri("/api/gemini")
        .set_json(&prompt())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({ "response": "Try the pineapple greenhouses." }));

    let calls = test_app.generator.calls.lock().unwrap();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].0[0].parts[0].text, "Suggest three stops in Ponta Delgada");
    assert!(!calls[0].1, "plain prompt should not carry a schema");
}

#[actix_rt::test]
async fn test_enhance_returns_parsed_plans() {
    let plans = json!([
        { "name": "Gruta do Carvão", "price": 7.5, "description": "Lava tube", "lat": 37.75, "longi": -25.68 },
        { "name": "Mercado da Graça", "price": 0, "description": "Market", "lat": 37.74, "longi": -25.67 }
    ]);
    let test_app = TestApp::with_reply(&plans.to_string());
    let app = test::init_service(test_app.create_app()).await;

    let req = test::TestRequest::post()
        .uri("/api/enhance")
        .set_json(&prompt())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body.as_array().unwrap().len(), 2);
    assert_eq!(body[0]["name"], "Gruta do Carvão");
    assert_eq!(body[1]["price"], 0.0);

    let calls = test_app.generator.calls.lock().unwrap();
    assert!(calls[0].1, "enhance should request schema output");
}

#[actix_rt::test]
async fn test_enhance_with_non_json_reply_is_upstream_error() {
    let test_app = TestApp::with_reply("Sorry, I can only answer in prose.");
    let app = test::init_service(test_app.create_app()).await;

    let req = test::TestRequest::post()
        .uri("/api/enhance")
        .set_json(&prompt())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 500);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Gemini returned invalid JSON");
    assert!(test_app.store.is_empty().await);
}

#[actix_rt::test]
async fn test_prompt_requires_contents_array() {
    let test_app = TestApp::new();
    let app = test::init_service(test_app.create_app()).await;

    for uri in ["/api/gemini", "/api/enhance"] {
        let req = test::TestRequest::post()
            .uri(uri)
            .set_json(&json!({}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 400);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "Invalid or missing `contents` array");

        let req = test::TestRequest::post()
            .uri(uri)
            .set_json(&json!({ "contents": "plan my trip" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 400);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "Invalid or missing `contents` array");
    }

    assert!(test_app.generator.calls.lock().unwrap().is_empty());
}

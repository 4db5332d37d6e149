use mockito::{Matcher, Server, ServerGuard};
use postergen_core::config::Config;
use postergen_core::{Error, PosterClient};
use serde_json::{Map, json};

fn client_for(server: &ServerGuard) -> PosterClient {
    let config = Config {
        api_base_url: server.url(),
        file_base_url: "http://localhost:8081".to_string(),
    };
    PosterClient::new(config).unwrap()
}

async fn server() -> ServerGuard {
    Server::new_async().await
}

#[test]
fn api_base_gains_trailing_slash() {
    let config = Config {
        api_base_url: "http://localhost:8081/api".to_string(),
        file_base_url: "http://localhost:8081".to_string(),
    };
    let client = PosterClient::new(config).unwrap();
    assert_eq!(client.api_base().as_str(), "http://localhost:8081/api/");
}

#[test]
fn file_url_joins_relative_path() {
    let config = Config {
        api_base_url: "http://localhost:8081/api".to_string(),
        file_base_url: "http://localhost:8081/".to_string(),
    };
    let client = PosterClient::new(config).unwrap();
    assert_eq!(
        client.file_url("files/out.pdf"),
        "http://localhost:8081/files/out.pdf"
    );
}

#[tokio::test]
async fn fetch_templates_reshapes_embedded_fields() {
    let mut server = server().await;
    let mock = server
        .mock("GET", "/posters/templates")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{
                "listdatapayload": {
                    "data": [
                        {
                            "id": 1,
                            "name": "Till Poster",
                            "required_fields": "[\"a\",\"b\"]",
                            "customization_data": "{\"c\":1}"
                        },
                        {"id": 2, "name": "Bare"}
                    ],
                    "pagination": null
                }
            }"#,
        )
        .create_async()
        .await;

    let templates = client_for(&server).fetch_templates().await.unwrap();

    mock.assert_async().await;
    assert_eq!(templates.len(), 2);
    assert_eq!(templates[0].required_fields, vec![json!("a"), json!("b")]);
    assert_eq!(templates[0].customization_data.get("c"), Some(&json!(1)));
    assert!(templates[1].required_fields.is_empty());
    assert!(templates[1].customization_data.is_empty());
}

#[tokio::test]
async fn fetch_templates_rejects_non_list_payload() {
    let mut server = server().await;
    server
        .mock("GET", "/posters/templates")
        .with_status(200)
        .with_body(r#"{"listdatapayload": {"data": {"id": 1}}}"#)
        .create_async()
        .await;

    let err = client_for(&server).fetch_templates().await.unwrap_err();
    match err {
        Error::Format(message) => assert_eq!(
            message,
            "Template data from the API is not in the expected format."
        ),
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn fetch_logos_returns_records_as_is() {
    let mut server = server().await;
    server
        .mock("GET", "/logos")
        .with_status(200)
        .with_body(r#"{"datapayload": {"data": [{"name": "mpesa"}, "plain"]}}"#)
        .create_async()
        .await;

    let logos = client_for(&server).fetch_logos().await.unwrap();
    assert_eq!(logos, vec![json!({"name": "mpesa"}), json!("plain")]);
}

#[tokio::test]
async fn fetch_logos_rejects_missing_payload() {
    let mut server = server().await;
    server
        .mock("GET", "/logos")
        .with_status(200)
        .with_body(r#"{"datapayload": {}}"#)
        .create_async()
        .await;

    let err = client_for(&server).fetch_logos().await.unwrap_err();
    match err {
        Error::Format(message) => {
            assert_eq!(message, "Logo data from the API is not in the expected format.")
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn error_body_message_passes_through() {
    let mut server = server().await;
    server
        .mock("GET", "/posters/templates")
        .with_status(500)
        .with_body(r#"{"message": "template engine down"}"#)
        .create_async()
        .await;

    let err = client_for(&server).fetch_templates().await.unwrap_err();
    assert_eq!(err.api_message(), Some("template engine down"));
}

#[tokio::test]
async fn unparsable_error_body_gets_fallback_message() {
    let mut server = server().await;
    server
        .mock("GET", "/logos")
        .with_status(502)
        .with_body("<html>bad gateway</html>")
        .create_async()
        .await;

    let err = client_for(&server).fetch_logos().await.unwrap_err();
    assert_eq!(err.api_message(), Some("An unknown network error occurred."));
}

#[tokio::test]
async fn error_body_without_message_gets_fallback() {
    let mut server = server().await;
    server
        .mock("GET", "/logos")
        .with_status(404)
        .with_body(r#"{"errorpayload": {"code": "NOT_FOUND"}}"#)
        .create_async()
        .await;

    let err = client_for(&server).fetch_logos().await.unwrap_err();
    assert_eq!(err.api_message(), Some("The server returned an error."));
}

#[tokio::test]
async fn empty_error_message_gets_fallback() {
    let mut server = server().await;
    server
        .mock("GET", "/logos")
        .with_status(500)
        .with_body(r#"{"message": ""}"#)
        .create_async()
        .await;

    let err = client_for(&server).fetch_logos().await.unwrap_err();
    assert_eq!(err.api_message(), Some("The server returned an error."));
}

#[tokio::test]
async fn malformed_success_body_is_a_parse_error() {
    let mut server = server().await;
    server
        .mock("GET", "/logos")
        .with_status(200)
        .with_body("not json")
        .create_async()
        .await;

    let err = client_for(&server).fetch_logos().await.unwrap_err();
    assert!(matches!(err, Error::Json(_)), "unexpected error: {err}");
}

#[tokio::test]
async fn generate_poster_resolves_pdf_url() {
    let mut server = server().await;
    let mock = server
        .mock("POST", "/posters/generate")
        .match_query(Matcher::UrlEncoded("template_id".into(), "3".into()))
        .match_body(Matcher::Json(json!({
            "business_name": "Acme",
            "data": {"till_number": "123"},
            "customization_data": {"primary_color": "#ff0000"}
        })))
        .with_status(201)
        .with_body(r#"{"datapayload": {"data": {"pdf_url": "files/out.pdf"}}}"#)
        .create_async()
        .await;

    let data: Map<_, _> = serde_json::from_value(json!({"till_number": "123"})).unwrap();
    let custom: Map<_, _> =
        serde_json::from_value(json!({"primary_color": "#ff0000"})).unwrap();
    let poster = client_for(&server)
        .generate_poster(3, "Acme", data, custom)
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(poster.pdf_url, "http://localhost:8081/files/out.pdf");
}

#[tokio::test]
async fn generate_poster_rejects_missing_pdf_url() {
    let mut server = server().await;
    server
        .mock("POST", "/posters/generate")
        .match_query(Matcher::Any)
        .with_status(201)
        .with_body(r#"{"datapayload": {"data": {"status": "completed"}}}"#)
        .create_async()
        .await;

    let err = client_for(&server)
        .generate_poster(1, "Acme", Map::new(), Map::new())
        .await
        .unwrap_err();
    match err {
        Error::Format(message) => {
            assert_eq!(message, "PDF URL not found in the server response.")
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn generate_poster_rejects_empty_pdf_url() {
    let mut server = server().await;
    server
        .mock("POST", "/posters/generate")
        .match_query(Matcher::Any)
        .with_status(201)
        .with_body(r#"{"datapayload": {"data": {"pdf_url": ""}}}"#)
        .create_async()
        .await;

    let err = client_for(&server)
        .generate_poster(1, "Acme", Map::new(), Map::new())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Format(_)), "unexpected error: {err}");
}

#[tokio::test]
async fn generate_poster_surfaces_error_message() {
    let mut server = server().await;
    server
        .mock("POST", "/posters/generate")
        .match_query(Matcher::Any)
        .with_status(400)
        .with_body(r#"{"message": "invalid template_id"}"#)
        .create_async()
        .await;

    let err = client_for(&server)
        .generate_poster(99, "Acme", Map::new(), Map::new())
        .await
        .unwrap_err();
    assert_eq!(err.api_message(), Some("invalid template_id"));
}

//! HttpDispatcher against a local mock endpoint

use chrono::{FixedOffset, TimeZone};
use rsvp::models::RsvpFormData;
use rsvp::{DispatchError, Dispatcher, HttpDispatcher, RsvpPayload};
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn payload() -> RsvpPayload {
    let data = RsvpFormData {
        name: "Ana Sousa".to_string(),
        email: "ana@example.pt".to_string(),
        attending: true,
        has_dietary_restriction: true,
        dietary_details: "Sem glúten".to_string(),
        honeypot: String::new(),
    };
    let at = FixedOffset::east_opt(3600)
        .unwrap()
        .with_ymd_and_hms(2026, 6, 1, 12, 0, 0)
        .unwrap();
    RsvpPayload::build(&data, &at, "rsvp_2026_sofia_ze_francisco")
}

#[tokio::test]
async fn test_posts_url_encoded_form() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/macros/exec"))
        .and(header("content-type", "application/x-www-form-urlencoded"))
        .and(body_string_contains("Nome+Completo=Ana+Sousa"))
        .and(body_string_contains("token=rsvp_2026_sofia_ze_francisco"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let dispatcher = HttpDispatcher::new(format!("{}/macros/exec", server.uri()));
    dispatcher.dispatch(&payload()).await.unwrap();
}

#[tokio::test]
async fn test_server_error_still_counts_as_sent() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .expect(1)
        .mount(&server)
        .await;

    let dispatcher = HttpDispatcher::new(server.uri());
    assert!(dispatcher.dispatch(&payload()).await.is_ok());
}

#[tokio::test]
async fn test_unreachable_endpoint_is_a_transport_error() {
    // Bind then release a port so nothing is listening on it
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let uri = format!("http://{}/exec", listener.local_addr().unwrap());
    drop(listener);

    let dispatcher = HttpDispatcher::new(uri.clone());
    let err = dispatcher.dispatch(&payload()).await.unwrap_err();

    match &err {
        DispatchError::Transport { endpoint, .. } => assert_eq!(endpoint, &uri),
        other => panic!("expected transport error, got {:?}", other),
    }
    assert!(err.user_message().contains("contacte os noivos"));
}

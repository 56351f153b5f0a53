//! End-to-end tests of the client against the mock historian server.
//!
//! These live here rather than in `ip21-client` to avoid a circular
//! dev-dependency between the client and the test infrastructure.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use ip21_client::{Config, Credentials, Error, HistoryOptions, Ip21Client, TransportMode};
use ip21_protocol::xml::element_text;
use ip21_testing::fixtures;
use ip21_testing::mock_server::{MockHistorianServer, MockResponse};

fn client_for(server: &MockHistorianServer) -> Ip21Client {
    client_with(server, TransportMode::Rest, "historian.plant.local")
}

fn client_with(server: &MockHistorianServer, transport: TransportMode, ip21: &str) -> Ip21Client {
    Ip21Client::new(
        Config::new()
            .credentials(Credentials::new("john.doe", "CONTOSO", "hunter2"))
            .sqlplus_address(server.addr().to_string())
            .ip21_address(ip21)
            .transport(transport)
            .debug(true),
    )
    .expect("client construction")
}

#[tokio::test]
async fn query_parses_json_payload() {
    let server = MockHistorianServer::builder()
        .with_response("SQL", MockResponse::json(fixtures::empty_rows_json()))
        .build()
        .await
        .unwrap();
    let client = client_for(&server);

    let result = client.query("SELECT 1").await.unwrap();
    assert_eq!(
        result.payload().unwrap(),
        &serde_json::json!({"rows": []})
    );

    let requests = server.requests_for("SQL").await;
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].path, "/ProcessData/AtProcessDataREST.dll/SQL");
    assert!(requests[0].body.contains("<![CDATA[SELECT 1]]>"));
    assert!(requests[0].body.contains(r#" s="1""#));
    assert!(requests[0].body.contains("HOST=historian.plant.local"));
}

#[tokio::test]
async fn non_select_statement_flags_mutation() {
    let server = MockHistorianServer::builder()
        .with_response("SQL", MockResponse::json(fixtures::empty_rows_json()))
        .build()
        .await
        .unwrap();
    let client = client_for(&server);

    client
        .query_with_limit("UPDATE IP_AnalogDef SET IP_VALUE = 0", 10)
        .await
        .unwrap();

    let requests = server.requests_for("SQL").await;
    assert!(requests[0].body.contains(r#" s="0""#));
    assert!(requests[0].body.contains(r#" m="10""#));
}

#[tokio::test]
async fn server_error_becomes_error_result() {
    let server = MockHistorianServer::builder()
        .with_response("SQL", MockResponse::error(500, "kaboom"))
        .build()
        .await
        .unwrap();
    let client = client_for(&server);

    let result = client.query("SELECT 1").await.unwrap();
    let err = result.error().expect("error result");
    assert_eq!(err.status, 500);
    assert!(err.message.starts_with("Error on IP21"));
}

#[tokio::test]
async fn malformed_json_on_ok_propagates_as_fault() {
    let server = MockHistorianServer::builder()
        .with_response("SQL", MockResponse::text("<html>not json</html>"))
        .build()
        .await
        .unwrap();
    let client = client_for(&server);

    let err = client.query("SELECT 1").await.unwrap_err();
    assert!(matches!(err, Error::Json(_)));
}

#[tokio::test]
async fn history_batches_tags_into_one_request() {
    let server = MockHistorianServer::builder()
        .with_response("History", MockResponse::json(fixtures::empty_rows_json()))
        .build()
        .await
        .unwrap();
    let client = client_for(&server);

    let result = client
        .history(
            ["FC101.PV", "TC102.PV"],
            1000,
            2000,
            HistoryOptions::new().limit(500),
        )
        .await
        .unwrap();
    assert!(result.is_payload());

    let requests = server.requests_for("History").await;
    assert_eq!(requests.len(), 1);
    let body = &requests[0].body;
    assert_eq!(body.matches("<Tag>").count(), 2);
    assert_eq!(element_text(body, "St"), Some("1000"));
    assert_eq!(element_text(body, "Et"), Some("2000"));
    assert_eq!(element_text(body, "X"), Some("500"));
    assert_eq!(
        element_text(body, "D"),
        Some("<![CDATA[historian.plant.local]]>")
    );
}

#[tokio::test]
async fn kpi_sends_url_encoded_form() {
    let server = MockHistorianServer::builder()
        .with_response("KPI", MockResponse::json(fixtures::analog_rows_json()))
        .build()
        .await
        .unwrap();
    let client = client_for(&server);

    let result = client.kpi("FC101.PV").await.unwrap();
    assert!(result.is_payload());

    let requests = server.requests_for("KPI").await;
    assert_eq!(requests.len(), 1);
    assert_eq!(
        requests[0].header("content-type"),
        Some("application/x-www-form-urlencoded")
    );
    let pairs: std::collections::HashMap<String, String> =
        url::form_urlencoded::parse(requests[0].body.as_bytes())
            .into_owned()
            .collect();
    assert_eq!(pairs["dataSource"], "historian.plant.local");
    assert_eq!(pairs["tag"], "FC101.PV");
    assert_eq!(pairs["allQuotes"], "1");
}

#[tokio::test]
async fn soap_transport_extracts_execute_sql_result() {
    let envelope = concat!(
        r#"<soap:Envelope xmlns:soap="http://schemas.xmlsoap.org/soap/envelope/">"#,
        "<soap:Body>",
        r#"<ExecuteSQLResponse xmlns="http://www.aspentech.com/SQLplus.WebService/">"#,
        r#"<ExecuteSQLResult>{"rows":[]}</ExecuteSQLResult>"#,
        "</ExecuteSQLResponse>",
        "</soap:Body>",
        "</soap:Envelope>"
    );
    let server = MockHistorianServer::builder()
        .with_response("SQLplusWebService.asmx", MockResponse::text(envelope))
        .build()
        .await
        .unwrap();
    let client = client_with(&server, TransportMode::Soap, "historian.plant.local");

    let result = client.query("SELECT 1").await.unwrap();
    assert_eq!(result.payload().unwrap(), &serde_json::json!({"rows": []}));

    let requests = server.requests_for(".asmx").await;
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].path, "/SQLplusWebService/SQLplusWebService.asmx");
    assert!(requests[0].body.contains("<command>SELECT 1</command>"));
    assert_eq!(
        requests[0].header("soapaction"),
        Some(r#""http://www.aspentech.com/SQLplus.WebService/ExecuteSQL""#)
    );
}

#[tokio::test]
async fn ntlm_challenge_is_answered() {
    let server = MockHistorianServer::builder()
        .with_ntlm_challenge()
        .with_response("SQL", MockResponse::json(fixtures::empty_rows_json()))
        .build()
        .await
        .unwrap();
    let client = client_for(&server);

    let result = client.query("SELECT 1").await.unwrap();
    assert!(result.is_payload());

    // Unauthenticated attempt, type-1, then type-3.
    let requests = server.requests_for("SQL").await;
    assert_eq!(requests.len(), 3);
    assert!(requests[0].header("authorization").is_none());
    assert!(requests[1].header("authorization").unwrap().starts_with("NTLM "));
    assert!(requests[2].header("authorization").unwrap().starts_with("NTLM "));
}

#[tokio::test]
async fn two_clients_differ_only_in_data_source() {
    let server = MockHistorianServer::builder()
        .with_response("SQL", MockResponse::json(fixtures::empty_rows_json()))
        .build()
        .await
        .unwrap();

    let client_a = client_with(&server, TransportMode::Rest, "10.0.0.1");
    let client_b = client_with(&server, TransportMode::Rest, "10.0.0.2");
    client_a.query("SELECT 1").await.unwrap();
    client_b.query("SELECT 1").await.unwrap();

    let requests = server.requests_for("SQL").await;
    assert_eq!(requests.len(), 2);
    assert_eq!(
        requests[0].body.replace("10.0.0.1", "10.0.0.2"),
        requests[1].body
    );
}

#[tokio::test]
async fn connection_refused_is_a_transport_fault() {
    // Bind then drop to get a port with nothing listening.
    let server = MockHistorianServer::builder().build().await.unwrap();
    let addr = server.addr();
    drop(server);
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;

    let client = Ip21Client::new(
        Config::new()
            .credentials(Credentials::new("a", "d", "p"))
            .sqlplus_address(addr.to_string())
            .ip21_address("h"),
    )
    .unwrap();

    let err = client.query("SELECT 1").await.unwrap_err();
    assert!(matches!(err, Error::Http(_)));
}

//! End-to-end checks of the reqwest transport against a local server.

use gaslamp_fetch::{
    ClientConfig, Credentials, FetchError, HistoryClient, HttpTransport, ObixError,
    ReqwestTransport, RequestConfig, TransportError,
};
use gaslamp_types::{HistoryQuery, parse_timestamp};
use std::io::{BufRead, BufReader, Write};
use std::net::TcpListener;
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Accepts one connection, answers it with `response` and returns the
/// request head.
fn serve_once(response: String) -> (String, JoinHandle<Vec<String>>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    let handle = thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        let mut reader = BufReader::new(stream.try_clone().unwrap());
        let mut head = Vec::new();
        loop {
            let mut line = String::new();
            reader.read_line(&mut line).unwrap();
            let line = line.trim_end().to_string();
            if line.is_empty() {
                break;
            }
            head.push(line);
        }
        stream.write_all(response.as_bytes()).unwrap();
        stream.flush().unwrap();
        head
    });
    (format!("http://{addr}"), handle)
}

fn ok(body: &str) -> String {
    format!(
        "HTTP/1.1 200 OK\r\nContent-Type: text/xml\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    )
}

fn status(code: u16, reason: &str, extra: &str) -> String {
    format!("HTTP/1.1 {code} {reason}\r\n{extra}Content-Length: 0\r\nConnection: close\r\n\r\n")
}

fn header<'a>(head: &'a [String], name: &str) -> Option<&'a str> {
    head.iter().find_map(|line| {
        let (key, value) = line.split_once(':')?;
        key.eq_ignore_ascii_case(name).then(|| value.trim())
    })
}

#[test]
fn test_locations_with_basic_auth() {
    let (base, server) = serve_once(ok(
        r#"<obj href="/obix/histories/"><ref name="site1" href="site1/"/></obj>"#,
    ));

    let client = HistoryClient::new("Aladdin", "open sesame", &base).unwrap();
    let locations = client.locations().unwrap();

    let head = server.join().unwrap();
    assert_eq!(head[0], "GET /obix/histories/ HTTP/1.1");
    assert_eq!(
        header(&head, "authorization"),
        Some("Basic QWxhZGRpbjpvcGVuIHNlc2FtZQ==")
    );
    assert_eq!(locations.len(), 1);
    assert_eq!(locations[0].as_str(), format!("{base}/obix/histories/site1/"));
}

#[test]
fn test_history_query_sent_literally() {
    let (base, server) = serve_once(ok(
        r#"<obj><list><obj><abstime val="2013-01-01T00:00:00.000-05:00"/><real val="21.5"/></obj></list></obj>"#,
    ));
    let query = HistoryQuery::new(
        parse_timestamp("2013-01-01T00:00:00-05:00").unwrap(),
        parse_timestamp("2013-01-02T00:00:00-05:00").unwrap(),
        100,
    )
    .unwrap();

    let client = HistoryClient::new("u", "p", &base).unwrap();
    let series = client.history_values("site1/", "Temp", &query).unwrap();

    let head = server.join().unwrap();
    assert_eq!(
        head[0],
        "GET /obix/histories/site1/Temp/~historyQuery?start=2013-01-01T00:00:00.000-05:00&end=2013-01-02T00:00:00.000-05:00&limit=100 HTTP/1.1"
    );
    assert_eq!(series.len(), 1);
    assert_eq!(series.first().unwrap().value, 21.5);
}

#[test]
fn test_redirect_is_not_followed() {
    let (base, server) = serve_once(status(302, "Found", "Location: /elsewhere/\r\n"));

    let client = HistoryClient::new("u", "p", &base).unwrap();
    let err = client.locations().unwrap_err();
    server.join().unwrap();

    assert!(matches!(
        err,
        ObixError::Fetch(FetchError::Transport(TransportError::Status { status: 302, .. }))
    ));
}

#[test]
fn test_error_status_is_reported() {
    let (base, server) = serve_once(status(500, "Internal Server Error", ""));

    let transport = ReqwestTransport::with_defaults().unwrap();
    let request = RequestConfig {
        url: format!("{base}/obix/histories/").parse().unwrap(),
        auth_header: Credentials::new("u", "p").auth_header(),
        timeout: Duration::from_secs(5),
        body: None,
    };
    let err = transport.get(&request).unwrap_err();
    server.join().unwrap();

    assert!(matches!(err, TransportError::Status { status: 500, .. }));
}

#[test]
fn test_unreachable_server_is_connectivity_error() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);

    let config = ClientConfig {
        timeout: Duration::from_secs(2),
        ..Default::default()
    };
    let client = HistoryClient::with_config(Credentials::new("u", "p"), &base, config).unwrap();
    let err = client.locations().unwrap_err();
    assert!(err.is_connectivity());
}

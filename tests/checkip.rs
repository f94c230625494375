use hello_world_lambda::{GreetError, Greeting, IpGreeter};
use reqwest::StatusCode;
use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::TcpListener,
};

/// Serve exactly one canned HTTP response on a local port and return the URL
/// to fetch it from.
async fn serve_once(status_line: &'static str, body: &'static str) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let (mut sock, _) = listener.accept().await.unwrap();

        // Swallow the request headers before answering.
        let mut seen = Vec::new();
        let mut buf = [0u8; 1024];

        while !seen.windows(4).any(|w| w == b"\r\n\r\n") {
            let n = sock.read(&mut buf).await.unwrap();
            if n == 0 {
                break;
            }
            seen.extend_from_slice(&buf[..n]);
        }

        let resp = format!(
            "HTTP/1.1 {status_line}\r\ncontent-type: text/plain\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
            body.len()
        );
        sock.write_all(resp.as_bytes()).await.unwrap();
        sock.shutdown().await.ok();
    });

    format!("http://{addr}/")
}

fn greeter(url: String) -> IpGreeter {
    let client = reqwest::Client::builder().no_proxy().build().unwrap();
    IpGreeter::with_client(client, url)
}

#[tokio::test]
async fn greets_the_ip() {
    let url = serve_once("200 OK", "1.2.3.4").await;
    let greeting = greeter(url).greet().await.unwrap();

    assert_eq!(
        greeting,
        Greeting {
            status_code: 200,
            body: "Hello, 1.2.3.4".to_owned(),
        }
    );
}

#[tokio::test]
async fn body_is_used_verbatim() {
    let url = serve_once("200 OK", "1.2.3.4\n").await;
    let greeting = greeter(url).greet().await.unwrap();
    assert_eq!(greeting.body, "Hello, 1.2.3.4\n");
}

#[tokio::test]
async fn non_200_is_rejected() {
    let url = serve_once("404 Not Found", "nope").await;

    match greeter(url).greet().await {
        Err(GreetError::UnexpectedStatus(status)) => assert_eq!(status, StatusCode::NOT_FOUND),
        other => panic!("expected UnexpectedStatus, got {:?}", other),
    }
}

#[tokio::test]
async fn other_2xx_is_rejected_too() {
    let url = serve_once("204 No Content", "").await;
    let err = greeter(url).greet().await.unwrap_err();
    assert!(matches!(err, GreetError::UnexpectedStatus(s) if s == StatusCode::NO_CONTENT));
}

#[tokio::test]
async fn empty_body_is_rejected() {
    let url = serve_once("200 OK", "").await;
    let err = greeter(url).greet().await.unwrap_err();
    assert!(matches!(err, GreetError::EmptyBody));
}

#[tokio::test]
async fn connection_failure_is_a_transport_error() {
    // Grab a free port, then close it again so nothing is listening.
    let addr = {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        listener.local_addr().unwrap()
    };

    let err = greeter(format!("http://{addr}/")).greet().await.unwrap_err();

    match err {
        GreetError::Transport(e) => assert!(e.is_connect() || e.is_request()),
        other => panic!("expected Transport, got {:?}", other),
    }
}

#[test]
fn default_url_is_checkip() {
    let g = IpGreeter::new(hello_world_lambda::settings::DEFAULT_CHECKIP_URL);
    assert_eq!(g.url(), "https://checkip.amazonaws.com");
}

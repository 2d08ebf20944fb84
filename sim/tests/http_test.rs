use comau_kinematics::RobotConfig;
use sim::{router, AppState, ErrorResponse, FkineResponse};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

async fn spawn_server() -> std::net::SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = router(AppState::new(RobotConfig::comau_smart_six().chain().unwrap()));
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

/// Send one HTTP/1.1 request and return (status line, body).
async fn send(
    addr: std::net::SocketAddr,
    method: &str,
    path: &str,
    body: &str,
) -> (String, String) {
    let mut socket = TcpStream::connect(addr).await.unwrap();
    let request = format!(
        "{method} {path} HTTP/1.1\r\n\
         Host: {addr}\r\n\
         Content-Type: application/json\r\n\
         Content-Length: {}\r\n\
         Connection: close\r\n\r\n{body}",
        body.len()
    );
    socket.write_all(request.as_bytes()).await.unwrap();

    let mut raw = String::new();
    socket.read_to_string(&mut raw).await.unwrap();
    let (head, body) = raw.split_once("\r\n\r\n").unwrap();
    let status = head.lines().next().unwrap().to_string();
    (status, body.to_string())
}

#[tokio::test]
async fn fkine_over_http() {
    let addr = spawn_server().await;
    let (status, body) = send(addr, "POST", "/fkine", r#"{"q1": 1.5707963267948966}"#).await;
    assert!(status.contains("200"), "{status}");

    let response: FkineResponse = serde_json::from_str(&body).unwrap();
    assert_eq!(response.transforms.len(), 7);
    let tip = response.transforms[6];
    assert!(tip[0][3].abs() < 1e-9);
    assert!((tip[1][3] - 0.87).abs() < 1e-9);
    assert!((tip[2][3] - 1.17).abs() < 1e-9);
}

#[tokio::test]
async fn robot_over_http() {
    let addr = spawn_server().await;
    let (status, body) = send(addr, "GET", "/robot", "").await;
    assert!(status.contains("200"), "{status}");

    let value: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(value["joints"].as_array().unwrap().len(), 6);
    assert_eq!(value["joints"][3]["link_offset"], 0.674);
}

#[tokio::test]
async fn malformed_body_is_rejected() {
    let addr = spawn_server().await;
    let (status, body) = send(addr, "POST", "/fkine", r#"{"q1": "fast"}"#).await;
    assert!(status.starts_with("HTTP/1.1 4"), "{status}");
    assert!(serde_json::from_str::<ErrorResponse>(&body).is_err());
}

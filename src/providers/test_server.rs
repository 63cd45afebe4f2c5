use serde_json::Value;
use std::io::{Read, Write};
use std::net::TcpListener;
use std::thread::{self, JoinHandle};

/// One-shot HTTP server that replies with a canned response and hands back the raw request.
pub(crate) struct CannedServer {
    pub base_url: String,
    handle: JoinHandle<String>,
}

pub(crate) struct CapturedRequest {
    pub head: String,
    pub body: Value,
}

impl CannedServer {
    pub(crate) fn start(status_line: &str, body: &str) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind should succeed");
        let addr = listener.local_addr().expect("address should be available");
        let response = format!(
            "HTTP/1.1 {}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
            status_line,
            body.len(),
            body
        );

        let handle = thread::spawn(move || {
            let (mut stream, _) = listener.accept().expect("accept should succeed");
            let request = read_request(&mut stream);
            stream
                .write_all(response.as_bytes())
                .expect("write should succeed");
            request
        });

        Self {
            base_url: format!("http://{}", addr),
            handle,
        }
    }

    pub(crate) fn request(self) -> CapturedRequest {
        let raw = self.handle.join().expect("server thread should join");
        let (head, body) = raw
            .split_once("\r\n\r\n")
            .expect("request should have a header terminator");
        CapturedRequest {
            head: head.to_ascii_lowercase(),
            body: serde_json::from_str(body).expect("request body should be JSON"),
        }
    }
}

fn read_request(stream: &mut impl Read) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    loop {
        let read = stream.read(&mut chunk).expect("read should succeed");
        if read == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..read]);

        if let Some(header_end) = buf.windows(4).position(|window| window == b"\r\n\r\n") {
            let head = String::from_utf8_lossy(&buf[..header_end]).to_ascii_lowercase();
            let content_length = head
                .lines()
                .find_map(|line| line.strip_prefix("content-length:"))
                .and_then(|value| value.trim().parse::<usize>().ok())
                .unwrap_or(0);
            if buf.len() >= header_end + 4 + content_length {
                break;
            }
        }
    }
    String::from_utf8_lossy(&buf).into_owned()
}

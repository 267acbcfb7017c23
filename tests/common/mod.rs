//! Local stand-in for the prediction service.
//!
//! Serves a fixed script of `(status, body)` replies in order on a random
//! loopback port and records every request it receives.
#![allow(dead_code)]

use std::io::Read;
use std::sync::mpsc::{self, Receiver};
use std::thread;
use std::time::Duration;

use tiny_http::{Header, Response, Server};

/// A request as seen by the stub.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: String,
    pub path: String,
    pub content_type: Option<String>,
    pub body: String,
}

impl Recorded {
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.body).expect("request body is JSON")
    }
}

pub struct StubService {
    pub base_url: String,
    requests: Receiver<Recorded>,
}

impl StubService {
    /// Start a stub that answers with `replies`, one per request.
    pub fn start(replies: Vec<(u16, String)>) -> Self {
        let server = Server::http("127.0.0.1:0").expect("bind stub server");
        let port = server
            .server_addr()
            .to_ip()
            .expect("stub listens on IP")
            .port();
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            for (status, body) in replies {
                let Ok(mut request) = server.recv() else {
                    return;
                };
                let mut buf = String::new();
                let _ = request.as_reader().read_to_string(&mut buf);
                let content_type = request
                    .headers()
                    .iter()
                    .find(|h| h.field.equiv("Content-Type"))
                    .map(|h| h.value.to_string());
                let _ = tx.send(Recorded {
                    method: request.method().to_string(),
                    path: request.url().to_string(),
                    content_type,
                    body: buf,
                });

                let response = Response::from_string(body)
                    .with_status_code(status)
                    .with_header(
                        Header::from_bytes("Content-Type", "application/json")
                            .expect("static header"),
                    );
                let _ = request.respond(response);
            }
        });

        Self {
            base_url: format!("http://127.0.0.1:{port}"),
            requests: rx,
        }
    }

    /// Convenience for a single reply.
    pub fn once(status: u16, body: &str) -> Self {
        Self::start(vec![(status, body.to_string())])
    }

    /// Next recorded request, waiting briefly for the stub thread.
    pub fn next_request(&self) -> Option<Recorded> {
        self.requests.recv_timeout(Duration::from_secs(5)).ok()
    }

    /// Whether any request arrived, without waiting.
    pub fn saw_request(&self) -> bool {
        self.requests.try_recv().is_ok()
    }
}

//! In-process HTTP stub for tests.
//!
//! [`StubServer`] listens on `127.0.0.1` on a random port and answers every
//! connection with the same canned response. Request lines are recorded so
//! tests can assert what was sent, or that nothing was sent at all.

use std::io::{Read, Write};
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// What the stub does with each connection.
#[derive(Clone)]
enum Reply {
    Respond { status: u16, body: String },
    /// Read the request, then hold the connection open without answering.
    Stall,
}

/// Single-threaded HTTP stub. Stops when dropped.
pub struct StubServer {
    addr: SocketAddr,
    url: String,
    requests: Arc<Mutex<Vec<String>>>,
    shutdown: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl StubServer {
    /// Answer every request with `status` and a JSON `body`.
    ///
    /// # Panics
    ///
    /// Panics if no local port can be bound.
    pub fn respond(status: u16, body: impl Into<String>) -> Self {
        Self::start(Reply::Respond {
            status,
            body: body.into(),
        })
    }

    /// Accept requests but never answer them.
    ///
    /// # Panics
    ///
    /// Panics if no local port can be bound.
    pub fn stall() -> Self {
        Self::start(Reply::Stall)
    }

    fn start(reply: Reply) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind stub server");
        let addr = listener.local_addr().expect("stub server address");
        let requests = Arc::new(Mutex::new(Vec::new()));
        let shutdown = Arc::new(AtomicBool::new(false));

        let handle = {
            let requests = Arc::clone(&requests);
            let shutdown = Arc::clone(&shutdown);
            thread::spawn(move || {
                for stream in listener.incoming() {
                    if shutdown.load(Ordering::SeqCst) {
                        break;
                    }
                    let Ok(mut stream) = stream else { continue };
                    let request_line = read_request_line(&mut stream);
                    if let Ok(mut recorded) = requests.lock() {
                        recorded.push(request_line);
                    }
                    match &reply {
                        Reply::Respond { status, body } => write_response(&mut stream, *status, body),
                        Reply::Stall => {
                            while !shutdown.load(Ordering::SeqCst) {
                                thread::sleep(Duration::from_millis(20));
                            }
                        }
                    }
                }
            })
        };

        Self {
            addr,
            url: format!("http://{addr}"),
            requests,
            shutdown,
            handle: Some(handle),
        }
    }

    /// Base URL of the stub (`http://127.0.0.1:<port>`).
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Request lines received so far, e.g. `GET /me/media?limit=50 HTTP/1.1`.
    #[must_use]
    pub fn requests(&self) -> Vec<String> {
        self.requests
            .lock()
            .map(|recorded| recorded.clone())
            .unwrap_or_default()
    }
}

impl Drop for StubServer {
    fn drop(&mut self) {
        self.shutdown.store(true, Ordering::SeqCst);
        // Wake the accept loop so it sees the flag
        let _ = TcpStream::connect(self.addr);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

/// Read request headers and return the first line.
fn read_request_line(stream: &mut TcpStream) -> String {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(5)));
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
        match stream.read(&mut chunk) {
            Ok(0) | Err(_) => break,
            Ok(n) => buf.extend_from_slice(&chunk[..n]),
        }
    }
    String::from_utf8_lossy(&buf)
        .lines()
        .next()
        .unwrap_or_default()
        .to_owned()
}

fn write_response(stream: &mut TcpStream, status: u16, body: &str) {
    let reason = if status == 200 { "OK" } else { "Error" };
    let response = format!(
        "HTTP/1.1 {status} {reason}\r\n\
         Content-Type: application/json\r\n\
         Content-Length: {}\r\n\
         Connection: close\r\n\
         \r\n\
         {body}",
        body.len()
    );
    let _ = stream.write_all(response.as_bytes());
    let _ = stream.flush();
}

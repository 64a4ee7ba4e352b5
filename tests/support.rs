use std::io::{Read, Write};
use std::net::{Shutdown, SocketAddr, TcpListener, TcpStream};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, mpsc};
use std::thread;
use std::time::Duration;

pub struct ServerHandle {
    shutdown: mpsc::Sender<()>,
    thread: Option<thread::JoinHandle<()>>,
}

impl Drop for ServerHandle {
    fn drop(&mut self) {
        let _send_result = self.shutdown.send(());
        if let Some(handle) = self.thread.take() {
            drop(handle.join());
        }
    }
}

/// Spawn a lightweight mock of the search service for tests.
///
/// Serves login, app listing, `inputs` configuration stanzas, and
/// search-job create/results over plain HTTP.
///
/// # Errors
///
/// Returns an error if the listener cannot be created or configured.
pub fn spawn_service() -> Result<(SocketAddr, ServerHandle), String> {
    let listener = TcpListener::bind("127.0.0.1:0")
        .map_err(|err| format!("bind mock service failed: {}", err))?;
    let addr = listener
        .local_addr()
        .map_err(|err| format!("mock service addr failed: {}", err))?;
    listener
        .set_nonblocking(true)
        .map_err(|err| format!("set_nonblocking failed: {}", err))?;

    let (shutdown_tx, shutdown_rx) = mpsc::channel();
    let job_counter = Arc::new(AtomicUsize::new(0));

    let handle = thread::spawn(move || {
        loop {
            if shutdown_rx.try_recv().is_ok() {
                break;
            }

            match listener.accept() {
                Ok((stream, _)) => {
                    let job_counter = Arc::clone(&job_counter);
                    thread::spawn(move || handle_client(stream, &job_counter));
                }
                Err(err) if err.kind() == std::io::ErrorKind::WouldBlock => {
                    thread::sleep(Duration::from_millis(10));
                }
                Err(_) => break,
            }
        }
    });

    Ok((
        addr,
        ServerHandle {
            shutdown: shutdown_tx,
            thread: Some(handle),
        },
    ))
}

fn handle_client(mut stream: TcpStream, job_counter: &AtomicUsize) {
    if stream
        .set_read_timeout(Some(Duration::from_secs(5)))
        .is_err()
    {
        return;
    }

    let Some((method, path)) = read_request(&mut stream) else {
        return;
    };

    let (status_line, body) = route(&method, &path, job_counter);
    let response = format!(
        "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status_line,
        body.len(),
        body
    );
    if stream.write_all(response.as_bytes()).is_err() {
        return;
    }
    if stream.flush().is_err() {
        return;
    }
    drop(stream.shutdown(Shutdown::Both));
}

/// Reads one full request (headers plus any Content-Length body) and returns
/// its method and path with the query string stripped.
fn read_request(stream: &mut TcpStream) -> Option<(String, String)> {
    let mut buffer = Vec::new();
    let mut chunk = [0u8; 1024];

    let headers_end = loop {
        let read = stream.read(&mut chunk).ok()?;
        if read == 0 {
            return None;
        }
        buffer.extend_from_slice(chunk.get(..read)?);
        if let Some(pos) = find_headers_end(&buffer) {
            break pos;
        }
        if buffer.len() > 64 * 1024 {
            return None;
        }
    };

    let head = String::from_utf8_lossy(buffer.get(..headers_end)?).into_owned();
    let body_len = content_length(&head);
    while buffer.len() < headers_end + 4 + body_len {
        let read = stream.read(&mut chunk).ok()?;
        if read == 0 {
            break;
        }
        buffer.extend_from_slice(chunk.get(..read)?);
    }

    let request_line = head.lines().next()?;
    let mut parts = request_line.split_whitespace();
    let method = parts.next()?.to_owned();
    let target = parts.next()?;
    let path = target.split('?').next()?.to_owned();
    Some((method, path))
}

fn find_headers_end(buffer: &[u8]) -> Option<usize> {
    buffer.windows(4).position(|window| window == b"\r\n\r\n")
}

fn content_length(head: &str) -> usize {
    head.lines()
        .filter_map(|line| line.split_once(':'))
        .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
        .and_then(|(_, value)| value.trim().parse().ok())
        .unwrap_or(0)
}

fn route(method: &str, path: &str, job_counter: &AtomicUsize) -> (&'static str, String) {
    if method == "POST" && path == "/services/auth/login" {
        return ("200 OK", r#"{"sessionKey":"E2E-KEY"}"#.to_owned());
    }
    if method == "GET" && path == "/services/apps/local" {
        return (
            "200 OK",
            r#"{"entry":[{"name":"search","content":{}},{"name":"alerts","content":{}}]}"#
                .to_owned(),
        );
    }
    if method == "GET" && path == "/services/configs/conf-inputs" {
        return (
            "200 OK",
            r#"{"entry":[{"name":"tcp://:9997","content":{"index":"main","disabled":"0"}},{"name":"monitor:///var/log","content":{"index":"os"}}]}"#
                .to_owned(),
        );
    }
    if method == "POST" && path == "/services/search/jobs" {
        let sid = job_counter.fetch_add(1, Ordering::SeqCst).wrapping_add(1);
        return ("200 OK", format!(r#"{{"sid":"e2e-{sid}"}}"#));
    }
    if method == "GET" && path.starts_with("/services/search/jobs/") && path.ends_with("/results") {
        return ("200 OK", r#"{"results":[{"_raw":"e2e event"}]}"#.to_owned());
    }
    ("404 Not Found", r#"{"messages":[{"text":"not found"}]}"#.to_owned())
}

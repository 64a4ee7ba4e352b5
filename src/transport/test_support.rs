use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use super::{CallOptions, Message, Method, Response, Transport, TransportResult, split_url};

/// In-memory transport serving the same endpoints the real service exposes,
/// with a configurable simulated I/O latency and an in-flight gauge.
pub(crate) struct ScriptedTransport {
    latency: Duration,
    fail_marker: Option<String>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    job_counter: AtomicUsize,
}

impl ScriptedTransport {
    pub(crate) fn new(latency: Duration) -> Self {
        Self {
            latency,
            fail_marker: None,
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
            job_counter: AtomicUsize::new(0),
        }
    }

    /// Job creation returns 503 for any query containing `marker`.
    pub(crate) fn failing_on(latency: Duration, marker: &str) -> Self {
        let mut transport = Self::new(latency);
        transport.fail_marker = Some(marker.to_owned());
        transport
    }

    pub(crate) fn max_observed_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    pub(crate) fn jobs_created(&self) -> usize {
        self.job_counter.load(Ordering::SeqCst)
    }

    fn route(&self, path: &str, message: &Message) -> Response {
        if path.ends_with("/services/auth/login") && message.method == Method::Post {
            return ok_json(r#"{"sessionKey":"SCRIPTED-KEY"}"#);
        }
        if path.ends_with("/services/apps/local") {
            return ok_json(
                r#"{"entry":[{"name":"search","content":{}},{"name":"launcher","content":{}}]}"#,
            );
        }
        if path.contains("/services/configs/conf-") {
            return ok_json(
                r#"{"entry":[{"name":"tcp://:9997","content":{"index":"main","disabled":"0"}}]}"#,
            );
        }
        if path.ends_with("/services/search/jobs") && message.method == Method::Post {
            if let Some(marker) = self.fail_marker.as_deref() {
                let body = String::from_utf8_lossy(&message.body);
                if body.contains(marker) {
                    return Response::new(
                        503,
                        "Service Unavailable".to_owned(),
                        Vec::new(),
                        Vec::new(),
                    );
                }
            }
            let sid = self.job_counter.fetch_add(1, Ordering::SeqCst).wrapping_add(1);
            return ok_json(&format!(r#"{{"sid":"{sid}"}}"#));
        }
        if path.ends_with("/results") {
            return ok_json(r#"{"results":[{"_raw":"scripted event"}]}"#);
        }
        Response::new(404, "Not Found".to_owned(), Vec::new(), Vec::new())
    }
}

fn ok_json(body: &str) -> Response {
    Response::new(
        200,
        "OK".to_owned(),
        vec![("Content-Type".to_owned(), "application/json".to_owned())],
        body.as_bytes().to_vec(),
    )
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn request(
        &self,
        url: &str,
        message: Message,
        _options: CallOptions,
    ) -> TransportResult<Response> {
        let entered = self
            .in_flight
            .fetch_add(1, Ordering::SeqCst)
            .wrapping_add(1);
        self.max_in_flight.fetch_max(entered, Ordering::SeqCst);

        tokio::time::sleep(self.latency).await;

        let split = split_url(url)?;
        let response = self.route(&split.path, &message);

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        Ok(response)
    }
}

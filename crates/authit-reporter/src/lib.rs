//! Client-side page-visit reporter.
//!
//! Tracks how long the current page has been open and, when the page is
//! left, fires one `{page, duration}` beacon at the tracking endpoint.
//! Delivery is at-most-once and never awaited: the request is queued on the
//! runtime before [`VisitReporter::leave`] returns, and any failure is
//! dropped.

use reqwest::{header::CONTENT_TYPE, Client, Url};
use tokio::{task::JoinHandle, time::Instant};
use tracing::debug;

use authit_core::visit::VisitBeacon;

#[derive(Debug)]
struct PageTimer {
    page: String,
    started: Instant,
}

impl PageTimer {
    /// Whole seconds on page, truncated.
    fn beacon_at(self, now: Instant) -> VisitBeacon {
        VisitBeacon {
            page: self.page,
            duration: now.saturating_duration_since(self.started).as_secs(),
        }
    }
}

pub struct VisitReporter {
    client: Client,
    endpoint: Url,
    current: Option<PageTimer>,
}

impl VisitReporter {
    pub fn new(endpoint: Url) -> Self {
        Self::with_client(Client::new(), endpoint)
    }

    pub fn with_client(client: Client, endpoint: Url) -> Self {
        Self {
            client,
            endpoint,
            current: None,
        }
    }

    pub fn current_page(&self) -> Option<&str> {
        self.current.as_ref().map(|t| t.page.as_str())
    }

    /// Navigate to `page`. Reports the page being left, if any, and starts
    /// timing the new one. Re-entering the current page keeps its timer.
    pub fn enter(&mut self, page: impl Into<String>) -> Option<JoinHandle<()>> {
        let page = page.into();
        if self.current_page() == Some(page.as_str()) {
            return None;
        }
        let sent = self.leave();
        self.current = Some(PageTimer {
            page,
            started: Instant::now(),
        });
        sent
    }

    /// Leave the current page (navigation away or teardown). Sends at most
    /// one beacon; calling again without an `enter` sends nothing.
    ///
    /// The returned handle may be awaited but never has to be.
    pub fn leave(&mut self) -> Option<JoinHandle<()>> {
        let timer = self.current.take()?;
        self.dispatch(timer.beacon_at(Instant::now()))
    }

    fn dispatch(&self, beacon: VisitBeacon) -> Option<JoinHandle<()>> {
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            debug!(page = %beacon.page, "No runtime; visit beacon dropped");
            return None;
        };
        let body = match serde_json::to_string(&beacon) {
            Ok(body) => body,
            Err(e) => {
                debug!(error = %e, "Visit beacon not serializable; dropped");
                return None;
            }
        };

        // Same content type the browser beacon API uses for string bodies.
        let request = self
            .client
            .post(self.endpoint.clone())
            .header(CONTENT_TYPE, "text/plain;charset=UTF-8")
            .body(body);

        Some(runtime.spawn(async move {
            if let Err(e) = request.send().await {
                debug!(error = %e, page = %beacon.page, "Visit beacon lost");
            }
        }))
    }
}

impl Drop for VisitReporter {
    /// Teardown counts as leaving the page.
    fn drop(&mut self) {
        let _ = self.leave();
    }
}

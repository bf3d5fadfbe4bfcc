//! Fire-and-forget event counters.

use tracing::{debug, instrument};
use uuid::Uuid;

const COLLECT_URL: &str = "https://www.google-analytics.com/collect";

/// Analytics event client.
///
/// Disabled (a no-op) unless `GA_ID` is present in the environment. Delivery
/// is best-effort: events are posted from a background task and failures are
/// logged and dropped.
#[derive(Debug, Clone)]
pub struct AnalyticsClient {
    inner: Option<Inner>,
}

#[derive(Debug, Clone)]
struct Inner {
    http: reqwest::Client,
    tracking_id: String,
    client_id: String,
}

impl AnalyticsClient {
    /// Builds a client from the `GA_ID` environment variable; a missing id
    /// yields a disabled client.
    #[instrument]
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        let inner = std::env::var("GA_ID").ok().map(|tracking_id| Inner {
            http: reqwest::Client::new(),
            tracking_id,
            client_id: Uuid::new_v4().to_string(),
        });
        Self { inner }
    }

    /// A client that drops every event.
    pub fn disabled() -> Self {
        Self { inner: None }
    }

    /// Records an event. Returns immediately; delivery happens in the
    /// background.
    #[instrument(skip(self))]
    pub fn event(&self, category: &str, action: &str) {
        let Some(inner) = self.inner.clone() else {
            return;
        };
        debug!(category, action, "Sending analytics event");
        let params = [
            ("v", "1".to_string()),
            ("tid", inner.tracking_id.clone()),
            ("cid", inner.client_id.clone()),
            ("t", "event".to_string()),
            ("ec", category.to_string()),
            ("ea", action.to_string()),
        ];
        tokio::spawn(async move {
            if let Err(e) = inner.http.post(COLLECT_URL).form(&params).send().await {
                debug!(error = %e, "Analytics event delivery failed");
            }
        });
    }
}

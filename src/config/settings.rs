use std::env;
use std::net::SocketAddr;
use std::time::Duration;

const DEFAULT_SERVICE_URL: &str = "https://bsky.social";
const DEFAULT_APPVIEW_URL: &str = "https://public.api.bsky.app";

#[derive(Clone, Debug)]
pub struct Settings {
    pub port: u16,
    pub addr: SocketAddr,
    /// PDS used for login and follow record creation.
    pub service_url: String,
    /// Public AppView used for actor search.
    pub appview_url: String,
    pub request_timeout: Duration,
}

impl Settings {
    pub fn new() -> Self {
        let port: u16 = env::var("PORT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(3000);
        let addr = SocketAddr::from(([0, 0, 0, 0], port));

        let service_url = non_empty_var("BLUESKY_SERVICE_URL")
            .unwrap_or_else(|| DEFAULT_SERVICE_URL.to_string());
        let appview_url = non_empty_var("BLUESKY_APPVIEW_URL")
            .unwrap_or_else(|| DEFAULT_APPVIEW_URL.to_string());

        let timeout_secs: u64 = env::var("BLUESKY_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(30);

        Self {
            port,
            addr,
            service_url: service_url.trim_end_matches('/').to_string(),
            appview_url: appview_url.trim_end_matches('/').to_string(),
            request_timeout: Duration::from_secs(timeout_secs),
        }
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

use scout_common::error::SessionError;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{info, warn};

/// Default number of `/status` probes before giving up.
pub const DEFAULT_PROBE_ATTEMPTS: u32 = 10;

/// Delay between `/status` probes.
pub const PROBE_INTERVAL: Duration = Duration::from_millis(500);

/// URL of the server's `/status` endpoint.
pub fn status_url(server_url: &str) -> String {
    format!("{}/status", server_url.trim_end_matches('/'))
}

/// Poll the Appium `/status` endpoint until it answers with a success code.
pub async fn wait_for_server(server_url: &str, attempts: u32) -> Result<(), SessionError> {
    let url = status_url(server_url);
    let client = reqwest::Client::new();

    for attempt in 1..=attempts.max(1) {
        match client.get(&url).send().await {
            Ok(resp) if resp.status().is_success() => {
                info!("Appium server ready after {} attempts", attempt);
                return Ok(());
            }
            Ok(resp) => {
                warn!(
                    "Appium server responded {} but is not ready yet (attempt {})",
                    resp.status(),
                    attempt
                );
            }
            Err(e) => {
                if attempt % 5 == 0 {
                    info!("Waiting for Appium server at {}... ({})", url, e);
                }
            }
        }
        if attempt < attempts {
            sleep(PROBE_INTERVAL).await;
        }
    }

    Err(SessionError::Connect(format!(
        "Appium server at {} not reachable after {} attempts",
        server_url, attempts
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_url_ignores_trailing_slash() {
        assert_eq!(status_url("http://localhost:4723/"), "http://localhost:4723/status");
        assert_eq!(status_url("http://10.0.2.2:4723"), "http://10.0.2.2:4723/status");
    }

    #[tokio::test]
    async fn unreachable_server_is_connect_error() {
        // Port 9 (discard) is closed on any sane test host.
        let err = wait_for_server("http://127.0.0.1:9", 1).await.unwrap_err();
        assert!(matches!(err, SessionError::Connect(_)));
    }
}

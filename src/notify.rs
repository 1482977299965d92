//! Best-effort status notification.
//!
//! After a successful run the JSON sidecar is posted to a local endpoint.
//! The payload is currently always an empty object and carries no report
//! content; the receiving side only uses the POST as a completion signal.
//! Failure here is logged and swallowed: the report is already on disk and
//! must not be invalidated by a dead endpoint.

use std::path::Path;

use tracing::{info, warn};

use crate::error::{PlatdiffError, Result};

/// Endpoint used when the caller does not override it.
pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1/content-metadata.json";

/// Load the sidecar payload for posting.
fn load_payload(sidecar: &Path) -> Result<serde_json::Value> {
    let content = std::fs::read_to_string(sidecar)?;
    Ok(serde_json::from_str(&content)?)
}

/// POST the sidecar payload as JSON to `url`.
///
/// # Errors
///
/// Returns `Notification` for transport failures and non-2xx responses.
pub async fn send_notification(url: &str, sidecar: &Path) -> Result<()> {
    let payload = load_payload(sidecar)?;

    let response = reqwest::Client::new()
        .post(url)
        .json(&payload)
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        return Err(PlatdiffError::Notification(format!(
            "endpoint {url} answered {status}"
        )));
    }

    info!(url, "notification delivered");
    Ok(())
}

/// Send the notification, absorbing any failure into a warning log. The
/// run's outcome does not depend on this call.
pub async fn notify_best_effort(url: &str, sidecar: &Path) {
    if let Err(err) = send_notification(url, sidecar).await {
        warn!(url, error = %err, "notification failed, report is unaffected");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_payload_empty_object() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"{}").unwrap();
        file.flush().unwrap();

        let payload = load_payload(file.path()).unwrap();
        assert_eq!(payload, serde_json::json!({}));
    }

    #[test]
    fn test_load_payload_invalid_json() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"not json").unwrap();
        file.flush().unwrap();

        assert!(load_payload(file.path()).is_err());
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_an_error() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"{}").unwrap();
        file.flush().unwrap();

        let result = send_notification("http://127.0.0.1:1/content-metadata.json", file.path()).await;
        assert!(matches!(result, Err(PlatdiffError::Notification(_))));
    }

    #[tokio::test]
    async fn test_best_effort_does_not_panic() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"{}").unwrap();
        file.flush().unwrap();

        // Must complete silently even when the endpoint is unreachable.
        notify_best_effort("http://127.0.0.1:1/content-metadata.json", file.path()).await;
    }
}

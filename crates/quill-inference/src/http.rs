//! Shared HTTP plumbing for the service clients.

use quill_core::{Error, Result};
use serde::de::DeserializeOwned;

/// Fail on non-2xx, otherwise decode the JSON body.
pub(crate) async fn read_json<T: DeserializeOwned>(
    response: reqwest::Response,
    service: &str,
) -> Result<T> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(Error::Request(format!(
            "{} returned {}: {}",
            service, status, body
        )));
    }

    response
        .json()
        .await
        .map_err(|e| Error::Serialization(format!("Failed to parse {} response: {}", service, e)))
}

/// `base` without trailing slashes, so `format!("{}/path", base)` never doubles them.
pub(crate) fn trim_base(base: &str) -> String {
    base.trim_end_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trim_base() {
        assert_eq!(trim_base("https://aip.baidubce.com/"), "https://aip.baidubce.com");
        assert_eq!(trim_base("http://localhost:9000"), "http://localhost:9000");
    }
}

//! Fetch-through helpers for pages that cannot make cross-origin requests.

use std::time::Duration;

const NEWS_TIMEOUT: Duration = Duration::from_secs(10);

/// Chromium release the user agent string claims to be.
const CHROME_VERSION: &str = "128.0.0.0";

/// GET `url` and return the body. Any failure yields an empty string.
pub async fn news(url: &str) -> String {
    let client = match reqwest::Client::builder().timeout(NEWS_TIMEOUT).build() {
        Ok(c) => c,
        Err(e) => {
            tracing::warn!("Failed to build HTTP client: {}", e);
            return String::new();
        }
    };

    let response = match client.get(url).send().await {
        Ok(r) => r,
        Err(e) => {
            tracing::warn!(url = %url, "News fetch failed: {}", e);
            return String::new();
        }
    };

    if !response.status().is_success() {
        tracing::warn!(url = %url, status = %response.status(), "News fetch returned an error status");
        return String::new();
    }

    match response.text().await {
        Ok(body) => body,
        Err(e) => {
            tracing::warn!(url = %url, "Failed to read news body: {}", e);
            String::new()
        }
    }
}

fn platform_token() -> &'static str {
    if cfg!(target_os = "windows") {
        "Windows NT 10.0; Win64; x64"
    } else if cfg!(target_os = "macos") {
        "Macintosh; Intel Mac OS X 10_15_7"
    } else {
        "X11; Linux x86_64"
    }
}

/// Chromium-style user agent for the current platform, without any
/// launcher branding.
pub fn default_user_agent() -> String {
    format!(
        "Mozilla/5.0 ({}) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/{} Safari/537.36",
        platform_token(),
        CHROME_VERSION
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_agent_shape() {
        let ua = default_user_agent();
        assert!(ua.starts_with("Mozilla/5.0 ("));
        assert!(ua.contains("Chrome/"));
        assert!(!ua.contains("NeuzOS"));
    }

    #[tokio::test]
    async fn test_news_failure_is_empty() {
        assert_eq!(news("not a url").await, "");
    }
}

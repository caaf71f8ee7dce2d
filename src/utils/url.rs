//! Endpoint URL construction for provider base URLs.

/// Join a provider base URL and an endpoint path without doubling or
/// dropping the separating slash.
///
/// ```
/// use friendchat::utils::url::construct_api_url;
///
/// assert_eq!(
///     construct_api_url("https://api.anthropic.com/v1/", "/messages"),
///     "https://api.anthropic.com/v1/messages"
/// );
/// ```
pub fn construct_api_url(base_url: &str, endpoint: &str) -> String {
    let base = base_url.trim().trim_end_matches('/');
    let endpoint = endpoint.trim_start_matches('/');
    format!("{base}/{endpoint}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joins_with_exactly_one_slash() {
        for (base, endpoint) in [
            ("https://api.openai.com/v1", "chat/completions"),
            ("https://api.openai.com/v1/", "chat/completions"),
            ("https://api.openai.com/v1///", "/chat/completions"),
            (" https://api.openai.com/v1 ", "//chat/completions"),
        ] {
            assert_eq!(
                construct_api_url(base, endpoint),
                "https://api.openai.com/v1/chat/completions"
            );
        }
    }

    #[test]
    fn keeps_proxy_path_prefixes() {
        assert_eq!(
            construct_api_url("http://localhost:8080/proxy/anthropic/v1", "messages"),
            "http://localhost:8080/proxy/anthropic/v1/messages"
        );
    }
}

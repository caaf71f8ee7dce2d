use std::error::Error;
use std::fmt;

/// Coarse failure classes. Only [`ProviderErrorKind::ModelNotFound`] lets the
/// model fallback policy move on to the next model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderErrorKind {
    /// Not configured, unreachable, timed out or failing server-side.
    Unavailable,
    ModelNotFound,
    RateLimited,
    Unknown,
}

impl ProviderErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ProviderErrorKind::Unavailable => "unavailable",
            ProviderErrorKind::ModelNotFound => "model-not-found",
            ProviderErrorKind::RateLimited => "rate-limited",
            ProviderErrorKind::Unknown => "unknown",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderError {
    pub kind: ProviderErrorKind,
    pub detail: String,
}

impl ProviderError {
    pub fn new(kind: ProviderErrorKind, detail: impl Into<String>) -> Self {
        Self {
            kind,
            detail: detail.into(),
        }
    }

    pub fn is_model_error(&self) -> bool {
        self.kind == ProviderErrorKind::ModelNotFound
    }

    /// Map a transport-level failure (no HTTP status available).
    pub fn from_transport(err: &reqwest::Error) -> Self {
        let kind = if err.is_timeout() || err.is_connect() {
            ProviderErrorKind::Unavailable
        } else {
            ProviderErrorKind::Unknown
        };
        Self::new(kind, err.to_string())
    }

    /// Map a non-success HTTP response to an error, keeping a short summary of
    /// the body as the detail.
    pub fn from_http_failure(status: u16, body: &str) -> Self {
        let summary = summarize_error_body(body);
        let detail = if summary.is_empty() {
            format!("HTTP {status}")
        } else {
            format!("HTTP {status}: {summary}")
        };

        let lowered = summary.to_lowercase();
        let kind = match status {
            429 => ProviderErrorKind::RateLimited,
            401 | 403 => ProviderErrorKind::Unknown,
            404 => ProviderErrorKind::ModelNotFound,
            400 if lowered.contains("model") || lowered.contains("not found") => {
                ProviderErrorKind::ModelNotFound
            }
            500..=599 => ProviderErrorKind::Unavailable,
            _ => ProviderErrorKind::Unknown,
        };

        Self::new(kind, detail)
    }
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.detail)
    }
}

impl Error for ProviderError {}

const MAX_RAW_BODY_CHARS: usize = 200;

fn extract_error_summary(value: &serde_json::Value) -> Option<String> {
    let summary = value
        .pointer("/error/message")
        .and_then(|v| v.as_str())
        .map(str::to_owned)
        .or_else(|| {
            value.get("error").and_then(|v| match v {
                serde_json::Value::String(s) => Some(s.to_string()),
                _ => None,
            })
        })
        .or_else(|| {
            value
                .get("message")
                .and_then(|v| v.as_str().map(str::to_owned))
        });

    summary.map(|text| {
        let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
        collapsed.trim().to_string()
    })
}

/// One-line description of an API error body: the JSON `message` when there
/// is one, otherwise the start of the raw text.
pub fn summarize_error_body(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return String::new();
    }

    if let Ok(json_value) = serde_json::from_str::<serde_json::Value>(trimmed) {
        if let Some(summary) = extract_error_summary(&json_value) {
            if !summary.is_empty() {
                return summary;
            }
        }
    }

    let collapsed = trimmed.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed.chars().take(MAX_RAW_BODY_CHARS).collect()
}

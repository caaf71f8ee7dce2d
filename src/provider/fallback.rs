use tracing::{debug, warn};

use super::{ChatProvider, ProviderError, ProviderErrorKind};
use crate::core::message::Message;

/// Models to try for one provider: the preferred one, then the fallbacks in
/// order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelPlan {
    pub preferred: String,
    pub fallbacks: Vec<String>,
}

impl ModelPlan {
    pub fn new(preferred: impl Into<String>, fallbacks: Vec<String>) -> Self {
        Self {
            preferred: preferred.into(),
            fallbacks,
        }
    }

    /// Preferred model first, then fallbacks, without repeats or blanks.
    pub fn candidates(&self) -> Vec<&str> {
        let mut out: Vec<&str> = Vec::with_capacity(self.fallbacks.len() + 1);
        for model in std::iter::once(&self.preferred).chain(self.fallbacks.iter()) {
            let model = model.trim();
            if !model.is_empty() && !out.contains(&model) {
                out.push(model);
            }
        }
        out
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelReply {
    pub text: String,
    pub model: String,
}

/// Try each candidate model until one answers. Only model-not-found failures
/// move on to the next candidate; any other failure is returned immediately.
pub async fn send_with_fallback(
    provider: &dyn ChatProvider,
    plan: &ModelPlan,
    history: &[Message],
    system_prompt: &str,
    user_message: &str,
) -> Result<ModelReply, ProviderError> {
    let mut last_error = None;

    for model in plan.candidates() {
        match provider
            .send(history, system_prompt, user_message, model)
            .await
        {
            Ok(text) => {
                debug!(model, "provider answered");
                return Ok(ModelReply {
                    text,
                    model: model.to_string(),
                });
            }
            Err(err) if err.is_model_error() => {
                warn!(model, error = %err, "model unavailable, trying next candidate");
                last_error = Some(err);
            }
            Err(err) => return Err(err),
        }
    }

    Err(last_error.unwrap_or_else(|| {
        ProviderError::new(ProviderErrorKind::Unknown, "no models configured")
    }))
}

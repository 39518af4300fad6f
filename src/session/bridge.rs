// ABOUTME: Session orchestration bridge — the single access point to the session service.
// ABOUTME: Translates start/interrupt/reset/preference intents and shapes every failure into an outcome.

use std::sync::Arc;

use super::service::{ModelPreference, SessionService, WindowHandle};
use crate::responses::{ModelPreferenceResponse, SetModelPreferenceResponse, SuccessResponse};

/// Error returned by `interrupt` when nothing is streaming.
pub const NOTHING_TO_INTERRUPT: &str = "No active response to stop.";

/// Thin adapter over a [`SessionService`] bound to one window.
#[derive(Clone)]
pub struct SessionBridge {
    service: Arc<dyn SessionService>,
    window: WindowHandle,
}

impl SessionBridge {
    pub fn new(service: Arc<dyn SessionService>, window: WindowHandle) -> Self {
        Self { service, window }
    }

    pub fn window(&self) -> &WindowHandle {
        &self.window
    }

    pub fn is_session_active(&self) -> bool {
        self.service.is_session_active()
    }

    /// Start the session in a detached task when none is active.
    ///
    /// Never waits for readiness and never fails the caller; a failed start is
    /// only logged.
    pub fn ensure_session_started(&self) {
        if self.service.is_session_active() {
            return;
        }

        let service = Arc::clone(&self.service);
        let window = self.window.clone();
        tokio::spawn(async move {
            match service.start_streaming_session(&window).await {
                Ok(()) => tracing::info!(window = window.label(), "session started"),
                Err(e) => tracing::warn!(
                    window = window.label(),
                    "failed to start streaming session: {:#}",
                    e
                ),
            }
        });
    }

    /// Reset the conversation, optionally resuming a prior session.
    pub async fn reset(&self, resume_session_id: Option<String>) -> SuccessResponse {
        match self.service.reset_session(resume_session_id).await {
            Ok(()) => SuccessResponse::ok(),
            Err(e) => {
                tracing::warn!("failed to reset session: {:#}", e);
                SuccessResponse::err(e.to_string())
            }
        }
    }

    /// Best-effort cancellation of the in-flight response.
    pub async fn interrupt(&self) -> SuccessResponse {
        match self.service.interrupt_current_response(&self.window).await {
            Ok(true) => SuccessResponse::ok(),
            Ok(false) => SuccessResponse::err(NOTHING_TO_INTERRUPT),
            Err(e) => {
                tracing::warn!("failed to interrupt response: {:#}", e);
                SuccessResponse::err(e.to_string())
            }
        }
    }

    pub fn model_preference(&self) -> ModelPreferenceResponse {
        ModelPreferenceResponse {
            preference: self.service.current_model_preference(),
        }
    }

    /// Change the preference. The response always reports the preference in
    /// effect afterwards so callers can resynchronize.
    pub async fn set_model_preference(
        &self,
        preference: ModelPreference,
    ) -> SetModelPreferenceResponse {
        let result = self.service.set_model_preference(preference).await;
        let current = self.service.current_model_preference();
        match result {
            Ok(()) => SetModelPreferenceResponse {
                success: true,
                error: None,
                preference: current,
            },
            Err(e) => {
                tracing::warn!(requested = %preference, "failed to set model preference: {:#}", e);
                SetModelPreferenceResponse {
                    success: false,
                    error: Some(e.to_string()),
                    preference: current,
                }
            }
        }
    }

    /// Like [`Self::set_model_preference`] but accepts the raw string form.
    pub async fn set_model_preference_str(&self, preference: &str) -> SetModelPreferenceResponse {
        match preference.parse::<ModelPreference>() {
            Ok(pref) => self.set_model_preference(pref).await,
            Err(e) => SetModelPreferenceResponse {
                success: false,
                error: Some(e),
                preference: self.service.current_model_preference(),
            },
        }
    }
}

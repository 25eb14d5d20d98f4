// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

//! HTTP client for the external workflow engine.
//!
//! [`EngineClient`] implements the [`WorkflowEngine`] port against the
//! engine's REST API: message correlation goes to `POST /message`, process
//! starts to `POST /process-definition/key/{key}/start`. Non-2xx answers
//! surface as [`EngineError::Rejected`] with the response body attached,
//! transport failures as [`EngineError::Transport`].

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use perfcard::{EngineError, WorkflowEngine};
use serde_json::json;
use tracing::debug;
use ureq::Agent;

/// Connection settings for the workflow engine.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Base URL of the engine's REST API, e.g.
    /// `http://camunda:8080/engine-rest`.
    pub base_url: String,
    /// Basic-auth user name, when the engine requires authentication.
    pub username: Option<String>,
    /// Basic-auth password.
    pub password: Option<String>,
}

/// Workflow engine client over HTTP.
pub struct EngineClient {
    agent: Agent,
    base_url: String,
    authorization: Option<String>,
}

impl EngineClient {
    /// Creates a client for the configured engine.
    ///
    /// Non-2xx statuses are handled by the client itself, so the agent is
    /// configured not to turn them into transport errors.
    #[must_use]
    pub fn new(config: &EngineConfig) -> Self {
        let agent: Agent = Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .new_agent();
        let authorization: Option<String> = match (&config.username, &config.password) {
            (Some(user), Some(pass)) => {
                let credentials: String = STANDARD.encode(format!("{user}:{pass}"));
                Some(format!("Basic {credentials}"))
            }
            _ => None,
        };
        Self {
            agent,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            authorization,
        }
    }

    /// Builds the full URL for an API path.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}/{path}", self.base_url)
    }

    fn post(&self, url: &str, payload: &serde_json::Value) -> Result<(), EngineError> {
        let mut request = self.agent.post(url);
        if let Some(auth) = &self.authorization {
            request = request.header("Authorization", auth);
        }
        let mut response = request
            .send_json(payload)
            .map_err(|e| EngineError::Transport(e.to_string()))?;

        let status: u16 = response.status().as_u16();
        if (200..300).contains(&status) {
            debug!(url, status, "Workflow engine call succeeded");
            return Ok(());
        }
        let body: String = response
            .body_mut()
            .read_to_string()
            .unwrap_or_else(|e| format!("<unreadable body: {e}>"));
        Err(EngineError::Rejected { status, body })
    }
}

impl WorkflowEngine for EngineClient {
    fn send_message(&self, business_key: &str, message_name: &str) -> Result<(), EngineError> {
        let payload = json!({
            "messageName": message_name,
            "businessKey": business_key,
        });
        self.post(&self.url("message"), &payload)
    }

    fn start_process(&self, process_key: &str, business_key: &str) -> Result<(), EngineError> {
        let payload = json!({
            "businessKey": business_key,
        });
        self.post(
            &self.url(&format!("process-definition/key/{process_key}/start")),
            &payload,
        )
    }
}

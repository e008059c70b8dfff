use serde::Deserialize;
use std::time::Duration;
use ureq::Agent;

use crate::config::Config;

const POLL_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, thiserror::Error)]
pub enum PollError {
    #[error("status request failed: {0}")]
    Transport(String),
    #[error("status response was not valid JSON: {0}")]
    MalformedResponse(String),
}

/// One status probe against the remote endpoint. The scheduler owns retry
/// and backoff; implementations make exactly one attempt per call.
pub trait StatusAdapter {
    fn poll(&self) -> Result<bool, PollError>;
}

// The endpoint responds with `{ "session": { "online": bool } }`. Absent
// `session` or `online` keys mean offline, not a malformed response.
#[derive(Debug, Default, Deserialize)]
struct StatusResponse {
    #[serde(default)]
    session: SessionStatus,
}

#[derive(Debug, Default, Deserialize)]
struct SessionStatus {
    #[serde(default)]
    online: bool,
}

pub struct HypixelStatusAdapter {
    agent: Agent,
    url: String,
    api_key: String,
    subject_uuid: String,
}

impl HypixelStatusAdapter {
    pub fn new(config: &Config) -> Self {
        let agent: Agent = Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(POLL_TIMEOUT_SECS)))
            .build()
            .into();
        Self {
            agent,
            url: config.status_url.clone(),
            api_key: config.api_key.clone(),
            subject_uuid: config.subject_uuid.clone(),
        }
    }
}

impl StatusAdapter for HypixelStatusAdapter {
    fn poll(&self) -> Result<bool, PollError> {
        let mut response = self
            .agent
            .get(&self.url)
            .query("uuid", self.subject_uuid.as_str())
            .header("API-Key", self.api_key.as_str())
            .call()
            .map_err(|err| PollError::Transport(err.to_string()))?;
        let body = response
            .body_mut()
            .read_to_string()
            .map_err(|err| PollError::Transport(err.to_string()))?;
        parse_status_body(&body)
    }
}

fn parse_status_body(body: &str) -> Result<bool, PollError> {
    let response: StatusResponse = serde_json::from_str(body)
        .map_err(|err| PollError::MalformedResponse(err.to_string()))?;
    Ok(response.session.online)
}

//! Scripted mock model for tests.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

use crate::error::ModelError;
use crate::model::{Model, ModelRequestParameters};
use nimbus_core::{ModelRequest, ModelResponse, ModelSettings};

/// A model that replays a scripted sequence of responses.
///
/// Each call to [`Model::request`] pops the next scripted response and
/// records a snapshot of the messages it was sent, so tests can assert on
/// both sides of the exchange. Running out of script is an API error, not a
/// panic, so a misbehaving loop under test fails visibly.
#[derive(Debug)]
pub struct MockModel {
    name: String,
    responses: Mutex<VecDeque<ModelResponse>>,
    requests: Mutex<Vec<Vec<ModelRequest>>>,
}

impl Default for MockModel {
    fn default() -> Self {
        Self::new()
    }
}

impl MockModel {
    /// Create an empty mock.
    #[must_use]
    pub fn new() -> Self {
        Self {
            name: "mock-model".to_string(),
            responses: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Queue a scripted response.
    #[must_use]
    pub fn with_response(self, response: ModelResponse) -> Self {
        self.responses
            .lock()
            .expect("mock lock poisoned")
            .push_back(response);
        self
    }

    /// Queue several scripted responses.
    #[must_use]
    pub fn with_responses(self, responses: impl IntoIterator<Item = ModelResponse>) -> Self {
        {
            let mut queue = self.responses.lock().expect("mock lock poisoned");
            queue.extend(responses);
        }
        self
    }

    /// Snapshots of the message lists received so far.
    #[must_use]
    pub fn received_requests(&self) -> Vec<Vec<ModelRequest>> {
        self.requests.lock().expect("mock lock poisoned").clone()
    }

    /// Number of requests made.
    #[must_use]
    pub fn request_count(&self) -> usize {
        self.requests.lock().expect("mock lock poisoned").len()
    }
}

#[async_trait]
impl Model for MockModel {
    fn name(&self) -> &str {
        &self.name
    }

    fn system(&self) -> &str {
        "mock"
    }

    async fn request(
        &self,
        messages: &[ModelRequest],
        _settings: &ModelSettings,
        _params: &ModelRequestParameters,
    ) -> Result<ModelResponse, ModelError> {
        self.requests
            .lock()
            .expect("mock lock poisoned")
            .push(messages.to_vec());

        self.responses
            .lock()
            .expect("mock lock poisoned")
            .pop_front()
            .ok_or_else(|| ModelError::api("mock model has no scripted response left"))
    }
}

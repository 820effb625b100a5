//! Token and call usage accounting.

use serde::{Deserialize, Serialize};

/// Usage reported for a single model request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RequestUsage {
    /// Tokens in the request.
    pub request_tokens: Option<u64>,
    /// Tokens in the response.
    pub response_tokens: Option<u64>,
    /// Total tokens, when the provider reports it directly.
    pub total_tokens: Option<u64>,
}

impl RequestUsage {
    /// Total tokens, computed from parts when not reported directly.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.total_tokens.unwrap_or_else(|| {
            self.request_tokens.unwrap_or(0) + self.response_tokens.unwrap_or(0)
        })
    }
}

/// Accumulated usage over a whole agent run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunUsage {
    /// Number of model requests made.
    pub requests: u32,
    /// Number of tool calls executed.
    pub tool_calls: u32,
    /// Number of retry prompts issued.
    pub retries: u32,
    /// Total request tokens.
    pub request_tokens: u64,
    /// Total response tokens.
    pub response_tokens: u64,
}

impl RunUsage {
    /// Create empty usage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold in the usage from one model request.
    pub fn add_request(&mut self, usage: &RequestUsage) {
        self.requests += 1;
        self.request_tokens += usage.request_tokens.unwrap_or(0);
        self.response_tokens += usage.response_tokens.unwrap_or(0);
    }

    /// Record a model request with no reported usage.
    pub fn record_request(&mut self) {
        self.requests += 1;
    }

    /// Record one tool call.
    pub fn record_tool_call(&mut self) {
        self.tool_calls += 1;
    }

    /// Record one retry prompt.
    pub fn record_retry(&mut self) {
        self.retries += 1;
    }

    /// Total tokens in both directions.
    #[must_use]
    pub fn total_tokens(&self) -> u64 {
        self.request_tokens + self.response_tokens
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_usage_total() {
        let usage = RequestUsage {
            request_tokens: Some(10),
            response_tokens: Some(5),
            total_tokens: None,
        };
        assert_eq!(usage.total(), 15);

        let usage = RequestUsage {
            request_tokens: Some(10),
            response_tokens: Some(5),
            total_tokens: Some(20),
        };
        assert_eq!(usage.total(), 20);
    }

    #[test]
    fn test_run_usage_accumulation() {
        let mut run = RunUsage::new();
        run.add_request(&RequestUsage {
            request_tokens: Some(100),
            response_tokens: Some(20),
            total_tokens: None,
        });
        run.record_tool_call();
        run.record_tool_call();
        run.record_retry();

        assert_eq!(run.requests, 1);
        assert_eq!(run.tool_calls, 2);
        assert_eq!(run.retries, 1);
        assert_eq!(run.total_tokens(), 120);
    }
}

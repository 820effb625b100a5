//! Run context threaded through tool calls.

use chrono::{DateTime, Utc};
use std::sync::Arc;

/// Context available to a tool during execution.
///
/// Carries the shared, read-only dependency bundle plus metadata about the
/// run and (when executing inside a tool) the current call. One context is
/// created per agent run; `for_tool` derives a per-call view.
#[derive(Debug, Clone)]
pub struct RunContext<Deps = ()> {
    /// Shared dependencies, immutable for the lifetime of the run.
    pub deps: Arc<Deps>,
    /// Unique id of this run.
    pub run_id: String,
    /// Name of the model driving the run.
    pub model_name: String,
    /// Name of the tool currently executing, if any.
    pub tool_name: Option<String>,
    /// Provider-assigned id of the current tool call, if any.
    pub tool_call_id: Option<String>,
    /// Retry prompts issued so far in this run.
    pub retry_count: u32,
    /// When the run started.
    pub start_time: DateTime<Utc>,
}

impl<Deps> RunContext<Deps> {
    /// Create a new run context.
    pub fn new(deps: Deps, model_name: impl Into<String>) -> Self {
        Self {
            deps: Arc::new(deps),
            run_id: generate_run_id(),
            model_name: model_name.into(),
            tool_name: None,
            tool_call_id: None,
            retry_count: 0,
            start_time: Utc::now(),
        }
    }

    /// Create a context from an already shared dependency bundle.
    pub fn from_arc(deps: Arc<Deps>, model_name: impl Into<String>) -> Self {
        Self {
            deps,
            run_id: generate_run_id(),
            model_name: model_name.into(),
            tool_name: None,
            tool_call_id: None,
            retry_count: 0,
            start_time: Utc::now(),
        }
    }

    /// Derive a per-call context for a tool execution.
    #[must_use]
    pub fn for_tool(&self, tool_name: &str, tool_call_id: Option<String>) -> Self {
        Self {
            deps: Arc::clone(&self.deps),
            run_id: self.run_id.clone(),
            model_name: self.model_name.clone(),
            tool_name: Some(tool_name.to_string()),
            tool_call_id,
            retry_count: self.retry_count,
            start_time: self.start_time,
        }
    }

    /// Seconds elapsed since the run started.
    #[must_use]
    pub fn elapsed_seconds(&self) -> f64 {
        (Utc::now() - self.start_time).num_milliseconds() as f64 / 1000.0
    }
}

/// Generate a unique run id.
pub fn generate_run_id() -> String {
    use std::sync::atomic::{AtomicU64, Ordering};
    static COUNTER: AtomicU64 = AtomicU64::new(0);
    let n = COUNTER.fetch_add(1, Ordering::Relaxed);
    format!("run-{}-{}", Utc::now().timestamp_millis(), n)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_for_tool_shares_deps() {
        let ctx = RunContext::new("deps".to_string(), "test-model");
        let tool_ctx = ctx.for_tool("get_lat_lng", Some("call_0".into()));

        assert!(Arc::ptr_eq(&ctx.deps, &tool_ctx.deps));
        assert_eq!(tool_ctx.tool_name.as_deref(), Some("get_lat_lng"));
        assert_eq!(tool_ctx.tool_call_id.as_deref(), Some("call_0"));
        assert_eq!(tool_ctx.run_id, ctx.run_id);
    }

    #[test]
    fn test_run_ids_are_unique() {
        let a = generate_run_id();
        let b = generate_run_id();
        assert_ne!(a, b);
    }
}

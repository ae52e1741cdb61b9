//! Data model for dispatched marketplace tasks

use crate::config::TaskDefaults;
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// One unit of outsourced human work, ready to be dispatched.
///
/// Built once per discovered item and consumed by the dispatcher; never
/// mutated afterward. The `body_xml` is the fully rendered question document
/// (see [`crate::marketplace::question`]).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkItem {
    /// Identifier of the upstream item this task is about (stored as the
    /// requester annotation on the remote side)
    pub external_id: String,
    pub title: String,
    pub description: String,
    /// Rendered question document, passed as a single string parameter
    pub body_xml: String,
    /// Reward per assignment, as a decimal string
    pub reward_amount: String,
    pub reward_currency: String,
    pub assignment_duration_secs: u32,
    /// Task lifetime; also bounds the completion-polling loop
    pub lifetime_secs: u32,
    /// Keywords in the order they are joined onto the wire
    pub keywords: Vec<String>,
    pub auto_approval_delay_secs: u32,
    /// Deduplication token for creation retries. The remote service honours
    /// it for 24 hours; a fresh logical work item needs a fresh token.
    pub idempotency_token: String,
    pub response_group: String,
}

impl WorkItem {
    /// Build a work item from configured policy defaults.
    ///
    /// The idempotency token is derived from the external id plus a random
    /// component, so re-discovering the same item produces a new token.
    pub fn from_defaults(
        external_id: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
        body_xml: impl Into<String>,
        defaults: &TaskDefaults,
    ) -> Self {
        let external_id = external_id.into();
        let idempotency_token = format!("{}-{}", external_id, Uuid::new_v4());
        Self {
            external_id,
            title: title.into(),
            description: description.into(),
            body_xml: body_xml.into(),
            reward_amount: defaults.reward_amount.clone(),
            reward_currency: defaults.reward_currency.clone(),
            assignment_duration_secs: defaults.assignment_duration_secs,
            lifetime_secs: defaults.lifetime_secs,
            keywords: defaults.keywords.clone(),
            auto_approval_delay_secs: defaults.auto_approval_delay_secs,
            idempotency_token,
            response_group: defaults.response_group.clone(),
        }
    }
}

/// Handle to a created remote task; the sole key used to poll for results
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskHandle {
    pub task_id: String,
    pub created_at: DateTime<Utc>,
}

/// Outcome of a single result poll
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollResult {
    /// No assignment has been submitted yet
    Pending,
    /// A worker submitted an answer with this free-text content
    Answered(String),
    /// The service marked the poll response invalid
    Invalid(String),
}

/// Status row returned by a bulk task search
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskSummary {
    pub task_id: String,
    pub title: String,
    pub status: String,
    pub expiration: String,
    pub assignments_pending: String,
    pub assignments_available: String,
    pub assignments_completed: String,
}

/// Paging filter for bulk task searches
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchFilter {
    pub page_size: Option<u32>,
    pub page_number: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_defaults_fills_policy_fields() {
        let defaults = TaskDefaults::default();
        let item = WorkItem::from_defaults("tweet-1", "Title", "Desc", "<xml/>", &defaults);

        assert_eq!(item.external_id, "tweet-1");
        assert_eq!(item.reward_amount, defaults.reward_amount);
        assert_eq!(item.reward_currency, "USD");
        assert_eq!(item.assignment_duration_secs, 600);
        assert_eq!(item.lifetime_secs, 1200);
        assert_eq!(item.response_group, "Minimal");
    }

    #[test]
    fn test_from_defaults_generates_fresh_tokens() {
        let defaults = TaskDefaults::default();
        let a = WorkItem::from_defaults("tweet-1", "T", "D", "<xml/>", &defaults);
        let b = WorkItem::from_defaults("tweet-1", "T", "D", "<xml/>", &defaults);

        assert!(a.idempotency_token.starts_with("tweet-1-"));
        assert_ne!(a.idempotency_token, b.idempotency_token);
    }
}

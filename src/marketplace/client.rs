//! Authenticated RPC-over-HTTP-form client for the marketplace
//!
//! Every request is a URL-encoded form POST carrying `Operation`, `Version`,
//! the access key id, an RFC 3339 timestamp, and a signature computed over
//! the same timestamp. Responses are XML envelopes with a validity flag that
//! is checked before the payload is trusted. The client never retries;
//! exactly-once creation across caller retries comes from the caller-supplied
//! idempotency token.

use crate::config::{Credentials, MarketplaceSection};
use crate::error::{MarketError, MarketResult};
use crate::marketplace::wire::{
    AssignmentsResponse, CreateTaskResponse, SearchTasksResponse, TaskAnswers,
};
use crate::poller::ResultSource;
use crate::signing;
use crate::task::{PollResult, SearchFilter, TaskHandle, TaskSummary, WorkItem};
use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, warn};

const CREATE_TASK_OPERATION: &str = "CreateHIT";
const GET_ASSIGNMENTS_OPERATION: &str = "GetAssignmentsForHIT";
const SEARCH_TASKS_OPERATION: &str = "SearchHITs";

/// Marketplace client; cheap to share behind an `Arc` across dispatchers and
/// pollers (credentials are read-only after construction)
pub struct MarketplaceClient {
    endpoint: String,
    service: String,
    version: String,
    credentials: Credentials,
    http: Client,
}

impl MarketplaceClient {
    /// Create a new client for the configured endpoint
    pub fn new(config: &MarketplaceSection, credentials: Credentials) -> MarketResult<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.http_timeout_secs))
            .build()?;
        Ok(Self {
            endpoint: config.endpoint.clone(),
            service: config.service.clone(),
            version: config.version.clone(),
            credentials,
            http,
        })
    }

    /// Create one remote task for the given work item.
    ///
    /// One call means one task with real monetary cost; callers must not
    /// repeat it for the same logical item without a fresh idempotency token.
    pub async fn create_task(&self, item: &WorkItem) -> MarketResult<TaskHandle> {
        let params = vec![
            ("Title".to_string(), item.title.clone()),
            ("Description".to_string(), item.description.clone()),
            ("Question".to_string(), item.body_xml.clone()),
            (
                "Reward.1.Amount".to_string(),
                item.reward_amount.clone(),
            ),
            (
                "Reward.1.CurrencyCode".to_string(),
                item.reward_currency.clone(),
            ),
            (
                "LifetimeInSeconds".to_string(),
                item.lifetime_secs.to_string(),
            ),
            (
                "AssignmentDurationInSeconds".to_string(),
                item.assignment_duration_secs.to_string(),
            ),
            ("Keywords".to_string(), item.keywords.join(",")),
            (
                "AutoApprovalDelayInSeconds".to_string(),
                item.auto_approval_delay_secs.to_string(),
            ),
            (
                "RequesterAnnotation".to_string(),
                item.external_id.clone(),
            ),
            (
                "UniqueRequestToken".to_string(),
                item.idempotency_token.clone(),
            ),
            ("ResponseGroup".to_string(), item.response_group.clone()),
        ];

        let response: CreateTaskResponse =
            self.post_form(CREATE_TASK_OPERATION, params).await?;

        if !response.task.request.valid() {
            return Err(MarketError::invalid_response(
                "task creation response was marked invalid",
            ));
        }

        Ok(TaskHandle {
            task_id: response.task.task_id,
            created_at: Utc::now(),
        })
    }

    /// Fetch the current result of a task.
    ///
    /// An invalid envelope is a [`PollResult::Invalid`], not an error: a poll
    /// loop treats it as "try again on the next tick". Absence of any
    /// assignment is [`PollResult::Pending`]. A submitted answer goes through
    /// a second decode pass before its free text is extracted.
    pub async fn get_task_result(&self, task_id: &str) -> MarketResult<PollResult> {
        let params = vec![("HITId".to_string(), task_id.to_string())];
        let response: AssignmentsResponse =
            self.post_form(GET_ASSIGNMENTS_OPERATION, params).await?;

        let result = response.result;
        if !result.request.valid() {
            return Ok(PollResult::Invalid(
                "assignments response was marked invalid".to_string(),
            ));
        }

        let Some(assignment) = result.assignment else {
            return Ok(PollResult::Pending);
        };

        if assignment.answer.is_empty() {
            // Assignment row present but no answer document attached yet.
            return Ok(PollResult::Pending);
        }

        let answers: TaskAnswers = quick_xml::de::from_str(&assignment.answer)
            .map_err(MarketError::AnswerDecode)?;

        debug!(
            task_id = %task_id,
            assignment_id = %assignment.assignment_id,
            worker_id = %assignment.worker_id,
            "assignment answer decoded"
        );
        Ok(PollResult::Answered(answers.answer.free_text))
    }

    /// Bulk status query over this requester's tasks
    pub async fn search_tasks(&self, filter: &SearchFilter) -> MarketResult<Vec<TaskSummary>> {
        let mut params = Vec::new();
        if let Some(page_size) = filter.page_size {
            params.push(("PageSize".to_string(), page_size.to_string()));
        }
        if let Some(page_number) = filter.page_number {
            params.push(("PageNumber".to_string(), page_number.to_string()));
        }

        let response: SearchTasksResponse =
            self.post_form(SEARCH_TASKS_OPERATION, params).await?;

        if !response.request.valid() {
            return Err(MarketError::invalid_response(
                "search response was marked invalid",
            ));
        }

        Ok(response
            .tasks
            .into_iter()
            .map(|row| TaskSummary {
                task_id: row.task_id,
                title: row.title,
                status: row.status,
                expiration: row.expiration,
                assignments_pending: row.assignments_pending,
                assignments_available: row.assignments_available,
                assignments_completed: row.assignments_completed,
            })
            .collect())
    }

    /// Stamp and sign the parameter set, then POST it as a form and decode
    /// the XML response.
    ///
    /// The signature is computed over the exact timestamp transmitted with
    /// the request and is the last parameter added.
    async fn post_form<T: DeserializeOwned>(
        &self,
        operation: &str,
        mut params: Vec<(String, String)>,
    ) -> MarketResult<T> {
        let timestamp = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);
        params.push(("Operation".to_string(), operation.to_string()));
        params.push(("Version".to_string(), self.version.clone()));
        params.push((
            "AWSAccessKeyId".to_string(),
            self.credentials.access_key.clone(),
        ));
        params.push(("Timestamp".to_string(), timestamp.clone()));

        let signature =
            signing::sign(&self.credentials.secret_key, &self.service, operation, &timestamp);
        params.push(("Signature".to_string(), signature));

        debug!(operation = %operation, endpoint = %self.endpoint, "posting marketplace request");

        let response = self.http.post(&self.endpoint).form(&params).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            warn!(operation = %operation, status = %status, "marketplace returned HTTP error");
        }
        debug!(operation = %operation, bytes = body.len(), "marketplace response received");

        Ok(quick_xml::de::from_str(&body)?)
    }
}

#[async_trait]
impl ResultSource for MarketplaceClient {
    async fn get_task_result(&self, task_id: &str) -> MarketResult<PollResult> {
        MarketplaceClient::get_task_result(self, task_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;

    fn test_client() -> MarketplaceClient {
        let config = AppConfig::test_config();
        let credentials = Credentials {
            access_key: "AKID".to_string(),
            secret_key: "secret".to_string(),
        };
        MarketplaceClient::new(&config.marketplace, credentials).unwrap()
    }

    #[test]
    fn test_client_creation() {
        let client = test_client();
        assert_eq!(client.endpoint, "https://mechanicalturk.example.com/");
        assert_eq!(client.version, "2012-03-25");
    }

    #[test]
    fn test_answer_payload_decode_failure_is_attributed() {
        let err = quick_xml::de::from_str::<TaskAnswers>("<broken")
            .map_err(MarketError::AnswerDecode)
            .unwrap_err();
        assert!(matches!(err, MarketError::AnswerDecode(_)));
    }
}

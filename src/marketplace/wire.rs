//! Typed XML response envelopes for the marketplace wire protocol
//!
//! Every envelope carries a validity flag that must be checked before the
//! payload is trusted. The worker's answer arrives as opaque escaped text
//! inside the outer envelope and needs a second decode pass ([`TaskAnswers`]);
//! that pass lives in the client so envelope failures and payload failures
//! stay attributable.

use serde::Deserialize;

/// Per-request status block embedded in every response
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RequestStatus {
    /// The service sends "True"/"False"; absent means not valid
    #[serde(rename = "IsValid", default)]
    pub is_valid: String,
}

impl RequestStatus {
    pub fn valid(&self) -> bool {
        self.is_valid.eq_ignore_ascii_case("true")
    }
}

/// Response to a task-creation request (`CreateHIT`)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateTaskResponse {
    #[serde(rename = "HIT", default)]
    pub task: CreatedTask,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreatedTask {
    #[serde(rename = "Request", default)]
    pub request: RequestStatus,
    #[serde(rename = "HITId", default)]
    pub task_id: String,
    #[serde(rename = "HITTypeId", default)]
    pub task_type_id: String,
}

/// Response to a result poll (`GetAssignmentsForHIT`)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AssignmentsResponse {
    #[serde(rename = "GetAssignmentsForHITResult", default)]
    pub result: AssignmentsResult,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AssignmentsResult {
    #[serde(rename = "Request", default)]
    pub request: RequestStatus,
    #[serde(rename = "NumResults", default)]
    pub num_results: i32,
    #[serde(rename = "TotalNumResults", default)]
    pub total_num_results: i32,
    #[serde(rename = "PageNumber", default)]
    pub page_number: i32,
    /// Absent until a worker has submitted
    #[serde(rename = "Assignment", default)]
    pub assignment: Option<Assignment>,
}

/// One worker's attempt at a task
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Assignment {
    #[serde(rename = "AssignmentId", default)]
    pub assignment_id: String,
    #[serde(rename = "WorkerId", default)]
    pub worker_id: String,
    #[serde(rename = "HITId", default)]
    pub task_id: String,
    #[serde(rename = "AssignmentStatus", default)]
    pub status: String,
    #[serde(rename = "SubmitTime", default)]
    pub submit_time: String,
    /// Opaque serialized answer document; decode with [`TaskAnswers`]
    #[serde(rename = "Answer", default)]
    pub answer: String,
}

/// Inner answer document, decoded from [`Assignment::answer`] in a second pass
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TaskAnswers {
    #[serde(rename = "Answer", default)]
    pub answer: FreeTextAnswerValue,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FreeTextAnswerValue {
    #[serde(rename = "QuestionIdentifier", default)]
    pub question_identifier: String,
    #[serde(rename = "FreeText", default)]
    pub free_text: String,
}

/// Response to a bulk status query (`SearchHITs`)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchTasksResponse {
    #[serde(rename = "Request", default)]
    pub request: RequestStatus,
    #[serde(rename = "NumResults", default)]
    pub num_results: i32,
    #[serde(rename = "TotalNumResults", default)]
    pub total_num_results: i32,
    #[serde(rename = "PageNumber", default)]
    pub page_number: i32,
    #[serde(rename = "HIT", default)]
    pub tasks: Vec<TaskRow>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TaskRow {
    #[serde(rename = "HITId", default)]
    pub task_id: String,
    #[serde(rename = "Title", default)]
    pub title: String,
    #[serde(rename = "HITStatus", default)]
    pub status: String,
    #[serde(rename = "Expiration", default)]
    pub expiration: String,
    #[serde(rename = "NumberOfAssignmentsPending", default)]
    pub assignments_pending: String,
    #[serde(rename = "NumberOfAssignmentsAvailable", default)]
    pub assignments_available: String,
    #[serde(rename = "NumberOfAssignmentsCompleted", default)]
    pub assignments_completed: String,
}

//! End-to-end flow: dispatch a work item, poll until a worker answers
//!
//! Runs the real dispatcher and poller against a mock marketplace that
//! returns "no assignment yet" twice before producing an answer.

use std::sync::Arc;
use std::time::Duration;
use turkpost::config::{Credentials, MarketplaceSection, TaskDefaults};
use turkpost::dispatch::TaskDispatcher;
use turkpost::marketplace::{MarketplaceClient, QuestionForm};
use turkpost::poller::{CompletionPoller, PollOutcome};
use turkpost::task::WorkItem;
use wiremock::matchers::{body_string_contains, method};
use wiremock::{Mock, MockServer, ResponseTemplate};

const CREATE_OK: &str = r#"
<CreateHITResponse>
    <HIT>
        <Request><IsValid>True</IsValid></Request>
        <HITId>FLOWTASK</HITId>
    </HIT>
</CreateHITResponse>"#;

const POLL_PENDING: &str = r#"
<GetAssignmentsForHITResponse>
    <GetAssignmentsForHITResult>
        <Request><IsValid>True</IsValid></Request>
        <NumResults>0</NumResults>
    </GetAssignmentsForHITResult>
</GetAssignmentsForHITResponse>"#;

const POLL_ANSWERED: &str = r#"
<GetAssignmentsForHITResponse>
    <GetAssignmentsForHITResult>
        <Request><IsValid>True</IsValid></Request>
        <NumResults>1</NumResults>
        <Assignment>
            <AssignmentId>A1</AssignmentId>
            <Answer>&lt;QuestionFormAnswers&gt;&lt;Answer&gt;&lt;FreeText&gt;🐳&lt;/FreeText&gt;&lt;/Answer&gt;&lt;/QuestionFormAnswers&gt;</Answer>
        </Assignment>
    </GetAssignmentsForHITResult>
</GetAssignmentsForHITResponse>"#;

fn test_setup(endpoint: &str) -> (Arc<MarketplaceClient>, TaskDefaults) {
    let config: MarketplaceSection =
        toml::from_str(&format!("endpoint = \"{endpoint}\"\nhttp_timeout_secs = 5\n")).unwrap();
    let credentials = Credentials {
        access_key: "AKID".to_string(),
        secret_key: "test-secret".to_string(),
    };
    let client = Arc::new(MarketplaceClient::new(&config, credentials).unwrap());
    (client, TaskDefaults::default())
}

#[tokio::test]
async fn test_dispatch_then_poll_to_answer() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(body_string_contains("Operation=CreateHIT"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(CREATE_OK, "text/xml"))
        .expect(1)
        .mount(&mock_server)
        .await;

    // Two pending polls, then the answer. Mocks are matched in mount order;
    // the pending mock stops matching after its two uses.
    Mock::given(method("POST"))
        .and(body_string_contains("Operation=GetAssignmentsForHIT"))
        .and(body_string_contains("HITId=FLOWTASK"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(POLL_PENDING, "text/xml"))
        .up_to_n_times(2)
        .mount(&mock_server)
        .await;
    Mock::given(method("POST"))
        .and(body_string_contains("Operation=GetAssignmentsForHIT"))
        .and(body_string_contains("HITId=FLOWTASK"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(POLL_ANSWERED, "text/xml"))
        .mount(&mock_server)
        .await;

    let (client, defaults) = test_setup(&mock_server.uri());

    let body = QuestionForm::free_text("q1", "Translate tweet", "Translate this into emoji")
        .to_xml()
        .unwrap();
    let item = WorkItem::from_defaults("tweet-42", "Translate tweet", "Pick emoji", body, &defaults);

    let dispatcher = TaskDispatcher::new(client.clone());
    let handle = dispatcher.dispatch(&item).await.unwrap();
    assert_eq!(handle.task_id, "FLOWTASK");

    // Short real-time tick; the deadline is generous enough that only a bug
    // could hit it.
    let poller = CompletionPoller::new(client, Duration::from_millis(25));
    let outcome = poller.run(&handle, Duration::from_secs(10)).await;

    assert_eq!(outcome, PollOutcome::Answered("🐳".to_string()));
}

#[tokio::test]
async fn test_poll_timeout_when_no_worker_answers() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(body_string_contains("Operation=GetAssignmentsForHIT"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(POLL_PENDING, "text/xml"))
        .mount(&mock_server)
        .await;

    let (client, _) = test_setup(&mock_server.uri());
    let handle = turkpost::task::TaskHandle {
        task_id: "FLOWTASK".to_string(),
        created_at: chrono::Utc::now(),
    };

    let poller = CompletionPoller::new(client, Duration::from_millis(25));
    let outcome = poller.run(&handle, Duration::from_millis(200)).await;

    assert_eq!(outcome, PollOutcome::TimedOut);
}

#[tokio::test]
async fn test_invalid_poll_response_does_not_end_the_loop() {
    let mock_server = MockServer::start().await;

    let invalid = r#"
        <GetAssignmentsForHITResponse>
            <GetAssignmentsForHITResult>
                <Request><IsValid>False</IsValid></Request>
            </GetAssignmentsForHITResult>
        </GetAssignmentsForHITResponse>"#;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(invalid, "text/xml"))
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(POLL_ANSWERED, "text/xml"))
        .mount(&mock_server)
        .await;

    let (client, _) = test_setup(&mock_server.uri());
    let handle = turkpost::task::TaskHandle {
        task_id: "FLOWTASK".to_string(),
        created_at: chrono::Utc::now(),
    };

    let poller = CompletionPoller::new(client, Duration::from_millis(25));
    let outcome = poller.run(&handle, Duration::from_secs(10)).await;

    assert_eq!(outcome, PollOutcome::Answered("🐳".to_string()));
}

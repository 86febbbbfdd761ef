//! Tests for the job polling loop.

mod common;

use common::{client_for, client_with_retries, job_state, sequence};
use std::cell::Cell;
use thematic_client::ClientError;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const INFO_PATH: &str = "/job/job-1/info";

#[tokio::test]
async fn test_wait_finishes_after_in_progress() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(INFO_PATH))
        .and(header("X-API-Authentication", common::API_KEY))
        .respond_with(sequence(vec![
            job_state("in_progress"),
            job_state("in_progress"),
            job_state("finished"),
        ]))
        .expect(3)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let timings = client.wait_for_job_completion("job-1").await.unwrap();

    assert_eq!(timings.polls, 3);
    assert!(timings.processing.is_some());
}

#[tokio::test]
async fn test_wait_without_in_progress_has_no_processing_time() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(INFO_PATH))
        .respond_with(sequence(vec![job_state("queued"), job_state("finished")]))
        .expect(2)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let timings = client.wait_for_job_completion("job-1").await.unwrap();

    assert_eq!(timings.polls, 2);
    assert!(timings.processing.is_none());
}

#[tokio::test]
async fn test_wait_errored_on_first_poll() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(INFO_PATH))
        .respond_with(job_state("errored"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let result = client.wait_for_job_completion("job-1").await;

    match result {
        Err(ClientError::JobErrored { job_id }) => assert_eq!(job_id, "job-1"),
        other => panic!("Expected JobErrored, got {other:?}"),
    }
}

#[tokio::test]
async fn test_wait_canceled() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(INFO_PATH))
        .respond_with(sequence(vec![job_state("in_progress"), job_state("canceled")]))
        .expect(2)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let err = client.wait_for_job_completion("job-1").await.unwrap_err();

    assert!(matches!(err, ClientError::JobCanceled { .. }));
    assert!(err.is_job_outcome());
}

#[tokio::test]
async fn test_wait_interrupted_by_callback() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(INFO_PATH))
        .respond_with(job_state("in_progress"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let calls = Cell::new(0);
    let result = client
        .wait_for_job_completion_with("job-1", || {
            calls.set(calls.get() + 1);
            false
        })
        .await;

    assert!(matches!(result, Err(ClientError::Interrupted { .. })));
    assert_eq!(calls.get(), 1);
}

#[tokio::test]
async fn test_wait_callback_runs_once_per_poll() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(INFO_PATH))
        .respond_with(sequence(vec![
            job_state("queued"),
            job_state("in_progress"),
            job_state("finished"),
        ]))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let calls = Cell::new(0);
    client
        .wait_for_job_completion_with("job-1", || {
            calls.set(calls.get() + 1);
            true
        })
        .await
        .unwrap();

    // The finishing poll returns before the callback.
    assert_eq!(calls.get(), 2);
}

#[tokio::test]
async fn test_wait_keeps_going_on_unknown_state() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(INFO_PATH))
        .respond_with(sequence(vec![
            job_state("uploading"),
            job_state("finished"),
        ]))
        .expect(2)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    assert!(client.wait_for_job_completion("job-1").await.is_ok());
}

#[tokio::test]
async fn test_wait_tolerates_transient_failures() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(INFO_PATH))
        .respond_with(sequence(vec![
            ResponseTemplate::new(502).set_body_string("Bad Gateway"),
            ResponseTemplate::new(502).set_body_string("Bad Gateway"),
            job_state("finished"),
        ]))
        .expect(3)
        .mount(&mock_server)
        .await;

    let client = client_with_retries(&mock_server, 5);
    let timings = client.wait_for_job_completion("job-1").await.unwrap();

    assert_eq!(timings.polls, 3);
}

#[tokio::test]
async fn test_wait_failure_counter_resets_after_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(INFO_PATH))
        .respond_with(sequence(vec![
            ResponseTemplate::new(500),
            job_state("in_progress"),
            ResponseTemplate::new(500),
            job_state("finished"),
        ]))
        .expect(4)
        .mount(&mock_server)
        .await;

    let client = client_with_retries(&mock_server, 1);
    assert!(client.wait_for_job_completion("job-1").await.is_ok());
}

#[tokio::test]
async fn test_wait_gives_up_after_retry_budget() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(INFO_PATH))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .expect(3)
        .mount(&mock_server)
        .await;

    let client = client_with_retries(&mock_server, 2);
    let err = client.wait_for_job_completion("job-1").await.unwrap_err();

    match err {
        ClientError::PollFailed {
            job_id,
            attempts,
            source,
        } => {
            assert_eq!(job_id, "job-1");
            assert_eq!(attempts, 3);
            assert!(matches!(*source, ClientError::Api { status: 500, .. }));
        }
        other => panic!("Expected PollFailed, got {other:?}"),
    }
}

#[tokio::test]
async fn test_wait_zero_retries_fails_on_first_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(INFO_PATH))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_with_retries(&mock_server, 0);
    let err = client.wait_for_job_completion("job-1").await.unwrap_err();

    assert!(matches!(err, ClientError::PollFailed { attempts: 1, .. }));
}

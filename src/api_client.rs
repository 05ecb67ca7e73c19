use crate::args::Args;
use anyhow::Result;
use reqwest::{
    blocking::{Client, Response},
    Method, StatusCode,
};
use serde::Deserialize;
use serde_json::Value;
use std::{
    thread,
    time::{Duration, Instant},
};
use thiserror::Error;

const CLI_ENDPOINT: &str = "api/private/cli";
const JOBS_ENDPOINT: &str = "api/cluster/jobs";

// How long mutating calls are polled before giving up on the job.
const POLL_TIMEOUT: Duration = Duration::from_secs(120);
const POLL_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Debug, Error)]
pub enum RestCliError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("cluster returned {status}: {message}")]
    Api { status: StatusCode, message: String },

    #[error("job failed: {message}")]
    JobFailed { message: String },

    #[error("job did not complete within {secs} seconds")]
    JobTimeout { secs: u64 },
}

/// Client for the REST API CLI passthrough of a single cluster.
#[derive(Debug)]
pub struct CliClient {
    client: Client,
    base_url: String,
    username: String,
    password: String,
}

impl CliClient {
    pub fn new(args: &Args, password: &str) -> Result<Self> {
        Ok(Self {
            client: CliClient::build_client()?,
            base_url: format!("https://{}", args.cluster),
            username: args.username.clone(),
            password: password.to_string(),
        })
    }

    /// Run a legacy CLI command through the passthrough endpoint and return
    /// the response payload. Query parameters end up in the URL, `body` is
    /// sent as JSON. Accepted jobs are polled to completion first.
    pub fn execute(
        &self,
        command: &str,
        query: &[(&str, &str)],
        body: Option<&Value>,
    ) -> Result<Value, RestCliError> {
        let (method, path) = route(command);
        let url = format!("{}/{}/{}", self.base_url, CLI_ENDPOINT, path);
        tracing::debug!(%method, %url, ?query, ?body, "issuing CLI passthrough call");

        let mut request = self
            .client
            .request(method, &url)
            .basic_auth(&self.username, Some(&self.password));
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send()?;
        let status = response.status();
        tracing::debug!(%status, %url, "cluster answered");

        if status == StatusCode::ACCEPTED {
            let output: Value = response.json()?;
            if let Ok(accepted) = serde_json::from_value::<JobResponse>(output.clone()) {
                self.wait_for_job(&accepted.job.uuid)?;
            }
            return Ok(output);
        }
        if !status.is_success() {
            return Err(RestCliError::Api {
                status,
                message: error_message(response),
            });
        }
        response.json().map_err(Into::into)
    }

    fn wait_for_job(&self, uuid: &str) -> Result<(), RestCliError> {
        let url = format!("{}/{}/{}", self.base_url, JOBS_ENDPOINT, uuid);
        let deadline = Instant::now() + POLL_TIMEOUT;

        loop {
            let job: JobStatus = self
                .client
                .get(&url)
                .basic_auth(&self.username, Some(&self.password))
                .send()?
                .json()?;

            match job.state {
                JobState::Success => return Ok(()),
                JobState::Failure => {
                    return Err(RestCliError::JobFailed {
                        message: job
                            .message
                            .unwrap_or_else(|| String::from("no failure message returned")),
                    })
                }
                JobState::Queued | JobState::Running | JobState::Paused => {
                    tracing::debug!(uuid, state = ?job.state, "job still in progress");
                }
            }

            if Instant::now() >= deadline {
                return Err(RestCliError::JobTimeout {
                    secs: POLL_TIMEOUT.as_secs(),
                });
            }
            thread::sleep(POLL_INTERVAL);
        }
    }

    fn build_client() -> Result<Client> {
        // Appliances routinely present self-signed certificates.
        Client::builder()
            .danger_accept_invalid_certs(true)
            .timeout(None)
            .build()
            .map_err(Into::into)
    }
}

/// Map a CLI command to its passthrough endpoint. The final word selects the
/// HTTP method; anything other than show/create/modify/delete is a non-CRUD
/// action and is POSTed with the full command as the path.
fn route(command: &str) -> (Method, String) {
    let words: Vec<&str> = command.split_whitespace().collect();
    let (method, path_words) = match words.split_last() {
        Some((&"show", rest)) => (Method::GET, rest),
        Some((&"create", rest)) => (Method::POST, rest),
        Some((&"modify", rest)) => (Method::PATCH, rest),
        Some((&"delete", rest)) => (Method::DELETE, rest),
        _ => (Method::POST, words.as_slice()),
    };
    (method, path_words.join("/"))
}

fn error_message(response: Response) -> String {
    response
        .json::<ErrorResponse>()
        .map(|body| body.error.message)
        .unwrap_or_else(|_| String::from("no error details returned"))
}

#[derive(Deserialize, Debug)]
struct JobResponse {
    job: JobRef,
}

#[derive(Deserialize, Debug)]
struct JobRef {
    uuid: String,
}

#[derive(Deserialize, Debug)]
struct JobStatus {
    state: JobState,
    message: Option<String>,
}

#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
enum JobState {
    Queued,
    Running,
    Paused,
    Success,
    Failure,
}

#[derive(Deserialize, Debug)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Deserialize, Debug)]
struct ErrorBody {
    message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn show_routes_to_get() {
        assert_eq!(route("volume show"), (Method::GET, "volume".to_string()));
    }

    #[test]
    fn create_routes_to_post() {
        assert_eq!(
            route("volume efficiency policy create"),
            (Method::POST, "volume/efficiency/policy".to_string())
        );
    }

    #[test]
    fn modify_routes_to_patch() {
        assert_eq!(
            route("volume efficiency modify"),
            (Method::PATCH, "volume/efficiency".to_string())
        );
    }

    #[test]
    fn delete_routes_to_delete() {
        assert_eq!(
            route("volume efficiency policy delete"),
            (Method::DELETE, "volume/efficiency/policy".to_string())
        );
    }

    #[test]
    fn non_crud_actions_post_the_full_command() {
        assert_eq!(
            route("system node reboot"),
            (Method::POST, "system/node/reboot".to_string())
        );
    }

    #[test]
    fn parses_job_reference() {
        let accepted: JobResponse =
            serde_json::from_str(r#"{"job": {"uuid": "ae3b-1f", "_links": {}}}"#).unwrap();
        assert_eq!(accepted.job.uuid, "ae3b-1f");
    }

    #[test]
    fn parses_job_states() {
        let running: JobStatus = serde_json::from_str(r#"{"state": "running"}"#).unwrap();
        assert_eq!(running.state, JobState::Running);
        assert_eq!(running.message, None);

        let failed: JobStatus =
            serde_json::from_str(r#"{"state": "failure", "message": "entry does not exist"}"#)
                .unwrap();
        assert_eq!(failed.state, JobState::Failure);
        assert_eq!(failed.message.as_deref(), Some("entry does not exist"));
    }

    #[test]
    fn parses_error_payload() {
        let body: ErrorResponse = serde_json::from_str(
            r#"{"error": {"message": "invalid field \"bogus\"", "code": "2"}}"#,
        )
        .unwrap();
        assert_eq!(body.error.message, "invalid field \"bogus\"");
    }
}

//! Log group/stream provisioning and log event publishing.
//!
//! The cold start needs a log group and a log stream to exist before it can
//! write its message. "Exists" is checked with a describe-by-prefix call and
//! fixed up with a create call. Those two steps aren't atomic, so another
//! instance starting up at the same moment may create the resource in
//! between. Backends report that case as [`CreateOutcome::AlreadyExisted`]
//! and we treat it as success.

use async_trait::async_trait;
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;

use lambda_runtime::tracing;

pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, Error)]
pub enum LogsError {
    #[error("failed to describe `{resource}`")]
    Describe {
        resource: String,
        #[source]
        source: BoxError,
    },

    #[error("failed to create `{resource}`")]
    Create {
        resource: String,
        #[source]
        source: BoxError,
    },

    #[error("failed to put log events to `{group}`:`{stream}`")]
    PutEvent {
        group: String,
        stream: String,
        #[source]
        source: BoxError,
    },
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CreateOutcome {
    Created,

    /// Someone else got there first.
    AlreadyExisted,
}

/// One event, as submitted to the backend.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LogEvent {
    pub message: String,
    pub timestamp_millis: i64,
}

impl LogEvent {
    pub fn now<S: Into<String>>(message: S) -> Self {
        LogEvent {
            message: message.into(),
            timestamp_millis: now_millis(),
        }
    }
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct PutAck {
    pub next_sequence_token: Option<String>,

    /// Whether the backend flagged any of the submitted events as rejected
    /// (too old, too new, or expired).
    pub rejected: bool,
}

/// The subset of the CloudWatch Logs API that we use.
#[async_trait]
pub trait LogBackend: Send + Sync {
    /// Names of the log groups whose names start with `prefix`.
    async fn describe_log_groups(&self, prefix: &str) -> Result<Vec<String>, LogsError>;

    async fn create_log_group(&self, name: &str) -> Result<CreateOutcome, LogsError>;

    /// Names of the streams in `group` whose names start with `prefix`.
    async fn describe_log_streams(
        &self,
        group: &str,
        prefix: &str,
    ) -> Result<Vec<String>, LogsError>;

    async fn create_log_stream(&self, group: &str, name: &str)
        -> Result<CreateOutcome, LogsError>;

    async fn put_log_events(
        &self,
        group: &str,
        stream: &str,
        events: Vec<LogEvent>,
    ) -> Result<PutAck, LogsError>;
}

/// Make sure that the log group `name` exists.
///
/// Returns `true` if the group was already there, `false` if we had to create
/// it (or lost a creation race to another instance).
pub async fn ensure_log_group<B: LogBackend + ?Sized>(
    backend: &B,
    name: &str,
) -> Result<bool, LogsError> {
    if !backend.describe_log_groups(name).await?.is_empty() {
        return Ok(true);
    }

    match backend.create_log_group(name).await? {
        CreateOutcome::Created => tracing::info!("created log group {name}"),
        CreateOutcome::AlreadyExisted => {
            tracing::info!("log group {name} appeared concurrently; using it")
        }
    }

    Ok(false)
}

/// Make sure that the log stream `stream` exists within `group`. Same
/// semantics as [`ensure_log_group`].
pub async fn ensure_log_stream<B: LogBackend + ?Sized>(
    backend: &B,
    group: &str,
    stream: &str,
) -> Result<bool, LogsError> {
    if !backend.describe_log_streams(group, stream).await?.is_empty() {
        return Ok(true);
    }

    match backend.create_log_stream(group, stream).await? {
        CreateOutcome::Created => tracing::info!("created log stream {group}:{stream}"),
        CreateOutcome::AlreadyExisted => {
            tracing::info!("log stream {group}:{stream} appeared concurrently; using it")
        }
    }

    Ok(false)
}

/// Write `message` as a single event stamped with the current time.
///
/// There is no sequence token handling: we write exactly once per process.
pub async fn publish<B: LogBackend + ?Sized>(
    backend: &B,
    group: &str,
    stream: &str,
    message: &str,
) -> Result<PutAck, LogsError> {
    let event = LogEvent::now(message);
    backend.put_log_events(group, stream, vec![event]).await
}

pub fn now_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or_default()
}

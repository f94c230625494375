//! [`LogBackend`] on top of the real CloudWatch Logs client.
//!
//! Only the first page of describe results is consulted: we look up by the
//! full name as prefix, so the interesting match is always on it.

use async_trait::async_trait;
use aws_sdk_cloudwatchlogs::{types::InputLogEvent, Client};

use crate::logs::{BoxError, CreateOutcome, LogBackend, LogEvent, LogsError, PutAck};

#[async_trait]
impl LogBackend for Client {
    async fn describe_log_groups(&self, prefix: &str) -> Result<Vec<String>, LogsError> {
        let out = self
            .describe_log_groups()
            .log_group_name_prefix(prefix)
            .send()
            .await
            .map_err(|e| LogsError::Describe {
                resource: prefix.to_owned(),
                source: e.into(),
            })?;

        Ok(out
            .log_groups()
            .iter()
            .filter_map(|g| g.log_group_name())
            .map(str::to_owned)
            .collect())
    }

    async fn create_log_group(&self, name: &str) -> Result<CreateOutcome, LogsError> {
        match self.create_log_group().log_group_name(name).send().await {
            Ok(_) => Ok(CreateOutcome::Created),

            Err(e)
                if e.as_service_error()
                    .map(|se| se.is_resource_already_exists_exception())
                    .unwrap_or(false) =>
            {
                Ok(CreateOutcome::AlreadyExisted)
            }

            Err(e) => Err(LogsError::Create {
                resource: name.to_owned(),
                source: e.into(),
            }),
        }
    }

    async fn describe_log_streams(
        &self,
        group: &str,
        prefix: &str,
    ) -> Result<Vec<String>, LogsError> {
        let out = self
            .describe_log_streams()
            .log_group_name(group)
            .log_stream_name_prefix(prefix)
            .send()
            .await
            .map_err(|e| LogsError::Describe {
                resource: format!("{group}:{prefix}"),
                source: e.into(),
            })?;

        Ok(out
            .log_streams()
            .iter()
            .filter_map(|s| s.log_stream_name())
            .map(str::to_owned)
            .collect())
    }

    async fn create_log_stream(
        &self,
        group: &str,
        name: &str,
    ) -> Result<CreateOutcome, LogsError> {
        match self
            .create_log_stream()
            .log_group_name(group)
            .log_stream_name(name)
            .send()
            .await
        {
            Ok(_) => Ok(CreateOutcome::Created),

            Err(e)
                if e.as_service_error()
                    .map(|se| se.is_resource_already_exists_exception())
                    .unwrap_or(false) =>
            {
                Ok(CreateOutcome::AlreadyExisted)
            }

            Err(e) => Err(LogsError::Create {
                resource: format!("{group}:{name}"),
                source: e.into(),
            }),
        }
    }

    async fn put_log_events(
        &self,
        group: &str,
        stream: &str,
        events: Vec<LogEvent>,
    ) -> Result<PutAck, LogsError> {
        let put_err = |source: BoxError| LogsError::PutEvent {
            group: group.to_owned(),
            stream: stream.to_owned(),
            source,
        };

        let events = events
            .into_iter()
            .map(|ev| {
                InputLogEvent::builder()
                    .message(ev.message)
                    .timestamp(ev.timestamp_millis)
                    .build()
            })
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| put_err(e.into()))?;

        let out = self
            .put_log_events()
            .log_group_name(group)
            .log_stream_name(stream)
            .set_log_events(Some(events))
            .send()
            .await
            .map_err(|e| put_err(e.into()))?;

        Ok(PutAck {
            next_sequence_token: out.next_sequence_token().map(str::to_owned),
            rejected: out.rejected_log_events_info().is_some(),
        })
    }
}

//! The one-off cold start work.
//!
//! In order: load the template parameters, render the log message, make sure
//! that the log group and stream exist, and write the message. Any failure
//! aborts the whole thing; nothing already created is rolled back.

use anyhow::{Context, Result};
use lambda_runtime::tracing;
use rand::Rng;

use crate::{
    logs::{self, LogBackend, PutAck},
    params,
    render::Renderer,
    settings::Settings,
};

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SetupReport {
    pub group_existed: bool,
    pub stream_existed: bool,
    pub ack: PutAck,
}

pub async fn run<B, R>(backend: &B, settings: &Settings, rng: &mut R) -> Result<SetupReport>
where
    B: LogBackend + ?Sized,
    R: Rng + ?Sized,
{
    let context = params::load_context(&settings.parameters_file)
        .context("failed to parse parameter file")?;

    let renderer = Renderer::from_dir(&settings.template_dir);
    let message = renderer
        .render(&settings.template_name, &context, rng)
        .context("failed to generate log from template file")?;

    let group = &settings.log_group;
    let stream = &settings.log_stream;

    let group_existed = logs::ensure_log_group(backend, group)
        .await
        .with_context(|| format!("failed to ensure log group `{group}`"))?;

    let stream_existed = logs::ensure_log_stream(backend, group, stream)
        .await
        .with_context(|| format!("failed to ensure log stream `{stream}`"))?;

    let ack = logs::publish(backend, group, stream, &message)
        .await
        .context("failed to put log event")?;

    tracing::info!(
        group_existed,
        stream_existed,
        rejected = ack.rejected,
        "cold start log event written to {group}:{stream}"
    );

    Ok(SetupReport {
        group_existed,
        stream_existed,
        ack,
    })
}

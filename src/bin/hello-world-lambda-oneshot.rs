//! "Oneshot" version of the greeting Lambda.
//!
//! Runs the cold start work and one greeting from the command line, then
//! prints the response that the API would have returned. An optional
//! argument gives the seed for the log message randomness.

use lambda_runtime::{tracing, Error};
use serde_json::json;
use std::env;

use hello_world_lambda::{render, Services};

#[tokio::main]
async fn main() -> Result<(), Error> {
    let mut args = env::args();
    args.next(); // skip argv[0]

    let seed = match args.next() {
        Some(text) => text
            .parse::<u64>()
            .map_err(|e| -> Error { format!("seed must be an unsigned integer: {e}").into() })?,
        None => render::seed_from_clock(),
    };

    let svcs = Services::init_with_seed(seed).await?;

    let report = svcs.setup_report();
    let settings = svcs.settings();
    tracing::info!(
        seed,
        group_existed = report.group_existed,
        stream_existed = report.stream_existed,
        next_sequence_token = ?report.ack.next_sequence_token,
        "cold start done; greeting via {}",
        settings.checkip_url
    );

    let greeting = svcs.greet().await?;

    let result = json!({
        "statusCode": greeting.status_code,
        "body": greeting.body,
    });

    serde_json::to_writer(std::io::stdout().lock(), &result)?;
    Ok(())
}

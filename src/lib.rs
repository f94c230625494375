//! The "hello world" Lambda: greet the caller's public IP
//!
//! This library crate implements the one API service and the cold start work
//! that goes with it. It is compiled into three executables:
//! `hello-world-lambda-proxyevent`, which speaks AWS API Gateway's "proxy
//! event" protocol and is what we deploy; `hello-world-lambda-bare`, a plain
//! JSON-in, JSON-out server that's easier to poke at locally; and
//! `hello-world-lambda-oneshot`, which runs everything once from the command
//! line.
//!
//! Before any invocation is handled, each process writes one templated log
//! event to a fixed CloudWatch log group and stream, creating them if needed.
//! If that fails the process exits and never registers its handler, so a
//! broken setup shows up as failed cold starts rather than as half-working
//! invocations.

use anyhow::Result;
use aws_config::{meta::region::RegionProviderChain, BehaviorVersion, Region};
use tracing_subscriber::EnvFilter;

pub mod checkip;
mod cloudwatch;
pub mod logs;
pub mod params;
pub mod render;
pub mod settings;
pub mod setup;

pub use checkip::{GreetError, Greeting, IpGreeter};
pub use settings::Settings;
pub use setup::SetupReport;

pub struct Services {
    settings: Settings,
    greeter: IpGreeter,
    setup: SetupReport,
}

impl Services {
    /// Set up the Lambda process, seeding the log message randomness from
    /// the clock.
    pub async fn init() -> Result<Self> {
        Services::init_with_seed(render::seed_from_clock()).await
    }

    /// Set up the Lambda process: tracing, AWS configuration, and the cold
    /// start log event.
    pub async fn init_with_seed(seed: u64) -> Result<Self> {
        init_tracing();

        let settings = Settings::from_env();

        let region = RegionProviderChain::default_provider()
            .or_else(Region::new(settings.region_fallback.clone()));
        let config = aws_config::defaults(BehaviorVersion::latest())
            .region(region)
            .load()
            .await;
        let logs_client = aws_sdk_cloudwatchlogs::Client::new(&config);

        let mut rng = render::seeded_rng(seed);
        let setup = setup::run(&logs_client, &settings, &mut rng).await?;

        let greeter = IpGreeter::new(settings.checkip_url.clone());

        Ok(Services {
            settings,
            greeter,
            setup,
        })
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn setup_report(&self) -> &SetupReport {
        &self.setup
    }

    /// Handle one invocation of the greeting API.
    pub async fn greet(&self) -> Result<Greeting, GreetError> {
        self.greeter.greet().await
    }
}

/// Install the global tracing subscriber, if nobody has yet.
///
/// The filter comes from `RUST_LOG`, defaulting to `info`. `log` records from
/// dependencies get forwarded into tracing as well.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    // `try_init` rather than `init`: tests and the oneshot tool may get here
    // with a subscriber already installed, and that's fine.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false) // don't print the module name
        .without_time() // don't print time (CloudWatch has it)
        .try_init();
}

//! Parley terminal client entry point.
//!
//! # Usage
//!
//! ```bash
//! # Agent backend on the default endpoint
//! parley
//!
//! # Token-gated backend elsewhere, with a shorter ack deadline
//! parley --variant gated --server http://10.0.0.5:12345 --ack-timeout-ms 2000
//!
//! # No backend at all: in-process demo server
//! parley --simulate
//! ```

use std::{fs::File, path::PathBuf, sync::Arc, time::Duration};

use clap::{Parser, ValueEnum};
use parley_app::{App, AppEvent, ClientConfig, Runtime, Variant};
use parley_client::{
    Endpoint, SessionConfig,
    transport::{self, ConnectedClient},
};
use parley_tui::{TerminalDriver, server};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// How long the demo agent "thinks" before answering.
const DEMO_REPLY_DELAY: Duration = Duration::from_millis(800);

/// Client variant.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum VariantArg {
    /// Agent chat
    Agent,
    /// Agent chat behind an access token
    Gated,
    /// Feedback echo
    Feedback,
}

impl From<VariantArg> for Variant {
    fn from(arg: VariantArg) -> Self {
        match arg {
            VariantArg::Agent => Self::Agent,
            VariantArg::Gated => Self::Gated,
            VariantArg::Feedback => Self::Feedback,
        }
    }
}

/// Parley terminal chat client
#[derive(Parser, Debug)]
#[command(name = "parley")]
#[command(about = "Terminal chat client for Socket.IO agent backends")]
#[command(version)]
struct Args {
    /// Client variant
    #[arg(long, value_enum, default_value = "agent")]
    variant: VariantArg,

    /// Server origin [default: the variant's preset]
    #[arg(short, long)]
    server: Option<String>,

    /// Acknowledgement deadline for sent messages, in milliseconds
    #[arg(long, default_value = "5000")]
    ack_timeout_ms: u64,

    /// Talk to an in-process demo server instead of `--server`
    #[arg(long)]
    simulate: bool,

    /// Log file (the terminal belongs to the UI)
    #[arg(long, default_value = "parley.log")]
    log_file: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let log_file = File::create(&args.log_file)?;
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(Arc::new(log_file)).with_ansi(false))
        .with(filter)
        .init();

    let mut config = ClientConfig::preset(args.variant.into());
    if let Some(server) = args.server {
        config = config.with_server(server);
    }
    let config = config
        .with_ack_timeout(Duration::from_millis(args.ack_timeout_ms));

    tracing::info!(variant = %config.variant, server = %config.server, "parley starting");

    // Dial before taking over the terminal so failures print normally
    let (channel, _demo) = if args.simulate {
        let (demo, pipes) = server::spawn(DEMO_REPLY_DELAY);
        let client =
            ConnectedClient::over_pipes(pipes.from_server, pipes.to_server, SessionConfig::default());
        (client, Some(demo))
    } else {
        let endpoint = Endpoint::parse(&config.server)?;
        (transport::connect(&endpoint, endpoint.session_config()).await?, None)
    };

    let driver = TerminalDriver::new()?;
    let mut app = App::new(config);
    app.handle(driver.initial_size()?);
    app.handle(AppEvent::Connecting);

    Runtime::new(driver, channel, app).run().await?;

    tracing::info!("parley exiting");
    Ok(())
}

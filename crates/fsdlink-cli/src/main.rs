//! FSDLink CLI — connect to an FSD server and print session events.

use anyhow::Context;
use clap::Parser;
use tracing::info;

use fsdlink_client::{Session, SessionConfig, SessionEvent};
use fsdlink_models::{FsdName, ProtocolRevision};

/// Terminal client for FSD air-traffic simulation networks.
#[derive(Parser, Debug)]
#[command(name = "fsdlink", about = "FSD session client")]
struct Args {
    /// Server host name or address.
    #[arg(long, default_value = "localhost")]
    host: String,

    /// Server TCP port.
    #[arg(long, default_value_t = 6809)]
    port: u16,

    /// Callsign to connect as.
    #[arg(long)]
    callsign: String,

    /// Sector identifier covered by this controller (repeatable).
    #[arg(long = "sector")]
    sectors: Vec<i64>,

    /// Speak the extended protocol revision (plane positions).
    #[arg(long)]
    extended: bool,

    /// Print events as JSON lines instead of plain text.
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Structured logging on stderr, controlled via RUST_LOG.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let callsign: FsdName = args
        .callsign
        .parse()
        .context("callsign is not a valid FSD name")?;

    let mut config = SessionConfig::new(args.host, args.port, callsign);
    config.sectors = args.sectors;
    if args.extended {
        config.revision = ProtocolRevision::Extended;
    }

    let (session, mut events) = Session::connect(config)
        .await
        .context("failed to connect")?;
    info!(callsign = %session.callsign(), "connected, waiting for traffic");

    loop {
        tokio::select! {
            event = events.recv() => {
                let Some(event) = event else { break };
                print_event(&event, args.json)?;
                if matches!(event, SessionEvent::Closed) {
                    break;
                }
            }
            result = tokio::signal::ctrl_c() => {
                result.context("failed to listen for ctrl-c")?;
                info!("closing session");
                session.close();
                // Keep draining until Closed arrives.
            }
        }
    }

    Ok(())
}

fn print_event(event: &SessionEvent, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string(event)?);
        return Ok(());
    }
    match event {
        SessionEvent::EntityAdded(s) => println!("+ {}", s.name),
        SessionEvent::EntityUpdated(s) => {
            let marker = if s.inactive { "~" } else { "*" };
            println!("{marker} {}", s.name);
        }
        SessionEvent::EntityDestroyed(s) => println!("- {}", s.name),
        SessionEvent::WeatherData(msg) => println!("wx {}: {}", msg.source, msg.data),
        SessionEvent::Disconnected {
            reason,
            kick_message,
        } => match kick_message {
            Some(text) => println!("disconnected ({reason}): {text}"),
            None => println!("disconnected ({reason})"),
        },
        SessionEvent::Closed => println!("session closed"),
    }
    Ok(())
}

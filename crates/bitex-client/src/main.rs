// crates/bitex-client/src/main.rs

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use bitex_client::{BitExClient, ClientConfig, WebSocketConnector};
use bitex_core::{Event, EventType};
use clap::Parser;
use tokio::sync::mpsc;
use tokio::time::interval;
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[clap(name = "bitex-client")]
#[clap(about = "Console client for the BitEx venue")]
struct Cli {
    /// TOML configuration file
    #[clap(short, long)]
    config: Option<PathBuf>,

    /// WebSocket URL of the venue
    #[clap(short, long)]
    url: Option<String>,

    /// Username to log in with
    #[clap(long)]
    username: Option<String>,

    /// Password to log in with
    #[clap(long)]
    password: Option<String>,

    /// Symbols to subscribe to (repeatable)
    #[clap(short = 'y', long = "symbol")]
    symbols: Vec<String>,

    /// Market depth to request (1 = top of book)
    #[clap(long)]
    depth: Option<u32>,

    /// Enable debug logging
    #[clap(short, long)]
    debug: bool,
}

impl Cli {
    fn apply(self, mut config: ClientConfig) -> ClientConfig {
        if let Some(url) = self.url {
            config.url = url;
        }
        if self.username.is_some() {
            config.username = self.username;
        }
        if self.password.is_some() {
            config.password = self.password;
        }
        if !self.symbols.is_empty() {
            config.symbols = self.symbols;
        }
        if let Some(depth) = self.depth {
            config.market_depth = depth;
        }
        config
    }
}

/// Follow-up actions triggered from event listeners.
#[derive(Debug)]
enum Signal {
    Opened,
    LoggedIn,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let default_level = if cli.debug { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    if rustls::crypto::ring::default_provider()
        .install_default()
        .is_err()
    {
        debug!("rustls crypto provider already installed");
    }

    let config_path = cli.config.clone();
    let config = cli.apply(
        ClientConfig::load(config_path.as_deref()).context("failed to load configuration")?,
    );

    run(config).await
}

async fn run(config: ClientConfig) -> Result<()> {
    let mut client = BitExClient::new();
    let (signal_tx, mut signal_rx) = mpsc::unbounded_channel::<Signal>();

    {
        let events = client.events();

        let tx = signal_tx.clone();
        events.subscribe(EventType::Opened, move |_| {
            let _ = tx.send(Signal::Opened);
        });

        let tx = signal_tx.clone();
        events.subscribe(EventType::LoginOk, move |_| {
            let _ = tx.send(Signal::LoggedIn);
        });

        events.subscribe(EventType::LoginError, |e| {
            warn!("Login rejected: {}", e.field_str("UserStatusText").unwrap_or("-"));
        });

        events.subscribe_all(log_event);
    }

    let mut transport_rx = client
        .open(&config.url, &WebSocketConnector)
        .with_context(|| format!("failed to open {}", config.url))?;

    let mut heartbeat = interval(Duration::from_secs(config.heartbeat_secs.max(1)));
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);
    let mut shutting_down = false;

    loop {
        tokio::select! {
            event = transport_rx.recv() => match event {
                Some(event) => {
                    if let Err(e) = client.handle_transport_event(event) {
                        error!("Dropping inbound frame: {}", e);
                    }
                }
                None => break,
            },

            Some(signal) = signal_rx.recv() => {
                if let Err(e) = on_signal(&mut client, &config, signal) {
                    error!("Request failed: {}", e);
                }
            }

            _ = heartbeat.tick() => {
                if client.is_open() {
                    if let Err(e) = client.test_request() {
                        warn!("Test request failed: {}", e);
                    }
                }
            }

            _ = &mut ctrl_c, if !shutting_down => {
                info!("Shutting down...");
                shutting_down = true;
                if !client.is_open() {
                    break;
                }
                if let Err(e) = client.close() {
                    warn!("Close failed: {}", e);
                    break;
                }
            }
        }
    }

    info!("Disconnected");
    Ok(())
}

fn on_signal(
    client: &mut BitExClient,
    config: &ClientConfig,
    signal: Signal,
) -> Result<(), bitex_client::ClientError> {
    match signal {
        Signal::Opened => match config.credentials() {
            Some((username, password)) => {
                info!("Logging in as {}", username);
                client.login(username, password)?;
            }
            None => subscribe(client, config)?,
        },
        Signal::LoggedIn => {
            info!("Logged in");
            subscribe(client, config)?;
            let req_id = client.request_open_orders(None)?;
            debug!("Requested open orders (OpenOrdersReqID={})", req_id);
            let req_id = client.request_balance(None)?;
            debug!("Requested balance (BalanceReqID={})", req_id);
        }
    }
    Ok(())
}

fn subscribe(
    client: &mut BitExClient,
    config: &ClientConfig,
) -> Result<(), bitex_client::ClientError> {
    let md_req_id =
        client.subscribe_market_data(config.market_depth, &config.symbols, &config.entry_types)?;
    info!(
        "Subscribed to {:?} (MDReqID={}, depth={})",
        config.symbols, md_req_id, config.market_depth
    );
    Ok(())
}

fn log_event(event: &Event) {
    match event.kind {
        EventType::RawMessage => {}
        EventType::Heartbeat => debug!("{}", event.kind),
        _ => match &event.payload {
            Some(payload) => info!(
                "{} {}",
                event.kind,
                serde_json::Value::Object(payload.as_object().clone())
            ),
            None => info!("{}", event.kind),
        },
    }
}

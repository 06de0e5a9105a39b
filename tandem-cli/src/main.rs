use anyhow::{Context, Result, bail};
use clap::Parser;
use colored::*;
use dialoguer::Input;
use std::str::FromStr;
use std::sync::Arc;
use tandem::client::media::TrackKind;
use tandem::client::media::rtc::{RtcMediaEngine, RtcRemoteTrack};
use tandem::client::{
    EngineConfig, EngineHandle, MediaConstraints, SessionState, TransportConfig, open_session,
};
use tandem::model::IceServerConfig;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "tandem-peer")]
#[command(about = "Headless call participant for a tandem relay")]
struct Cli {
    /// Relay WebSocket URL
    #[arg(default_value = "ws://localhost:8443")]
    url: String,

    /// Send an offer as soon as the relay connection is up
    #[arg(long)]
    caller: bool,

    #[arg(long)]
    no_audio: bool,

    #[arg(long)]
    no_video: bool,

    /// STUN server URL, repeatable. Defaults to the public servers.
    #[arg(long = "stun")]
    stun: Vec<String>,
}

enum PeerCommand {
    Start,
    MuteMic,
    MuteCam,
    Status,
    Quit,
}

impl FromStr for PeerCommand {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "start" => Ok(Self::Start),
            "mute-mic" => Ok(Self::MuteMic),
            "mute-cam" => Ok(Self::MuteCam),
            "status" => Ok(Self::Status),
            "quit" | "exit" => Ok(Self::Quit),
            other => bail!("unknown command '{}' (start, mute-mic, mute-cam, status, quit)", other),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let cli = Cli::parse();

    let transport = if cli.stun.is_empty() {
        TransportConfig::default()
    } else {
        TransportConfig {
            ice_servers: cli.stun.iter().map(IceServerConfig::stun).collect(),
        }
    };
    let config = EngineConfig {
        relay_url: cli.url.clone(),
        transport,
        constraints: MediaConstraints {
            audio: !cli.no_audio,
            video: !cli.no_video,
        },
        auto_start: cli.caller,
    };

    println!("{}", format!("📡 Connecting to {}...", cli.url).cyan());
    let handle = open_session(config, Arc::new(RtcMediaEngine::new()))
        .await
        .context("Failed to open session")?;
    println!(
        "{} {}",
        "✨ Joined as".green().bold(),
        handle.local_id().to_string().bold()
    );

    watch_session(&handle);

    loop {
        let line = tokio::task::spawn_blocking(|| {
            Input::<String>::new()
                .with_prompt("tandem")
                .interact_text()
        })
        .await??;

        let cmd = match line.parse::<PeerCommand>() {
            Ok(cmd) => cmd,
            Err(e) => {
                println!("{}", e.to_string().yellow());
                continue;
            }
        };

        match cmd {
            PeerCommand::Start => handle.start(true).await?,
            PeerCommand::MuteMic => handle.mute_local_audio().await?,
            PeerCommand::MuteCam => handle.mute_local_video().await?,
            PeerCommand::Status => print_state(handle.state()),
            PeerCommand::Quit => {
                handle.teardown().await?;
                println!("{}", "👋 Left the call".green());
                return Ok(());
            }
        }
    }
}

/// Print state and remote track changes as they happen.
fn watch_session(handle: &EngineHandle<RtcRemoteTrack>) {
    let mut states = handle.states();
    tokio::spawn(async move {
        while states.changed().await.is_ok() {
            let state = *states.borrow_and_update();
            print_state(state);
        }
    });

    let mut remote = handle.remote_stream();
    tokio::spawn(async move {
        while remote.changed().await.is_ok() {
            let Some(track) = remote.borrow_and_update().clone() else {
                continue;
            };
            let kind = match track.kind {
                Some(TrackKind::Audio) => "audio",
                Some(TrackKind::Video) => "video",
                None => "unknown",
            };
            println!(
                "{} {} track {} (stream {})",
                "🎥 Remote".magenta().bold(),
                kind,
                track.track_id,
                track.stream_id
            );
        }
    });
}

fn print_state(state: SessionState) {
    let label = match state {
        SessionState::Idle => "idle".normal(),
        SessionState::Negotiating(role) => format!("negotiating ({:?})", role).yellow(),
        SessionState::Connected => "connected".green().bold(),
    };
    println!("   state: {}", label);
}

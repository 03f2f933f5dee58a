//! `twinkle` command-line client.
//!
//! ```bash
//! twinkle --url=ws://localhost:9000
//! twinkle -m                      # no sound
//! twinkle --sound-dir /usr/share/twinkle -v
//! ```
//!
//! Exits 0 when the star request is confirmed, 1 otherwise.

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;
use twinkle_client::client::DEFAULT_URL;
use twinkle_client::session::RESPONSE_TIMEOUT;
use twinkle_client::{Client, CommandPlayer, ConsoleNotifier, NotifierConfig, Result};

/// Send a star request to a twinkle server and report the result.
#[derive(Parser, Debug)]
#[command(name = "twinkle")]
#[command(version, about, long_about = None)]
struct Args {
    /// WebSocket server URL
    #[arg(long, default_value = DEFAULT_URL)]
    url: String,

    /// Do not play success/failure sounds
    #[arg(short = 'm', long)]
    mute_sound: bool,

    /// Directory containing success.wav and fail.wav
    #[arg(long, default_value = ".")]
    sound_dir: PathBuf,

    /// Seconds to wait for the server's confirmation
    #[arg(long, default_value_t = RESPONSE_TIMEOUT.as_secs())]
    timeout: u64,

    /// Enable debug logging
    #[arg(short = 'v', long)]
    verbose: bool,
}

fn init_logging(verbose: bool) {
    let default = if verbose {
        "twinkle_client=debug,twinkle=debug"
    } else {
        "twinkle_client=warn,twinkle=warn"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Builds the client from the command line. Errors here are usage errors:
/// they exit 2 before any connection or notification.
fn build_client(args: &Args) -> Result<Client> {
    Client::builder()
        .url(&args.url)
        .response_timeout(Duration::from_secs(args.timeout))
        .build()
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);
    debug!(?args, "Starting");

    let client = match build_client(&args) {
        Ok(client) => client,
        Err(e) => {
            eprintln!("twinkle: {e}");
            return ExitCode::from(2);
        }
    };

    let notifier = ConsoleNotifier::new(
        NotifierConfig::default()
            .with_muted(args.mute_sound)
            .with_sound_dir(args.sound_dir),
        CommandPlayer::current(),
    );

    let outcome = client.run(&notifier).await;
    ExitCode::from(outcome.exit_code())
}

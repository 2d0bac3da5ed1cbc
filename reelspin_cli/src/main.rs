mod audio;
mod game;
mod http;
mod render;
mod simulate;
#[cfg(test)]
mod testutil;

use clap::{Parser, Subcommand};
use tracing::warn;
use tracing_subscriber::EnvFilter;

use reelspin_core::{Paytable, Session, SessionError};
use reelspin_shared::SpinRecord;

use crate::audio::{AudioMixer, LogBackend};
use crate::game::{GameOptions, SlotGame};
use crate::http::SlotClient;

#[derive(Parser)]
#[command(name = "reelspin", about = "Terminal client for the reelspin slot server")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    /// Server base URL
    #[arg(long, env = "SERVER_URL", default_value = "http://127.0.0.1:3000")]
    server_url: String,
    /// Animation frame rate
    #[arg(long, default_value_t = 60)]
    fps: u32,
    /// Skip the real-time animation and only print results
    #[arg(long)]
    no_animation: bool,
    /// Log audio cues at full volume instead of muted
    #[arg(long)]
    audio: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Play one round (plus any bonus spins it triggers)
    Spin,
    /// Play up to N rounds or until the balance runs out
    Play {
        #[arg(long, default_value_t = 10)]
        rounds: u32,
        /// Write this session's spin log to a CSV file
        #[arg(long)]
        export_csv: Option<String>,
    },
    /// Run the outcome generator locally and report statistics
    Simulate {
        #[arg(long, default_value_t = 100_000)]
        spins: u64,
        #[arg(long)]
        seed: Option<u64>,
    },
}

async fn new_game(cli: &Cli) -> anyhow::Result<SlotGame<LogBackend>> {
    let client = SlotClient::new(cli.server_url.clone());
    let catalog = client.catalog().await?;
    let mut audio = AudioMixer::new(catalog.audio.clone(), LogBackend);
    audio.enable(cli.audio);
    let mut game = SlotGame::new(
        client,
        Session::new(Paytable::default()),
        catalog.catalog()?,
        audio,
        GameOptions {
            fps: cli.fps,
            animate: !cli.no_animation,
        },
    )?;
    game.audio_mut().play("bgMusic", true);
    Ok(game)
}

fn export_csv(path: &str, log: &[SpinRecord]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;
    wtr.write_record(["ts", "bonus_round", "reels", "win_type", "bonus", "payout", "balance"])?;
    for r in log {
        wtr.write_record(&[
            r.ts.to_rfc3339(),
            r.bonus_round.to_string(),
            serde_json::to_string(&r.reels)?,
            format!("{:?}", r.win_type),
            r.bonus.to_string(),
            r.payout.to_string(),
            r.balance.to_string(),
        ])?;
    }
    wtr.flush()?;
    println!("Exported {} rows to {}", log.len(), path);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .init();

    match &cli.command {
        Commands::Spin => {
            let mut game = new_game(&cli).await?;
            game.play_round().await?;
        }
        Commands::Play { rounds, export_csv: csv_path } => {
            let mut game = new_game(&cli).await?;
            println!("balance {}", game.balance());
            for round in 1..=*rounds {
                println!("-- round {round}");
                if let Err(e) = game.play_round().await {
                    if let Some(reason) = e.downcast_ref::<SessionError>() {
                        println!("{reason}");
                        break;
                    }
                    // the session stops at the first failed spin
                    warn!("round {round} failed: {e:#}");
                    return Err(e);
                }
            }
            println!("final balance {}", game.balance());
            if let Some(path) = csv_path {
                export_csv(path, game.log())?;
            }
        }
        Commands::Simulate { spins, seed } => {
            let report = simulate::run(*spins, *seed)?;
            simulate::print(&report);
        }
    }

    Ok(())
}

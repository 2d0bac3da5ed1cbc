use std::io::Write;
use std::time::{Duration, Instant};

use anyhow::Context;
use chrono::Utc;
use tokio::sync::oneshot;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use reelspin_core::{
    rng, MotionConfig, Outcome, Session, SpinKind, SpinOrchestrator, SymbolCatalog, WinType,
};
use reelspin_shared::{SpinRecord, SpinResponse};

use crate::audio::{AudioBackend, AudioMixer};
use crate::http::SlotClient;
use crate::render::TextSurface;

pub struct GameOptions {
    pub fps: u32,
    /// Draw frames to the terminal in real time; otherwise run on a
    /// synthetic clock and only print the result.
    pub animate: bool,
}

/// One play session: balance, reels, audio and the spin log.
pub struct SlotGame<B> {
    client: SlotClient,
    session: Session,
    catalog: SymbolCatalog,
    orchestrator: SpinOrchestrator,
    surface: TextSurface,
    audio: AudioMixer<B>,
    options: GameOptions,
    log: Vec<SpinRecord>,
    out: Box<dyn Write + Send>,
}

impl<B: AudioBackend> SlotGame<B> {
    pub fn new(
        client: SlotClient,
        session: Session,
        catalog: SymbolCatalog,
        audio: AudioMixer<B>,
        options: GameOptions,
    ) -> anyhow::Result<Self> {
        let config = MotionConfig::default();
        let surface = TextSurface::new(&catalog, &config);
        let orchestrator = SpinOrchestrator::new(config, catalog.len(), &mut rng::from_entropy())?;
        Ok(Self {
            client,
            session,
            catalog,
            orchestrator,
            surface,
            audio,
            options: GameOptions {
                fps: options.fps.max(1),
                ..options
            },
            log: Vec::new(),
            out: Box::new(std::io::stdout()),
        })
    }

    #[cfg(test)]
    pub fn with_output(mut self, out: impl Write + Send + 'static) -> Self {
        self.out = Box::new(out);
        self
    }

    pub fn balance(&self) -> u64 {
        self.session.balance()
    }

    pub fn log(&self) -> &[SpinRecord] {
        &self.log
    }

    pub fn audio_mut(&mut self) -> &mut AudioMixer<B> {
        &mut self.audio
    }

    /// A regular spin followed by any bonus spins it grants.
    pub async fn play_round(&mut self) -> anyhow::Result<()> {
        self.spin(SpinKind::Regular).await?;
        while self.session.bonus_available() {
            writeln!(self.out, "BONUS! free spin")?;
            self.spin(SpinKind::Bonus).await?;
        }
        Ok(())
    }

    pub async fn spin(&mut self, kind: SpinKind) -> anyhow::Result<()> {
        // rejected before the server is contacted
        self.session.ensure_can_spin(kind)?;

        let response: SpinResponse = self.client.spin().await.context("spin request failed")?;
        let outcome = response.into_outcome(self.catalog.len())?;
        self.session.charge(kind)?;
        debug!(?outcome, ?kind, "spin accepted");

        self.audio.play("spin", false);
        self.audio.play("spinning", true);
        let animated = self.animate(outcome).await;
        self.audio.pause("spinning");
        animated?;

        let payout = self.session.settle(&outcome);
        match outcome.win_type {
            WinType::BigWin => self.audio.play("bigWin", false),
            WinType::SmallWin => self.audio.play("smallWin", false),
            _ => self.audio.play("noWin", false),
        }
        if outcome.bonus {
            self.audio.play("bonus", false);
        }

        writeln!(
            self.out,
            "{}{} | balance {}",
            outcome.win_type,
            if payout > 0 { format!(" +{payout}") } else { String::new() },
            self.session.balance()
        )?;
        self.log.push(SpinRecord {
            ts: Utc::now(),
            bonus_round: kind == SpinKind::Bonus,
            reels: SpinResponse::from(&outcome).reels,
            win_type: outcome.win_type,
            bonus: outcome.bonus,
            payout,
            balance: self.session.balance(),
        });
        info!(
            win_type = ?outcome.win_type,
            payout,
            balance = self.session.balance(),
            "spin done"
        );
        Ok(())
    }

    async fn animate(&mut self, outcome: Outcome) -> anyhow::Result<()> {
        let frame_ms = 1000.0 / f64::from(self.options.fps);
        let (done_tx, mut done_rx) = oneshot::channel();

        if !self.options.animate {
            let mut now = 0.0;
            self.orchestrator.start_spin(outcome, now, move || {
                let _ = done_tx.send(());
            })?;
            while done_rx.try_recv().is_err() {
                now += frame_ms;
                if let Err(e) = self.orchestrator.tick(now) {
                    self.orchestrator.cancel();
                    return Err(e.into());
                }
            }
            self.draw(false)?;
            return Ok(());
        }

        let clock = Instant::now();
        let now_ms = || clock.elapsed().as_secs_f64() * 1000.0;
        self.orchestrator.start_spin(outcome, now_ms(), move || {
            let _ = done_tx.send(());
        })?;

        // dropped on return, which ends the tick subscription
        let mut ticker = tokio::time::interval(Duration::from_secs_f64(frame_ms / 1000.0));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut first = true;
        loop {
            ticker.tick().await;
            if let Err(e) = self.orchestrator.tick(now_ms()) {
                warn!("animation aborted: {e}");
                self.orchestrator.cancel();
                return Err(e.into());
            }
            if let Err(e) = self.draw(!first) {
                self.orchestrator.cancel();
                return Err(e);
            }
            first = false;
            if done_rx.try_recv().is_ok() {
                return Ok(());
            }
        }
    }

    fn draw(&mut self, overwrite: bool) -> anyhow::Result<()> {
        self.orchestrator.render(&mut self.surface);
        let out = &mut self.out;
        let lines = self.surface.lines();
        if overwrite {
            // move the cursor back over the previous frame
            write!(out, "\x1b[{}A", lines.len())?;
        }
        for line in lines {
            writeln!(out, "\x1b[2K{line}")?;
        }
        out.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::LogBackend;
    use crate::testutil::{serve, spin_stub};
    use axum::http::StatusCode;
    use reelspin_core::{reference_audio_tracks, Paytable, SessionError};
    use serde_json::json;
    use std::io;
    use std::sync::atomic::Ordering;

    struct BrokenPipe;

    impl Write for BrokenPipe {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::ErrorKind::BrokenPipe.into())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn big_win() -> serde_json::Value {
        json!({
            "reels": [[1, 2, 3], [1, 2, 3], [1, 2, 3]],
            "winType": "BigWin",
            "bonus": false,
        })
    }

    fn game(url: String, paytable: Paytable) -> SlotGame<LogBackend> {
        SlotGame::new(
            SlotClient::new(url),
            Session::new(paytable),
            SymbolCatalog::reference("/static"),
            AudioMixer::new(reference_audio_tracks("/static"), LogBackend),
            GameOptions {
                fps: 60,
                animate: false,
            },
        )
        .unwrap()
        .with_output(io::sink())
    }

    #[tokio::test]
    async fn resolved_spin_charges_and_pays() {
        let (app, hits) = spin_stub(StatusCode::OK, big_win());
        let mut g = game(serve(app).await, Paytable::default());
        g.spin(SpinKind::Regular).await.unwrap();
        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert_eq!(g.balance(), 100 - 10 + 50);
        assert_eq!(g.log().len(), 1);
        assert_eq!(g.log()[0].payout, 50);
        assert!(!g.orchestrator.is_spinning());
    }

    #[tokio::test]
    async fn server_error_leaves_balance_alone() {
        let (app, hits) = spin_stub(StatusCode::INTERNAL_SERVER_ERROR, json!({}));
        let mut g = game(serve(app).await, Paytable::default());
        let err = g.spin(SpinKind::Regular).await.unwrap_err();
        assert!(err.to_string().contains("spin request failed"), "{err:#}");
        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert_eq!(g.balance(), 100);
        assert!(g.log().is_empty());
    }

    #[tokio::test]
    async fn mismatched_win_type_leaves_balance_alone() {
        let mut body = big_win();
        body["winType"] = json!("NoWin");
        let (app, _) = spin_stub(StatusCode::OK, body);
        let mut g = game(serve(app).await, Paytable::default());
        assert!(g.spin(SpinKind::Regular).await.is_err());
        assert_eq!(g.balance(), 100);
    }

    #[tokio::test]
    async fn short_balance_never_reaches_the_server() {
        let (app, hits) = spin_stub(StatusCode::OK, big_win());
        let paytable = Paytable {
            starting_balance: 5,
            ..Paytable::default()
        };
        let mut g = game(serve(app).await, paytable);
        let err = g.spin(SpinKind::Regular).await.unwrap_err();
        assert_eq!(
            err.downcast_ref::<SessionError>(),
            Some(&SessionError::InsufficientBalance { balance: 5, stake: 10 })
        );
        assert_eq!(hits.load(Ordering::SeqCst), 0);
        assert_eq!(g.balance(), 5);
    }

    #[tokio::test]
    async fn bonus_spin_needs_a_pending_bonus() {
        let (app, hits) = spin_stub(StatusCode::OK, big_win());
        let mut g = game(serve(app).await, Paytable::default());
        let err = g.spin(SpinKind::Bonus).await.unwrap_err();
        assert_eq!(
            err.downcast_ref::<SessionError>(),
            Some(&SessionError::NoBonusAvailable)
        );
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn failed_frame_cancels_the_spin() {
        let (app, hits) = spin_stub(StatusCode::OK, big_win());
        let mut g = game(serve(app).await, Paytable::default()).with_output(BrokenPipe);
        g.options.animate = true;
        assert!(g.spin(SpinKind::Regular).await.is_err());
        assert!(!g.orchestrator.is_spinning());

        let mut g = g.with_output(io::sink());
        g.options.animate = false;
        g.spin(SpinKind::Regular).await.unwrap();
        assert_eq!(hits.load(Ordering::SeqCst), 2);
        assert_eq!(g.balance(), 100 - 10 - 10 + 50);
    }
}

use reelspin_core::{rng, MotionConfig, OutcomeGenerator, SpinOrchestrator};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Example end-to-end spin on a synthetic 60 Hz clock
    let mut rng = rng::seeded(1);
    let generator = OutcomeGenerator::with_catalog_len(9)?;
    let outcome = generator.generate(&mut rng)?;

    let mut orchestrator = SpinOrchestrator::new(MotionConfig::default(), 9, &mut rng)?;
    orchestrator.start_spin(outcome, 0.0, || println!("all reels settled"))?;

    let mut now = 0.0;
    let mut frames = 0;
    while orchestrator.is_spinning() {
        now += 1000.0 / 60.0;
        frames += 1;
        orchestrator.tick(now)?;
    }

    println!(
        "win_type={:?} bonus={} frames={} reels={:?}",
        outcome.win_type,
        outcome.bonus,
        frames,
        orchestrator
            .reels()
            .iter()
            .map(|r| r.settled_textures())
            .collect::<Vec<_>>()
    );
    Ok(())
}

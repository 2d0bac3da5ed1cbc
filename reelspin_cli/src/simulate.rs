use std::collections::BTreeMap;

use reelspin_core::{rng, OutcomeGenerator, Paytable, SymbolCatalog};

#[derive(Debug, Default)]
pub struct SimulationReport {
    pub spins: u64,
    pub wins: BTreeMap<String, u64>,
    pub bonuses: u64,
    pub staked: u64,
    pub paid: u64,
}

impl SimulationReport {
    pub fn bonus_rate(&self) -> f64 {
        self.bonuses as f64 / self.spins.max(1) as f64
    }

    /// Payout per credit staked, ignoring free bonus spins.
    pub fn return_to_player(&self) -> f64 {
        self.paid as f64 / self.staked.max(1) as f64
    }
}

/// Runs the generator locally, without a server or animation.
pub fn run(spins: u64, seed: Option<u64>) -> anyhow::Result<SimulationReport> {
    let catalog = SymbolCatalog::reference("/static");
    let generator = OutcomeGenerator::new(&catalog)?;
    let paytable = Paytable::default();
    let mut rng = seed.map_or_else(rng::from_entropy, rng::seeded);

    let mut report = SimulationReport::default();
    for _ in 0..spins {
        let outcome = generator.generate(&mut rng)?;
        report.spins += 1;
        *report.wins.entry(format!("{:?}", outcome.win_type)).or_default() += 1;
        report.bonuses += u64::from(outcome.bonus);
        report.staked += paytable.stake;
        report.paid += paytable.payout(outcome.win_type);
    }
    Ok(report)
}

pub fn print(report: &SimulationReport) {
    println!("spins: {}", report.spins);
    for (win_type, count) in &report.wins {
        println!(
            "  {win_type:<9} {count:>9} ({:.2}%)",
            100.0 * *count as f64 / report.spins.max(1) as f64
        );
    }
    println!("bonus rate: {:.4}", report.bonus_rate());
    println!("return per credit staked: {:.4}", report.return_to_player());
}

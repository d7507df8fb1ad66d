//! Decay table dump.

use clap::{Args, ValueEnum};
use expenv_config::DecayCurve;
use expenv_envelope::{CurveKind, power_law_entry, soft_entry};

/// Decay table selection for CLI
#[derive(Clone, Copy, Debug, Default, ValueEnum)]
pub enum CliCurve {
    #[default]
    Soft,
    Power,
}

impl From<CliCurve> for CurveKind {
    fn from(c: CliCurve) -> Self {
        match c {
            CliCurve::Soft => CurveKind::Soft,
            CliCurve::Power => CurveKind::PowerLaw,
        }
    }
}

#[derive(Args)]
pub struct TableArgs {
    /// Which table to print
    #[arg(long, value_enum, default_value_t = CliCurve::Soft)]
    curve: CliCurve,

    /// Also compare every entry with its closed-form value
    #[arg(long)]
    check: bool,
}

pub fn run(args: TableArgs) -> anyhow::Result<()> {
    let curve = DecayCurve::from_kind(args.curve.into());
    let entries = curve.table().entries();

    println!("{} decay table", curve.kind().name());
    match curve.ten_percent_index() {
        Some(index) => println!("decay times scaled by 256/{index}"),
        None => println!("decay times used as given"),
    }
    println!();

    for (row, chunk) in entries.chunks(16).enumerate() {
        let cells: Vec<String> = chunk.iter().map(|v| format!("{v:>3}")).collect();
        println!("{:>3}: {}", row * 16, cells.join(" "));
    }

    if args.check {
        let closed_form: fn(u8) -> u8 = match curve.kind() {
            CurveKind::Soft => soft_entry,
            CurveKind::PowerLaw => power_law_entry,
        };
        // entry 0 is pinned to silence
        let mismatches: Vec<usize> = (1..entries.len())
            .filter(|&i| entries[i].abs_diff(closed_form(i as u8)) > 1)
            .collect();
        println!();
        if mismatches.is_empty() {
            println!("all entries within 1 of the closed form");
        } else {
            anyhow::bail!("entries differ from the closed form at {:?}", mismatches);
        }
    }

    Ok(())
}

//! Millisecond quantization calculator.

use clap::Args;
use expenv_config::{DEFAULT_CONTROL_RATE, DecayCurve, Timebase};

use super::table::CliCurve;

#[derive(Args)]
pub struct StepsArgs {
    /// Durations in milliseconds
    #[arg(value_name = "MS", required = true)]
    msec: Vec<u32>,

    /// Control rate in Hz
    #[arg(long, default_value_t = DEFAULT_CONTROL_RATE)]
    control_rate: u32,

    /// Treat the durations as decay times and apply curve compensation
    #[arg(long)]
    decay: bool,

    /// Curve used for decay compensation
    #[arg(long, value_enum, default_value_t = CliCurve::Soft)]
    curve: CliCurve,
}

pub fn run(args: StepsArgs) -> anyhow::Result<()> {
    if args.control_rate == 0 {
        anyhow::bail!("control rate must be non-zero");
    }
    let timebase = Timebase::new(args.control_rate, args.control_rate);
    let curve = DecayCurve::from_kind(args.curve.into());

    println!("{:>8} {:>10} {:>8} {:>10}", "ms", "effective", "ticks", "actual ms");
    for &ms in &args.msec {
        let effective = if args.decay {
            curve.compensate_decay_ms(ms)
        } else {
            ms
        };
        let ticks = timebase.msec_to_steps(effective);
        let note = if ms > 0 && ticks == 0 { "  (skipped)" } else { "" };
        println!(
            "{:>8} {:>10} {:>8} {:>10}{}",
            ms,
            effective,
            ticks,
            timebase.steps_to_msec(ticks),
            note
        );
    }

    Ok(())
}

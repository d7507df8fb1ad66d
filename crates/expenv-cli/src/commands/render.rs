//! Envelope rendering command.

use anyhow::Context;
use clap::Args;
use expenv_config::{PhaseKind, find_patch};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::host::{self, Frame, RenderPlan};

#[derive(Args)]
pub struct RenderArgs {
    /// Patch file or factory patch name
    #[arg(value_name = "PATCH")]
    patch: String,

    /// Write a 16-bit mono WAV at the patch's audio rate
    #[arg(short, long, value_name = "FILE")]
    out: Option<PathBuf>,

    /// Print `sample,phase,value` rows to stdout
    #[arg(long)]
    csv: bool,

    /// Render exactly this long instead of until the envelope stops
    #[arg(long, value_name = "MS")]
    duration_ms: Option<u32>,

    /// Send note_off after this long (overrides the patch's gate_ms)
    #[arg(long, value_name = "MS")]
    gate_ms: Option<u32>,

    /// Send a second note_on after this long
    #[arg(long, value_name = "MS")]
    retrigger_ms: Option<u32>,

    /// Start each note_on from the current level instead of zero
    #[arg(long)]
    no_reset: bool,
}

pub fn run(args: RenderArgs) -> anyhow::Result<()> {
    let patch = find_patch(&args.patch)
        .with_context(|| format!("cannot load patch '{}'", args.patch))?;
    let mut env = patch
        .build()
        .with_context(|| format!("cannot build patch '{}'", patch.name))?;

    let timebase = patch.timebase();
    let to_ticks = |ms: u32| timebase.msec_to_steps(ms);
    let plan = RenderPlan {
        total_ticks: args.duration_ms.map(to_ticks),
        gate_tick: args.gate_ms.or(patch.gate_ms).map(to_ticks),
        retrigger_tick: args.retrigger_ms.map(to_ticks),
        reset: !args.no_reset,
    };

    let frames = host::render(env.as_mut(), &plan);

    if let Some(path) = &args.out {
        write_wav(path, &frames, timebase.audio_rate())?;
    }

    if args.csv {
        write_csv(&frames)?;
    } else {
        print_summary(&patch, &frames, args.out.as_deref());
    }

    Ok(())
}

fn write_wav(path: &Path, frames: &[Frame], sample_rate: u32) -> anyhow::Result<()> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(path, spec)
        .with_context(|| format!("cannot create '{}'", path.display()))?;
    for frame in frames {
        writer.write_sample(level_to_pcm(frame.value))?;
    }
    writer.finalize()?;
    Ok(())
}

/// Map an 8-bit level onto the positive half of 16-bit PCM.
fn level_to_pcm(level: u8) -> i16 {
    (i32::from(level) * i32::from(i16::MAX) / 255) as i16
}

fn write_csv(frames: &[Frame]) -> anyhow::Result<()> {
    let stdout = std::io::stdout();
    let mut out = std::io::BufWriter::new(stdout.lock());
    writeln!(out, "sample,phase,value")?;
    for (i, frame) in frames.iter().enumerate() {
        writeln!(out, "{},{},{}", i, frame.phase, frame.value)?;
    }
    out.flush()?;
    Ok(())
}

fn print_summary(patch: &expenv_config::Patch, frames: &[Frame], out: Option<&Path>) {
    let timebase = patch.timebase();
    println!("Patch: {}", patch.name);
    if let Some(desc) = &patch.description {
        println!("  {}", desc);
    }
    println!(
        "Variant: {}  Curve: {}  Rates: {} Hz control / {} Hz audio ({} samples per tick)",
        patch.variant.name(),
        patch.curve.name(),
        timebase.control_rate(),
        timebase.audio_rate(),
        timebase.lerps_per_control()
    );

    println!();
    println!("{:<8} {:>6} {:>8}", "phase", "ticks", "samples");
    for phase in [PhaseKind::Attack, PhaseKind::Decay, PhaseKind::Release] {
        let ticks = patch.phase_steps(phase);
        println!(
            "{:<8} {:>6} {:>8}",
            phase.name(),
            ticks,
            timebase.lerp_steps(ticks)
        );
    }

    let peak = frames.iter().map(|f| f.value).max().unwrap_or(0);
    let secs = frames.len() as f64 / f64::from(timebase.audio_rate().max(1));
    println!();
    println!("Rendered {} samples ({:.3} s), peak {}", frames.len(), secs, peak);
    if let Some(path) = out {
        println!("Wrote {}", path.display());
    }
}

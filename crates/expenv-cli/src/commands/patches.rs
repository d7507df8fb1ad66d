//! Factory patch listing.

use clap::Args;
use expenv_config::{PhaseKind, factory_patches, find_patch};

#[derive(Args)]
pub struct PatchesArgs {
    /// Print one patch as TOML instead of listing all
    #[arg(value_name = "PATCH")]
    name: Option<String>,

    /// Print the patch as JSON instead of TOML
    #[arg(long, requires = "name")]
    json: bool,
}

pub fn run(args: PatchesArgs) -> anyhow::Result<()> {
    match args.name {
        Some(name) => show_patch(&name, args.json),
        None => {
            list_patches();
            Ok(())
        }
    }
}

fn list_patches() {
    println!("Factory Patches:");
    println!();
    for patch in factory_patches() {
        let ticks: Vec<String> = [PhaseKind::Attack, PhaseKind::Decay, PhaseKind::Release]
            .iter()
            .map(|&p| patch.phase_steps(p).to_string())
            .collect();
        println!(
            "  {:<8} {:<5} {:<6} ticks {:<12} {}",
            patch.name.to_lowercase(),
            patch.variant.name(),
            patch.curve.name(),
            ticks.join("/"),
            patch.description.as_deref().unwrap_or("")
        );
    }
}

fn show_patch(name: &str, json: bool) -> anyhow::Result<()> {
    let patch = find_patch(name)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&patch)?);
    } else {
        print!("{}", patch.to_toml()?);
    }
    Ok(())
}

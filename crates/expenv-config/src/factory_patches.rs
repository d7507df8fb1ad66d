//! Factory patches bundled with the library.
//!
//! Built-in patches that are always available without external files. Each
//! one quantizes cleanly at its own rates: no phase collapses to zero ticks.

use std::path::Path;

use crate::{ConfigError, Patch};

/// Array of factory patch names for external access.
pub static FACTORY_PATCH_NAMES: &[&str] = &["init", "pluck", "kick", "hat", "pad"];

/// TOML content for factory patches.
///
/// These are embedded at compile time and always available.
static FACTORY_PATCHES_TOML: &[(&str, &str)] = &[
    ("init", INIT_PATCH),
    ("pluck", PLUCK_PATCH),
    ("kick", KICK_PATCH),
    ("hat", HAT_PATCH),
    ("pad", PAD_PATCH),
];

const INIT_PATCH: &str = r#"
name = "Init"
description = "Plain ADSR at the default rates"
variant = "adsr"
curve = "soft"
gate_ms = 600

[levels]
attack = 255
decay = 128
release = 0

[times]
attack_ms = 32
decay_ms = 500
release_ms = 300
"#;

const PLUCK_PATCH: &str = r#"
name = "Pluck"
description = "Fast attack, soft exponential fall, no release"
variant = "ad"
curve = "soft"

[levels]
attack = 255
decay = 0

[times]
attack_ms = 16
decay_ms = 400
"#;

const KICK_PATCH: &str = r#"
name = "Kick"
description = "Single-tick click into a steep power-law decay"
control_rate = 256
audio_rate = 16384
variant = "ad"
curve = "power"

[levels]
attack = 255
decay = 0

[times]
attack_steps = 1
decay_ms = 250
"#;

const HAT_PATCH: &str = r#"
name = "Hat"
description = "Very short decay at a high control rate"
control_rate = 1024
audio_rate = 16384
variant = "ad"
curve = "soft"

[levels]
attack = 200
decay = 0

[times]
attack_steps = 0
decay_ms = 40
"#;

const PAD_PATCH: &str = r#"
name = "Pad"
description = "Slow swell with a long release"
variant = "adsr"
curve = "soft"
gate_ms = 2000

[levels]
attack = 230
decay = 180
release = 0

[times]
attack_ms = 800
decay_ms = 1200
release_ms = 1500
"#;

/// Get all factory patches.
pub fn factory_patches() -> Vec<Patch> {
    FACTORY_PATCHES_TOML
        .iter()
        .filter_map(|(_, toml)| Patch::from_toml(toml).ok())
        .collect()
}

/// Get a factory patch by internal or display name, case-insensitively.
pub fn get_factory_patch(name: &str) -> Option<Patch> {
    let name_lower = name.to_lowercase();

    for (patch_name, toml) in FACTORY_PATCHES_TOML {
        if patch_name.to_lowercase() == name_lower {
            return Patch::from_toml(toml).ok();
        }
    }

    FACTORY_PATCHES_TOML
        .iter()
        .filter_map(|(_, toml)| Patch::from_toml(toml).ok())
        .find(|patch| patch.name.to_lowercase() == name_lower)
}

/// Check if a name refers to a factory patch.
pub fn is_factory_patch(name: &str) -> bool {
    get_factory_patch(name).is_some()
}

/// Resolve a command-line patch argument.
///
/// An existing file is loaded; anything else is looked up among the factory
/// patches.
pub fn find_patch(name_or_path: &str) -> Result<Patch, ConfigError> {
    let path = Path::new(name_or_path);
    if path.is_file() {
        return Patch::load(path);
    }
    get_factory_patch(name_or_path).ok_or_else(|| ConfigError::PatchNotFound(name_or_path.to_string()))
}

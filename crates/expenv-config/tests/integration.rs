//! Integration tests for expenv-config.
//!
//! These tests verify end-to-end functionality across modules: files on
//! disk, validation, and building envelopes from patches.

use expenv_config::{
    ConfigError, Curve, Levels, Patch, PhaseKind, Times, ValidationError, Variant,
    factory_patches, find_patch, get_factory_patch,
};
use tempfile::TempDir;

/// Render a built envelope until it stops, releasing after `gate_ticks`.
fn render_all(patch: &Patch, gate_ticks: Option<u32>) -> Vec<u8> {
    let mut env = patch.build().expect("patch should build");
    let lerps = env.timebase().lerps_per_control() as usize;
    let mut block = vec![0u8; lerps];
    let mut out = Vec::new();
    let mut tick = 0;

    env.note_on(true);
    while env.playing() {
        if Some(tick) == gate_ticks {
            env.note_off();
        }
        let n = env.render_tick(&mut block);
        out.extend_from_slice(&block[..n]);
        tick += 1;
        assert!(tick < 100_000, "envelope never finished");
    }
    out
}

#[test]
fn test_save_and_load_patch() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("nested/dir/pluck.toml");

    let patch = Patch::new("Saved Pluck")
        .with_description("round trip through a file")
        .with_variant(Variant::Ad)
        .with_curve(Curve::Power)
        .with_times(Times {
            attack_ms: Some(16),
            decay_steps: Some(30),
            ..Times::default()
        });

    patch.save(&path).unwrap();
    assert!(path.exists());

    let loaded = Patch::load(&path).unwrap();
    assert_eq!(loaded, patch);
}

#[test]
fn test_load_missing_file() {
    let err = Patch::load("/definitely/not/here.toml").unwrap_err();
    assert!(matches!(err, ConfigError::ReadFile { .. }));
}

#[test]
fn test_load_malformed_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("bad.toml");
    std::fs::write(&path, "name = \"x\"\ncontrol_rate = \"fast\"\n").unwrap();

    let err = Patch::load(&path).unwrap_err();
    assert!(matches!(err, ConfigError::TomlParse(_)));
}

#[test]
fn test_find_patch_prefers_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("kick");
    Patch::new("Not The Factory Kick").save(&path).unwrap();

    let from_file = find_patch(path.to_str().unwrap()).unwrap();
    assert_eq!(from_file.name, "Not The Factory Kick");

    let from_factory = find_patch("kick").unwrap();
    assert_eq!(from_factory.name, "Kick");
}

#[test]
fn test_build_reports_validation_errors() {
    let mut patch = Patch::new("Broken").with_rates(64, 1000);
    patch.times.attack_ms = Some(10);
    patch.times.attack_steps = Some(1);

    match patch.build() {
        Err(ConfigError::Validation(ValidationError::Multiple(errors))) => {
            assert_eq!(errors.len(), 2);
        }
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("broken patch should not build"),
    }
}

#[test]
fn test_factory_patches_render_and_finish() {
    for patch in factory_patches() {
        let gate = patch
            .gate_ms
            .map(|ms| patch.timebase().msec_to_steps(ms));
        let out = render_all(&patch, gate);

        assert!(!out.is_empty(), "{} rendered nothing", patch.name);
        let peak = out.iter().copied().max().unwrap_or(0);
        assert!(
            peak > patch.levels.decay,
            "{} never rose above its decay level",
            patch.name
        );
    }
}

#[test]
fn test_ad_patch_ignores_gate() {
    let patch = get_factory_patch("pluck").unwrap();
    let natural = render_all(&patch, None);
    let gated = render_all(&patch, Some(3));
    assert_eq!(natural, gated);
}

#[test]
fn test_adsr_gate_shortens_note() {
    let patch = Patch::new("Gated")
        .with_levels(Levels {
            attack: 255,
            decay: 200,
            release: 0,
            idle: 0,
        })
        .with_times(Times::steps(4, 40, 4));

    let natural = render_all(&patch, None);
    let gated = render_all(&patch, Some(6));
    assert!(gated.len() < natural.len());

    let lerps = patch.timebase().lerps_per_control() as usize;
    // gate at tick 6, four release ticks, one lag tick in idle
    assert_eq!(gated.len(), (6 + 4 + 1) * lerps);
}

#[test]
fn test_phase_steps_match_built_envelope() {
    let patch = Patch::new("Timing")
        .with_rates(128, 16384)
        .with_times(Times::millis(100, 250, 400));
    let mut env = patch.build().unwrap();
    env.note_on(true);

    let attack = patch.phase_steps(PhaseKind::Attack);
    for _ in 0..attack {
        assert_eq!(env.phase(), PhaseKind::Attack);
        env.advance();
    }
    assert_eq!(env.phase(), PhaseKind::Decay);
}

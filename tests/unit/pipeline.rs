use rand::rngs::StdRng;

use super::*;
use crate::config::{FoldConfig, GrainConfig, GrungeConfig, Preset};

fn ramp(width: u32, height: u32) -> ImageBuffer {
    let mut data = Vec::new();
    for y in 0..height {
        for x in 0..width {
            let v = ((x * 255) / (width - 1)) as u8;
            data.extend_from_slice(&[v, (y * 20) as u8, 255 - v, 255]);
        }
    }
    ImageBuffer::from_rgba8(width, height, data).unwrap()
}

#[test]
fn default_config_is_duotone_only() {
    let src = ramp(16, 4);
    let out = process_buffer(&src, &EffectConfig::default(), &TextureLibrary::new()).unwrap();

    let mut expected = src.clone();
    apply_duotone(&mut expected, Default::default(), false);
    assert_eq!(out, expected);
}

#[test]
fn disabled_random_stages_make_pipeline_idempotent() {
    let cfg = EffectConfig {
        fold: FoldConfig {
            enabled: true,
            ..FoldConfig::default()
        },
        ..EffectConfig::default()
    };
    let src = ramp(32, 12);
    let a = process_buffer(&src, &cfg, &TextureLibrary::new()).unwrap();
    let b = process_buffer(&src, &cfg, &TextureLibrary::new()).unwrap();
    assert_eq!(a, b);
}

#[test]
fn seeded_config_reproduces_random_stages() {
    let cfg = EffectConfig {
        seed: Some(1234),
        ..EffectConfig::default().with_preset(Preset::GrungePoster)
    };
    let src = ramp(64, 48);
    let a = process_buffer(&src, &cfg, &TextureLibrary::new()).unwrap();
    let b = process_buffer(&src, &cfg, &TextureLibrary::new()).unwrap();
    assert_eq!(a, b);
}

#[test]
fn injected_rng_matches_seeded_config() {
    let cfg = EffectConfig {
        grain: GrainConfig {
            amount: 0.5,
            block_size: 2,
        },
        seed: Some(99),
        ..EffectConfig::default()
    };
    let src = ramp(20, 20);
    let seeded = process_buffer(&src, &cfg, &TextureLibrary::new()).unwrap();

    let mut injected = src.clone();
    let mut rng = StdRng::seed_from_u64(99);
    apply_effects_with_rng(&mut injected, &cfg, &TextureLibrary::new(), &mut rng).unwrap();
    assert_eq!(seeded, injected);
}

#[test]
fn invalid_config_fails_before_any_stage() {
    let cfg = EffectConfig {
        grain: GrainConfig {
            amount: 2.0,
            block_size: 1,
        },
        ..EffectConfig::default()
    };
    let mut buf = ramp(8, 8);
    let before = buf.clone();
    let err = apply_effects(&mut buf, &cfg, &TextureLibrary::new()).unwrap_err();
    assert!(matches!(err, DuotoneError::Validation(_)));
    assert_eq!(buf, before);
}

#[test]
fn unknown_texture_index_is_rejected_up_front() {
    let cfg = EffectConfig {
        grunge: GrungeConfig {
            amount: 0.3,
            source: GrungeSource::Texture { index: 2 },
            ..GrungeConfig::default()
        },
        ..EffectConfig::default()
    };
    let err = check_config(&cfg, &TextureLibrary::new()).unwrap_err();
    assert!(matches!(err, DuotoneError::Validation(_)));

    // A disabled grunge pass does not need its texture.
    let off = EffectConfig {
        grunge: GrungeConfig {
            amount: 0.0,
            ..cfg.grunge
        },
        ..cfg
    };
    check_config(&off, &TextureLibrary::new()).unwrap();
}

#[test]
fn checkpoint_error_stops_the_sequence() {
    let cfg = EffectConfig::default().with_preset(Preset::Poster);
    let mut buf = ramp(8, 8);
    let mut calls = 0;
    let err = run_effect_passes(
        &mut buf,
        &cfg,
        &TextureLibrary::new(),
        &mut StdRng::seed_from_u64(0),
        &mut || {
            calls += 1;
            Err(DuotoneError::Superseded)
        },
    )
    .unwrap_err();
    assert!(matches!(err, DuotoneError::Superseded));
    assert_eq!(calls, 1);
}

#[test]
fn process_image_rejects_garbage_bytes() {
    let err = process_image(b"nope", &EffectConfig::default(), &TextureLibrary::new()).unwrap_err();
    assert!(matches!(err, DuotoneError::Decode(_)));
}

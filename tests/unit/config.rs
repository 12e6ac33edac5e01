use super::*;

#[test]
fn defaults_validate_and_disable_every_pass() {
    let cfg = EffectConfig::default();
    cfg.validate().unwrap();
    assert_eq!(cfg.color_scheme, ColorScheme::Optimized);
    assert!(!cfg.reversed);
    assert_eq!(cfg.vignette.strength, 0.0);
    assert_eq!(cfg.grain.amount, 0.0);
    assert_eq!(cfg.glow.strength, 0.0);
    assert_eq!(cfg.grunge.amount, 0.0);
    assert!(!cfg.fold.enabled);
    assert_eq!(cfg.campaign.strength, 0.0);
    assert_eq!(cfg.seed, None);
}

#[test]
fn json_missing_keys_take_defaults() {
    let cfg = EffectConfig::from_json_str(
        r#"{ "color_scheme": "classic", "grain": { "amount": 0.2 }, "seed": 7 }"#,
    )
    .unwrap();
    assert_eq!(cfg.color_scheme, ColorScheme::Classic);
    assert_eq!(cfg.grain.amount, 0.2);
    assert_eq!(cfg.grain.block_size, 1);
    assert_eq!(cfg.vignette.softness, 0.6);
    assert_eq!(cfg.seed, Some(7));
}

#[test]
fn json_parses_tagged_grunge_source_and_enums() {
    let cfg = EffectConfig::from_json_str(
        r#"{
            "grunge": { "amount": 0.5, "blend_mode": "soft-light",
                        "source": { "kind": "texture", "index": 3 } },
            "fold": { "enabled": true, "direction": "diagonal", "count": 2 }
        }"#,
    )
    .unwrap();
    assert_eq!(cfg.grunge.blend_mode, BlendMode::SoftLight);
    assert_eq!(cfg.grunge.source, GrungeSource::Texture { index: 3 });
    assert_eq!(cfg.fold.direction, FoldDirection::Diagonal);
}

#[test]
fn json_rejects_unknown_keys_and_bad_values() {
    let err = EffectConfig::from_json_str(r#"{ "grian": {} }"#).unwrap_err();
    assert!(matches!(err, DuotoneError::Serde(_)));

    let err = EffectConfig::from_json_str(r#"{ "vignette": { "strength": 1.5 } }"#).unwrap_err();
    assert!(matches!(err, DuotoneError::Validation(_)));
}

#[test]
fn validate_rejects_out_of_range_fields() {
    let mut cfg = EffectConfig::default();
    cfg.grain.block_size = 5;
    assert!(cfg.validate().is_err());

    let mut cfg = EffectConfig::default();
    cfg.glow.blur_px = f32::NAN;
    assert!(cfg.validate().is_err());

    let mut cfg = EffectConfig::default();
    cfg.grunge.scale = 5.0;
    assert!(cfg.validate().is_err());

    let mut cfg = EffectConfig::default();
    cfg.grunge.blend_mode = BlendMode::Screen;
    assert!(cfg.validate().is_err());

    let mut cfg = EffectConfig::default();
    cfg.fold.count = 7;
    assert!(cfg.validate().is_err());

    let mut cfg = EffectConfig::default();
    cfg.campaign.strength = 1.2;
    assert!(cfg.validate().is_err());

    let mut cfg = EffectConfig::default();
    cfg.campaign.blend_mode = BlendMode::Normal;
    assert!(cfg.validate().is_err());
}

#[test]
fn json_parses_campaign_section() {
    let cfg = EffectConfig::from_json_str(
        r#"{ "campaign": { "mode": "pink", "blend_mode": "multiply", "strength": 0.4 } }"#,
    )
    .unwrap();
    assert_eq!(cfg.campaign.mode, CampaignMode::Pink);
    assert_eq!(cfg.campaign.blend_mode, BlendMode::Multiply);
    assert_eq!(cfg.campaign.strength, 0.4);
}

#[test]
fn presets_override_only_their_fields() {
    let base = EffectConfig {
        color_scheme: ColorScheme::Classic,
        reversed: true,
        seed: Some(1),
        ..EffectConfig::default()
    };
    let cfg = base.with_preset(Preset::Dramatic);
    cfg.validate().unwrap();
    assert_eq!(cfg.color_scheme, ColorScheme::Classic);
    assert!(cfg.reversed);
    assert_eq!(cfg.seed, Some(1));
    assert_eq!(cfg.grain.amount, 0.26);
    assert_eq!(cfg.grain.block_size, 2);
    assert_eq!(cfg.vignette.strength, 0.42);
    assert_eq!(cfg.glow.blur_px, 10.0);
    assert_eq!(cfg.grunge.amount, 0.2);
}

#[test]
fn every_preset_validates_and_parses_by_name() {
    for p in Preset::ALL {
        EffectConfig::default().with_preset(p).validate().unwrap();
        assert_eq!(Preset::parse(p.name()).unwrap(), p);
    }
    assert_eq!(Preset::parse("Grunge_Poster").unwrap(), Preset::GrungePoster);
    assert!(Preset::parse("halftone").is_err());
}

#[test]
fn json_round_trip_preserves_config() {
    let cfg = EffectConfig::default().with_preset(Preset::Poster);
    let json = cfg.to_json_pretty().unwrap();
    assert_eq!(EffectConfig::from_json_str(&json).unwrap(), cfg);
}

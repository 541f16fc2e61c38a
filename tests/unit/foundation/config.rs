use super::*;

#[test]
fn effect_defaults_differ_per_effect() {
    let boil = EffectConfig::boil();
    assert_eq!(boil.palette_size, 64);
    assert_eq!(boil.lossy, None);
    assert_eq!(boil.blur_radius, 0.0);

    let mog = EffectConfig::framemog();
    assert_eq!(mog.palette_size, 256);
    assert_eq!(mog.lossy, Some(30));
    assert_eq!(mog.blur_radius, 0.5);
}

#[test]
fn effect_validation_catches_bad_values() {
    let mut cfg = EffectConfig::boil();
    cfg.palette_size = 1;
    assert!(cfg.validate().is_err());
    cfg.palette_size = 257;
    assert!(cfg.validate().is_err());

    let mut cfg = EffectConfig::boil();
    cfg.blur_radius = -1.0;
    assert!(cfg.validate().is_err());
    cfg.blur_radius = f32::NAN;
    assert!(cfg.validate().is_err());
}

#[test]
fn blur_radius_is_bounded() {
    let mut cfg = EffectConfig::framemog();
    cfg.blur_radius = MAX_BLUR_RADIUS;
    assert!(cfg.validate().is_ok());
    cfg.blur_radius = 1e5;
    assert!(matches!(cfg.validate(), Err(BoilerError::Validation(_))));
    cfg.blur_radius = f32::INFINITY;
    assert!(cfg.validate().is_err());

    let bot = BotConfig {
        framemog: cfg,
        ..BotConfig::default()
    };
    assert!(bot.validate().is_err());
}

#[test]
fn partial_json_fills_defaults() {
    let cfg: BotConfig =
        serde_json::from_str(r#"{ "cache_dir": "c", "boil": { "palette_size": 32 } }"#).unwrap();
    assert_eq!(cfg.cache_dir, PathBuf::from("c"));
    assert_eq!(cfg.boil.palette_size, 32);
    assert_eq!(cfg.boil.lossy, None);
    assert_eq!(cfg.framemog, EffectConfig::framemog());
    assert_eq!(cfg.max_attachment_bytes, DEFAULT_MAX_ATTACHMENT_BYTES);
    cfg.validate().unwrap();
}

#[test]
fn bot_validation_rejects_zero_threads_and_limits() {
    let cfg = BotConfig {
        threads: Some(0),
        ..BotConfig::default()
    };
    assert!(cfg.validate().is_err());

    let cfg = BotConfig {
        max_attachment_bytes: 0,
        ..BotConfig::default()
    };
    assert!(cfg.validate().is_err());
}

#[test]
fn effect_caches_are_separate() {
    let cfg = BotConfig::default();
    assert_ne!(cfg.boil_cache_dir(), cfg.framemog_cache_dir());
    assert!(cfg.boil_cache_dir().starts_with(&cfg.cache_dir));
}

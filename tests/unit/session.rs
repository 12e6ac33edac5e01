use super::*;
use crate::{assets::encode::encode_png, config::Preset};

fn source_png() -> Vec<u8> {
    let mut data = Vec::new();
    for y in 0..24u32 {
        for x in 0..32u32 {
            data.extend_from_slice(&[(x * 8) as u8, (y * 10) as u8, 90, 255]);
        }
    }
    encode_png(&ImageBuffer::from_rgba8(32, 24, data).unwrap()).unwrap()
}

#[test]
fn tickets_are_monotonic_and_newest_wins() {
    let comp = Compositor::new(TextureLibrary::new());
    let first = comp.begin();
    assert!(first.is_current());
    let second = comp.begin();
    assert_eq!(second.id(), first.id() + 1);
    assert!(!first.is_current());
    assert!(second.is_current());
}

#[test]
fn stale_ticket_is_rejected() {
    let comp = Compositor::new(TextureLibrary::new());
    let stale = comp.begin();
    let _fresh = comp.begin();
    let err = comp
        .render(&stale, &source_png(), &EffectConfig::default())
        .unwrap_err();
    assert!(matches!(err, DuotoneError::Superseded));
}

#[test]
fn cached_and_uncached_renders_agree() {
    let png = source_png();
    let cfg = EffectConfig {
        seed: Some(5),
        ..EffectConfig::default().with_preset(Preset::Dramatic)
    };

    let cached = Compositor::new(TextureLibrary::new());
    let plain = Compositor::uncached(TextureLibrary::new());

    let a = cached.render(&cached.begin(), &png, &cfg).unwrap();
    // Second render hits the duotone cache.
    let b = cached.render(&cached.begin(), &png, &cfg).unwrap();
    let c = plain.render(&plain.begin(), &png, &cfg).unwrap();
    assert_eq!(a, b);
    assert_eq!(a, c);
}

#[test]
fn scheme_change_reuses_source_but_not_remap() {
    let png = source_png();
    let comp = Compositor::new(TextureLibrary::new());
    let optimized = comp
        .render(&comp.begin(), &png, &EffectConfig::default())
        .unwrap();
    let classic_cfg = EffectConfig {
        color_scheme: ColorScheme::Classic,
        ..EffectConfig::default()
    };
    let classic = comp.render(&comp.begin(), &png, &classic_cfg).unwrap();
    assert_ne!(optimized, classic);

    comp.clear_cache().unwrap();
    let again = comp.render(&comp.begin(), &png, &classic_cfg).unwrap();
    assert_eq!(classic, again);
}

#[test]
fn superseded_between_stages() {
    let comp = Compositor::new(TextureLibrary::new());
    let ticket = comp.begin();
    let cfg = EffectConfig {
        seed: Some(1),
        ..EffectConfig::default().with_preset(Preset::Poster)
    };

    // An rng that starts a newer request on its first draw, i.e. during the grain stage.
    struct Interloper<'a> {
        comp: &'a Compositor,
        inner: rand::rngs::StdRng,
        fired: bool,
    }
    impl rand::RngCore for Interloper<'_> {
        fn next_u32(&mut self) -> u32 {
            if !self.fired {
                self.fired = true;
                let _ = self.comp.begin();
            }
            self.inner.next_u32()
        }
        fn next_u64(&mut self) -> u64 {
            if !self.fired {
                self.fired = true;
                let _ = self.comp.begin();
            }
            self.inner.next_u64()
        }
        fn fill_bytes(&mut self, dst: &mut [u8]) {
            self.inner.fill_bytes(dst)
        }
    }

    use rand::SeedableRng as _;
    let mut rng = Interloper {
        comp: &comp,
        inner: rand::rngs::StdRng::seed_from_u64(0),
        fired: false,
    };
    let err = comp
        .render_with_rng(&ticket, &source_png(), &cfg, &mut rng)
        .unwrap_err();
    assert!(matches!(err, DuotoneError::Superseded));
    assert!(rng.fired);
}

#[test]
fn fingerprint_collision_does_not_return_foreign_pixels() {
    let png = source_png();
    let other = encode_png(&ImageBuffer::filled(32, 24, [250, 250, 250, 255]).unwrap()).unwrap();

    // Plant an entry whose fingerprint matches `png` but whose bytes and pixels are `other`'s.
    let comp = Compositor::new(TextureLibrary::new());
    let foreign = Arc::new(decode_image(&other).unwrap());
    {
        let mut guard = lock(comp.cache.as_ref().unwrap()).unwrap();
        guard.source = Some(CachedSource {
            fingerprint: fingerprint_bytes(&png),
            bytes: Arc::from(other.as_slice()),
            decoded: Arc::clone(&foreign),
        });
        guard.duotone = Some((
            DuotoneKey {
                scheme: ColorScheme::Optimized,
                reversed: false,
            },
            foreign,
        ));
    }

    let cfg = EffectConfig::default();
    let cached = comp.render(&comp.begin(), &png, &cfg).unwrap();
    let plain = Compositor::uncached(TextureLibrary::new());
    assert_eq!(cached, plain.render(&plain.begin(), &png, &cfg).unwrap());
}

//! Long-lived compositor that renders requests in order and drops stale ones.
//!
//! Every call to [`Compositor::begin`] bumps a generation counter. A render holding an
//! older [`Ticket`] stops at the next stage boundary with [`DuotoneError::Superseded`], so
//! only the latest request ever produces output.

use std::sync::{
    Arc, Mutex, MutexGuard,
    atomic::{AtomicU64, Ordering},
};

use rand::Rng;

use crate::{
    assets::{decode::decode_image, encode::encode_png, textures::TextureLibrary},
    buffer::ImageBuffer,
    config::EffectConfig,
    effects::duotone::{ColorScheme, apply_duotone},
    foundation::{
        error::{DuotoneError, DuotoneResult},
        math::fingerprint_bytes,
    },
    pipeline::{check_config, rng_for, run_effect_passes},
};

/// Handle for one render request.
#[derive(Clone, Debug)]
pub struct Ticket {
    id: u64,
    generation: Arc<AtomicU64>,
}

impl Ticket {
    /// Monotonic request number, starting at 1.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// `false` once a newer request has been started.
    pub fn is_current(&self) -> bool {
        self.generation.load(Ordering::Acquire) == self.id
    }

    fn ensure_current(&self) -> DuotoneResult<()> {
        if self.is_current() {
            Ok(())
        } else {
            tracing::warn!(ticket = self.id, "render superseded by a newer request");
            Err(DuotoneError::Superseded)
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct DuotoneKey {
    scheme: ColorScheme,
    reversed: bool,
}

/// Last decoded source. The fingerprint only short-circuits the comparison; a hit also
/// requires the stored bytes to equal the request's.
struct CachedSource {
    fingerprint: u64,
    bytes: Arc<[u8]>,
    decoded: Arc<ImageBuffer>,
}

impl CachedSource {
    fn matches(&self, fingerprint: u64, bytes: &[u8]) -> bool {
        self.fingerprint == fingerprint && *self.bytes == *bytes
    }
}

/// The duotone entry always belongs to `source`.
#[derive(Default)]
struct RenderCache {
    source: Option<CachedSource>,
    duotone: Option<(DuotoneKey, Arc<ImageBuffer>)>,
}

/// Renders effect configurations against source images, one request at a time.
///
/// The last decoded source and its duotone remap are cached, so re-rendering the same
/// image with different effect parameters skips both decode and remap.
pub struct Compositor {
    generation: Arc<AtomicU64>,
    textures: TextureLibrary,
    cache: Option<Mutex<RenderCache>>,
}

impl Compositor {
    /// A caching compositor over `textures`.
    pub fn new(textures: TextureLibrary) -> Self {
        Self {
            generation: Arc::new(AtomicU64::new(0)),
            textures,
            cache: Some(Mutex::new(RenderCache::default())),
        }
    }

    /// A compositor that decodes and remaps on every render.
    pub fn uncached(textures: TextureLibrary) -> Self {
        Self {
            cache: None,
            ..Self::new(textures)
        }
    }

    /// Textures available to the grunge stage.
    pub fn textures(&self) -> &TextureLibrary {
        &self.textures
    }

    /// Start a new request, superseding every ticket handed out before.
    pub fn begin(&self) -> Ticket {
        let id = self.generation.fetch_add(1, Ordering::AcqRel) + 1;
        Ticket {
            id,
            generation: Arc::clone(&self.generation),
        }
    }

    /// Render `source` with `config` and return PNG bytes.
    pub fn render(
        &self,
        ticket: &Ticket,
        source: &[u8],
        config: &EffectConfig,
    ) -> DuotoneResult<Vec<u8>> {
        self.render_with_rng(ticket, source, config, &mut rng_for(config))
    }

    /// [`Compositor::render`] with a caller-supplied random source.
    #[tracing::instrument(skip(self, source, config, rng), fields(ticket = ticket.id))]
    pub fn render_with_rng<R: Rng + ?Sized>(
        &self,
        ticket: &Ticket,
        source: &[u8],
        config: &EffectConfig,
        rng: &mut R,
    ) -> DuotoneResult<Vec<u8>> {
        ticket.ensure_current()?;
        check_config(config, &self.textures)?;

        let mut buf = self.duotone_base(source, config)?;
        ticket.ensure_current()?;

        run_effect_passes(&mut buf, config, &self.textures, rng, &mut || {
            ticket.ensure_current()
        })?;

        let out = encode_png(&buf)?;
        ticket.ensure_current()?;
        tracing::info!(
            width = buf.width(),
            height = buf.height(),
            bytes = out.len(),
            "render complete"
        );
        Ok(out)
    }

    /// Drop cached buffers.
    pub fn clear_cache(&self) -> DuotoneResult<()> {
        if let Some(cache) = &self.cache {
            *lock(cache)? = RenderCache::default();
        }
        Ok(())
    }

    fn duotone_base(&self, source: &[u8], config: &EffectConfig) -> DuotoneResult<ImageBuffer> {
        let Some(cache) = &self.cache else {
            let mut buf = decode_image(source)?;
            apply_duotone(&mut buf, config.color_scheme, config.reversed);
            return Ok(buf);
        };

        let fingerprint = fingerprint_bytes(source);
        let key = DuotoneKey {
            scheme: config.color_scheme,
            reversed: config.reversed,
        };

        let decoded = {
            let guard = lock(cache)?;
            match &guard.source {
                Some(cached) if cached.matches(fingerprint, source) => {
                    if let Some((k, buf)) = &guard.duotone
                        && *k == key
                    {
                        tracing::debug!(source = fingerprint, "duotone cache hit");
                        return Ok(ImageBuffer::clone(buf));
                    }
                    Some(Arc::clone(&cached.decoded))
                }
                _ => None,
            }
        };

        // Decoding happens outside the lock.
        let decoded = match decoded {
            Some(buf) => {
                tracing::debug!(source = fingerprint, "source cache hit");
                buf
            }
            None => Arc::new(decode_image(source)?),
        };

        let mut remapped = ImageBuffer::clone(&decoded);
        apply_duotone(&mut remapped, config.color_scheme, config.reversed);

        let mut guard = lock(cache)?;
        guard.source = Some(CachedSource {
            fingerprint,
            bytes: Arc::from(source),
            decoded,
        });
        guard.duotone = Some((key, Arc::new(remapped.clone())));
        Ok(remapped)
    }
}

fn lock(cache: &Mutex<RenderCache>) -> DuotoneResult<MutexGuard<'_, RenderCache>> {
    cache
        .lock()
        .map_err(|_| DuotoneError::Other(anyhow::anyhow!("compositor cache lock poisoned")))
}

#[cfg(test)]
#[path = "../tests/unit/session.rs"]
mod tests;

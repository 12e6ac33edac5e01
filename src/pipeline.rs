use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::{
    assets::{decode::decode_image, encode::encode_png, textures::TextureLibrary},
    buffer::ImageBuffer,
    config::EffectConfig,
    effects::{
        campaign::apply_campaign, duotone::apply_duotone, fold::apply_paper_folds, glow::apply_soft_glow,
        grain::apply_grain, grunge::GrungeSource, grunge::apply_grunge, vignette::apply_vignette,
    },
    foundation::error::{DuotoneError, DuotoneResult},
};

/// Random source for one invocation: seeded when `config.seed` is set, OS entropy otherwise.
pub fn rng_for(config: &EffectConfig) -> StdRng {
    match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    }
}

/// Validate `config` against itself and the available textures.
pub fn check_config(config: &EffectConfig, textures: &TextureLibrary) -> DuotoneResult<()> {
    config.validate()?;
    if config.grunge.amount > 0.0
        && let GrungeSource::Texture { index } = config.grunge.source
        && index >= textures.len()
    {
        return Err(DuotoneError::validation(format!(
            "grunge texture index {index} is out of range (library has {})",
            textures.len()
        )));
    }
    Ok(())
}

/// Run the full stage sequence on an already decoded buffer.
///
/// Order: duotone, vignette, grain, soft glow, grunge, paper folds, campaign overlay.
/// Stages whose amount/strength is zero are skipped outright.
pub fn apply_effects(
    buf: &mut ImageBuffer,
    config: &EffectConfig,
    textures: &TextureLibrary,
) -> DuotoneResult<()> {
    apply_effects_with_rng(buf, config, textures, &mut rng_for(config))
}

/// [`apply_effects`] with a caller-supplied random source.
pub fn apply_effects_with_rng<R: Rng + ?Sized>(
    buf: &mut ImageBuffer,
    config: &EffectConfig,
    textures: &TextureLibrary,
    rng: &mut R,
) -> DuotoneResult<()> {
    check_config(config, textures)?;
    apply_duotone(buf, config.color_scheme, config.reversed);
    run_effect_passes(buf, config, textures, rng, &mut no_checkpoint)
}

/// Pure form of the pipeline: the source buffer is left untouched.
pub fn process_buffer(
    source: &ImageBuffer,
    config: &EffectConfig,
    textures: &TextureLibrary,
) -> DuotoneResult<ImageBuffer> {
    let mut buf = source.clone();
    apply_effects(&mut buf, config, textures)?;
    Ok(buf)
}

/// Decode, run every stage and encode to PNG.
#[tracing::instrument(skip(source, config, textures), fields(len = source.len()))]
pub fn process_image(
    source: &[u8],
    config: &EffectConfig,
    textures: &TextureLibrary,
) -> DuotoneResult<Vec<u8>> {
    process_image_with_rng(source, config, textures, &mut rng_for(config))
}

/// [`process_image`] with a caller-supplied random source.
pub fn process_image_with_rng<R: Rng + ?Sized>(
    source: &[u8],
    config: &EffectConfig,
    textures: &TextureLibrary,
    rng: &mut R,
) -> DuotoneResult<Vec<u8>> {
    check_config(config, textures)?;
    let mut buf = decode_image(source)?;
    apply_duotone(&mut buf, config.color_scheme, config.reversed);
    run_effect_passes(&mut buf, config, textures, rng, &mut no_checkpoint)?;
    let out = encode_png(&buf)?;
    tracing::info!(
        width = buf.width(),
        height = buf.height(),
        bytes = out.len(),
        "processed image"
    );
    Ok(out)
}

/// Every stage after the duotone remap. `checkpoint` runs between stages and aborts the
/// sequence when it returns an error.
pub(crate) fn run_effect_passes<R: Rng + ?Sized>(
    buf: &mut ImageBuffer,
    config: &EffectConfig,
    textures: &TextureLibrary,
    rng: &mut R,
    checkpoint: &mut dyn FnMut() -> DuotoneResult<()>,
) -> DuotoneResult<()> {
    if config.vignette.strength > 0.0 {
        apply_vignette(buf, &config.vignette);
        tracing::debug!(stage = "vignette", "applied");
    } else {
        tracing::debug!(stage = "vignette", "skipped");
    }

    if config.grain.amount > 0.0 {
        apply_grain(buf, &config.grain, rng);
        tracing::debug!(stage = "grain", "applied");
    } else {
        tracing::debug!(stage = "grain", "skipped");
    }
    checkpoint()?;

    if config.glow.strength > 0.0 && config.glow.blur_px > 0.0 {
        apply_soft_glow(buf, &config.glow)?;
        tracing::debug!(stage = "glow", "applied");
    } else {
        tracing::debug!(stage = "glow", "skipped");
    }
    checkpoint()?;

    if config.grunge.amount > 0.0 {
        apply_grunge(buf, &config.grunge, textures, rng)?;
        tracing::debug!(stage = "grunge", source = ?config.grunge.source, "applied");
    } else {
        tracing::debug!(stage = "grunge", "skipped");
    }
    checkpoint()?;

    if config.fold.enabled && config.fold.strength > 0.0 && config.fold.count > 0 {
        apply_paper_folds(buf, &config.fold)?;
        tracing::debug!(stage = "fold", count = config.fold.count, "applied");
    } else {
        tracing::debug!(stage = "fold", "skipped");
    }
    checkpoint()?;

    if config.campaign.strength > 0.0 {
        apply_campaign(buf, &config.campaign)?;
        tracing::debug!(stage = "campaign", mode = ?config.campaign.mode, "applied");
    } else {
        tracing::debug!(stage = "campaign", "skipped");
    }
    checkpoint()
}

fn no_checkpoint() -> DuotoneResult<()> {
    Ok(())
}

#[cfg(test)]
#[path = "../tests/unit/pipeline.rs"]
mod tests;

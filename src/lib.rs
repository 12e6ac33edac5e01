//! Duotone is a deterministic image stylization pipeline.
//!
//! A source image is decoded, remapped to a two-colour ramp by luminance, then run through
//! an ordered set of optional stages:
//!
//! - vignette and film grain
//! - soft glow (blur, then screen)
//! - grunge overlay (procedural or texture backed)
//! - paper-fold creases
//! - campaign colour overlays (flat pink or green, a pink-to-green gradient, or a mixed
//!   pink/green duotone)
//!
//! One-shot callers use [`process_image`]. Interactive callers hold a [`Compositor`], which
//! caches decoded sources and drops renders superseded by a newer request.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod assets;
mod buffer;
mod composite;
mod effects;
mod foundation;

/// Effect parameters, defaults and presets.
pub mod config;
/// One-shot processing entry points.
pub mod pipeline;
/// Cached, supersedable rendering.
pub mod session;

pub use crate::assets::decode::{MAX_DIMENSION, constrain_dimensions, decode_image};
pub use crate::assets::encode::{encode_png, write_png};
pub use crate::assets::textures::TextureLibrary;
pub use crate::buffer::ImageBuffer;
pub use crate::composite::blend::{BlendMode, composite_premul_in_place};
pub use crate::composite::blur::box_blur_rgba8_premul;
pub use crate::config::{
    CampaignConfig, EffectConfig, FoldConfig, GlowConfig, GrainConfig, GrungeConfig, Preset,
    VignetteConfig,
};
pub use crate::effects::campaign::{BRAVE_PINK, CampaignMode, HERO_GREEN, apply_campaign};
pub use crate::effects::duotone::{
    ColorPair, ColorScheme, LUMA_WEIGHTS, apply_duotone, enhance_contrast, luminance,
};
pub use crate::effects::fold::{FoldDirection, apply_paper_folds, fold_centers};
pub use crate::effects::glow::apply_soft_glow;
pub use crate::effects::grain::apply_grain;
pub use crate::effects::grunge::{GrungeSource, apply_grunge, procedural_layer};
pub use crate::effects::vignette::apply_vignette;
pub use crate::foundation::error::{DuotoneError, DuotoneResult};
pub use crate::pipeline::{apply_effects, process_buffer, process_image};
pub use crate::session::{Compositor, Ticket};

use std::path::Path;

use anyhow::Context as _;

use crate::{
    composite::blend::BlendMode,
    effects::{
        campaign::CampaignMode, duotone::ColorScheme, fold::FoldDirection,
        grunge::GrungeSource,
    },
    foundation::error::{DuotoneError, DuotoneResult},
};

/// Largest glow blur accepted, in pixels.
pub const MAX_GLOW_BLUR_PX: f32 = 24.0;
/// Accepted grunge scale range.
pub const GRUNGE_SCALE_RANGE: std::ops::RangeInclusive<f32> = 10.0..=200.0;
/// Largest number of paper folds.
pub const MAX_FOLD_COUNT: u32 = 6;
/// Campaign strength used when a mode is picked without an explicit strength.
pub const CAMPAIGN_DEFAULT_STRENGTH: f32 = 0.4;

/// Edge-darkening parameters.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct VignetteConfig {
    /// Darkening at the corners, 0..=1. Zero disables the pass.
    pub strength: f32,
    /// Width of the falloff ring as a fraction of the centre-to-corner distance, 0..=1.
    pub softness: f32,
}

impl Default for VignetteConfig {
    fn default() -> Self {
        Self {
            strength: 0.0,
            softness: 0.6,
        }
    }
}

/// Monochrome film grain parameters.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GrainConfig {
    /// Noise amplitude, 0..=1. Zero disables the pass.
    pub amount: f32,
    /// Side of the square tile sharing one noise value, 1..=4.
    pub block_size: u32,
}

impl Default for GrainConfig {
    fn default() -> Self {
        Self {
            amount: 0.0,
            block_size: 1,
        }
    }
}

/// Blur-and-screen glow parameters.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GlowConfig {
    /// Opacity of the screened blur, 0..=1. Zero disables the pass.
    pub strength: f32,
    /// Blur radius in pixels (Gaussian sigma), 0..=24. Zero disables the pass.
    pub blur_px: f32,
}

impl Default for GlowConfig {
    fn default() -> Self {
        Self {
            strength: 0.0,
            blur_px: 6.0,
        }
    }
}

/// Grunge overlay parameters.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GrungeConfig {
    /// Overlay intensity, 0..=1. Zero disables the pass.
    pub amount: f32,
    /// Feature scale, 10..=200. Larger values mean bigger blotches and specks.
    pub scale: f32,
    /// Operator of the first composite pass: multiply, overlay or soft-light.
    pub blend_mode: BlendMode,
    /// Where the texture layer comes from.
    pub source: GrungeSource,
}

impl Default for GrungeConfig {
    fn default() -> Self {
        Self {
            amount: 0.0,
            scale: 100.0,
            blend_mode: BlendMode::Multiply,
            source: GrungeSource::Procedural,
        }
    }
}

/// Paper crease parameters.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FoldConfig {
    /// Master switch.
    pub enabled: bool,
    /// Crease contrast, 0..=1.
    pub strength: f32,
    /// Crease orientation.
    pub direction: FoldDirection,
    /// Number of creases, 0..=6. Zero disables the pass.
    pub count: u32,
}

impl Default for FoldConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            strength: 0.4,
            direction: FoldDirection::Vertical,
            count: 1,
        }
    }
}

/// Brand-colour campaign overlay parameters.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CampaignConfig {
    /// Flat pink, flat green, pink-to-green gradient, or pink/green duotone mix.
    pub mode: CampaignMode,
    /// Operator for the colour and gradient modes: overlay, soft-light or multiply.
    pub blend_mode: BlendMode,
    /// Layer opacity (or duotone mix), 0..=1. Zero disables the pass.
    pub strength: f32,
}

impl Default for CampaignConfig {
    fn default() -> Self {
        Self {
            mode: CampaignMode::Gradient,
            blend_mode: BlendMode::Overlay,
            strength: 0.0,
        }
    }
}

/// Every stage parameter for one invocation.
///
/// Missing keys in serialized form take the defaults above; [`EffectConfig::validate`]
/// runs before any stage executes.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EffectConfig {
    /// Palette for the duotone remap.
    pub color_scheme: ColorScheme,
    /// Map dark luminance to the highlight colour instead.
    pub reversed: bool,
    /// Vignette pass.
    pub vignette: VignetteConfig,
    /// Grain pass.
    pub grain: GrainConfig,
    /// Soft glow pass.
    pub glow: GlowConfig,
    /// Grunge overlay pass.
    pub grunge: GrungeConfig,
    /// Paper fold pass.
    pub fold: FoldConfig,
    /// Campaign overlay pass.
    pub campaign: CampaignConfig,
    /// Seed for the randomized passes. `None` draws fresh entropy per invocation.
    pub seed: Option<u64>,
}

/// Named parameter bundles for the grain, vignette, glow and grunge passes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Preset {
    /// Punchy print look.
    Poster,
    /// Low grain, wide glow.
    Soft,
    /// Heavy grain and vignette with a little grunge.
    Dramatic,
    /// Poster look with a strong grunge overlay.
    GrungePoster,
}

impl Preset {
    /// All presets, in menu order.
    pub const ALL: [Preset; 4] = [
        Preset::Poster,
        Preset::Soft,
        Preset::Dramatic,
        Preset::GrungePoster,
    ];

    /// Kebab-case name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Poster => "poster",
            Self::Soft => "soft",
            Self::Dramatic => "dramatic",
            Self::GrungePoster => "grunge-poster",
        }
    }

    /// Parse a preset name.
    pub fn parse(name: &str) -> DuotoneResult<Self> {
        let name = name.trim().to_ascii_lowercase().replace('_', "-");
        Self::ALL
            .into_iter()
            .find(|p| p.name() == name)
            .ok_or_else(|| DuotoneError::validation(format!("unknown preset '{name}'")))
    }
}

impl EffectConfig {
    /// Override grain, vignette, glow and grunge amount with `preset`; other fields are kept.
    pub fn with_preset(mut self, preset: Preset) -> Self {
        // (grain %, grain block, vignette %, softness %, glow %, glow px, grunge %)
        let (grain, block, vig, soft, glow, blur, grunge) = match preset {
            Preset::Poster => (18, 1, 30, 60, 12, 6, 0),
            Preset::Soft => (8, 1, 18, 80, 28, 12, 0),
            Preset::Dramatic => (26, 2, 42, 50, 18, 10, 20),
            Preset::GrungePoster => (20, 2, 24, 65, 10, 6, 45),
        };
        let pct = |v: u32| v as f32 / 100.0;
        self.grain = GrainConfig {
            amount: pct(grain),
            block_size: block,
        };
        self.vignette = VignetteConfig {
            strength: pct(vig),
            softness: pct(soft),
        };
        self.glow = GlowConfig {
            strength: pct(glow),
            blur_px: blur as f32,
        };
        self.grunge.amount = pct(grunge);
        self
    }

    /// Reject non-finite or out-of-range parameters.
    pub fn validate(&self) -> DuotoneResult<()> {
        unit("vignette.strength", self.vignette.strength)?;
        unit("vignette.softness", self.vignette.softness)?;
        unit("grain.amount", self.grain.amount)?;
        if !(1..=4).contains(&self.grain.block_size) {
            return Err(DuotoneError::validation(format!(
                "grain.block_size must be in 1..=4, got {}",
                self.grain.block_size
            )));
        }
        unit("glow.strength", self.glow.strength)?;
        ranged("glow.blur_px", self.glow.blur_px, 0.0..=MAX_GLOW_BLUR_PX)?;
        unit("grunge.amount", self.grunge.amount)?;
        ranged("grunge.scale", self.grunge.scale, GRUNGE_SCALE_RANGE)?;
        if !matches!(
            self.grunge.blend_mode,
            BlendMode::Multiply | BlendMode::Overlay | BlendMode::SoftLight
        ) {
            return Err(DuotoneError::validation(format!(
                "grunge.blend_mode must be multiply, overlay or soft-light, got {:?}",
                self.grunge.blend_mode
            )));
        }
        unit("fold.strength", self.fold.strength)?;
        if self.fold.count > MAX_FOLD_COUNT {
            return Err(DuotoneError::validation(format!(
                "fold.count must be <= {MAX_FOLD_COUNT}, got {}",
                self.fold.count
            )));
        }
        unit("campaign.strength", self.campaign.strength)?;
        if !matches!(
            self.campaign.blend_mode,
            BlendMode::Multiply | BlendMode::Overlay | BlendMode::SoftLight
        ) {
            return Err(DuotoneError::validation(format!(
                "campaign.blend_mode must be multiply, overlay or soft-light, got {:?}",
                self.campaign.blend_mode
            )));
        }
        Ok(())
    }

    /// Parse and validate a JSON document.
    pub fn from_json_str(json: &str) -> DuotoneResult<Self> {
        let cfg: Self = serde_json::from_str(json)
            .map_err(|e| DuotoneError::serde(format!("parse effect config: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Read, parse and validate a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> DuotoneResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("read effect config '{}'", path.display()))?;
        Self::from_json_str(&json)
    }

    /// Pretty-printed JSON.
    pub fn to_json_pretty(&self) -> DuotoneResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| DuotoneError::serde(format!("serialize effect config: {e}")))
    }
}

fn unit(name: &str, v: f32) -> DuotoneResult<()> {
    ranged(name, v, 0.0..=1.0)
}

fn ranged(name: &str, v: f32, range: std::ops::RangeInclusive<f32>) -> DuotoneResult<()> {
    if !v.is_finite() || !range.contains(&v) {
        return Err(DuotoneError::validation(format!(
            "{name} must be finite and in {}..={}, got {v}",
            range.start(),
            range.end()
        )));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;

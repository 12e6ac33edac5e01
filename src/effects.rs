pub(crate) mod campaign;
pub(crate) mod duotone;
pub(crate) mod fold;
pub(crate) mod glow;
pub(crate) mod grain;
pub(crate) mod grunge;
pub(crate) mod vignette;

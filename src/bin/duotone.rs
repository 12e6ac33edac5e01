use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use rayon::prelude::*;

use duotone::{
    BlendMode, CampaignMode, ColorScheme, EffectConfig, FoldDirection, GrungeSource, Preset,
    TextureLibrary, config::CAMPAIGN_DEFAULT_STRENGTH,
};

#[derive(Parser, Debug)]
#[command(name = "duotone", version, about = "Duotone poster effects for still images")]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Process one image into a PNG.
    Render(RenderArgs),
    /// Process many images in parallel.
    Batch(BatchArgs),
    /// Print the resolved effect configuration as JSON.
    DumpConfig(EffectArgs),
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Input image (any format the decoder understands).
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    #[command(flatten)]
    effects: EffectArgs,
}

#[derive(Parser, Debug)]
struct BatchArgs {
    /// Input images.
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Directory receiving `<stem>-duotone.png` for each input.
    #[arg(long)]
    out_dir: PathBuf,

    /// Override rayon worker threads.
    #[arg(long)]
    threads: Option<usize>,

    #[command(flatten)]
    effects: EffectArgs,
}

/// Effect parameters. Percentages are 0..=100; explicit flags win over `--preset`, which
/// wins over `--config`.
#[derive(Args, Debug, Default)]
struct EffectArgs {
    /// JSON effect configuration to start from.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Named preset: poster, soft, dramatic, grunge-poster.
    #[arg(long)]
    preset: Option<String>,

    /// Use the classic palette.
    #[arg(long)]
    classic: bool,

    /// Swap shadow and highlight colours.
    #[arg(long)]
    reversed: bool,

    /// Vignette strength, percent.
    #[arg(long)]
    vignette: Option<u32>,

    /// Vignette softness, percent.
    #[arg(long)]
    softness: Option<u32>,

    /// Grain amount, percent.
    #[arg(long)]
    grain: Option<u32>,

    /// Grain tile size, 1..=4 pixels.
    #[arg(long)]
    grain_block: Option<u32>,

    /// Soft glow strength, percent.
    #[arg(long)]
    glow: Option<u32>,

    /// Soft glow blur, pixels.
    #[arg(long)]
    glow_blur: Option<f32>,

    /// Grunge amount, percent.
    #[arg(long)]
    grunge: Option<u32>,

    /// Grunge element scale, percent (10..=200).
    #[arg(long)]
    grunge_scale: Option<u32>,

    /// Grunge blend mode: multiply, overlay, soft-light.
    #[arg(long)]
    grunge_blend: Option<String>,

    /// Directory holding grunge textures named 1.png, 2.png, ...
    #[arg(long)]
    textures: Option<PathBuf>,

    /// Use the texture at this index instead of procedural grunge.
    #[arg(long)]
    texture_index: Option<usize>,

    /// Enable paper folds.
    #[arg(long)]
    fold: bool,

    /// Fold strength, percent.
    #[arg(long)]
    fold_strength: Option<u32>,

    /// Fold direction: horizontal, vertical, diagonal.
    #[arg(long)]
    fold_direction: Option<String>,

    /// Number of folds, 0..=6.
    #[arg(long)]
    fold_count: Option<u32>,

    /// Campaign overlay: pink, green, gradient, duotone.
    #[arg(long)]
    campaign: Option<String>,

    /// Campaign blend mode: overlay, soft-light, multiply.
    #[arg(long)]
    campaign_blend: Option<String>,

    /// Campaign strength, percent (40 when only --campaign is given).
    #[arg(long)]
    campaign_strength: Option<u32>,

    /// Seed for grain and grunge; omit for a fresh look every run.
    #[arg(long)]
    seed: Option<u64>,
}

impl EffectArgs {
    fn resolve(&self) -> anyhow::Result<EffectConfig> {
        let mut cfg = match &self.config {
            Some(path) => EffectConfig::from_path(path)?,
            None => EffectConfig::default(),
        };
        if let Some(name) = &self.preset {
            cfg = cfg.with_preset(Preset::parse(name)?);
        }

        let pct = |v: u32| v as f32 / 100.0;
        if self.classic {
            cfg.color_scheme = ColorScheme::Classic;
        }
        if self.reversed {
            cfg.reversed = true;
        }
        if let Some(v) = self.vignette {
            cfg.vignette.strength = pct(v);
        }
        if let Some(v) = self.softness {
            cfg.vignette.softness = pct(v);
        }
        if let Some(v) = self.grain {
            cfg.grain.amount = pct(v);
        }
        if let Some(v) = self.grain_block {
            cfg.grain.block_size = v;
        }
        if let Some(v) = self.glow {
            cfg.glow.strength = pct(v);
        }
        if let Some(v) = self.glow_blur {
            cfg.glow.blur_px = v;
        }
        if let Some(v) = self.grunge {
            cfg.grunge.amount = pct(v);
        }
        if let Some(v) = self.grunge_scale {
            cfg.grunge.scale = v as f32;
        }
        if let Some(name) = &self.grunge_blend {
            cfg.grunge.blend_mode = BlendMode::parse(name)?;
        }
        if let Some(index) = self.texture_index {
            cfg.grunge.source = GrungeSource::Texture { index };
        }
        if self.fold {
            cfg.fold.enabled = true;
        }
        if let Some(v) = self.fold_strength {
            cfg.fold.strength = pct(v);
        }
        if let Some(name) = &self.fold_direction {
            cfg.fold.direction = FoldDirection::parse(name)?;
        }
        if let Some(v) = self.fold_count {
            cfg.fold.count = v;
        }
        if let Some(name) = &self.campaign {
            cfg.campaign.mode = CampaignMode::parse(name)?;
            if cfg.campaign.strength <= 0.0 {
                cfg.campaign.strength = CAMPAIGN_DEFAULT_STRENGTH;
            }
        }
        if let Some(name) = &self.campaign_blend {
            cfg.campaign.blend_mode = BlendMode::parse(name)?;
        }
        if let Some(v) = self.campaign_strength {
            cfg.campaign.strength = pct(v);
        }
        if self.seed.is_some() {
            cfg.seed = self.seed;
        }

        cfg.validate()?;
        Ok(cfg)
    }

    fn texture_library(&self) -> anyhow::Result<TextureLibrary> {
        match &self.textures {
            Some(dir) => Ok(TextureLibrary::from_dir(dir)?),
            None => Ok(TextureLibrary::new()),
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Batch(args) => cmd_batch(args),
        Command::DumpConfig(args) => cmd_dump_config(args),
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let cfg = args.effects.resolve()?;
    let textures = args.effects.texture_library()?;
    process_file(&args.in_path, &args.out, &cfg, &textures)?;
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_batch(args: BatchArgs) -> anyhow::Result<()> {
    let cfg = args.effects.resolve()?;
    let textures = args.effects.texture_library()?;

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = args.threads {
        builder = builder.num_threads(n);
    }
    let pool = builder.build().context("build batch thread pool")?;

    let results: Vec<(PathBuf, anyhow::Result<()>)> = pool.install(|| {
        args.inputs
            .par_iter()
            .map(|input| {
                let out = batch_output_path(&args.out_dir, input);
                let res = process_file(input, &out, &cfg, &textures);
                (out, res)
            })
            .collect()
    });

    let mut failed = 0usize;
    for (out, res) in results {
        match res {
            Ok(()) => eprintln!("wrote {}", out.display()),
            Err(e) => {
                failed += 1;
                eprintln!("failed {}: {e:#}", out.display());
            }
        }
    }
    if failed > 0 {
        anyhow::bail!("{failed} of {} inputs failed", args.inputs.len());
    }
    Ok(())
}

fn cmd_dump_config(args: EffectArgs) -> anyhow::Result<()> {
    let cfg = args.resolve()?;
    println!("{}", cfg.to_json_pretty()?);
    Ok(())
}

fn batch_output_path(out_dir: &Path, input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_owned());
    out_dir.join(format!("{stem}-duotone.png"))
}

fn process_file(
    input: &Path,
    out: &Path,
    cfg: &EffectConfig,
    textures: &TextureLibrary,
) -> anyhow::Result<()> {
    let bytes =
        std::fs::read(input).with_context(|| format!("read image '{}'", input.display()))?;
    let mut buf = duotone::decode_image(&bytes)
        .with_context(|| format!("decode '{}'", input.display()))?;
    duotone::apply_effects(&mut buf, cfg, textures)
        .with_context(|| format!("process '{}'", input.display()))?;
    duotone::write_png(out, &buf)?;
    Ok(())
}

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use mezzanine::{
    BitDepth, FailurePolicy, Fps, IndicatorPolicy, LabelColors, MezzanineConfig, NoiseConfig,
    PngSequenceSink, RenderOptions, RenderThreading, Resolution, SecondChannel, SequenceKind,
    SyncPatternParams, SyncPatternSynthesizer, TracingDiagnostics,
};

#[derive(Parser, Debug)]
#[command(name = "mezzanine", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the frame timeline for a run as JSON.
    Plan(PlanArgs),
    /// Write the bit-pattern and QR PNG sequences and the AV-sync parameters.
    Frames(FramesArgs),
    /// Generate a band-limited noise WAV and its JSON manifest.
    Audio(AudioArgs),
}

/// Flags overlaid on an optional run config file.
#[derive(Args, Debug)]
struct RunArgs {
    /// Run config JSON; flags below override its values.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Label carried in every QR code.
    #[arg(long)]
    label: Option<String>,

    /// Frame rate: `30`, `29.97` or `30000/1001`.
    #[arg(long)]
    fps: Option<Fps>,

    /// Output resolution, `WIDTHxHEIGHT`.
    #[arg(long)]
    resolution: Option<Resolution>,

    /// Duration in seconds, indicator frames included.
    #[arg(long)]
    duration: Option<f64>,

    /// Start/end indicators: none, start, end or both.
    #[arg(long)]
    indicators: Option<IndicatorPolicy>,

    /// Frames per indicator block.
    #[arg(long)]
    indicator_frames: Option<u32>,
}

impl RunArgs {
    fn resolve(&self) -> anyhow::Result<MezzanineConfig> {
        let mut cfg = match &self.config {
            Some(path) => MezzanineConfig::from_json_file(path)
                .with_context(|| format!("load config '{}'", path.display()))?,
            None => MezzanineConfig::default(),
        };
        if let Some(label) = &self.label {
            cfg.label = label.clone();
        }
        if let Some(fps) = self.fps {
            cfg.frame_rate = fps;
        }
        if let Some(resolution) = self.resolution {
            cfg.resolution = resolution;
        }
        if let Some(duration) = self.duration {
            cfg.duration_secs = duration;
        }
        if let Some(indicators) = self.indicators {
            cfg.indicators = indicators;
        }
        if let Some(n) = self.indicator_frames {
            cfg.indicator_frames = n;
        }
        cfg.validate()?;
        Ok(cfg)
    }
}

#[derive(Parser, Debug)]
struct PlanArgs {
    #[command(flatten)]
    run: RunArgs,
}

#[derive(Parser, Debug)]
struct FramesArgs {
    #[command(flatten)]
    run: RunArgs,

    /// Output directory; sequences go to `bitpattern/` and `qr/` below it.
    #[arg(long)]
    out: PathBuf,

    /// Render QR codes dark-on-light instead of light-on-dark.
    #[arg(long, default_value_t = false)]
    dark_on_light: bool,

    /// Enable frame-level parallelism.
    #[arg(long, default_value_t = false)]
    parallel: bool,

    /// Override rayon worker threads (parallel mode only).
    #[arg(long)]
    threads: Option<usize>,

    /// Frames per chunk.
    #[arg(long, default_value_t = 64)]
    chunk_size: usize,

    /// Stop at the first frame that fails.
    #[arg(long, default_value_t = false)]
    fail_fast: bool,

    /// AV-sync generator program; when set it is run after the sequences are written.
    #[arg(long)]
    sync_program: Option<PathBuf>,

    /// Arguments placed before the generator flags (repeatable).
    #[arg(long = "sync-arg", allow_hyphen_values = true)]
    sync_args: Vec<String>,
}

#[derive(Parser, Debug)]
struct AudioArgs {
    /// Output WAV path; the manifest is written next to it.
    #[arg(long)]
    out: PathBuf,

    /// Noise config JSON; flags below override its values.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Seed text; defaults to the output file name.
    #[arg(long)]
    seed: Option<String>,

    /// Duration in whole seconds.
    #[arg(long)]
    duration: Option<u32>,

    /// Sample rate in Hz.
    #[arg(long)]
    sample_rate: Option<u32>,

    /// Channel count.
    #[arg(long)]
    channels: Option<u16>,

    /// Bits per sample: 16, 24 or 32.
    #[arg(long)]
    bits: Option<u16>,

    /// Passband edge in Hz.
    #[arg(long)]
    bandwidth: Option<f64>,

    /// Start with the causal filter's settling silence.
    #[arg(long, default_value_t = false)]
    silent_start: bool,

    /// Copy channel 0 into channel 1 instead of leaving it silent.
    #[arg(long, default_value_t = false)]
    duplicate_second_channel: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Plan(args) => cmd_plan(args),
        Command::Frames(args) => cmd_frames(args),
        Command::Audio(args) => cmd_audio(args),
    }
}

fn cmd_plan(args: PlanArgs) -> anyhow::Result<()> {
    let cfg = args.run.resolve()?;
    let plan = cfg.plan()?;
    println!(
        "{}",
        serde_json::to_string_pretty(&plan).context("encode plan JSON")?
    );
    Ok(())
}

fn cmd_frames(args: FramesArgs) -> anyhow::Result<()> {
    let mut cfg = args.run.resolve()?;
    if args.dark_on_light {
        cfg.label_colors = LabelColors::DarkOnLight;
    }
    let plan = cfg.plan()?;

    std::fs::create_dir_all(&args.out)
        .with_context(|| format!("create output dir '{}'", args.out.display()))?;

    let opts = RenderOptions {
        threading: RenderThreading {
            parallel: args.parallel,
            chunk_size: args.chunk_size,
            threads: args.threads,
        },
        failure: if args.fail_fast {
            FailurePolicy::FailFast
        } else {
            FailurePolicy::Continue
        },
        ..RenderOptions::default()
    };

    let mut bit_sink = PngSequenceSink::new(args.out.join(SequenceKind::BitPattern.dir_name()));
    let mut label_sink = PngSequenceSink::new(args.out.join(SequenceKind::Label.dir_name()));
    let report = mezzanine::render_sequences(
        &cfg,
        &plan,
        &mut bit_sink,
        &mut label_sink,
        &opts,
        &TracingDiagnostics,
    )?;

    let sync = SyncPatternParams::from_plan(&plan, &cfg, &args.out);
    let params_path = args.out.join("avsync_params.json");
    std::fs::write(
        &params_path,
        serde_json::to_string_pretty(&sync).context("encode sync parameters")?,
    )
    .with_context(|| format!("write '{}'", params_path.display()))?;

    if let Some(program) = &args.sync_program {
        mezzanine::ProcessSyncPattern::new(program)
            .with_leading_args(&args.sync_args)
            .synthesize(&sync)?;
    }

    for seq in [&report.bit_pattern, &report.label] {
        eprintln!(
            "{}: wrote {} of {} frames",
            seq.kind, seq.written, plan.frame_count
        );
    }
    let failed = report.bit_pattern.failures.len() + report.label.failures.len();
    if failed > 0 {
        anyhow::bail!("{failed} frames failed to render");
    }
    Ok(())
}

fn cmd_audio(args: AudioArgs) -> anyhow::Result<()> {
    let mut cfg = match &args.config {
        Some(path) => NoiseConfig::from_json_file(path)
            .with_context(|| format!("load noise config '{}'", path.display()))?,
        None => NoiseConfig::default(),
    };
    if let Some(seed) = &args.seed {
        cfg.seed = Some(seed.clone());
    }
    if let Some(d) = args.duration {
        cfg.duration_secs = d;
    }
    if let Some(rate) = args.sample_rate {
        cfg.sample_rate = rate;
    }
    if let Some(ch) = args.channels {
        cfg.channels = ch;
    }
    if let Some(bits) = args.bits {
        cfg.bit_depth = BitDepth::try_from(bits)?;
    }
    if let Some(bw) = args.bandwidth {
        cfg.filter.bandwidth_hz = bw;
    }
    if args.silent_start {
        cfg.silent_start = true;
    }
    if args.duplicate_second_channel {
        cfg.second_channel = SecondChannel::Duplicate;
    }

    let fallback_seed = file_name(&args.out);
    let spec = cfg.to_spec(&fallback_seed)?;
    let seq = mezzanine::generate_noise(&spec)?;

    if let Some(parent) = args.out.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    mezzanine::write_wav(&seq, &args.out)?;

    let command_line = std::env::args().collect::<Vec<_>>().join(" ");
    let manifest = mezzanine::AudioManifest::for_noise(
        &spec,
        &args.out,
        cfg.version,
        cfg.spec_version,
        command_line,
    )?;
    let manifest_path = manifest.write_next_to(&args.out)?;

    eprintln!("wrote {}", args.out.display());
    eprintln!("wrote {}", manifest_path.display());
    Ok(())
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

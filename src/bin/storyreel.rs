use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};

use storyreel::services::{EspeakSynthesizer, SpeechSynthesizer as _};
use storyreel::session::ProjectFile;
use storyreel::{MediaItem, MediaOrigin, NarrationSource, NarrationTrack, Project, TransitionKind};

#[derive(Parser, Debug)]
#[command(name = "storyreel", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a project JSON into an MP4 (requires `ffmpeg` on PATH).
    Render(RenderArgs),
    /// Synthesize narration text into a WAV (requires `espeak-ng` on PATH).
    Speak(SpeakArgs),
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Input project JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output directory for the MP4 artifact.
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,
}

#[derive(Parser, Debug)]
struct SpeakArgs {
    /// Narration script text.
    #[arg(long)]
    text: String,

    /// Output WAV path.
    #[arg(long)]
    out: PathBuf,

    /// Voice/language identifier.
    #[arg(long, default_value = "en")]
    language: String,

    /// Speaking rate multiplier (1.0 = normal).
    #[arg(long, default_value_t = 1.0)]
    rate: f64,

    /// Synthesizer binary.
    #[arg(long, default_value = "espeak-ng")]
    binary: String,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Speak(args) => cmd_speak(args),
    }
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let file = ProjectFile::from_path(&args.in_path)?;
    let settings = file.settings()?;
    let base_dir = args
        .in_path
        .parent()
        .unwrap_or_else(|| Path::new("."))
        .to_path_buf();

    let mut project = Project::new(settings)?;
    for entry in &file.media {
        let mut item = MediaItem::new(resolve(&base_dir, &entry.path), MediaOrigin::UserUpload);
        if let Some(secs) = entry.duration_secs {
            item.set_duration(secs)?;
        }
        project.add_media(item);
    }
    if let Some(narration) = &file.narration {
        project.set_narration(NarrationTrack::from_file(
            resolve(&base_dir, narration),
            NarrationSource::Uploaded,
        ));
    }

    project.generate_timeline()?;
    for (i, entry) in file.media.iter().enumerate() {
        let timeline = project
            .timeline_mut()
            .context("timeline missing after generation (unexpected)")?;
        if let Some(text) = &entry.text {
            timeline.set_text(i, text.clone())?;
        }
        if let Some(kind) = &entry.transition {
            timeline.set_transition(i, TransitionKind::parse(kind)?)?;
        }
    }

    let mut last_pct = -1i32;
    let mut on_progress = |f: f32| {
        let pct = (f * 100.0) as i32;
        if pct != last_pct {
            last_pct = pct;
            eprint!("\rrendering {pct:3}%");
        }
    };
    let job = project.render(&args.out_dir, Some(&mut on_progress));
    eprintln!();

    if let Some(detail) = job.failure_detail() {
        anyhow::bail!("render failed: {detail}");
    }
    eprintln!("wrote {}", job.output_path.display());
    Ok(())
}

fn cmd_speak(args: SpeakArgs) -> anyhow::Result<()> {
    let synth = EspeakSynthesizer::new(&args.binary);
    synth.synthesize(&args.text, &args.language, args.rate, &args.out)?;
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn resolve(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

//! CLI application for scoring recorded landmark detections.
//!
//! Usage:
//!   happy-lens <landmarks.json>                   # Human-readable output
//!   happy-lens <landmarks.json> --json            # JSON output
//!   happy-lens <landmarks.json> -o scores.json    # Save to file
//!   happy-lens <landmarks.json> --render out.png  # Save the overlay of the last frame

use clap::Parser;
use happy_lens::{
    Assessment, Config, FrameAnalyzer, HappinessEstimator, LandmarkRenderer, Mood, Recording,
    ReplayDetector, ScoreStatus, ScoringConfig, SmileMetrics,
};
use image::RgbaImage;
use serde::Serialize;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "happy-lens")]
#[command(author, version, about = "Happiness score from facial landmarks", long_about = None)]
struct Args {
    /// Recorded detection pass(es) as JSON
    #[arg(required = true)]
    landmarks: PathBuf,

    /// Output as JSON
    #[arg(short, long)]
    json: bool,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Write the landmark overlay of the last frame to this PNG
    #[arg(long)]
    render: Option<PathBuf>,

    /// Scoring and palette config (JSON)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Use the 70/30 mouth/eye weighting without smoothing
    #[arg(long, conflicts_with = "config")]
    two_signal: bool,

    /// Show verbose output
    #[arg(short, long)]
    verbose: bool,
}

/// Output structure for JSON serialization
#[derive(Serialize)]
struct Output {
    source: String,
    frames: Vec<FrameOutput>,
}

#[derive(Serialize)]
struct FrameOutput {
    /// Frame index (0-based)
    index: usize,
    width: u32,
    height: u32,
    faces_detected: usize,
    score: u8,
    mood: Mood,
    status: ScoreStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    signals: Option<SmileMetrics>,
    #[serde(skip_serializing_if = "Option::is_none")]
    raw: Option<f32>,
}

impl FrameOutput {
    fn new(index: usize, width: u32, height: u32, faces: usize, assessment: Assessment) -> Self {
        Self {
            index,
            width,
            height,
            faces_detected: faces,
            score: assessment.score.value(),
            mood: assessment.score.mood(),
            status: assessment.status,
            signals: assessment.metrics,
            raw: assessment.raw,
        }
    }
}

fn main() {
    let args = Args::parse();
    init_tracing(args.verbose);

    if let Err(e) = run(&args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let config = match (&args.config, args.two_signal) {
        (Some(path), _) => {
            tracing::info!(path = %path.display(), "loading config");
            Config::load(path)?
        }
        (None, true) => Config {
            scoring: ScoringConfig::fixed_two_signal(),
            ..Config::default()
        },
        (None, false) => Config::default(),
    };

    let estimator = HappinessEstimator::new(config.scoring)?;
    let analyzer = FrameAnalyzer::new(estimator, LandmarkRenderer::new(config.palette));

    tracing::info!(path = %args.landmarks.display(), "loading landmarks");
    let recording = Recording::load(&args.landmarks)?;
    let mut detector = ReplayDetector::new(&recording);

    let mut canvas = RgbaImage::new(1, 1);
    let mut frames = Vec::with_capacity(recording.len());

    for (index, pass) in recording.frames.iter().enumerate() {
        let last = index + 1 == recording.len();
        let overlay = if last && args.render.is_some() {
            Some(&mut canvas)
        } else {
            None
        };

        let assessment = analyzer.analyze(&mut detector, &index, pass.frame(), overlay)?;
        tracing::debug!(index, score = assessment.score.value(), "frame scored");

        frames.push(FrameOutput::new(
            index,
            pass.width,
            pass.height,
            pass.faces.len(),
            assessment,
        ));
    }

    if let Some(ref path) = args.render {
        if recording.is_empty() {
            return Err("Nothing to render: the recording has no frames".into());
        }
        canvas.save(path)?;
        if args.verbose {
            eprintln!("Overlay written to {:?}", path);
        }
    }

    let output = Output {
        source: args.landmarks.display().to_string(),
        frames,
    };

    // Generate output
    let output_str = if args.json {
        serde_json::to_string_pretty(&output)?
    } else {
        format_human_readable(&output)
    };

    // Write output
    if let Some(ref path) = args.output {
        std::fs::write(path, &output_str)?;
        if args.verbose {
            eprintln!("Output written to {:?}", path);
        }
    } else {
        println!("{}", output_str);
    }

    Ok(())
}

fn format_human_readable(output: &Output) -> String {
    let mut s = String::new();

    s.push_str(&format!("Source: {}\n", output.source));
    s.push_str(&format!("Frames: {}\n", output.frames.len()));

    if output.frames.is_empty() {
        s.push_str("\nNo frames recorded.\n");
        return s;
    }

    for frame in &output.frames {
        let mood = frame.mood;
        s.push_str(&format!(
            "\n--- Frame {} ({}x{}, {} face(s)) ---\n",
            frame.index, frame.width, frame.height, frame.faces_detected
        ));
        s.push_str(&format!("Happiness: {}% {} ({})\n", frame.score, mood.emoji(), mood));

        match frame.status {
            ScoreStatus::Measured => {}
            ScoreStatus::InsufficientLandmarks { mouth, eyes } => {
                s.push_str(&format!(
                    "  Not enough landmarks (mouth: {}, eyes: {})\n",
                    mouth, eyes
                ));
            }
            ScoreStatus::NonFinite => s.push_str("  Non-finite geometry, score reset\n"),
        }

        if let Some(signals) = frame.signals {
            s.push_str("\nSignals:\n");
            s.push_str(&format!("  Mouth curvature: {:.3}\n", signals.mouth_curvature));
            s.push_str(&format!("  Eye narrowing:   {:.3}\n", signals.eye_narrowing));
            s.push_str(&format!("  Mouth width:     {:.3}\n", signals.mouth_width));
        }
        if let Some(raw) = frame.raw {
            s.push_str(&format!("  Combined:        {:.3}\n", raw));
        }
    }

    s
}

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use stomp_control::analysis::StompPipeline;
use stomp_control::audio::{list_input_devices, AudioCapture, Take, WavBlockReader};
use stomp_control::classify::EnergyRatioClassifier;
use stomp_control::config::AppConfig;
use stomp_control::control::{DirectionSink, KeySink};
use stomp_control::Direction;

#[derive(Parser, Debug)]
#[command(
    name = "stomp_cli",
    about = "Stomp detection and direction classification over stereo audio"
)]
struct Cli {
    /// Path to a JSON configuration file (defaults apply if absent)
    #[arg(long)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Detect stomps from the live input device
    Listen {
        /// Input device index from `devices`
        #[arg(long)]
        device: Option<usize>,
        /// Capture sample rate override
        #[arg(long)]
        sample_rate: Option<u32>,
        /// Energy threshold override
        #[arg(long)]
        threshold: Option<f32>,
        /// Emit events as JSON lines instead of log text
        #[arg(long)]
        json: bool,
    },
    /// Replay a WAV file through the detection pipeline
    Replay {
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        threshold: Option<f32>,
        /// Use peak-picking detection with wall-clock deduplication
        #[arg(long)]
        peaks: bool,
        #[arg(long)]
        json: bool,
    },
    /// Record one stereo WAV take per cardinal direction
    Record {
        /// Directory the takes are written into
        output_dir: PathBuf,
        /// Shared name prefix for this session's files
        #[arg(long)]
        name: String,
        #[arg(long)]
        device: Option<usize>,
        #[arg(long)]
        sample_rate: Option<u32>,
    },
    /// List available input devices
    Devices,
}

fn main() -> ExitCode {
    stomp_control::init_logging();
    match run() {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {err:?}");
            ExitCode::from(1)
        }
    }
}

fn run() -> Result<ExitCode> {
    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => AppConfig::load_from_file(path),
        None => AppConfig::default(),
    };

    match cli.command {
        Commands::Listen {
            device,
            sample_rate,
            threshold,
            json,
        } => run_listen(config, device, sample_rate, threshold, json),
        Commands::Replay {
            input,
            threshold,
            peaks,
            json,
        } => run_replay(config, &input, threshold, peaks, json),
        Commands::Record {
            output_dir,
            name,
            device,
            sample_rate,
        } => run_record(config, &output_dir, &name, device, sample_rate),
        Commands::Devices => run_devices(),
    }
}

fn build_pipeline(config: &AppConfig) -> Result<StompPipeline> {
    let classifier = EnergyRatioClassifier::new(config.classifier.fallback);
    StompPipeline::new(config, Box::new(classifier)).context("building detection pipeline")
}

fn emit_events(
    events: &[stomp_control::DetectionEvent],
    sink: &mut KeySink,
    json: bool,
) -> Result<()> {
    for event in events {
        if json {
            println!("{}", serde_json::to_string(event)?);
        } else {
            println!(
                "Detected stomp at {} ms: {} (peak {:.3})",
                event.timestamp_ms, event.direction, event.peak_amplitude
            );
        }
        sink.press(event.direction);
    }
    Ok(())
}

fn run_listen(
    mut config: AppConfig,
    device: Option<usize>,
    sample_rate: Option<u32>,
    threshold: Option<f32>,
    json: bool,
) -> Result<ExitCode> {
    if let Some(rate) = sample_rate {
        config.detector.sample_rate = rate;
    }
    if let Some(threshold) = threshold {
        config.detector.energy_threshold = threshold;
    }

    let step_frames =
        (config.capture.step_ms as u64 * config.detector.sample_rate as u64 / 1000) as usize;
    let mut capture = AudioCapture::open(
        device,
        config.detector.sample_rate,
        step_frames,
        config.capture.queue_blocks,
    )
    .context("opening capture device")?;

    let mut pipeline = build_pipeline(&config)?;
    let mut sink = KeySink;

    eprintln!("Listening... press Ctrl+C to stop.");
    loop {
        let block = capture.read_block().context("reading capture block")?;
        match pipeline.process_block(&block) {
            Ok(events) => emit_events(&events, &mut sink, json)?,
            Err(err) => log::error!("[Listen] Classification failed: {}", err),
        }
    }
}

fn run_replay(
    mut config: AppConfig,
    input: &PathBuf,
    threshold: Option<f32>,
    peaks: bool,
    json: bool,
) -> Result<ExitCode> {
    if let Some(threshold) = threshold {
        config.detector.energy_threshold = threshold;
    }
    if peaks {
        config.detector.peak_picking = true;
        config.detector.threshold_mode = stomp_control::config::ThresholdMode::Static;
        if config.detector.min_stomp_sep_ms.is_none() {
            config.detector.cooldown_blocks = None;
            config.detector.min_stomp_sep_ms = Some(250);
        }
        // Peak picking wants room around each candidate; widen the rolling
        // buffer well past the segment window
        if config.detector.buffer_ms.is_none() {
            config.detector.buffer_ms = Some(config.detector.window_ms * 5);
        }
    }

    let mut reader = WavBlockReader::open(input, config.capture.step_ms)
        .with_context(|| format!("opening {input:?}"))?;
    // The file dictates the rate; window geometry rescales with it
    config.detector.sample_rate = reader.sample_rate();

    let mut pipeline = build_pipeline(&config)?;
    let mut sink = KeySink;
    let mut total = 0usize;

    while let Some(block) = reader.read_block() {
        match pipeline.process_block(&block) {
            Ok(events) => {
                total += events.len();
                emit_events(&events, &mut sink, json)?;
            }
            Err(err) => log::error!("[Replay] Classification failed: {}", err),
        }
    }

    eprintln!("Replay finished: {} stomp(s) detected.", total);
    Ok(ExitCode::from(0))
}

const RECORD_DIRECTIONS: [Direction; 4] = [
    Direction::Up,
    Direction::Down,
    Direction::Left,
    Direction::Right,
];

fn run_record(
    config: AppConfig,
    output_dir: &PathBuf,
    name: &str,
    device: Option<usize>,
    sample_rate: Option<u32>,
) -> Result<ExitCode> {
    let sample_rate = sample_rate.unwrap_or(config.detector.sample_rate);
    let step_frames = (config.capture.step_ms as u64 * sample_rate as u64 / 1000) as usize;

    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("creating {}", output_dir.display()))?;

    let mut capture = AudioCapture::open(
        device,
        sample_rate,
        step_frames,
        config.capture.queue_blocks,
    )
    .context("opening capture device")?;

    println!("Stereo recording session initialized.");
    println!("Files will be saved to: {}", output_dir.display());

    for direction in RECORD_DIRECTIONS {
        print!("\nPress Enter when ready to record '{}'...", direction);
        std::io::stdout().flush()?;
        wait_for_enter();

        // Drop anything captured while the operator was idle
        while capture.try_read_block().is_some() {}

        println!("Recording... press Enter to stop.");
        let take = record_until_enter(&mut capture, sample_rate);

        if take.is_empty() {
            println!("No audio captured; skipping file write.");
            continue;
        }

        let path = output_dir.join(format!("{}_{}.wav", name, direction));
        take.save_wav(&path)
            .with_context(|| format!("writing {}", path.display()))?;
        println!("Saved {} ({:.1}s).", path.display(), take.duration_secs());
    }

    Ok(ExitCode::from(0))
}

fn record_until_enter(capture: &mut AudioCapture, sample_rate: u32) -> Take {
    let stop = Arc::new(AtomicBool::new(false));
    let stop_flag = Arc::clone(&stop);
    std::thread::spawn(move || {
        let mut line = String::new();
        let _ = std::io::stdin().read_line(&mut line);
        stop_flag.store(true, Ordering::SeqCst);
    });

    let mut take = Take::new(sample_rate);
    while !stop.load(Ordering::SeqCst) {
        match capture.try_read_block() {
            Some(block) => take.push_block(&block),
            None => std::thread::sleep(std::time::Duration::from_millis(1)),
        }
    }
    take
}

fn wait_for_enter() {
    let mut line = String::new();
    let _ = std::io::stdin().read_line(&mut line);
}

fn run_devices() -> Result<ExitCode> {
    let devices = list_input_devices().context("enumerating input devices")?;
    if devices.is_empty() {
        println!("No input devices found.");
        return Ok(ExitCode::from(0));
    }

    for (index, name) in devices.iter().enumerate() {
        println!("{index}: {name}");
    }
    Ok(ExitCode::from(0))
}

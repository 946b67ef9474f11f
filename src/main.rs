//! paderbox-audio CLI - Inspect and load audio files from the command line

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{debug, info, Level};
use tracing_subscriber::FmtSubscriber;

use paderbox_audio::audio::{audio_info, describe_file, ChannelSelection, LoadOptions, Unit};
use paderbox_audio::{load_audio_with_sample_rate, DtypeSetting, LoaderConfig, VERSION};

/// paderbox-audio - Load audio with slice annotations like `speech.wav::[8000:16000]`
#[derive(Parser, Debug)]
#[command(name = "paderbox-audio")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show sample rate, channels, length and subtype of a file
    Info {
        /// Audio file path
        path: PathBuf,
    },

    /// Load a file (optionally sliced) and summarize the signal
    Load {
        /// Audio file path, may carry a `::[start:stop,channel]` annotation
        path: String,

        /// First frame to read; negative counts from the end
        #[arg(long, allow_hyphen_values = true)]
        start: Option<f64>,

        /// Frame after the last one to read; negative counts from the end
        #[arg(long, allow_hyphen_values = true)]
        stop: Option<f64>,

        /// Number of frames to read
        #[arg(long, allow_hyphen_values = true)]
        frames: Option<f64>,

        /// Channel selection: `2`, `1,3,5` or `0:2`
        #[arg(long)]
        channel: Option<ChannelSelection>,

        /// Unit of start/stop/frames: samples or seconds
        #[arg(long)]
        unit: Option<Unit>,

        /// Sample type: int16, int32, float32, float64 or native
        #[arg(long)]
        dtype: Option<DtypeSetting>,

        /// Pad short reads with this value
        #[arg(long, allow_hyphen_values = true)]
        fill_value: Option<f64>,

        /// Fail unless the file has this sample rate
        #[arg(long)]
        expected_sample_rate: Option<u32>,

        /// YAML file with loader defaults
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Describe what files actually contain, whatever their suffix
    Probe {
        /// Files to inspect
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },
}

fn setup_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_writer(std::io::stderr)
        .compact()
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    debug!("paderbox-audio v{}", VERSION);

    match cli.command {
        Commands::Info { path } => {
            let info = audio_info(&path)
                .with_context(|| format!("Failed to read info of {}", path.display()))?;
            println!("path:        {}", path.display());
            println!("sample rate: {}", info.sample_rate);
            println!("channels:    {}", info.channels);
            println!("frames:      {}", info.frames);
            println!("duration:    {:.3}s", info.duration());
            println!("subtype:     {}", info.subtype);
            println!("shape:       {:?}", info.shape());
            println!("format:      {}", describe_file(&path));
            Ok(())
        }

        Commands::Load {
            path,
            start,
            stop,
            frames,
            channel,
            unit,
            dtype,
            fill_value,
            expected_sample_rate,
            config,
        } => {
            let mut options = match &config {
                Some(config) => {
                    info!("Loading config from {:?}", config);
                    LoaderConfig::load(config)
                        .map(|cfg| cfg.to_options())
                        .context("Failed to load config")?
                }
                None => LoadOptions::new(),
            };

            if let Some(start) = start {
                options = options.start(start);
            }
            if let Some(stop) = stop {
                options = options.stop(stop);
            }
            if let Some(frames) = frames {
                options = options.frames(frames);
            }
            if let Some(channel) = channel {
                options = options.channel(channel);
            }
            if let Some(unit) = unit {
                options = options.unit(unit);
            }
            if let Some(dtype) = dtype {
                options = options.dtype(dtype.dtype());
            }
            if let Some(fill_value) = fill_value {
                options = options.fill_value(fill_value);
            }
            if let Some(sample_rate) = expected_sample_rate {
                options = options.expected_sample_rate(sample_rate);
            }
            debug!(?options, "load options");

            let (signal, sample_rate) = load_audio_with_sample_rate(&path, &options)
                .with_context(|| format!("Failed to load {path}"))?;
            println!("dtype:       {}", signal.dtype());
            println!("shape:       {:?}", signal.shape());
            println!("sample rate: {}", sample_rate);
            println!("peak:        {:.6}", signal.peak());
            Ok(())
        }

        Commands::Probe { paths } => {
            for path in paths {
                println!("{}", describe_file(&path));
            }
            Ok(())
        }
    }
}

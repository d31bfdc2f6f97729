//! pixpack - pack files into a PNG image and back.

use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand};
use log::Level;
use pixpack::config::PngCompression;
use pixpack::progress::{LogObserver, COMPLETE_LABEL};
use pixpack::{ConvertConfig, Error, ProgressObserver};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "pixpack")]
#[command(author, version, about, long_about = None)]
#[command(
    about = "Pack files into a lossless PNG image and unpack them again",
    long_about = "Stores any number of files and directories inside the RGB channels of a single PNG. \
                  Decoding recreates the original names, contents and directory layout."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    options: GlobalOptions,
}

#[derive(Args)]
struct GlobalOptions {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    /// JSON configuration file; flags override its values
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert files and directories into an image
    Encode {
        /// Files or directories to pack
        #[arg(required = true, num_args = 1..)]
        inputs: Vec<PathBuf>,

        /// Image to create
        #[arg(short, long)]
        output: PathBuf,

        /// PNG compression: fast, default or best
        #[arg(long)]
        compression: Option<PngCompression>,
    },

    /// Extract the files stored in one or more images
    Decode {
        /// Images, or directories searched for images
        #[arg(required = true, num_args = 1..)]
        inputs: Vec<PathBuf>,

        /// Directory to extract into
        #[arg(short, long, default_value = ".")]
        output: PathBuf,

        /// Largest decoded image to accept, in MiB
        #[arg(long)]
        max_image_mb: Option<u64>,

        /// Keep existing files instead of replacing them
        #[arg(long)]
        no_overwrite: bool,
    },
}

/// Prints progress to stdout and counts reported errors.
///
/// Progress goes to stdout only; errors go through [`LogObserver`].
#[derive(Default)]
struct ConsoleObserver {
    log: LogObserver,
    errors: usize,
}

impl ProgressObserver for ConsoleObserver {
    fn on_progress(&mut self, label: &str, fraction: f64) {
        if label != COMPLETE_LABEL {
            println!("  {:>5.1}%  {}", fraction * 100.0, label);
        }
    }

    fn on_error(&mut self, error: &Error) {
        self.errors += 1;
        self.log.on_error(error);
    }
}

fn main() {
    let cli = Cli::parse();

    let level = match (cli.options.quiet, cli.options.verbose) {
        (true, _) => Level::Error,
        (false, 0) => Level::Warn,
        (false, 1) => Level::Debug,
        (false, _) => Level::Trace,
    };
    if let Err(e) = simple_logger::init_with_level(level) {
        eprintln!("Failed to initialise logging: {}", e);
    }

    match run(cli) {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<bool> {
    let mut config = load_config(cli.options.config.as_deref())?;

    match cli.command {
        Commands::Encode {
            inputs,
            output,
            compression,
        } => {
            if let Some(compression) = compression {
                config.compression = compression;
            }
            cmd_encode(&inputs, &output, &config)
        }

        Commands::Decode {
            inputs,
            output,
            max_image_mb,
            no_overwrite,
        } => {
            if let Some(mb) = max_image_mb {
                config.max_image_bytes = mb.saturating_mul(1024 * 1024);
            }
            if no_overwrite {
                config.overwrite = false;
            }
            config.validate().map_err(Error::Config)?;
            cmd_decode(&inputs, &output, &config)
        }
    }
}

fn load_config(path: Option<&Path>) -> anyhow::Result<ConvertConfig> {
    match path {
        Some(path) => ConvertConfig::from_file(path)
            .with_context(|| format!("loading config {}", path.display())),
        None => Ok(ConvertConfig::default()),
    }
}

fn cmd_encode(inputs: &[PathBuf], output: &Path, config: &ConvertConfig) -> anyhow::Result<bool> {
    println!("Encoding files");
    let mut observer = ConsoleObserver::default();
    let summary = pixpack::encode(inputs, output, config, &mut observer)?;

    if !summary.saved {
        bail!("could not write {}", output.display());
    }

    println!("Created: {}", summary.output.display());
    println!("  Canvas:        {0}x{0} px", summary.dimension);
    println!("  Files packed:  {}", summary.files_packed);
    println!("  Bytes written: {} of {}", summary.bytes_written, summary.total_bytes);
    if summary.files_skipped > 0 {
        println!("  Skipped:       {}", summary.files_skipped);
    }
    if observer.errors > 0 {
        println!("  Problems:      {} (see log)", observer.errors);
    }

    Ok(true)
}

fn cmd_decode(inputs: &[PathBuf], output: &Path, config: &ConvertConfig) -> anyhow::Result<bool> {
    println!("Decoding files");
    let mut observer = ConsoleObserver::default();
    let summary = pixpack::decode(inputs, output, config, &mut observer);

    if !summary.success() {
        eprintln!("No files were extracted");
        return Ok(false);
    }

    println!("Unpacked to: {}", output.display());
    println!("  Images:  {}", summary.images_processed);
    println!("  Files:   {}", summary.files_written.len());
    if summary.images_failed > 0 {
        println!("  Failed:  {}", summary.images_failed);
    }
    if observer.errors > 0 {
        println!("  Problems: {} (see log)", observer.errors);
    }

    Ok(true)
}

use clap::{Parser, Subcommand};
use log::LevelFilter;
use smart_crop::imaging::calculations::normalized_target;
use smart_crop::imaging::{self, Quality, RustBackend};
use smart_crop::{config, output};
use std::path::{Path, PathBuf};

/// Target size shared by the commands that run a search.
#[derive(clap::Args, Clone)]
struct TargetArgs {
    /// Source image
    input: PathBuf,

    /// Target width in pixels
    #[arg(long)]
    width: u32,

    /// Target height in pixels
    #[arg(long)]
    height: u32,

    /// Only the aspect ratio matters: search for a 100-wide target instead
    #[arg(long)]
    normalize: bool,
}

impl TargetArgs {
    fn search_target(&self) -> (u32, u32) {
        if self.normalize {
            normalized_target(self.width, self.height)
        } else {
            (self.width, self.height)
        }
    }
}

#[derive(Parser)]
#[command(name = "smart-crop")]
#[command(about = "Content-aware crop selection for thumbnails")]
#[command(long_about = "\
Content-aware crop selection for thumbnails

Finds the rectangle of the target aspect ratio that best keeps the
interesting content of an image: skin tones, saturated color and detail,
weighted towards the rule-of-thirds lines and away from the crop border.

Run 'smart-crop gen-config' to generate a documented config file.")]
#[command(version)]
struct Cli {
    /// Config file (TOML); stock defaults when omitted
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log search progress to stderr
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Find the best crop and print its geometry
    Crop {
        #[command(flatten)]
        target: TargetArgs,

        /// Write the cropped image, resized to the target size
        #[arg(long)]
        output: Option<PathBuf>,

        /// Write the analysis maps (R = skin, G = edge, B = saturation)
        #[arg(long)]
        analysis: Option<PathBuf>,

        /// Encoder quality for lossy output formats
        #[arg(long, default_value_t = 90)]
        quality: u32,
    },
    /// Print a JSON report of the best candidates
    Analyze {
        #[command(flatten)]
        target: TargetArgs,

        /// Number of candidates to include
        #[arg(long, default_value_t = 10)]
        top: usize,
    },
    /// Print a stock config file with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let backend = RustBackend::new();

    match cli.command {
        Command::Crop {
            target,
            output: out_path,
            analysis,
            quality,
        } => {
            let settings = load_settings(cli.config.as_deref())?;
            let search_target = target.search_target();
            let result =
                imaging::analyze_file(&backend, &target.input, search_target, &settings.crop)?;
            if let Some(path) = &out_path {
                imaging::apply_crop(
                    &backend,
                    &target.input,
                    path,
                    &result,
                    (target.width, target.height),
                    Quality::new(quality),
                )?;
            }
            if let Some(path) = &analysis {
                imaging::write_analysis(&backend, &result, path)?;
            }
            output::print_crop_output(&result);
        }
        Command::Analyze { target, top } => {
            let settings = load_settings(cli.config.as_deref())?;
            let search_target = target.search_target();
            let source_dims = imaging::get_dimensions(&backend, &target.input)?;
            let result =
                imaging::analyze_file(&backend, &target.input, search_target, &settings.crop)?;
            let report =
                output::build_report(&result, source_dims, search_target, top);
            output::print_analysis_report(&report)?;
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Load settings and size the rayon pool from them.
fn load_settings(path: Option<&Path>) -> Result<config::Settings, config::ConfigError> {
    let settings = config::load_settings(path)?;
    init_thread_pool(&settings.processing);
    Ok(settings)
}

/// Log to stderr at `warn`, or `debug` for this crate with `--verbose`.
/// `RUST_LOG` overrides both.
fn init_logging(verbose: bool) {
    let mut builder = env_logger::Builder::new();
    builder.filter_level(LevelFilter::Warn);
    if verbose {
        builder.filter_module("smart_crop", LevelFilter::Debug);
    }
    builder.parse_default_env();
    builder.format_timestamp(None);
    builder.init();
}

/// Initialize the rayon thread pool based on processing config.
///
/// Caps at the number of available CPU cores. User can constrain down, not up.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}

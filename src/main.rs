use clap::Parser;
use std::path::PathBuf;
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

use ghostmark::{Anchor, SizeMode, WatermarkConfig, batch};

#[derive(Parser, Debug)]
#[command(author, version, about = "Add text or image watermarks to a folder of images", long_about = None)]
struct Cli {
    /// Optional TOML config file; command-line flags override its values
    #[arg(long, default_value = "ghostmark.toml")]
    config: PathBuf,

    #[arg(long, default_value = "info")]
    log_level: String,

    /// Input folder containing images to watermark
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Output folder for watermarked images
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Text to use as watermark
    #[arg(short, long, conflicts_with = "image")]
    text: Option<String>,

    /// Path to an image to use as watermark
    #[arg(short = 'm', long)]
    image: Option<PathBuf>,

    /// Position of the watermark
    #[arg(short, long, value_enum)]
    position: Option<Anchor>,

    /// Opacity from 0.0 (invisible) to 1.0 (fully visible)
    #[arg(short = 'a', long)]
    opacity: Option<f32>,

    /// Relative size of the watermark
    #[arg(short, long, value_enum, conflicts_with = "pixel_size")]
    size: Option<SizeMode>,

    /// Fixed size in pixels for text height or the longest side of an image watermark
    #[arg(long, visible_alias = "px")]
    pixel_size: Option<u32>,

    /// Text color, either a name (e.g. red) or a hex code (e.g. #FF0000)
    #[arg(short = 'c', long)]
    text_color: Option<String>,

    /// Prefix added to output filenames
    #[arg(long)]
    prefix: Option<String>,

    /// Path to a TrueType font for text watermarks
    #[arg(long)]
    font: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Set up logging first
    let level = match cli.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let mut config = if cli.config.exists() {
        let config_content = std::fs::read_to_string(&cli.config)?;
        toml_edit::de::from_str::<WatermarkConfig>(&config_content)?
    } else {
        WatermarkConfig::default()
    };

    apply_cli_overrides(&mut config, &cli);
    config.normalize();

    if !config.input_folder.is_dir() {
        eprintln!(
            "Error: input folder {:?} does not exist",
            config.input_folder
        );
        std::process::exit(1);
    }

    info!(
        "watermarking images from {:?} into {:?}",
        config.input_folder, config.output_folder
    );

    let summary = batch::run(&config)?;
    println!(
        "Summary: {} images processed successfully, {} errors",
        summary.processed, summary.errors
    );

    Ok(())
}

fn apply_cli_overrides(config: &mut WatermarkConfig, cli: &Cli) {
    if let Some(input) = &cli.input {
        config.input_folder = input.clone();
    }
    if let Some(output) = &cli.output {
        config.output_folder = output.clone();
    }

    // Text and image are mutually exclusive; picking one on the command
    // line drops the other from the config file
    if cli.text.is_some() {
        config.text = cli.text.clone();
        config.image_path = None;
    } else if cli.image.is_some() {
        config.image_path = cli.image.clone();
        config.text = None;
    }

    if let Some(position) = cli.position {
        config.anchor = position;
    }
    if let Some(opacity) = cli.opacity {
        config.opacity = opacity;
    }

    // An explicit pixel size disables relative sizing and vice versa
    if let Some(pixel_size) = cli.pixel_size {
        config.pixel_size = pixel_size;
    } else if let Some(size) = cli.size {
        config.size = size;
        config.pixel_size = 0;
    }

    if let Some(text_color) = &cli.text_color {
        config.text_color = text_color.clone();
    }
    if let Some(prefix) = &cli.prefix {
        config.prefix = prefix.clone();
    }
    if let Some(font) = &cli.font {
        config.font_path = Some(font.clone());
    }
}

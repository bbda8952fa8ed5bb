//! MeterMan LCD command-line tool
//!
//! Decodes seven-segment displays in still images and maintains the
//! calibration file used between runs.

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};

use meterman_lcd::calibration::{render_preview, save_preview};
use meterman_lcd::lcd::table::{Segment, CHARACTERS};
use meterman_lcd::{log, paths, LcdConfig, LcdDecoder};

#[derive(Parser)]
#[command(name = "meterman-lcd")]
#[command(about = "Read seven-segment LCD/LED displays from images")]
#[command(version)]
struct Cli {
    /// Log decoder details.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Decode the display shown in an image.
    Decode(DecodeArgs),

    /// Calibrate from an image showing known characters.
    Calibrate(CalibrateArgs),

    /// Print the segment mask of every recognised character.
    Table,
}

#[derive(Debug, Clone, Args)]
struct DecoderArgs {
    /// Decoder config (JSON). Defaults to lcd.json next to the executable.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Calibration file. Defaults to calibration.txt next to the executable.
    #[arg(long)]
    levels: Option<PathBuf>,

    /// Input image.
    #[arg(long)]
    image: PathBuf,
}

#[derive(Debug, Clone, Args)]
struct DecodeArgs {
    #[command(flatten)]
    decoder: DecoderArgs,

    /// Write an image showing the sample regions.
    #[arg(long)]
    preview: Option<PathBuf>,
}

#[derive(Debug, Clone, Args)]
struct CalibrateArgs {
    #[command(flatten)]
    decoder: DecoderArgs,

    /// Characters shown on the display, one per digit.
    #[arg(long)]
    expect: String,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    meterman_lcd::set_verbose(cli.verbose);
    match paths::ensure_directories() {
        Ok(()) => meterman_lcd::set_log_file(paths::get_log_file()),
        Err(e) => eprintln!("Warning: Logging to stderr only: {}", e),
    }

    match cli.command {
        Commands::Decode(args) => run_decode(&args),
        Commands::Calibrate(args) => run_calibrate(&args),
        Commands::Table => {
            print_table();
            Ok(())
        }
    }
}

/// Builds the decoder and restores saved calibration if present.
fn load_decoder(args: &DecoderArgs) -> Result<(LcdDecoder, PathBuf)> {
    let config_path = args.config.clone().unwrap_or_else(paths::default_config_path);
    let levels_path = args.levels.clone().unwrap_or_else(paths::default_levels_path);

    let config = LcdConfig::load(&config_path)
        .with_context(|| format!("Failed to load config {}", config_path.display()))?;
    let mut decoder = LcdDecoder::from_config(&config)?;

    if levels_path.exists() {
        match decoder.restore_from_path(&levels_path) {
            Ok(_) => {
                decoder.pick_calibration();
            }
            Err(e) => log(&format!(
                "Warning: Ignoring calibration file {}: {}",
                levels_path.display(),
                e
            )),
        }
    }
    Ok((decoder, levels_path))
}

fn open_image(path: &Path) -> Result<image::RgbImage> {
    let img = image::open(path).with_context(|| format!("Failed to open image {}", path.display()))?;
    Ok(img.to_rgb8())
}

fn run_decode(args: &DecodeArgs) -> Result<()> {
    let (decoder, _) = load_decoder(&args.decoder)?;
    let img = open_image(&args.decoder.image)?;

    let result = decoder.decode(&img);
    if !result.is_valid() {
        log(&format!("Warning: {} digits not recognised", result.invalid));
    }
    for (i, scan) in result.scans.iter().enumerate() {
        meterman_lcd::log_verbose(&format!(
            "Digit {}: mask {:#04x}, segments {:?}, off {}, dp {:?}",
            i, scan.mask, scan.segments, scan.off, scan.dp
        ));
    }

    if let Some(path) = &args.preview {
        let preview = render_preview(&img, &decoder, Some(&result.scans));
        save_preview(&preview, path)?;
    }

    println!("{}\t{}", result.text, result.invalid);
    Ok(())
}

fn run_calibrate(args: &CalibrateArgs) -> Result<()> {
    let (mut decoder, levels_path) = load_decoder(&args.decoder)?;
    let img = open_image(&args.decoder.image)?;

    decoder.calibrate_from_image(&img, &args.expect)?;

    let result = decoder.decode(&img);
    let decoded: String = result.decodes.iter().map(|d| d.ch).collect();
    if decoded == args.expect {
        decoder.good();
    } else {
        log(&format!(
            "Warning: Decoded {:?} after calibrating for {:?}",
            decoded, args.expect
        ));
        decoder.bad();
    }
    decoder.recalibrate();

    let count = decoder.save_to_path(&levels_path)?;
    if count == 0 {
        bail!("No calibration sets to save");
    }
    println!("{}", decoded);
    Ok(())
}

fn print_table() {
    let labels: Vec<&str> = Segment::ALL.iter().map(|s| s.label()).collect();
    println!("char  mask  {}", labels.join(" "));
    for &(mask, c) in CHARACTERS.iter() {
        let lit: Vec<&str> = Segment::ALL
            .iter()
            .map(|s| if mask & s.mask() != 0 { s.label() } else { "  " })
            .collect();
        println!("{:?}   {:#04x}  {}", c, mask, lit.join(" "));
    }
}

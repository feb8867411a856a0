mod logger;

use anyhow::{Context, Result, bail};
use clap::{Parser, ValueEnum};
use pdf_booklet::{BookletConfig, GridSpec, Rotation};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(
    name = "pocketbook",
    about = "Impose a PDF as a foldable pocket booklet",
    version
)]
struct Cli {
    /// Input PDF file
    input: PathBuf,

    /// Output PDF file (default: <input>-booklet.pdf)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// JSON configuration file; command-line flags override it
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output paper size
    #[arg(long, value_enum)]
    paper: Option<PaperArg>,

    /// Output orientation
    #[arg(long, value_enum)]
    orientation: Option<OrientationArg>,

    /// Pages per folded signature (multiple of 4)
    #[arg(long)]
    signature_size: Option<usize>,

    /// Grid columns per sheet
    #[arg(long)]
    cols: Option<usize>,

    /// Grid rows per sheet
    #[arg(long)]
    rows: Option<usize>,

    /// Clockwise cell rotation per column in degrees, e.g. 270,90
    #[arg(long, value_delimiter = ',')]
    rotations: Option<Vec<i32>>,

    /// Do not draw cell borders
    #[arg(long)]
    no_borders: bool,

    /// Do not stamp sheet numbers
    #[arg(long)]
    no_annotations: bool,

    /// Show statistics only, don't generate PDF
    #[arg(long)]
    stats_only: bool,

    /// Write the effective configuration to this file
    #[arg(long)]
    save_config: Option<PathBuf>,

    /// More log output (repeat for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log warnings and errors
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum PaperArg {
    A3,
    A4,
    A5,
    Letter,
    Legal,
    Tabloid,
}

#[derive(Clone, Copy, ValueEnum)]
enum OrientationArg {
    Portrait,
    Landscape,
}

impl From<PaperArg> for pdf_booklet::PaperSize {
    fn from(arg: PaperArg) -> Self {
        match arg {
            PaperArg::A3 => Self::A3,
            PaperArg::A4 => Self::A4,
            PaperArg::A5 => Self::A5,
            PaperArg::Letter => Self::Letter,
            PaperArg::Legal => Self::Legal,
            PaperArg::Tabloid => Self::Tabloid,
        }
    }
}

impl From<OrientationArg> for pdf_booklet::Orientation {
    fn from(arg: OrientationArg) -> Self {
        match arg {
            OrientationArg::Portrait => Self::Portrait,
            OrientationArg::Landscape => Self::Landscape,
        }
    }
}

impl Cli {
    /// Start from the config file (or defaults) and apply flag overrides
    async fn booklet_config(&self) -> Result<BookletConfig> {
        let mut config = match &self.config {
            Some(path) => BookletConfig::load(path)
                .await
                .with_context(|| format!("Failed to load config {}", path.display()))?,
            None => BookletConfig::default(),
        };

        if let Some(paper) = self.paper {
            config.paper_size = paper.into();
        }
        if let Some(orientation) = self.orientation {
            config.orientation = orientation.into();
        }
        if let Some(signature_size) = self.signature_size {
            config.signature_size = signature_size;
        }
        if self.cols.is_some() || self.rows.is_some() {
            config.grid = GridSpec::new(
                self.cols.unwrap_or(config.grid.cols),
                self.rows.unwrap_or(config.grid.rows),
            );
        }
        if let Some(degrees) = &self.rotations {
            config.column_rotations = degrees
                .iter()
                .map(|&d| {
                    Rotation::from_degrees(d)
                        .with_context(|| format!("Rotation must be a multiple of 90, got {}", d))
                })
                .collect::<Result<_>>()?;
        }
        if self.no_borders {
            config.draw_borders = false;
        }
        if self.no_annotations {
            config.annotate_sheets = false;
        }

        config.validate()?;
        Ok(config)
    }
}

/// `<dir>/<stem>-booklet.pdf` next to the input
fn default_output_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string());
    input.with_file_name(format!("{}-booklet.pdf", stem))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logger::StderrLogger::new(logger::level_for(cli.verbose, cli.quiet)).init()?;

    if !cli.input.is_file() {
        bail!("Input file not found: {}", cli.input.display());
    }

    let config = cli.booklet_config().await?;

    if let Some(path) = &cli.save_config {
        config
            .save(path)
            .await
            .with_context(|| format!("Failed to save config {}", path.display()))?;
        log::info!("Saved configuration to {}", path.display());
    }

    if cli.stats_only {
        let document = pdf_booklet::load_pdf(&cli.input)
            .await
            .with_context(|| format!("Failed to read {}", cli.input.display()))?;
        let stats = pdf_booklet::calculate_statistics(document.get_pages().len(), &config)?;
        println!("Booklet Statistics:");
        println!("  Source pages: {}", stats.source_pages);
        println!("  Blank pages added: {}", stats.blank_pages_added);
        println!("  Signatures: {}", stats.signatures);
        println!("  Pages per sheet: {}", stats.cells_per_sheet);
        println!("  Output sheets: {}", stats.output_sheets);
        return Ok(());
    }

    let output = cli
        .output
        .clone()
        .unwrap_or_else(|| default_output_path(&cli.input));

    let stats = pdf_booklet::make_booklet_file(&cli.input, &output, &config)
        .await
        .with_context(|| format!("Failed to create booklet from {}", cli.input.display()))?;
    println!(
        "Booklet PDF created: {} ({} sheets)",
        output.display(),
        stats.output_sheets
    );

    Ok(())
}

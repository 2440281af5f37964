//! Command-line interface for building a mosaic from one image file

use crate::io::configuration::{
    DEFAULT_SERVER_URL, DEFAULT_TILE_HEIGHT, DEFAULT_TILE_WIDTH, Locality, MosaicConfig,
    OUTPUT_EXTENSION, OUTPUT_SUFFIX,
};
use crate::io::error::{Result, invalid_input};
use crate::io::image::load_source_image;
use crate::io::progress::ProgressManager;
use crate::io::render::MarkupWriter;
use crate::pipeline::{Mosaic, RunSummary};
use crate::resolve::HttpTileLookup;
use crate::spatial::TileGeometry;
use clap::Parser;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "tilemosaic")]
#[command(
    author,
    version,
    about = "Build a photo mosaic from tiles served by a color tile service"
)]
/// Command-line arguments for the mosaic builder
#[allow(clippy::struct_excessive_bools)]
pub struct Cli {
    /// Source image (JPEG, PNG or GIF)
    #[arg(value_name = "IMAGE")]
    pub target: PathBuf,

    /// Base URL of the color tile service
    #[arg(short, long, default_value = DEFAULT_SERVER_URL)]
    pub server: String,

    /// Tile width in pixels
    #[arg(short = 'W', long, default_value_t = DEFAULT_TILE_WIDTH)]
    pub tile_width: usize,

    /// Tile height in pixels
    #[arg(short = 'H', long, default_value_t = DEFAULT_TILE_HEIGHT)]
    pub tile_height: usize,

    /// Output document (defaults to <IMAGE stem>_mosaic.html next to the source)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Sample on the caller's task instead of a worker thread
    #[arg(long)]
    pub inline: bool,

    /// Suppress progress output
    #[arg(short, long)]
    pub quiet: bool,

    /// Process the image even if the output exists
    #[arg(short, long)]
    pub no_skip: bool,
}

impl Cli {
    /// Check if existing output files should be skipped
    pub const fn skip_existing(&self) -> bool {
        !self.no_skip
    }

    /// Check if progress should be displayed
    pub const fn should_show_progress(&self) -> bool {
        !self.quiet
    }

    /// Where the rendered document goes
    pub fn output_path(&self) -> PathBuf {
        self.output
            .clone()
            .unwrap_or_else(|| default_output_path(&self.target))
    }

    /// Mosaic configuration described by the arguments
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if a tile dimension is zero
    pub fn config(&self) -> Result<MosaicConfig> {
        Ok(MosaicConfig {
            geometry: TileGeometry::new(self.tile_width, self.tile_height)?,
            locality: if self.inline {
                Locality::Inline
            } else {
                Locality::Worker
            },
            ..MosaicConfig::default()
        })
    }
}

/// `<dir>/<stem>_mosaic.html` for a source at `<dir>/<stem>.<ext>`
pub fn default_output_path(input_path: &Path) -> PathBuf {
    let stem = input_path.file_stem().unwrap_or_default();
    let output_name = format!(
        "{}{}.{}",
        stem.to_string_lossy(),
        OUTPUT_SUFFIX,
        OUTPUT_EXTENSION
    );

    if let Some(parent) = input_path.parent() {
        parent.join(output_name)
    } else {
        PathBuf::from(output_name)
    }
}

/// Drives one mosaic run from the command line
pub struct MosaicApp {
    cli: Cli,
    progress_manager: Option<ProgressManager>,
}

impl MosaicApp {
    /// Create an app for the given arguments
    pub fn new(cli: Cli) -> Self {
        let progress_manager = cli.should_show_progress().then(ProgressManager::new);
        Self {
            cli,
            progress_manager,
        }
    }

    /// Build the mosaic and write it next to the source
    ///
    /// Returns `None` when the output already exists and skipping is enabled.
    ///
    /// # Errors
    ///
    /// Returns an error if the arguments are invalid, the image cannot be
    /// loaded, the run aborts or the output cannot be written
    pub async fn process(&self) -> Result<Option<RunSummary>> {
        if !self.cli.target.is_file() {
            return Err(invalid_input(
                "target",
                &self.cli.target.display(),
                &"must be an image file",
            ));
        }

        let output_path = self.cli.output_path();
        if self.cli.skip_existing() && output_path.exists() {
            log::warn!(
                "Skipping: {} (output {} exists)",
                self.cli.target.display(),
                output_path.display()
            );
            return Ok(None);
        }

        let config = self.cli.config()?;
        let image = load_source_image(&self.cli.target)?;
        let lookup = HttpTileLookup::new(&self.cli.server)?;
        let mosaic = Mosaic::new(config, lookup);

        if let Some(pm) = &self.progress_manager {
            pm.initialize(mosaic.grid_for(&image).rows());
        }

        let mut writer = MarkupWriter::create(&output_path)?;
        let handle = mosaic.start(image)?;
        let outcome = handle
            .drive(&mut writer, |event| {
                if let Some(pm) = &self.progress_manager {
                    pm.observe(event);
                }
            })
            .await;

        if let Some(pm) = &self.progress_manager {
            pm.finish();
        }

        let summary = outcome?;
        log::info!(
            "Wrote {} rows to {}",
            writer.rows_written(),
            output_path.display()
        );
        Ok(Some(summary))
    }
}

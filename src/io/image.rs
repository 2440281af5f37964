//! Source image loading with format allow-list enforcement

use crate::io::configuration::ACCEPTED_FORMATS;
use crate::io::error::{MosaicError, Result, invalid_input};
use crate::spatial::SourceImage;
use image::{ImageFormat, ImageReader};
use std::io::{BufRead, Cursor, Seek};
use std::path::Path;

/// Whether `format` may be used as a mosaic source
pub fn is_accepted(format: ImageFormat) -> bool {
    ACCEPTED_FORMATS.contains(&format)
}

/// Load and decode an image file into a source image
///
/// The format is detected from the file content, not its extension.
///
/// # Errors
///
/// Returns an error if:
/// - The file cannot be opened (`FileSystem`)
/// - The content is not a recognized image or not JPEG, PNG or GIF
///   (`InvalidInput`)
/// - Decoding fails (`DecodeFailure`)
pub fn load_source_image(path: &Path) -> Result<SourceImage> {
    let reader = ImageReader::open(path).map_err(|e| MosaicError::FileSystem {
        path: path.to_path_buf(),
        operation: "open image",
        source: e,
    })?;
    let image = decode_checked(reader, path)?;
    log::info!(
        "Loaded {} ({}x{})",
        path.display(),
        image.width(),
        image.height()
    );
    Ok(image)
}

/// Decode an in-memory image into a source image
///
/// # Errors
///
/// Returns `InvalidInput` for unrecognized or unsupported content and
/// `DecodeFailure` if decoding fails
pub fn load_source_bytes(bytes: &[u8]) -> Result<SourceImage> {
    decode_checked(ImageReader::new(Cursor::new(bytes)), Path::new("<memory>"))
}

fn decode_checked<R: BufRead + Seek>(reader: ImageReader<R>, path: &Path) -> Result<SourceImage> {
    let reader = reader
        .with_guessed_format()
        .map_err(|e| MosaicError::FileSystem {
            path: path.to_path_buf(),
            operation: "read image header",
            source: e,
        })?;

    let format = reader
        .format()
        .ok_or_else(|| invalid_input("image", &path.display(), &"not an image"))?;
    if !is_accepted(format) {
        return Err(invalid_input(
            "image",
            &path.display(),
            &format!("unsupported format {format:?}, expected JPEG, PNG or GIF"),
        ));
    }

    let decoded = reader.decode().map_err(|e| MosaicError::DecodeFailure {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(SourceImage::from(decoded.to_rgba8()))
}

// File boundary of the engine: decoding images picked by file extension, and writing
// difference maps back out as PNG. Nothing here knows about YIQ; the engine never
// touches a file.

use crate::core_modules::diff_engine::DifferenceMap;
use image::{DynamicImage, ImageError, ImageFormat};
use log::debug;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("could not open image file {path:?}: {source}")]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not decode {format} image file {path:?}: {source}")]
    Decode {
        path: PathBuf,
        format: &'static str,
        source: ImageError,
    },
    #[error("unknown image file extension {0:?}")]
    UnknownExtension(String),
    #[error("could not write image file {path:?}: {source}")]
    Save { path: PathBuf, source: ImageError },
}

/// Maps a file extension onto a decoder. Matching is case-insensitive.
pub fn format_for(path: &Path) -> Result<(ImageFormat, &'static str), LoadError> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    match extension.as_str() {
        "png" => Ok((ImageFormat::Png, "PNG")),
        "jpeg" | "jpg" => Ok((ImageFormat::Jpeg, "JPEG")),
        "gif" => Ok((ImageFormat::Gif, "GIF")),
        "tif" | "tiff" => Ok((ImageFormat::Tiff, "TIFF")),
        "" => Err(LoadError::UnknownExtension(String::new())),
        other => Err(LoadError::UnknownExtension(format!(".{other}"))),
    }
}

/// Decodes the image at `path`, choosing the decoder from the file extension.
pub fn load(path: impl AsRef<Path>) -> Result<DynamicImage, LoadError> {
    let path = path.as_ref();
    let (format, label) = format_for(path)?;

    let file = File::open(path).map_err(|source| LoadError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let image = image::load(BufReader::new(file), format).map_err(|source| LoadError::Decode {
        path: path.to_path_buf(),
        format: label,
        source,
    })?;

    debug!(
        "loaded {} {}x{} {:?} from {}",
        label,
        image.width(),
        image.height(),
        image.color(),
        path.display()
    );
    Ok(image)
}

/// Writes the difference map as a 16-bit grayscale PNG.
pub fn save_difference_map(path: impl AsRef<Path>, map: &DifferenceMap) -> Result<(), LoadError> {
    let path = path.as_ref();
    map.image()
        .save_with_format(path, ImageFormat::Png)
        .map_err(|source| LoadError::Save {
            path: path.to_path_buf(),
            source,
        })?;
    let (width, height) = map.image().dimensions();
    debug!("saved {width}x{height} difference map to {}", path.display());
    Ok(())
}

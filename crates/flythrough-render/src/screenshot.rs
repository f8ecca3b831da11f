//! Saving rendered frames as image files.

use std::path::Path;

use image::{DynamicImage, ImageFormat, RgbaImage};

use crate::error::{RenderError, RenderResult};

/// Destination for individual rendered frames.
pub trait ImageSink {
    /// Writes `image` to `path`.
    fn write(&mut self, path: &Path, image: &RgbaImage) -> RenderResult<()>;
}

/// Writes frames to disk, choosing the format from the file extension.
#[derive(Debug, Default, Clone, Copy)]
pub struct FileImageSink;

impl ImageSink for FileImageSink {
    fn write(&mut self, path: &Path, image: &RgbaImage) -> RenderResult<()> {
        save_image(path, image)
    }
}

/// Saves an RGBA image to a file.
///
/// Supports `.png` and `.jpg`/`.jpeg`; JPEG output drops the alpha channel.
pub fn save_image(path: &Path, image: &RgbaImage) -> RenderResult<()> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();

    match extension.as_str() {
        "png" => {
            image.save_with_format(path, ImageFormat::Png)?;
        }
        "jpg" | "jpeg" => {
            let rgb = DynamicImage::ImageRgba8(image.clone()).to_rgb8();
            rgb.save_with_format(path, ImageFormat::Jpeg)?;
        }
        _ => {
            return Err(RenderError::UnsupportedFormat(extension));
        }
    }

    Ok(())
}

/// Numbered file name of frame `index`: `0000.png`, `0001.png`, ...
pub fn frame_file_name(index: usize) -> String {
    format!("{index:04}.png")
}

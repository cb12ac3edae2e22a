use crate::{config::ExportConfig, error::Result, loader::Bitmap};
use image::{
    RgbImage,
    buffer::ConvertBuffer,
    codecs::{jpeg::JpegEncoder, png::PngEncoder},
};
use std::{
    fmt, fs,
    path::{Path, PathBuf},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Png,
    Jpeg,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Png => "png",
            ExportFormat::Jpeg => "jpg",
        }
    }

    pub fn mime(&self) -> &'static str {
        match self {
            ExportFormat::Png => "image/png",
            ExportFormat::Jpeg => "image/jpeg",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportFormat::Png => write!(f, "PNG"),
            ExportFormat::Jpeg => write!(f, "JPEG"),
        }
    }
}

/// An encoded output bitmap, ready to be handed to a file-save dialog.
#[derive(Debug, Clone)]
pub struct ExportedImage {
    pub file_name: String,
    pub mime: &'static str,
    pub bytes: Vec<u8>,
}

impl ExportedImage {
    /// Writes the image into `dir` under its file name.
    pub fn save_to(&self, dir: impl AsRef<Path>) -> Result<PathBuf> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)?;

        let path = dir.join(&self.file_name);
        fs::write(&path, &self.bytes)?;
        log::info!(
            "saved {} ({})",
            path.display(),
            cutil::fs::pretty_bytes_size(self.bytes.len() as u64)
        );
        Ok(path)
    }
}

/// Encodes `bitmap`. JPEG output drops the alpha channel.
pub fn encode(
    bitmap: &Bitmap,
    format: ExportFormat,
    config: &ExportConfig,
) -> Result<ExportedImage> {
    let mut bytes = Vec::new();

    match format {
        ExportFormat::Png => bitmap.write_with_encoder(PngEncoder::new(&mut bytes))?,
        ExportFormat::Jpeg => {
            let rgb: RgbImage = bitmap.convert();
            let quality = config.jpeg_quality.clamp(1, 100);
            rgb.write_with_encoder(JpegEncoder::new_with_quality(&mut bytes, quality))?;
        }
    }

    Ok(ExportedImage {
        file_name: format!("{}.{}", config.file_stem, format.extension()),
        mime: format.mime(),
        bytes,
    })
}

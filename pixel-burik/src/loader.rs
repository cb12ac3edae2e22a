//! Bitmap loader and display scaler.

use crate::{
    config::LoaderConfig,
    error::{Result, SessionError},
};
use fast_image_resize::{
    FilterType, PixelType, ResizeAlg, ResizeOptions, Resizer, images::Image as FastImage,
};
use image::{ImageFormat, RgbaImage};
use log::{debug, info};
use std::{fs::File, io::Read, path::Path};

/// RGBA8, row-major, top-left origin.
pub type Bitmap = RgbaImage;

/// Raw image bytes as handed over by a file picker or drop target.
#[derive(Debug, Clone)]
pub struct ImageResource {
    pub name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

/// A decoded image and its preview-sized copy.
#[derive(Debug, Clone)]
pub struct LoadedImage {
    pub source: Bitmap,
    pub display: Bitmap,
}

impl ImageResource {
    pub fn new(name: impl Into<String>, mime: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime: mime.into(),
            bytes,
        }
    }

    /// Reads a file and derives its MIME type from the extension.
    ///
    /// Files larger than `max_file_size` fail with [`SessionError::TooLarge`]
    /// before their contents are read.
    pub fn from_path(path: impl AsRef<Path>, max_file_size: u64) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;

        let size = file.metadata()?.len();
        if size > max_file_size {
            return Err(SessionError::TooLarge {
                size,
                max: max_file_size,
            });
        }

        // the file may grow between the metadata call and the read
        let mut bytes = Vec::with_capacity(size as usize);
        file.take(max_file_size.saturating_add(1)).read_to_end(&mut bytes)?;

        if bytes.len() as u64 > max_file_size {
            return Err(SessionError::TooLarge {
                size: bytes.len() as u64,
                max: max_file_size,
            });
        }

        Ok(Self::new(cutil::fs::file_name(path), mime_from_path(path), bytes))
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    pub fn is_image_mime(&self) -> bool {
        self.mime.trim().to_ascii_lowercase().starts_with("image/")
    }
}

fn mime_from_path(path: &Path) -> String {
    if let Ok(format) = ImageFormat::from_path(path) {
        return format.to_mime_type().to_string();
    }

    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "txt" | "md" | "csv" => "text/plain",
        "json" => "application/json",
        "pdf" => "application/pdf",
        _ => "application/octet-stream",
    }
    .to_string()
}

/// Checks, decodes and scales `resource`.
///
/// The size check runs before the type check, and both run before any
/// decoding work.
pub fn load(resource: &ImageResource, config: &LoaderConfig) -> Result<LoadedImage> {
    let source = decode(resource, config)?;
    let display = scale_to_display(&source, config.display_max_width, config.display_max_height)?;

    info!(
        "loaded {} ({}x{}), display {}x{}",
        resource.name,
        source.width(),
        source.height(),
        display.width(),
        display.height()
    );

    Ok(LoadedImage { source, display })
}

/// Validates `resource` and decodes it to a full-resolution bitmap.
pub fn decode(resource: &ImageResource, config: &LoaderConfig) -> Result<Bitmap> {
    if resource.size() > config.max_file_size {
        return Err(SessionError::TooLarge {
            size: resource.size(),
            max: config.max_file_size,
        });
    }

    if !resource.is_image_mime() {
        return Err(SessionError::NotAnImage(format!(
            "{} has type `{}`",
            resource.name, resource.mime
        )));
    }

    let image = image::load_from_memory(&resource.bytes)
        .map_err(|e| SessionError::NotAnImage(format!("decode {} failed: {e}", resource.name)))?;

    if image.width() == 0 || image.height() == 0 {
        return Err(SessionError::NotAnImage(format!(
            "{} has no pixels",
            resource.name
        )));
    }

    Ok(image.to_rgba8())
}

/// Size of the preview for a `width` x `height` image.
///
/// Images inside the bound are kept as is. Larger ones are scaled by
/// `min(max_width / width, max_height / height)`, each side rounded to the
/// nearest pixel and never below 1.
pub fn display_dimensions(width: u32, height: u32, max_width: u32, max_height: u32) -> (u32, u32) {
    if width <= max_width && height <= max_height {
        return (width, height);
    }

    let ratio = f64::min(
        max_width as f64 / width as f64,
        max_height as f64 / height as f64,
    );

    let scaled_width = ((width as f64 * ratio).round() as u32).clamp(1, max_width.max(1));
    let scaled_height = ((height as f64 * ratio).round() as u32).clamp(1, max_height.max(1));
    (scaled_width, scaled_height)
}

/// Downscales `source` to fit the display bound. Never upscales.
pub fn scale_to_display(source: &Bitmap, max_width: u32, max_height: u32) -> Result<Bitmap> {
    let (width, height) = source.dimensions();
    let (dst_width, dst_height) = display_dimensions(width, height, max_width, max_height);

    if (dst_width, dst_height) == (width, height) {
        return Ok(source.clone());
    }

    debug!("scale {width}x{height} -> {dst_width}x{dst_height}");

    let src_image = FastImage::from_vec_u8(width, height, source.as_raw().clone(), PixelType::U8x4)
        .map_err(|e| SessionError::Resize(format!("Failed to create source image: {e}")))?;

    let mut dst_image = FastImage::new(dst_width, dst_height, PixelType::U8x4);

    let resize_options =
        ResizeOptions::new().resize_alg(ResizeAlg::Convolution(FilterType::Bilinear));

    Resizer::new()
        .resize(&src_image, &mut dst_image, &resize_options)
        .map_err(|e| SessionError::Resize(format!("Resize failed: {e}")))?;

    RgbaImage::from_raw(dst_width, dst_height, dst_image.into_vec()).ok_or_else(|| {
        SessionError::Resize("Failed to create resized image buffer".to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, codecs::png::PngEncoder};

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = RgbaImage::from_fn(width, height, |x, y| {
            Rgba([(x % 256) as u8, (y % 256) as u8, 128, 255])
        });

        let mut bytes = Vec::new();
        img.write_with_encoder(PngEncoder::new(&mut bytes)).unwrap();
        bytes
    }

    #[test]
    fn test_display_dimensions_scale_down() {
        assert_eq!(display_dimensions(800, 600, 400, 300), (400, 300));
        assert_eq!(display_dimensions(1000, 200, 400, 300), (400, 80));
        assert_eq!(display_dimensions(300, 900, 400, 300), (100, 300));
        assert_eq!(display_dimensions(1000, 333, 400, 300), (400, 133));
    }

    #[test]
    fn test_display_dimensions_never_upscale() {
        assert_eq!(display_dimensions(320, 240, 400, 300), (320, 240));
        assert_eq!(display_dimensions(400, 300, 400, 300), (400, 300));
        assert_eq!(display_dimensions(1, 1, 400, 300), (1, 1));
    }

    #[test]
    fn test_display_dimensions_keep_at_least_one_pixel() {
        assert_eq!(display_dimensions(10_000, 1, 400, 300), (400, 1));
        assert_eq!(display_dimensions(1, 10_000, 400, 300), (1, 300));
    }

    #[test]
    fn test_display_dimensions_preserve_aspect_ratio() {
        let (w, h) = display_dimensions(1920, 1080, 400, 300);
        assert_eq!(w, 400);
        assert!(((w as f64 / h as f64) - 16.0 / 9.0).abs() < 0.02);
    }

    #[test]
    fn test_scale_to_display() {
        let source = RgbaImage::from_pixel(800, 600, Rgba([10, 20, 30, 255]));
        let display = scale_to_display(&source, 400, 300).unwrap();

        assert_eq!(display.dimensions(), (400, 300));
        for p in display.pixels() {
            for (c, expected) in [10u8, 20, 30, 255].into_iter().enumerate() {
                assert!(p[c].abs_diff(expected) <= 1, "{p:?}");
            }
        }
    }

    #[test]
    fn test_scale_to_display_small_image_unchanged() {
        let source = RgbaImage::from_fn(50, 40, |x, y| Rgba([x as u8, y as u8, 0, 255]));
        assert_eq!(scale_to_display(&source, 400, 300).unwrap(), source);
    }

    #[test]
    fn test_load_png() {
        let resource = ImageResource::new("a.png", "image/png", png_bytes(800, 600));
        let loaded = load(&resource, &LoaderConfig::default()).unwrap();

        assert_eq!(loaded.source.dimensions(), (800, 600));
        assert_eq!(loaded.display.dimensions(), (400, 300));
    }

    #[test]
    fn test_too_large_checked_first() {
        let config = LoaderConfig {
            max_file_size: 16,
            ..LoaderConfig::default()
        };
        let resource = ImageResource::new("big.txt", "text/plain", vec![0; 17]);

        assert!(matches!(
            decode(&resource, &config),
            Err(SessionError::TooLarge { size: 17, max: 16 })
        ));
    }

    #[test]
    fn test_from_path_rejects_oversized_file_before_reading() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("big.png");
        std::fs::write(&path, vec![0u8; 65]).unwrap();

        assert!(matches!(
            ImageResource::from_path(&path, 64),
            Err(SessionError::TooLarge { size: 65, max: 64 })
        ));

        let resource = ImageResource::from_path(&path, 65).unwrap();
        assert_eq!(resource.size(), 65);
        assert_eq!(resource.mime, "image/png");
        assert_eq!(resource.name, "big.png");
    }

    #[test]
    fn test_from_path_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            ImageResource::from_path(dir.path().join("gone.png"), 64),
            Err(SessionError::Io(_))
        ));
    }

    #[test]
    fn test_rejects_non_image_mime() {
        let resource = ImageResource::new("notes.txt", "text/plain", b"hello".to_vec());
        assert!(matches!(
            decode(&resource, &LoaderConfig::default()),
            Err(SessionError::NotAnImage(_))
        ));
    }

    #[test]
    fn test_rejects_undecodable_bytes() {
        let resource = ImageResource::new("fake.png", "image/png", b"not really a png".to_vec());
        assert!(matches!(
            decode(&resource, &LoaderConfig::default()),
            Err(SessionError::NotAnImage(_))
        ));
    }

    #[test]
    fn test_mime_from_path() {
        assert_eq!(mime_from_path(Path::new("a.PNG")), "image/png");
        assert_eq!(mime_from_path(Path::new("b.jpg")), "image/jpeg");
        assert_eq!(mime_from_path(Path::new("c.txt")), "text/plain");
        assert_eq!(mime_from_path(Path::new("d")), "application/octet-stream");
    }

    #[test]
    fn test_image_mime_check() {
        assert!(ImageResource::new("", "image/webp", vec![]).is_image_mime());
        assert!(ImageResource::new("", "Image/PNG", vec![]).is_image_mime());
        assert!(!ImageResource::new("", "text/plain", vec![]).is_image_mime());
        assert!(!ImageResource::new("", "", vec![]).is_image_mime());
    }
}

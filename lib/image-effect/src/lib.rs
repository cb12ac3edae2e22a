//! Mosaic and blur effects over RGBA buffers.
//!
//! Every effect is a small config struct implementing [`Effect`]. Configs are
//! built with `new()` plus `with_*` setters and applied in place:
//!
//! ```
//! use image::RgbaImage;
//! use image_effect::{Effect, stylized_effect::PixelateConfig};
//!
//! let mut img = RgbaImage::new(32, 32);
//! PixelateConfig::new().with_block_size(8).apply(&mut img).unwrap();
//! ```

pub mod blur_effect;
pub mod stylized_effect;

use image::RgbaImage;

pub type ImageEffectResult<T> = Result<T, ImageEffectError>;

#[derive(thiserror::Error, Debug)]
pub enum ImageEffectError {
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}

pub trait Effect {
    fn apply(&self, image: &mut RgbaImage) -> ImageEffectResult<()>;
}

#[derive(Debug, Clone)]
pub enum ImageEffect {
    Pixelate(stylized_effect::PixelateConfig),
    GaussianBlur(blur_effect::GaussianBlurConfig),
    BoxBlur(blur_effect::BoxBlurConfig),
}

impl Effect for ImageEffect {
    fn apply(&self, image: &mut RgbaImage) -> ImageEffectResult<()> {
        match self {
            ImageEffect::Pixelate(config) => config.apply(image),
            ImageEffect::GaussianBlur(config) => config.apply(image),
            ImageEffect::BoxBlur(config) => config.apply(image),
        }
    }
}

/// Applies the effects in order. Stops at the first failure.
pub fn apply_chain(image: &mut RgbaImage, effects: &[ImageEffect]) -> ImageEffectResult<()> {
    for effect in effects {
        log::trace!("apply effect: {effect:?}");
        effect.apply(image)?;
    }

    Ok(())
}

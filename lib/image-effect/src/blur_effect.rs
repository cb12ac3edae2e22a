use crate::{Effect, ImageEffectResult};
use derivative::Derivative;
use derive_setters::Setters;
use image::RgbaImage;
use serde::{Deserialize, Serialize};

/// Smoothing kernel used by the blur pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BlurKind {
    #[default]
    Gaussian,
    Box,
}

/// Gaussian blur configuration
///
/// `radius` is the standard deviation in pixels, the same unit a CSS
/// `blur(<radius>px)` filter uses. The kernel is cut at three sigma and never
/// reaches further than the image's largest side. A radius of 0 leaves the
/// image untouched.
#[derive(Debug, Clone, Derivative, Setters)]
#[derivative(Default)]
#[setters(prefix = "with_")]
#[non_exhaustive]
pub struct GaussianBlurConfig {
    #[derivative(Default(value = "3"))]
    radius: u32,
}

impl GaussianBlurConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Normalized weights for offsets `-half..=half`, with `half` at most
    /// `max_half`.
    fn kernel(&self, max_half: u32) -> Vec<f32> {
        let sigma = self.radius as f32;
        let half = ((sigma * 3.0).ceil() as u32).min(max_half) as i64;
        let denom = 2.0 * sigma * sigma;

        let mut kernel: Vec<f32> = (-half..=half)
            .map(|i| {
                let d = i as f32;
                (-(d * d) / denom).exp()
            })
            .collect();

        let sum: f32 = kernel.iter().sum();
        kernel.iter_mut().for_each(|w| *w /= sum);
        kernel
    }
}

impl Effect for GaussianBlurConfig {
    fn apply(&self, image: &mut RgbaImage) -> ImageEffectResult<()> {
        if self.radius == 0 {
            return Ok(());
        }

        let kernel = self.kernel(image.width().max(image.height()));
        let horizontal = convolve(image, &kernel, Axis::Horizontal);
        *image = convolve(&horizontal, &kernel, Axis::Vertical);
        Ok(())
    }
}

/// Box blur configuration
///
/// Separable mean filter over a `2 * radius + 1` window with edge clamping.
#[derive(Debug, Clone, Derivative, Setters)]
#[derivative(Default)]
#[setters(prefix = "with_")]
#[non_exhaustive]
pub struct BoxBlurConfig {
    #[derivative(Default(value = "3"))]
    radius: u32,
}

impl BoxBlurConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Window weights folded down to `max_half` taps per side. Offsets past
    /// the largest side all clamp to the same edge pixel, so their weight is
    /// added to the outermost taps and the result stays exact.
    fn kernel(&self, max_half: u32) -> Vec<f32> {
        let half = self.radius.min(max_half);
        let weight = 1.0 / (2.0 * self.radius as f64 + 1.0);
        let tail = (self.radius - half) as f64 * weight;

        let mut kernel = vec![weight; 2 * half as usize + 1];
        let last = kernel.len() - 1;
        kernel[0] += tail;
        kernel[last] += tail;

        kernel.into_iter().map(|w| w as f32).collect()
    }
}

impl Effect for BoxBlurConfig {
    fn apply(&self, image: &mut RgbaImage) -> ImageEffectResult<()> {
        if self.radius == 0 {
            return Ok(());
        }

        let kernel = self.kernel(image.width().max(image.height()));
        let horizontal = convolve(image, &kernel, Axis::Horizontal);
        *image = convolve(&horizontal, &kernel, Axis::Vertical);
        Ok(())
    }
}

#[derive(Debug, Clone, Copy)]
enum Axis {
    Horizontal,
    Vertical,
}

/// One pass of a symmetric 1-D kernel along `axis`. Samples outside the
/// image are clamped to the nearest edge pixel.
fn convolve(image: &RgbaImage, kernel: &[f32], axis: Axis) -> RgbaImage {
    let (width, height) = image.dimensions();
    let half = (kernel.len() / 2) as i64;
    let mut result = RgbaImage::new(width, height);

    for y in 0..height {
        for x in 0..width {
            let mut sum = [0f32; 4];

            for (k, weight) in kernel.iter().enumerate() {
                let offset = k as i64 - half;
                let (sx, sy) = match axis {
                    Axis::Horizontal => (clamp_index(x, offset, width), y),
                    Axis::Vertical => (x, clamp_index(y, offset, height)),
                };

                let pixel = image.get_pixel(sx, sy);
                for c in 0..4 {
                    sum[c] += pixel[c] as f32 * weight;
                }
            }

            let pixel = result.get_pixel_mut(x, y);
            for c in 0..4 {
                pixel[c] = sum[c].round().clamp(0.0, 255.0) as u8;
            }
        }
    }

    result
}

fn clamp_index(index: u32, offset: i64, len: u32) -> u32 {
    (index as i64 + offset).clamp(0, len as i64 - 1) as u32
}

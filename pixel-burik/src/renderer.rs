//! Pixelation-blur renderer.
//!
//! [`render`] is a pure function of the display bitmap and the parameters.
//! It always starts from the bitmap it is given, so editing parameters back
//! and forth never accumulates drift.

use crate::loader::Bitmap;
use derivative::Derivative;
use derive_setters::Setters;
use image_effect::{
    ImageEffect, ImageEffectResult, apply_chain,
    blur_effect::{BlurKind, BoxBlurConfig, GaussianBlurConfig},
    stylized_effect::{BlockSample, PixelateConfig},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Derivative, Setters)]
#[derivative(Default)]
#[setters(prefix = "with_")]
pub struct RenderParameters {
    /// Edge length of a pixelation block, at least 1
    #[derivative(Default(value = "10"))]
    pub block_size: u32,

    /// Blur strength, 0 disables the blur pass
    #[derivative(Default(value = "0"))]
    pub blur_radius: u32,
}

/// How the pipeline samples blocks and which blur kernel it uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Setters)]
#[setters(prefix = "with_")]
pub struct RenderOptions {
    pub sample: BlockSample,
    pub blur_kind: BlurKind,
}

/// Valid parameter ranges exposed to the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderLimits {
    pub max_block_size: u32,
    pub max_blur_radius: u32,
}

impl RenderLimits {
    /// Clamps `block_size` into `[1, max_block_size]` and `blur_radius`
    /// into `[0, max_blur_radius]`.
    pub fn clamp(&self, params: RenderParameters) -> RenderParameters {
        RenderParameters {
            block_size: params.block_size.clamp(1, self.max_block_size.max(1)),
            blur_radius: params.blur_radius.min(self.max_blur_radius),
        }
    }
}

/// Renders with top-left sampling and a Gaussian blur.
pub fn render(display: &Bitmap, params: RenderParameters) -> Bitmap {
    render_with(display, params, RenderOptions::default())
}

/// Pixelates a copy of `display`, then blurs it when `blur_radius > 0`.
///
/// # Panics
///
/// Panics if an effect rejects its input. The parameters are validated
/// before any effect runs, so this only happens on a broken invariant.
pub fn render_with(display: &Bitmap, params: RenderParameters, options: RenderOptions) -> Bitmap {
    assert!(params.block_size > 0, "block size must be positive");

    match try_render(display, params, options) {
        Ok(output) => output,
        Err(e) => panic!(
            "render failed on a {}x{} bitmap with {params:?}: {e}",
            display.width(),
            display.height()
        ),
    }
}

fn try_render(
    display: &Bitmap,
    params: RenderParameters,
    options: RenderOptions,
) -> ImageEffectResult<Bitmap> {
    let mut output = display.clone();
    apply_chain(&mut output, &effects(params, options))?;

    debug_assert_eq!(output.dimensions(), display.dimensions());
    Ok(output)
}

fn effects(params: RenderParameters, options: RenderOptions) -> Vec<ImageEffect> {
    let mut effects = vec![ImageEffect::Pixelate(
        PixelateConfig::new()
            .with_block_size(params.block_size)
            .with_sample(options.sample),
    )];

    if params.blur_radius > 0 {
        effects.push(match options.blur_kind {
            BlurKind::Gaussian => ImageEffect::GaussianBlur(
                GaussianBlurConfig::new().with_radius(params.blur_radius),
            ),
            BlurKind::Box => {
                ImageEffect::BoxBlur(BoxBlurConfig::new().with_radius(params.blur_radius))
            }
        });
    }

    effects
}

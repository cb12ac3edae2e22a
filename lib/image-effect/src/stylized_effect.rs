use crate::{Effect, ImageEffectError, ImageEffectResult};
use derivative::Derivative;
use derive_setters::Setters;
use image::{Rgba, RgbaImage};
use serde::{Deserialize, Serialize};

/// How a block picks its fill colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BlockSample {
    /// Colour of the block's top-left pixel.
    #[default]
    TopLeft,
    /// Mean colour over the (clipped) block.
    Average,
}

/// Pixelate effect configuration
///
/// Blocks are anchored at (0, 0). Blocks on the right and bottom edges are
/// clipped by the image bounds. Every filled pixel is written fully opaque.
#[derive(Debug, Clone, Derivative, Setters)]
#[derivative(Default)]
#[setters(prefix = "with_")]
#[non_exhaustive]
pub struct PixelateConfig {
    #[derivative(Default(value = "10"))]
    block_size: u32,

    #[derivative(Default(value = "BlockSample::TopLeft"))]
    sample: BlockSample,
}

impl PixelateConfig {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Effect for PixelateConfig {
    fn apply(&self, image: &mut RgbaImage) -> ImageEffectResult<()> {
        if self.block_size == 0 {
            return Err(ImageEffectError::InvalidParameter(
                "block size must be positive".to_string(),
            ));
        }

        let (width, height) = image.dimensions();
        let block_size = self.block_size;

        for y in (0..height).step_by(block_size as usize) {
            let y_end = y.saturating_add(block_size).min(height);

            for x in (0..width).step_by(block_size as usize) {
                let x_end = x.saturating_add(block_size).min(width);

                let [r, g, b] = match self.sample {
                    BlockSample::TopLeft => {
                        let pixel = image.get_pixel(x, y);
                        [pixel[0], pixel[1], pixel[2]]
                    }
                    BlockSample::Average => block_average(image, x..x_end, y..y_end),
                };

                let fill = Rgba([r, g, b, 255]);
                for by in y..y_end {
                    for bx in x..x_end {
                        image.put_pixel(bx, by, fill);
                    }
                }
            }
        }

        Ok(())
    }
}

fn block_average(
    image: &RgbaImage,
    xs: std::ops::Range<u32>,
    ys: std::ops::Range<u32>,
) -> [u8; 3] {
    let mut sum = [0u64; 3];
    let mut count = 0u64;

    for by in ys {
        for bx in xs.clone() {
            let pixel = image.get_pixel(bx, by);
            sum[0] += pixel[0] as u64;
            sum[1] += pixel[1] as u64;
            sum[2] += pixel[2] as u64;
            count += 1;
        }
    }

    // Rounded mean
    sum.map(|s| ((s + count / 2) / count) as u8)
}

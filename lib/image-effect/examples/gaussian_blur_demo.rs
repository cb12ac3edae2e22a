/// Blur example
/// Pixelates the test image, then blurs it with both kernels at several radii
use image::ImageReader;
use image_effect::{
    ImageEffect, apply_chain,
    blur_effect::{BoxBlurConfig, GaussianBlurConfig},
    stylized_effect::PixelateConfig,
};
use std::path::Path;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let output_dir = Path::new("tmp");
    std::fs::create_dir_all(output_dir)?;

    let img_path = Path::new("data/test.png");
    let img = ImageReader::open(img_path)?.decode()?.to_rgba8();

    for radius in [1, 2, 5, 10] {
        let pixelate = ImageEffect::Pixelate(PixelateConfig::new().with_block_size(10));

        let mut gaussian = img.clone();
        apply_chain(
            &mut gaussian,
            &[
                pixelate.clone(),
                ImageEffect::GaussianBlur(GaussianBlurConfig::new().with_radius(radius)),
            ],
        )?;
        let filename = format!("gaussian_blur_r{}.png", radius);
        gaussian.save(output_dir.join(&filename))?;
        println!("✓ Generated {}", filename);

        let mut boxed = img.clone();
        apply_chain(
            &mut boxed,
            &[
                pixelate,
                ImageEffect::BoxBlur(BoxBlurConfig::new().with_radius(radius)),
            ],
        )?;
        let filename = format!("box_blur_r{}.png", radius);
        boxed.save(output_dir.join(&filename))?;
        println!("✓ Generated {}", filename);
    }

    println!("\n✓ All blur effects applied successfully!");
    println!("  Images saved to: tmp/");

    Ok(())
}

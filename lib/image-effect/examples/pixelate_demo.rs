/// Pixelate effect example
/// Renders the test image at several block sizes with both sampling modes
use image::ImageReader;
use image_effect::{
    Effect, ImageEffect,
    stylized_effect::{BlockSample, PixelateConfig},
};
use std::path::Path;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let output_dir = Path::new("tmp");
    std::fs::create_dir_all(output_dir)?;

    let img_path = Path::new("data/test.png");
    let img = ImageReader::open(img_path)?.decode()?.to_rgba8();

    for sample in [BlockSample::TopLeft, BlockSample::Average] {
        for block_size in [4, 10, 20, 50] {
            let mut test_img = img.clone();
            let effect = ImageEffect::Pixelate(
                PixelateConfig::new()
                    .with_block_size(block_size)
                    .with_sample(sample),
            );

            effect.apply(&mut test_img)?;

            let filename = format!("pixelate_{sample:?}_b{block_size}.png").to_lowercase();
            test_img.save(output_dir.join(&filename))?;
            println!("✓ Generated {}", filename);
        }
    }

    println!("\n✓ All pixelate effects applied successfully!");
    println!("  Images saved to: tmp/");

    Ok(())
}

use image::{Rgba, RgbaImage};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    std::fs::create_dir_all("data")?;

    // 800x600 gradient, large enough to be scaled down for preview
    let img = RgbaImage::from_fn(800, 600, |x, y| {
        let r = (x * 255 / 800) as u8;
        let g = (y * 255 / 600) as u8;
        let b = ((x + y) * 255 / 1400) as u8;
        Rgba([r, g, b, 255])
    });

    img.save("data/test.png")?;
    println!("Created data/test.png");
    Ok(())
}

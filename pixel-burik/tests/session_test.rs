use image::{Rgba, RgbaImage, codecs::png::PngEncoder};
use pixel_burik::{
    Config, ExportFormat, ImageResource, RenderParameters, RenderWorker, Session, SessionError,
    render,
};
use std::time::Duration;

fn striped_png(width: u32, height: u32) -> Vec<u8> {
    let img = RgbaImage::from_fn(width, height, |x, y| {
        Rgba([(x * 7 % 256) as u8, (y * 13 % 256) as u8, ((x / 3 + y / 5) * 29 % 256) as u8, 255])
    });

    let mut bytes = Vec::new();
    img.write_with_encoder(PngEncoder::new(&mut bytes)).unwrap();
    bytes
}

fn params(block_size: u32, blur_radius: u32) -> RenderParameters {
    RenderParameters {
        block_size,
        blur_radius,
    }
}

fn loaded_session(width: u32, height: u32) -> Session {
    let mut session = Session::default();
    session
        .load(&ImageResource::new("photo.png", "image/png", striped_png(width, height)))
        .unwrap();
    session
}

#[test]
fn test_large_image_scaled_then_pixelated_and_blurred() {
    let mut session = loaded_session(800, 600);

    assert_eq!(session.source().unwrap().dimensions(), (800, 600));
    let display = session.display().unwrap().clone();
    assert_eq!(display.dimensions(), (400, 300));

    let sharp = session.set_parameters(params(10, 0)).unwrap().clone();

    for (x, y, pixel) in sharp.enumerate_pixels() {
        let anchor = display.get_pixel(x / 10 * 10, y / 10 * 10);
        assert_eq!(pixel.0[..3], anchor.0[..3], "pixel ({x}, {y})");
    }

    let blurred = session.set_blur_radius(5).unwrap().clone();
    assert_eq!(blurred.dimensions(), (400, 300));

    let differing = (1..39)
        .flat_map(|bx| (1..29).map(move |by| (bx * 10, by * 10)))
        .filter(|&(x, y)| sharp.get_pixel(x, y) != blurred.get_pixel(x, y))
        .count();
    assert!(differing > 0);
}

#[test]
fn test_too_large_file_keeps_session_empty() {
    let mut session = Session::default();
    let resource = ImageResource::new("huge.png", "image/png", vec![0; 15 * 1024 * 1024]);

    let err = session.load(&resource).unwrap_err();
    assert!(matches!(err, SessionError::TooLarge { .. }));
    assert!(!session.is_loaded());
    assert_eq!(session.advisory().current(), Some(err.to_string().as_str()));
}

#[test]
fn test_text_file_is_not_an_image() {
    let mut session = Session::default();
    let resource = ImageResource::new("readme.txt", "text/plain", b"plain text".to_vec());

    assert!(matches!(session.load(&resource), Err(SessionError::NotAnImage(_))));
    assert!(!session.is_loaded());
    assert!(session.advisory().current().is_some());
}

#[test]
fn test_text_file_from_disk_is_not_an_image() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("notes.txt");
    std::fs::write(&path, "not pixels").unwrap();

    let max = Config::default().loader.max_file_size;
    let resource = ImageResource::from_path(&path, max).unwrap();
    assert_eq!(resource.mime, "text/plain");

    let mut session = Session::default();
    assert!(matches!(session.load(&resource), Err(SessionError::NotAnImage(_))));
}

#[test]
fn test_oversized_file_on_disk_is_too_large() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("huge.png");
    let max = Config::default().loader.max_file_size;

    let file = std::fs::File::create(&path).unwrap();
    file.set_len(max + 1).unwrap();

    let err = ImageResource::from_path(&path, max).unwrap_err();
    assert!(matches!(err, SessionError::TooLarge { size, .. } if size == max + 1));
}

#[test]
fn test_reset_restores_default_render() {
    let mut session = loaded_session(300, 200);
    let original = session.output().unwrap().clone();

    session.set_block_size(3).unwrap();
    session.set_blur_radius(4).unwrap();
    assert_ne!(session.output().unwrap(), &original);

    session.reset().unwrap();
    assert_eq!(session.parameters(), params(10, 0));
    assert_eq!(session.output().unwrap(), &original);
}

#[test]
fn test_parameter_edits_do_not_drift() {
    let mut session = loaded_session(120, 90);
    let p1 = params(4, 1);
    let p2 = params(9, 3);

    let first = session.set_parameters(p1).unwrap().clone();
    session.set_parameters(p2).unwrap();
    let again = session.set_parameters(p1).unwrap().clone();

    assert_eq!(first, again);
    assert_eq!(first, render(session.display().unwrap(), p1));
}

#[test]
fn test_block_size_one_reproduces_display() {
    let mut session = loaded_session(64, 48);
    let output = session.set_block_size(1).unwrap().clone();
    assert_eq!(&output, session.display().unwrap());
}

#[test]
fn test_export_both_formats() {
    let dir = tempfile::tempdir().unwrap();
    let mut session = loaded_session(50, 40);

    let png = session.export_png().unwrap();
    let jpeg = session.export_jpeg().unwrap();
    assert_eq!(png.file_name, "pixel-burik.png");
    assert_eq!(jpeg.file_name, "pixel-burik.jpg");

    let decoded = image::load_from_memory(&png.bytes).unwrap().to_rgba8();
    assert_eq!(&decoded, session.output().unwrap());

    let png_path = png.save_to(dir.path()).unwrap();
    let jpeg_path = jpeg.save_to(dir.path()).unwrap();
    assert!(png_path.exists() && jpeg_path.exists());

    // export reports the format it was asked for
    assert_eq!(session.export(ExportFormat::Jpeg).unwrap().mime, "image/jpeg");
}

#[test]
fn test_background_render_matches_synchronous() {
    let mut session = loaded_session(200, 150);
    let worker = RenderWorker::spawn().unwrap();
    let wanted = params(6, 2);

    let stale = session.request_parameters(params(2, 0)).unwrap();
    worker.submit(stale);
    let request = session.request_parameters(wanted).unwrap();
    let generation = request.generation;
    worker.submit(request);

    let outcome = worker.wait(generation, Duration::from_secs(30)).unwrap();
    assert!(session.apply_render(outcome));

    let expected = render(session.display().unwrap(), wanted);
    assert_eq!(session.output().unwrap(), &expected);
    assert_eq!(session.parameters(), wanted);
}

#[test]
fn test_custom_config_limits() {
    let mut config = Config::default();
    config.loader.display_max_width = 100;
    config.loader.display_max_height = 100;
    config.render.max_block_size = 8;

    let mut session = Session::new(config);
    session
        .load(&ImageResource::new("a.png", "image/png", striped_png(400, 200)))
        .unwrap();

    assert_eq!(session.display().unwrap().dimensions(), (100, 50));
    session.set_block_size(30).unwrap();
    assert_eq!(session.parameters().block_size, 8);
}

//! Pixel Burik
//!
//! Loads an image, scales it down for preview, pixelates it with an optional
//! blur pass and exports the result as PNG or JPEG.
//!
//! # Architecture
//! - [`loader`]: size/type checks, decoding and display scaling
//! - [`renderer`]: pure pixelation + blur pipeline over the display bitmap
//! - [`Session`]: one loaded image, its parameters and the advisory slot
//! - [`RenderWorker`]: optional background rendering with superseding requests
//! - [`config`]: TOML configuration
//!
//! ```no_run
//! use pixel_burik::{ImageResource, Session};
//!
//! # fn main() -> anyhow::Result<()> {
//! let mut session = Session::default();
//! let max_file_size = session.config().loader.max_file_size;
//! session.load(&ImageResource::from_path("photo.jpg", max_file_size)?)?;
//! session.set_block_size(16)?;
//! session.set_blur_radius(2)?;
//! session.export_png()?.save_to(".")?;
//! # Ok(())
//! # }
//! ```

pub mod advisory;
pub mod config;
pub mod error;
pub mod export;
pub mod loader;
pub mod renderer;
pub mod session;
pub mod worker;

pub use advisory::Advisory;
pub use config::Config;
pub use error::{Result, SessionError};
pub use export::{ExportFormat, ExportedImage};
pub use loader::{Bitmap, ImageResource, LoadedImage};
pub use renderer::{RenderLimits, RenderOptions, RenderParameters, render, render_with};
pub use session::Session;
pub use worker::{RenderOutcome, RenderRequest, RenderWorker};

/// Initializes the logger.
///
/// Format: `[HH:MM:SS LEVEL file line] message`. Defaults to `info`,
/// overridable through `RUST_LOG`.
pub fn init_logger() {
    use std::io::Write;

    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .format(|buf, record| {
            let style = buf.default_level_style(record.level());
            let ts = cutil::time::local_now("%H:%M:%S");

            writeln!(
                buf,
                "[{} {style}{}{style:#} {} {}] {}",
                ts,
                record.level(),
                record
                    .file()
                    .unwrap_or("None")
                    .split('/')
                    .next_back()
                    .unwrap_or("None"),
                record.line().unwrap_or(0),
                record.args()
            )
        })
        .init();
}

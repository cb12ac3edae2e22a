use crate::{
    advisory::Advisory,
    config::Config,
    error::{Result, SessionError},
    export::{self, ExportFormat, ExportedImage},
    loader::{self, Bitmap, ImageResource},
    renderer::{self, RenderParameters},
    worker::{RenderOutcome, RenderRequest},
};
use log::{debug, warn};
use std::sync::Arc;

/// The three bitmaps of a loaded image. They are always replaced together.
#[derive(Debug, Clone)]
struct SessionImage {
    source: Bitmap,
    display: Arc<Bitmap>,
    output: Bitmap,
}

/// One editing session: at most one loaded image, the current parameters and
/// the advisory slot.
///
/// ```text
/// Empty --load--> Loaded --set_parameters/reset/load--> Loaded
/// ```
///
/// Every failing operation leaves the session as it was and posts its error
/// to the advisory slot.
#[derive(Debug)]
pub struct Session {
    config: Config,
    params: RenderParameters,
    image: Option<SessionImage>,
    generation: u64,
    advisory: Advisory,
}

impl Session {
    pub fn new(config: Config) -> Self {
        Self {
            params: config.render.default_parameters(),
            advisory: Advisory::new(config.advisory.duration()),
            image: None,
            generation: 0,
            config,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn is_loaded(&self) -> bool {
        self.image.is_some()
    }

    pub fn parameters(&self) -> RenderParameters {
        self.params
    }

    pub fn source(&self) -> Option<&Bitmap> {
        self.image.as_ref().map(|image| &image.source)
    }

    pub fn display(&self) -> Option<&Bitmap> {
        self.image.as_ref().map(|image| image.display.as_ref())
    }

    pub fn output(&self) -> Option<&Bitmap> {
        self.image.as_ref().map(|image| &image.output)
    }

    pub fn advisory(&self) -> &Advisory {
        &self.advisory
    }

    pub fn advisory_mut(&mut self) -> &mut Advisory {
        &mut self.advisory
    }

    /// Id of the newest render request. Outcomes from older ones are ignored.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Loads a new image, resets the parameters to their defaults and renders.
    pub fn load(&mut self, resource: &ImageResource) -> Result<&Bitmap> {
        let result = self.try_load(resource);
        self.report(result)?;
        self.advisory.clear();
        self.current_output()
    }

    /// Clamps `params` into the configured ranges and re-renders.
    pub fn set_parameters(&mut self, params: RenderParameters) -> Result<&Bitmap> {
        let result = self.try_set_parameters(params);
        self.report(result)?;
        self.current_output()
    }

    pub fn set_block_size(&mut self, block_size: u32) -> Result<&Bitmap> {
        self.set_parameters(self.params.with_block_size(block_size))
    }

    pub fn set_blur_radius(&mut self, blur_radius: u32) -> Result<&Bitmap> {
        self.set_parameters(self.params.with_blur_radius(blur_radius))
    }

    /// Restores the default parameters and re-renders without reloading.
    pub fn reset(&mut self) -> Result<&Bitmap> {
        self.set_parameters(self.config.render.default_parameters())
    }

    pub fn export(&mut self, format: ExportFormat) -> Result<ExportedImage> {
        let result = match self.output() {
            Some(output) => export::encode(output, format, &self.config.export),
            None => Err(SessionError::NoImageLoaded),
        };

        let exported = self.report(result)?;
        debug!("exported {} ({} bytes)", exported.file_name, exported.bytes.len());
        Ok(exported)
    }

    pub fn export_png(&mut self) -> Result<ExportedImage> {
        self.export(ExportFormat::Png)
    }

    pub fn export_jpeg(&mut self) -> Result<ExportedImage> {
        self.export(ExportFormat::Jpeg)
    }

    /// Returns a render request for a [`RenderWorker`](crate::RenderWorker)
    /// and supersedes every earlier request.
    ///
    /// The session keeps reporting and exporting its current parameters and
    /// output until the outcome is installed with [`Session::apply_render`].
    pub fn request_parameters(&mut self, params: RenderParameters) -> Result<RenderRequest> {
        let result = match &self.image {
            Some(image) => Ok(Arc::clone(&image.display)),
            None => Err(SessionError::NoImageLoaded),
        };
        let display = self.report(result)?;
        self.generation += 1;

        Ok(RenderRequest {
            generation: self.generation,
            display,
            params: self.config.render.limits().clamp(params),
            options: self.config.render.options(),
        })
    }

    /// Installs a worker result together with its parameters. Returns `false`
    /// and drops the outcome if a newer request or image has been issued since.
    pub fn apply_render(&mut self, outcome: RenderOutcome) -> bool {
        match &mut self.image {
            Some(image) if outcome.generation == self.generation => {
                image.output = outcome.output;
                self.params = outcome.params;
                true
            }
            _ => {
                debug!(
                    "drop stale render {} (current {})",
                    outcome.generation, self.generation
                );
                false
            }
        }
    }

    fn try_load(&mut self, resource: &ImageResource) -> Result<()> {
        let loaded = loader::load(resource, &self.config.loader)?;
        let params = self.config.render.default_parameters();
        let output = renderer::render_with(&loaded.display, params, self.config.render.options());

        self.image = Some(SessionImage {
            source: loaded.source,
            display: Arc::new(loaded.display),
            output,
        });
        self.params = params;
        self.generation += 1;
        Ok(())
    }

    fn try_set_parameters(&mut self, params: RenderParameters) -> Result<()> {
        let params = self.config.render.limits().clamp(params);
        let options = self.config.render.options();

        let image = self.image.as_mut().ok_or(SessionError::NoImageLoaded)?;
        image.output = renderer::render_with(&image.display, params, options);

        self.params = params;
        self.generation += 1;
        debug!("rendered with {params:?}");
        Ok(())
    }

    fn current_output(&self) -> Result<&Bitmap> {
        self.output().ok_or(SessionError::NoImageLoaded)
    }

    fn report<T>(&mut self, result: Result<T>) -> Result<T> {
        if let Err(e) = &result {
            warn!("{e}");
            self.advisory.show(e.to_string());
        }
        result
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

use crate::renderer::{RenderLimits, RenderOptions, RenderParameters};
use anyhow::{Context, Result, bail};
use derivative::Derivative;
use image_effect::{blur_effect::BlurKind, stylized_effect::BlockSample};
use log::debug;
use platform_dirs::AppDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

pub const APP_NAME: &str = "pixel-burik";

#[derive(Serialize, Deserialize, Default, Debug, Clone)]
pub struct Config {
    #[serde(skip)]
    pub config_path: PathBuf,

    #[serde(skip)]
    pub is_first_run: bool,

    #[serde(default)]
    pub loader: LoaderConfig,

    #[serde(default)]
    pub render: RenderConfig,

    #[serde(default)]
    pub export: ExportConfig,

    #[serde(default)]
    pub advisory: AdvisoryConfig,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Derivative)]
#[derivative(Default)]
#[serde(default)]
pub struct LoaderConfig {
    /// Largest accepted input, in bytes
    #[derivative(Default(value = "12 * cutil::fs::MB"))]
    pub max_file_size: u64,

    #[derivative(Default(value = "400"))]
    pub display_max_width: u32,

    #[derivative(Default(value = "300"))]
    pub display_max_height: u32,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Derivative)]
#[derivative(Default)]
#[serde(default)]
pub struct RenderConfig {
    #[derivative(Default(value = "10"))]
    pub default_block_size: u32,

    #[derivative(Default(value = "50"))]
    pub max_block_size: u32,

    #[derivative(Default(value = "0"))]
    pub default_blur_radius: u32,

    #[derivative(Default(value = "20"))]
    pub max_blur_radius: u32,

    pub sample: BlockSample,

    pub blur_kind: BlurKind,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Derivative)]
#[derivative(Default)]
#[serde(default)]
pub struct ExportConfig {
    #[derivative(Default(value = "APP_NAME.to_string()"))]
    pub file_stem: String,

    #[derivative(Default(value = "92"))]
    pub jpeg_quality: u8,

    /// Empty means the current working directory
    pub save_dir: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Derivative)]
#[derivative(Default)]
#[serde(default)]
pub struct AdvisoryConfig {
    #[derivative(Default(value = "5"))]
    pub duration_secs: u64,
}

impl RenderConfig {
    pub fn default_parameters(&self) -> RenderParameters {
        self.limits().clamp(RenderParameters {
            block_size: self.default_block_size,
            blur_radius: self.default_blur_radius,
        })
    }

    pub fn limits(&self) -> RenderLimits {
        RenderLimits {
            max_block_size: self.max_block_size.max(1),
            max_blur_radius: self.max_blur_radius,
        }
    }

    pub fn options(&self) -> RenderOptions {
        RenderOptions {
            sample: self.sample,
            blur_kind: self.blur_kind,
        }
    }
}

impl AdvisoryConfig {
    pub fn duration(&self) -> Duration {
        Duration::from_secs(self.duration_secs)
    }
}

impl Config {
    /// `<platform config dir>/pixel-burik/pixel-burik.toml`
    pub fn default_path() -> Result<PathBuf> {
        let app_dirs = AppDirs::new(Some(APP_NAME), true)
            .with_context(|| "resolve platform config directory failed")?;

        Ok(app_dirs.config_dir.join(format!("{APP_NAME}.toml")))
    }

    /// Loads the config at `path`.
    ///
    /// A missing file is created with default values. A file that fails to
    /// parse is backed up as `<path>.bak` and replaced with defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if let Some(dir) = path.parent()
            && !dir.as_os_str().is_empty()
        {
            fs::create_dir_all(dir)
                .with_context(|| format!("create config dir {} failed", dir.display()))?;
        }

        let mut config = match fs::read_to_string(path) {
            Ok(text) => match toml::from_str::<Config>(&text) {
                Ok(c) => c,
                Err(e) => {
                    log::warn!("parse {} failed, falling back to defaults: {e}", path.display());
                    _ = fs::copy(path, format!("{}.bak", path.display()));

                    let mut c = Config::default();
                    c.is_first_run = true;
                    c.write_to(path)?;
                    c
                }
            },
            Err(_) => {
                let mut c = Config::default();
                c.is_first_run = true;
                c.write_to(path)?;
                c
            }
        };

        config.config_path = path.to_path_buf();
        debug!("{:?}", config);
        Ok(config)
    }

    /// Saves the config back to the path it was loaded from.
    pub fn save(&self) -> Result<()> {
        if self.config_path.as_os_str().is_empty() {
            bail!("config has no file path");
        }

        self.write_to(&self.config_path)
    }

    fn write_to(&self, path: &Path) -> Result<()> {
        match toml::to_string_pretty(self) {
            Ok(text) => Ok(fs::write(path, text)
                .with_context(|| format!("save config {} failed", path.display()))?),
            Err(e) => bail!(format!("convert config to toml format failed. {e:?}")),
        }
    }
}

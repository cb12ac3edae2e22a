use anyhow::{Context, Result, bail};
use clap::{Parser, ValueEnum};
use image_effect::{blur_effect::BlurKind, stylized_effect::BlockSample};
use pixel_burik::{
    Config, ExportFormat, ImageResource, RenderParameters, RenderWorker, Session,
};
use std::{path::PathBuf, process::ExitCode, time::Duration};

#[derive(Parser, Debug)]
#[command(name = "pixel-burik", version, about = "Pixelate and blur an image")]
struct Cli {
    /// Image to load
    input: PathBuf,

    /// Pixelation block edge length
    #[arg(short, long)]
    block_size: Option<u32>,

    /// Blur radius, 0 disables the blur
    #[arg(short = 'r', long)]
    blur_radius: Option<u32>,

    #[arg(short, long, value_enum, default_value_t = FormatArg::Png)]
    format: FormatArg,

    /// Output directory, defaults to `export.save_dir` or the working directory
    #[arg(short, long)]
    out_dir: Option<PathBuf>,

    #[arg(long, value_enum)]
    sample: Option<SampleArg>,

    #[arg(long, value_enum)]
    blur_kind: Option<BlurKindArg>,

    /// Config file, defaults to the platform config directory
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Render on the background worker thread
    #[arg(long)]
    background: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum FormatArg {
    Png,
    Jpeg,
    Both,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum SampleArg {
    TopLeft,
    Average,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum BlurKindArg {
    Gaussian,
    Box,
}

impl FormatArg {
    fn formats(self) -> &'static [ExportFormat] {
        match self {
            FormatArg::Png => &[ExportFormat::Png],
            FormatArg::Jpeg => &[ExportFormat::Jpeg],
            FormatArg::Both => &[ExportFormat::Png, ExportFormat::Jpeg],
        }
    }
}

fn main() -> ExitCode {
    pixel_burik::init_logger();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let config_path = match &cli.config {
        Some(path) => path.clone(),
        None => Config::default_path()?,
    };
    let mut config = Config::load(&config_path)
        .with_context(|| format!("load config {} failed", config_path.display()))?;

    if let Some(sample) = cli.sample {
        config.render.sample = match sample {
            SampleArg::TopLeft => BlockSample::TopLeft,
            SampleArg::Average => BlockSample::Average,
        };
    }

    if let Some(kind) = cli.blur_kind {
        config.render.blur_kind = match kind {
            BlurKindArg::Gaussian => BlurKind::Gaussian,
            BlurKindArg::Box => BlurKind::Box,
        };
    }

    let out_dir = match &cli.out_dir {
        Some(dir) => dir.clone(),
        None if !config.export.save_dir.is_empty() => PathBuf::from(&config.export.save_dir),
        None => PathBuf::from("."),
    };

    let mut session = Session::new(config);
    let max_file_size = session.config().loader.max_file_size;
    let resource = ImageResource::from_path(&cli.input, max_file_size)
        .with_context(|| format!("read {} failed", cli.input.display()))?;
    session.load(&resource)?;

    let defaults = session.parameters();
    let params = RenderParameters {
        block_size: cli.block_size.unwrap_or(defaults.block_size),
        blur_radius: cli.blur_radius.unwrap_or(defaults.blur_radius),
    };

    if cli.background {
        let worker = RenderWorker::spawn().with_context(|| "start render worker failed")?;
        let request = session.request_parameters(params)?;
        let generation = request.generation;
        worker.submit(request);

        let Some(outcome) = worker.wait(generation, Duration::from_secs(60)) else {
            bail!("render worker returned no result");
        };
        if !session.apply_render(outcome) {
            bail!("render {generation} was superseded before it could be applied");
        }
    } else {
        session.set_parameters(params)?;
    }

    log::info!("rendered with {:?}", session.parameters());

    for format in cli.format.formats() {
        let exported = session.export(*format)?;
        let path = exported.save_to(&out_dir)?;
        println!("{} saved to {}", format, path.display());
    }

    Ok(())
}

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pixel_engine::{
    opaque_colors, CurveParams, DitherAlgorithm, DitherOptions, DitherParams, Palette,
    PaletteAlgorithm, PaletteParams, Raster, Rgb, ThresholdMode, ThresholdParams,
};
use pixelsmith::models::{AppConfig, CurveSpec, CONFIG_ENV};
use pixelsmith::services::{png_codec, EditSession, Pipeline};

#[derive(Parser)]
#[command(name = "pixelsmith")]
#[command(about = "Palette, dither, threshold and tone-curve tool for PNG images")]
struct Cli {
    /// Log engine details at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Preset configuration file (falls back to $PIXELSMITH_CONFIG)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a palette from the image and remap every pixel to it
    Quantize {
        #[arg(short, long)]
        input: PathBuf,

        #[arg(short, long)]
        output: PathBuf,

        /// Number of palette colors (1-256)
        #[arg(short, long, default_value_t = 16)]
        colors: usize,

        /// "median-cut" or "kmeans"
        #[arg(short, long, default_value = "median-cut")]
        algorithm: String,

        /// K-means iteration cap
        #[arg(long, default_value_t = 16)]
        iterations: usize,

        /// K-means initialisation seed
        #[arg(long, default_value_t = 0)]
        seed: u64,

        /// Subsample large images to at most this many pixels
        #[arg(long)]
        sample_limit: Option<usize>,

        /// Print the palette most frequent color first
        #[arg(long)]
        by_population: bool,

        /// Print the palette as JSON instead of one hex color per line
        #[arg(long)]
        json: bool,
    },
    /// Dither onto a fixed palette or one built from the image
    Dither {
        #[arg(short, long)]
        input: PathBuf,

        #[arg(short, long)]
        output: PathBuf,

        /// "floyd-steinberg", "ordered" or "random"
        #[arg(short, long, default_value = "floyd-steinberg")]
        algorithm: String,

        /// Comma-separated hex colors (e.g. "#000,#fff")
        #[arg(short, long, conflicts_with = "colors")]
        palette: Option<String>,

        /// Build a palette of this many colors from the image first
        #[arg(short, long)]
        colors: Option<usize>,

        /// Palette algorithm used with --colors
        #[arg(long, default_value = "median-cut")]
        palette_algorithm: String,

        /// Error or bias scale in [0, 1]
        #[arg(short, long, default_value_t = 1.0)]
        strength: f32,

        /// Bayer matrix size for ordered dithering (2, 4, 8 or 16)
        #[arg(long, default_value_t = 4)]
        bayer_size: usize,

        /// Bias range in channel units; defaults to the palette spacing
        #[arg(long)]
        spread: Option<f32>,

        /// Seed for random dithering (and k-means with --colors)
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Reduce to two colors
    Threshold {
        #[arg(short, long)]
        input: PathBuf,

        #[arg(short, long)]
        output: PathBuf,

        /// "global", "adaptive" or "otsu"
        #[arg(short, long, default_value = "global")]
        mode: String,

        /// Global cutoff (0-255)
        #[arg(long, default_value_t = 128.0)]
        value: f32,

        /// Adaptive window size
        #[arg(long, default_value_t = 15)]
        block_size: usize,

        /// Adaptive offset subtracted from the local mean
        #[arg(long, default_value_t = 5.0)]
        constant: f32,

        /// Swap foreground and background colors
        #[arg(long)]
        invert: bool,

        #[arg(long, default_value = "#ffffff")]
        foreground: String,

        #[arg(long, default_value = "#000000")]
        background: String,
    },
    /// Apply tone curves: a preset name or "x:y,x:y,..." control points
    Curves {
        #[arg(short, long)]
        input: PathBuf,

        #[arg(short, long)]
        output: PathBuf,

        #[arg(long)]
        master: Option<String>,

        #[arg(long)]
        red: Option<String>,

        #[arg(long)]
        green: Option<String>,

        #[arg(long)]
        blue: Option<String>,
    },
    /// Run a named preset from the configuration
    Preset {
        name: String,

        #[arg(short, long)]
        input: PathBuf,

        #[arg(short, long)]
        output: PathBuf,
    },
    /// List available presets
    Presets {
        /// Print the full step definitions as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Quantize {
            input,
            output,
            colors,
            algorithm,
            iterations,
            seed,
            sample_limit,
            by_population,
            json,
        } => {
            let mut params = PaletteParams::new(algorithm.parse()?, colors)
                .kmeans_iterations(iterations)
                .seed(seed);
            if let Some(limit) = sample_limit {
                params = params.sample_limit(limit);
            }
            run_quantize_command(&input, &output, &params, by_population, json)
        }
        Commands::Dither {
            input,
            output,
            algorithm,
            palette,
            colors,
            palette_algorithm,
            strength,
            bayer_size,
            spread,
            seed,
        } => {
            let algorithm: DitherAlgorithm = algorithm.parse()?;
            let mut options = DitherOptions::new()
                .strength(strength)
                .bayer_size(bayer_size);
            if let Some(spread) = spread {
                options = options.spread(spread);
            }
            if let Some(seed) = seed {
                options = options.seed(seed);
            }
            let source = PaletteSource::from_args(palette, colors, &palette_algorithm, seed)?;
            run_dither_command(&input, &output, algorithm, source, options)
        }
        Commands::Threshold {
            input,
            output,
            mode,
            value,
            block_size,
            constant,
            invert,
            foreground,
            background,
        } => {
            let mode: ThresholdMode = mode.parse()?;
            let foreground = foreground.parse::<Rgb>().context("invalid --foreground")?;
            let background = background.parse::<Rgb>().context("invalid --background")?;
            let params = ThresholdParams::new(mode)
                .value(value)
                .block_size(block_size)
                .constant(constant)
                .invert(invert)
                .colors(foreground, background);
            run_threshold_command(&input, &output, &params)
        }
        Commands::Curves {
            input,
            output,
            master,
            red,
            green,
            blue,
        } => {
            let params = curve_params(master, red, green, blue)?;
            run_curves_command(&input, &output, &params)
        }
        Commands::Preset {
            name,
            input,
            output,
        } => {
            let config = load_config(cli.config);
            run_preset_command(&config, &name, &input, &output)
        }
        Commands::Presets { json } => {
            let config = load_config(cli.config);
            run_presets_command(&config, json)
        }
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        tracing_subscriber::EnvFilter::new("pixelsmith=debug,pixel_engine=debug")
    } else {
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "pixelsmith=info,pixel_engine=warn".into())
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .without_time()
                .with_writer(std::io::stderr),
        )
        .init();
}

fn load_config(path: Option<PathBuf>) -> AppConfig {
    let path = path.or_else(|| std::env::var_os(CONFIG_ENV).map(PathBuf::from));
    AppConfig::load(path.as_deref())
}

fn read_input(path: &Path) -> anyhow::Result<Raster> {
    png_codec::read_file(path).with_context(|| format!("failed to read {}", path.display()))
}

fn write_output(path: &Path, raster: &Raster) -> anyhow::Result<()> {
    png_codec::write_rgba(path, raster)
        .with_context(|| format!("failed to write {}", path.display()))?;
    tracing::info!(
        output = %path.display(),
        width = raster.width(),
        height = raster.height(),
        "Wrote PNG"
    );
    Ok(())
}

/// Build a palette from the image, print it, and write the remapped image
fn run_quantize_command(
    input: &Path,
    output: &Path,
    params: &PaletteParams,
    by_population: bool,
    json: bool,
) -> anyhow::Result<()> {
    let mut session = EditSession::new(read_input(input)?);

    let samples = by_population.then(|| opaque_colors(session.source()));
    let palette = session.palette(params)?;
    let hex = match samples {
        Some(samples) => palette.sorted_by_population(&samples).to_hex(),
        None => palette.to_hex(),
    };
    if json {
        println!("{}", serde_json::to_string(&hex)?);
    } else {
        for color in &hex {
            println!("{color}");
        }
    }

    let remapped = session.quantize(params)?;
    write_output(output, &remapped)
}

/// Where the dither palette comes from
enum PaletteSource {
    Fixed(Palette),
    Built(PaletteParams),
}

impl PaletteSource {
    fn from_args(
        palette: Option<String>,
        colors: Option<usize>,
        algorithm: &str,
        seed: Option<u64>,
    ) -> anyhow::Result<Self> {
        match (palette, colors) {
            (Some(list), _) => {
                let hex: Vec<&str> = list.split(',').collect();
                let palette = Palette::from_hex(&hex).context("invalid --palette")?;
                Ok(Self::Fixed(palette))
            }
            (None, Some(colors)) => {
                let algorithm: PaletteAlgorithm = algorithm.parse()?;
                let params = PaletteParams::new(algorithm, colors).seed(seed.unwrap_or(0));
                Ok(Self::Built(params))
            }
            (None, None) => Ok(Self::Fixed(Palette::new(vec![Rgb::BLACK, Rgb::WHITE])?)),
        }
    }
}

/// Dither and write an indexed PNG
fn run_dither_command(
    input: &Path,
    output: &Path,
    algorithm: DitherAlgorithm,
    source: PaletteSource,
    options: DitherOptions,
) -> anyhow::Result<()> {
    let mut session = EditSession::new(read_input(input)?);

    let image = match source {
        PaletteSource::Fixed(palette) => {
            session.dither(&DitherParams::new(algorithm, palette).options(options))?
        }
        PaletteSource::Built(params) => {
            session.dither_with_built_palette(&params, algorithm, options)?
        }
    };

    png_codec::write_indexed(output, &image)
        .with_context(|| format!("failed to write {}", output.display()))?;
    tracing::info!(
        output = %output.display(),
        algorithm = %algorithm,
        colors = image.palette().len(),
        "Wrote indexed PNG"
    );
    Ok(())
}

/// Threshold and write; Otsu mode prints the discovered level
fn run_threshold_command(
    input: &Path,
    output: &Path,
    params: &ThresholdParams,
) -> anyhow::Result<()> {
    let session = EditSession::new(read_input(input)?);
    let outcome = session.threshold(params)?;

    if params.mode == ThresholdMode::Otsu {
        if let Some(level) = outcome.level {
            println!("{level}");
        }
    }

    write_output(output, &outcome.raster)
}

fn curve_params(
    master: Option<String>,
    red: Option<String>,
    green: Option<String>,
    blue: Option<String>,
) -> anyhow::Result<CurveParams> {
    let parse = |arg: &str, value: Option<String>| -> anyhow::Result<Option<pixel_engine::Curve>> {
        value
            .map(|v| {
                v.parse::<CurveSpec>()
                    .and_then(|spec| spec.to_curve())
                    .with_context(|| format!("invalid --{arg} curve"))
            })
            .transpose()
    };

    let mut params = CurveParams::new(parse("master", master)?.unwrap_or_default());
    params.red = parse("red", red)?;
    params.green = parse("green", green)?;
    params.blue = parse("blue", blue)?;
    Ok(params)
}

fn run_curves_command(input: &Path, output: &Path, params: &CurveParams) -> anyhow::Result<()> {
    let mut session = EditSession::new(read_input(input)?);
    let adjusted = session.apply_curves(params);
    write_output(output, &adjusted)
}

fn run_preset_command(
    config: &AppConfig,
    name: &str,
    input: &Path,
    output: &Path,
) -> anyhow::Result<()> {
    let pipeline = Pipeline::from_preset(config, name)?;
    let raster = read_input(input)?;
    let result = pipeline
        .run(&raster)
        .with_context(|| format!("preset {name} failed"))?;
    write_output(output, &result)
}

fn run_presets_command(config: &AppConfig, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(&config.presets)?);
        return Ok(());
    }

    for (name, steps) in &config.presets {
        let ops: Vec<&str> = steps.iter().map(|step| step.op()).collect();
        println!("{name}: {}", ops.join(" -> "));
    }
    Ok(())
}

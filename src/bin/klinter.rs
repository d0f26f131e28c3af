use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt as _, util::SubscriberInitExt as _};

use klinter::{
    ComposeOptions, ComposeThreading, Ease, FluxSizeTable, Orientation, OutputSize, PlaybackMode,
    Resample, SizeClass, SizeTable, ZoomFactor,
};

#[derive(Parser, Debug)]
#[command(name = "klinter", version, about)]
struct Cli {
    /// Enable debug logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Pad an image for outpainting and write canvas, mask and zoomed-out variants.
    Pad(PadArgs),
    /// Render a zoom transition across two or more images as numbered PNG frames.
    Compose(ComposeArgs),
    /// Print output sizes from an aspect ratio or a size table.
    Sizes(SizesArgs),
}

#[derive(Args, Debug)]
struct PadArgs {
    /// Input image.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Zoom factor, e.g. `1.5` or `1.5x`.
    #[arg(long, default_value = "1.5x")]
    zoom: ZoomFactor,

    /// Feather width in pixels.
    #[arg(long, default_value_t = 40)]
    feather: u32,

    /// Kernel for the zoomed-out outputs.
    #[arg(long, default_value = "bicubic")]
    resample: Resample,

    /// Write the mask with 1.0 marking padding instead of original content.
    #[arg(long)]
    invert_mask: bool,

    /// Output directory.
    #[arg(long)]
    out_dir: PathBuf,
}

#[derive(Args, Debug)]
struct ComposeArgs {
    /// Input images, in sequence order (repeat the flag).
    #[arg(long = "in", required = true)]
    in_paths: Vec<PathBuf>,

    #[arg(long, default_value = "1.5")]
    zoom: ZoomFactor,

    /// Frames per transition between consecutive images.
    #[arg(long, default_value_t = 24)]
    frames: u32,

    /// zoom-out, zoom-in, zoom-out-in or zoom-in-out.
    #[arg(long, default_value = "zoom-out")]
    mode: PlaybackMode,

    #[arg(long, default_value = "in-out-sine")]
    ease: Ease,

    #[arg(long, default_value = "bicubic")]
    resample: Resample,

    /// Final frame width (requires --height).
    #[arg(long, requires = "height")]
    width: Option<u32>,

    /// Final frame height (requires --width).
    #[arg(long, requires = "width")]
    height: Option<u32>,

    /// Fit frames inside --width x --height instead of stretching.
    #[arg(long)]
    keep_aspect: bool,

    /// Render frames on a thread pool.
    #[arg(long)]
    parallel: bool,

    /// Worker thread count for --parallel.
    #[arg(long)]
    threads: Option<usize>,

    /// Output directory for `frame_NNNNN.png`.
    #[arg(long)]
    out_dir: PathBuf,
}

#[derive(Args, Debug)]
struct SizesArgs {
    /// Size table JSON (`{"sizes": {...}}`); lists every entry.
    #[arg(long, conflicts_with_all = ["base", "aspect", "flux_table"])]
    table: Option<PathBuf>,

    /// Size table keyed by aspect then size class; lists every entry unless --aspect is set.
    #[arg(long, conflicts_with = "base")]
    flux_table: Option<PathBuf>,

    /// Size class for --flux-table.
    #[arg(long, default_value = "medium", requires = "flux_table")]
    size: SizeClass,

    /// `flipped` swaps width and height for --flux-table.
    #[arg(long, default_value = "normal", requires = "flux_table")]
    orientation: Orientation,

    /// Smaller side in pixels.
    #[arg(long, default_value_t = 1024)]
    base: u32,

    /// Aspect ratio label such as `16:9`; lists every ratio when omitted.
    #[arg(long)]
    aspect: Option<String>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.cmd {
        Command::Pad(args) => cmd_pad(args),
        Command::Compose(args) => cmd_compose(args),
        Command::Sizes(args) => cmd_sizes(args),
    }
}

fn init_tracing(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("klinter={level}").into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}

fn cmd_pad(args: PadArgs) -> anyhow::Result<()> {
    let image = klinter::load_image(&args.in_path)?;
    let out = klinter::outpaint(&image, args.zoom, args.feather, args.resample)
        .with_context(|| format!("pad '{}'", args.in_path.display()))?;

    let (mask, zoomed_mask) = if args.invert_mask {
        (out.padded.mask.inverted(), out.zoomed_out_mask.inverted())
    } else {
        (out.padded.mask, out.zoomed_out_mask)
    };

    let dir = &args.out_dir;
    klinter::save_image(&out.padded.canvas, dir.join("padded.png"))?;
    klinter::save_mask(&mask, dir.join("padded_mask.png"))?;
    klinter::save_image(&out.zoomed_out_image, dir.join("zoomed_out.png"))?;
    klinter::save_mask(&zoomed_mask, dir.join("zoomed_out_mask.png"))?;

    tracing::info!(
        canvas = %out.padded.canvas.dimensions(),
        feather = out.padded.feather,
        "wrote {}",
        dir.display()
    );
    Ok(())
}

fn cmd_compose(args: ComposeArgs) -> anyhow::Result<()> {
    let images = args
        .in_paths
        .iter()
        .map(|p| klinter::load_image(p))
        .collect::<Result<Vec<_>, _>>()?;

    let output_size = match (args.width, args.height) {
        (Some(width), Some(height)) => Some(OutputSize {
            width,
            height,
            keep_aspect: args.keep_aspect,
        }),
        _ => None,
    };

    let opts = ComposeOptions {
        zoom: args.zoom,
        frames_per_transition: args.frames,
        mode: args.mode,
        ease: args.ease,
        resample: args.resample,
        output_size,
        threading: ComposeThreading {
            parallel: args.parallel,
            threads: args.threads,
        },
    };
    let frames = klinter::compose_with(&images, &opts).context("compose zoom transition")?;

    for (i, frame) in frames.iter().enumerate() {
        klinter::save_image(frame, frame_path(&args.out_dir, i))?;
    }

    tracing::info!(frames = frames.len(), "wrote {}", args.out_dir.display());
    Ok(())
}

fn cmd_sizes(args: SizesArgs) -> anyhow::Result<()> {
    if let Some(path) = args.table {
        let table = SizeTable::load(&path)?;
        for label in table.labels() {
            let entry = table.get_by_label(&label)?;
            println!("{label}: {}", entry.dimensions());
        }
        return Ok(());
    }

    if let Some(path) = args.flux_table {
        let table = FluxSizeTable::load(&path)?;
        match args.aspect {
            Some(aspect) => {
                let pick = table.select(&aspect, args.size, args.orientation)?;
                println!("{}", pick.description);
            }
            None => {
                for aspect in table.aspects() {
                    for class in table.classes(aspect)? {
                        let pick = table.select(aspect, class, args.orientation)?;
                        println!("{}", pick.description);
                    }
                }
            }
        }
        return Ok(());
    }

    match args.aspect {
        Some(label) => {
            let dims = klinter::aspect_dimensions(args.base, &label)?;
            println!("{label}: {dims}");
        }
        None => {
            for r in klinter::ASPECT_RATIOS {
                let dims = klinter::aspect_dimensions(args.base, r.label)?;
                println!("{}: {dims}", r.label);
            }
        }
    }
    Ok(())
}

fn frame_path(dir: &Path, index: usize) -> PathBuf {
    dir.join(format!("frame_{index:05}.png"))
}

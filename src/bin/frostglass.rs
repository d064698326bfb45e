use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};

use frostglass::{BlurKit, BlurLayer, LoadedScene, ManualScheduler, PixelBuffer, Vec2};

#[derive(Parser, Debug)]
#[command(name = "frostglass", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render one tick of the scene's blur layer as a PNG.
    Frame(FrameArgs),
    /// Drive the refresh loop while moving the blur layer, one PNG per tick.
    Animate(AnimateArgs),
}

#[derive(Parser, Debug)]
struct FrameArgs {
    /// Input scene JSON.
    #[arg(long)]
    scene: PathBuf,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct AnimateArgs {
    /// Input scene JSON.
    #[arg(long)]
    scene: PathBuf,

    /// Directory receiving `frame_0000.png`, `frame_0001.png`, ...
    #[arg(long)]
    out_dir: PathBuf,

    /// Number of ticks to run.
    #[arg(long, default_value_t = 10)]
    frames: u32,

    /// Horizontal move of the blur layer per tick, in surface pixels.
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    dx: f64,

    /// Vertical move of the blur layer per tick, in surface pixels.
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    dy: f64,

    /// Freeze one blurred snapshot of the surface before the first tick.
    #[arg(long)]
    lock_view: bool,

    /// Keep the position resolved on the first tick.
    #[arg(long)]
    lock_position: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Command::Frame(args) => cmd_frame(args),
        Command::Animate(args) => cmd_animate(args),
    }
}

fn load_scene(path: &Path) -> anyhow::Result<(LoadedScene, BlurLayer)> {
    let scene =
        LoadedScene::load(path).with_context(|| format!("load scene '{}'", path.display()))?;
    let layer = BlurLayer::with_slot(scene.blur_node, scene.config, BlurKit::cpu())
        .context("create blur layer")?;
    Ok((scene, layer))
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let (mut scene, mut layer) = load_scene(&args.scene)?;

    if !layer.render(&mut scene.tree)? {
        anyhow::bail!("blur layer produced no image (is it inside the surface?)");
    }
    let image = layer
        .presenter()
        .image()
        .context("presenter holds no image after a published tick")?;

    if let Some(parent) = args.out.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    write_png(&args.out, image)?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_animate(args: AnimateArgs) -> anyhow::Result<()> {
    let (mut scene, mut layer) = load_scene(&args.scene)?;
    std::fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("create output dir '{}'", args.out_dir.display()))?;

    let mut scheduler = ManualScheduler::new();
    if args.lock_position {
        layer.lock_position();
    }
    if args.lock_view {
        layer.lock_view(&mut scene.tree);
    }
    layer.on_attached(&mut scheduler);

    let step = Vec2::new(args.dx, args.dy);
    let mut written = 0u32;
    for i in 0..args.frames {
        // With fps = 0 the loop never schedules itself; render on demand instead.
        let published = if layer.is_running() {
            if !scheduler.advance_to_next() {
                anyhow::bail!("refresh loop stopped scheduling at tick {i}");
            }
            layer.on_frame(&mut scene.tree, &mut scheduler)?
        } else {
            layer.render(&mut scene.tree)?
        };

        if published && let Some(image) = layer.presenter().image() {
            write_png(&args.out_dir.join(format!("frame_{i:04}.png")), image)?;
            written += 1;
        } else {
            eprintln!("tick {i}: no image");
        }

        scene
            .tree
            .translate(layer.node(), step)
            .context("move blur layer")?;
    }
    layer.on_detached(&mut scheduler);

    eprintln!(
        "wrote {written} frames to {} ({:?} of scheduler time)",
        args.out_dir.display(),
        scheduler.now()
    );
    Ok(())
}

fn write_png(path: &Path, image: &PixelBuffer) -> anyhow::Result<()> {
    image::save_buffer_with_format(
        path,
        &image.to_straight_rgba8(),
        image.width(),
        image.height(),
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", path.display()))
}

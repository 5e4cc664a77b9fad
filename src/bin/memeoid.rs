use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use memeoid::{FontCatalog, FontRef, MemeConfig, MemeService};

#[derive(Parser, Debug)]
#[command(name = "memeoid", version, about = "Caption animated GIFs")]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Args, Debug)]
struct GlobalArgs {
    /// JSON config file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Font name, overriding the config and MEMEOID_FONT.
    #[arg(short = 'f', long, global = true)]
    font: Option<String>,

    /// Compositor worker threads.
    #[arg(long, global = true)]
    threads: Option<usize>,

    /// Raise log verbosity (-v debug, -vv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Caption a gif with top and bottom text.
    Generate(GenerateArgs),
    /// Serve a URL-query meme request from the image directory into the meme cache.
    Request(RequestArgs),
    /// List the source gifs in the image directory.
    List(DirArgs),
    /// Write a thumbnail of a source gif's first frame.
    Preview(PreviewArgs),
    /// Print per-frame metadata of a gif as JSON.
    Info(InfoArgs),
}

#[derive(Args, Debug)]
struct GenerateArgs {
    /// Source gif.
    #[arg(long, default_value = "homer.gif")]
    gif: PathBuf,

    /// Top caption.
    #[arg(short, long, default_value = "")]
    top: String,

    /// Bottom caption.
    #[arg(short, long, default_value = "")]
    bottom: String,

    /// Output gif.
    #[arg(short, long, default_value = "meme.gif")]
    out: PathBuf,
}

#[derive(Args, Debug)]
struct DirArgs {
    /// Directory holding source gifs.
    #[arg(long)]
    image_dir: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct RequestArgs {
    /// Query string, e.g. `from=homer.gif&top=hello`.
    query: String,

    #[command(flatten)]
    dirs: DirArgs,

    /// Directory receiving generated memes.
    #[arg(long)]
    meme_dir: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct PreviewArgs {
    /// Source gif name inside the image directory.
    #[arg(long)]
    from: String,

    /// Maximum thumbnail width.
    #[arg(long, default_value_t = 200)]
    width: u32,

    /// Maximum thumbnail height.
    #[arg(long, default_value_t = 200)]
    height: u32,

    /// Output image; the format follows the extension.
    #[arg(short, long, default_value = "preview.jpg")]
    out: PathBuf,

    #[command(flatten)]
    dirs: DirArgs,
}

#[derive(Args, Debug)]
struct InfoArgs {
    /// Gif to inspect.
    #[arg(long)]
    gif: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.global.verbose);
    let config = load_config(&cli.global)?;

    match cli.cmd {
        Command::Generate(args) => cmd_generate(&config, args),
        Command::Request(args) => cmd_request(config, args),
        Command::List(args) => cmd_list(config, args),
        Command::Preview(args) => cmd_preview(config, args),
        Command::Info(args) => cmd_info(args),
    }
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "memeoid=debug,info",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(global: &GlobalArgs) -> anyhow::Result<MemeConfig> {
    let mut config = MemeConfig::load(global.config.as_deref()).context("load config")?;
    if let Some(font) = &global.font {
        config.font = font.clone();
    }
    if global.threads.is_some() {
        config.threads = global.threads;
    }
    config.validate().context("validate config")?;
    Ok(config)
}

fn resolve_font(name: &str) -> anyhow::Result<FontRef> {
    let path = Path::new(name);
    if path.is_file() {
        return FontRef::from_file(path).with_context(|| format!("load font file '{name}'"));
    }
    FontCatalog::system()
        .resolve(name)
        .with_context(|| format!("resolve font '{name}'"))
}

fn service(config: MemeConfig) -> anyhow::Result<MemeService> {
    let font = resolve_font(&config.font)?;
    Ok(MemeService::with_font(config, font))
}

fn cmd_generate(config: &MemeConfig, args: GenerateArgs) -> anyhow::Result<()> {
    let font = resolve_font(&config.font)?;
    let mut meme = memeoid::meme_from_file(&args.gif, &args.top, &args.bottom, font, config.fit)
        .with_context(|| format!("prepare meme from '{}'", args.gif.display()))?;
    meme.generate(config.threads).context("render meme")?;
    tracing::info!(
        frames = meme.animation().len(),
        boxes = meme.boxes().len(),
        border = meme.border(),
        "meme rendered"
    );
    meme.save(&args.out)
        .with_context(|| format!("write '{}'", args.out.display()))?;
    println!("{}", args.out.display());
    Ok(())
}

fn cmd_request(mut config: MemeConfig, args: RequestArgs) -> anyhow::Result<()> {
    if let Some(dir) = args.dirs.image_dir {
        config.image_dir = dir;
    }
    if let Some(dir) = args.meme_dir {
        config.meme_dir = dir;
    }
    let generated = service(config)?.generate(&args.query).map_err(|e| {
        anyhow::anyhow!("request failed with status {}: {e}", e.status_code())
    })?;
    println!("{}", serde_json::to_string_pretty(&generated)?);
    Ok(())
}

fn cmd_list(mut config: MemeConfig, args: DirArgs) -> anyhow::Result<()> {
    if let Some(dir) = args.image_dir {
        config.image_dir = dir;
    }
    let dir = config.image_dir.clone();
    let names = service(config)?
        .list_gifs()
        .with_context(|| format!("list '{}'", dir.display()))?;
    for name in names {
        println!("{name}");
    }
    Ok(())
}

fn cmd_preview(mut config: MemeConfig, args: PreviewArgs) -> anyhow::Result<()> {
    if let Some(dir) = args.dirs.image_dir {
        config.image_dir = dir;
    }
    let thumb = service(config)?
        .preview(&args.from, args.width, args.height)
        .with_context(|| format!("preview '{}'", args.from))?;

    let is_jpeg = args
        .out
        .extension()
        .is_some_and(|e| e.eq_ignore_ascii_case("jpg") || e.eq_ignore_ascii_case("jpeg"));
    let image = image::DynamicImage::ImageRgba8(thumb);
    let saved = if is_jpeg {
        image.to_rgb8().save(&args.out)
    } else {
        image.save(&args.out)
    };
    saved.with_context(|| format!("write '{}'", args.out.display()))?;
    println!("{}", args.out.display());
    Ok(())
}

fn cmd_info(args: InfoArgs) -> anyhow::Result<()> {
    let anim = memeoid::decode_file(&args.gif)
        .with_context(|| format!("decode '{}'", args.gif.display()))?;
    let report = serde_json::json!({
        "screen_width": anim.screen_width,
        "screen_height": anim.screen_height,
        "frames": memeoid::frame_info(&anim),
    });
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

use clap::{Args, Parser, Subcommand};
use genstudio::{
    logger::{self, LogLevel, LoggerConfig},
    models::{
        extension_for_media_type, media_type_for_path, Archetype, EncodedImage, IDEA_FIELD,
        POSE_FIELD, PRODUCT_NAME_FIELD, STYLE_FIELD,
    },
    Config, Outcome, Phase, Studio, StudioError, StudioInputs,
};
use std::path::{Path, PathBuf};
use std::process;

#[derive(Parser)]
#[command(name = "genstudio", version, about = "AI image studio for poses, mockups, ads and carousels")]
struct Cli {
    /// Log level (trace, debug, info, warn, error). Falls back to RUST_LOG.
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Recreate a person in a new pose
    Pose {
        /// Base image of the person
        #[arg(long)]
        primary: PathBuf,
        /// Optional pose reference image
        #[arg(long)]
        secondary: Option<PathBuf>,
        /// Pose description
        #[arg(long)]
        pose: Option<String>,
        #[command(flatten)]
        output: SingleOutput,
    },
    /// Place a product into a scene
    Mockup {
        #[arg(long)]
        primary: PathBuf,
        #[arg(long)]
        secondary: PathBuf,
        #[command(flatten)]
        output: SingleOutput,
    },
    /// Build an advertisement from a subject and an aesthetic reference
    Ad {
        #[arg(long)]
        primary: PathBuf,
        #[arg(long)]
        secondary: PathBuf,
        /// Product name shown in the advert
        #[arg(long)]
        product: String,
        #[command(flatten)]
        output: SingleOutput,
    },
    /// Plan and render a multi-slide carousel from an idea
    Carousel {
        #[arg(long)]
        idea: String,
        #[arg(long)]
        pages: Option<u32>,
        #[arg(long)]
        style: Option<String>,
        /// Directory the slides are written to
        #[arg(long, default_value = "carousel")]
        out_dir: PathBuf,
    },
}

#[derive(Args)]
struct SingleOutput {
    /// Output file. The extension is chosen from the returned image type when omitted.
    #[arg(long)]
    out: Option<PathBuf>,
}

enum Destination {
    File(Option<PathBuf>),
    Directory(PathBuf),
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let dotenv_loaded = dotenv::dotenv().is_ok();

    let level = cli
        .log_level
        .clone()
        .or_else(|| std::env::var("RUST_LOG").ok())
        .and_then(|name| LogLevel::parse(&name))
        .unwrap_or(LogLevel::Info);
    if let Err(e) = logger::init_with_config(LoggerConfig::development().with_level(level)) {
        eprintln!("Failed to initialize logger: {}", e);
    }

    if dotenv_loaded {
        log::info!("✅ .env file loaded successfully");
    } else {
        log::warn!("⚠️  No .env file found, using system environment variables");
    }

    logger::log_startup_info("genstudio", env!("CARGO_PKG_VERSION"));
    let config = Config::from_env();
    logger::log_config_info(&config);

    if let Err(e) = run(cli.command, config).await {
        log::error!("❌ {}", e);
        eprintln!("{}", e.user_message());
        process::exit(1);
    }
}

async fn run(command: Command, config: Config) -> Result<(), StudioError> {
    let (archetype, inputs, destination) = match command {
        Command::Pose {
            primary,
            secondary,
            pose,
            output,
        } => {
            let mut inputs = StudioInputs::new().with_primary(load_image(&primary).await?);
            if let Some(path) = secondary {
                inputs = inputs.with_secondary(load_image(&path).await?);
            }
            if let Some(pose) = pose {
                inputs = inputs.with_field(POSE_FIELD, pose);
            }
            (Archetype::Pose, inputs, Destination::File(output.out))
        }
        Command::Mockup {
            primary,
            secondary,
            output,
        } => {
            let inputs = StudioInputs::new()
                .with_primary(load_image(&primary).await?)
                .with_secondary(load_image(&secondary).await?);
            (Archetype::Mockup, inputs, Destination::File(output.out))
        }
        Command::Ad {
            primary,
            secondary,
            product,
            output,
        } => {
            let inputs = StudioInputs::new()
                .with_primary(load_image(&primary).await?)
                .with_secondary(load_image(&secondary).await?)
                .with_field(PRODUCT_NAME_FIELD, product);
            (Archetype::Ad, inputs, Destination::File(output.out))
        }
        Command::Carousel {
            idea,
            pages,
            style,
            out_dir,
        } => {
            let mut inputs = StudioInputs::new().with_field(IDEA_FIELD, idea);
            if let Some(style) = style {
                inputs = inputs.with_field(STYLE_FIELD, style);
            }
            if let Some(pages) = pages {
                inputs = inputs.with_page_count(pages);
            }
            (Archetype::Carousel, inputs, Destination::Directory(out_dir))
        }
    };

    log::info!("🔄 Creating Gemini client...");
    let studio = Studio::from_config(&config)?;
    studio.select_archetype(archetype);

    let mut updates = studio.subscribe();
    tokio::spawn(async move {
        while updates.changed().await.is_ok() {
            let state = updates.borrow_and_update().clone();
            match state.phase {
                Phase::Validating => log::debug!("Validating {} request", state.archetype),
                Phase::InFlight => log::info!("🎨 Generating {}...", state.archetype),
                Phase::Succeeded(_) => log::info!("✅ {} generation finished", state.archetype),
                Phase::Failed(message) => log::warn!("⚠️  {}", message),
                Phase::Idle => {}
            }
        }
    });

    let outcome = studio.execute(archetype, &inputs).await?;
    save_outcome(outcome, destination).await
}

async fn load_image(path: &Path) -> Result<EncodedImage, StudioError> {
    let media_type = media_type_for_path(path).ok_or_else(|| {
        StudioError::ValidationFailed(format!("unsupported image file: {}", path.display()))
    })?;
    let bytes = tokio::fs::read(path).await.map_err(|e| {
        StudioError::ValidationFailed(format!("cannot read {}: {}", path.display(), e))
    })?;
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();

    log::debug!("Loaded {} ({} bytes, {})", name, bytes.len(), media_type);
    EncodedImage::from_bytes(name, media_type, &bytes)
}

async fn save_outcome(outcome: Outcome, destination: Destination) -> Result<(), StudioError> {
    match (outcome, destination) {
        (Outcome::Image(image), Destination::File(path)) => {
            let path = path.unwrap_or_else(|| {
                let ext = extension_for_media_type(image.media_type().unwrap_or("image/png"));
                PathBuf::from(format!("output.{}", ext))
            });
            let written = image.save(&path).await?;
            log::info!("💾 Saved {} ({} bytes)", path.display(), written);
            println!("{}", path.display());
        }
        (Outcome::Carousel(slides), Destination::Directory(dir)) => {
            for (idx, slide) in slides.iter().enumerate() {
                let image = genstudio::GeneratedImage {
                    data_url: slide.image_url.clone(),
                };
                let ext = extension_for_media_type(image.media_type().unwrap_or("image/png"));
                let path = dir.join(format!("slide-{:02}.{}", idx + 1, ext));
                let written = image.save(&path).await?;
                log::info!("💾 Saved {} ({} bytes)", path.display(), written);

                if let Some(title) = &slide.title {
                    println!("{}: {}", path.display(), title);
                } else {
                    println!("{}", path.display());
                }
                if let Some(body) = &slide.body {
                    println!("    {}", body);
                }
            }
        }
        _ => {
            return Err(StudioError::InternalError(
                "outcome does not match the requested output".into(),
            ))
        }
    }
    Ok(())
}

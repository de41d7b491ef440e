//! Marque CLI
//!
//! Compile scenes offline, and composite, vectorize, decompose or generate
//! logos through the Gemini backend.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod config;

use config::{MarqueConfig, Overrides};
use marque_ai::{AiBridge, BridgeConfig, GeminiBackend};
use marque_core::{GenerationParams, LogoLayout, Scene};
use marque_editor::{export_file_name, AccountLedger, LogoGenerator, MemoryAssetStore, PlanTier, UserAccount};
use marque_image::ImagePayload;
use marque_prompt::{compile_with, CanvasMode};

#[derive(Parser)]
#[command(name = "marque")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "AI logo editor toolkit", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file (defaults to ./marque.toml when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Gemini API key
    #[arg(long, global = true, env = "GEMINI_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Model used for image output
    #[arg(long, global = true)]
    image_model: Option<String>,

    /// Model used for SVG and layer output
    #[arg(long, global = true)]
    text_model: Option<String>,

    /// Request timeout in seconds
    #[arg(long, global = true)]
    timeout: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the compositing instruction for a scene (offline)
    Compile {
        /// Scene JSON file
        scene: PathBuf,

        /// Compile against a transparent canvas
        #[arg(long)]
        transparent: bool,
    },

    /// Flatten a scene into a single image
    Composite {
        /// Scene JSON file
        scene: PathBuf,

        /// Output image path
        #[arg(short, long)]
        output: PathBuf,

        /// Ignore the scene background and render on transparency
        #[arg(long)]
        transparent: bool,
    },

    /// Flatten a scene and convert it to SVG
    Vectorize {
        /// Scene JSON file
        scene: PathBuf,

        /// Output SVG path
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Reconstruct editable text and shape layers from an image
    Decompose {
        /// Source image
        image: PathBuf,

        /// Output JSON path
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Generate four logo concepts
    Generate {
        /// Brand name
        #[arg(short, long)]
        name: String,

        #[arg(long)]
        slogan: Option<String>,

        #[arg(long)]
        industry: Option<String>,

        /// Brand color (repeatable)
        #[arg(long = "color")]
        colors: Vec<String>,

        /// Font style (repeatable)
        #[arg(long = "font")]
        fonts: Vec<String>,

        /// icon-top, icon-left, icon-right, icon-only or text-only
        #[arg(long, default_value = "icon-top")]
        layout: String,

        /// Visual style, e.g. "flat" or "3d"
        #[arg(long)]
        style: Option<String>,

        /// Description of the icon
        #[arg(long)]
        icon: Option<String>,

        /// Additional free-form instructions
        #[arg(long)]
        prompt: Option<String>,

        /// Reference image to take inspiration from
        #[arg(long)]
        reference: Option<PathBuf>,

        /// Output directory (defaults to the configured output dir)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show version and backend configuration
    Info,
}

fn main() {
    let cli = Cli::parse();

    // Initialize logging
    let level = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    if let Err(err) = run(cli) {
        error!("{:#}", err);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = MarqueConfig::load(cli.config.as_deref())?;
    let overrides = Overrides {
        api_key: cli.api_key,
        image_model: cli.image_model,
        text_model: cli.text_model,
        timeout_secs: cli.timeout,
    };
    let bridge_config = config.bridge_config(&overrides);

    match cli.command {
        Commands::Compile { scene, transparent } => cmd_compile(&scene, transparent),
        Commands::Info => cmd_info(&bridge_config),
        command => {
            let runtime = tokio::runtime::Runtime::new().context("Failed to start async runtime")?;
            runtime.block_on(run_online(command, bridge_config, &config))
        }
    }
}

async fn run_online(command: Commands, bridge_config: BridgeConfig, config: &MarqueConfig) -> Result<()> {
    if !bridge_config.has_api_key() {
        anyhow::bail!("No API key configured. Set GEMINI_API_KEY, pass --api-key, or add api_key to [gemini].");
    }
    let bridge = AiBridge::new(GeminiBackend::new(bridge_config)?);

    match command {
        Commands::Composite {
            scene,
            output,
            transparent,
        } => cmd_composite(&bridge, &scene, &output, transparent).await,
        Commands::Vectorize { scene, output } => cmd_vectorize(&bridge, &scene, &output).await,
        Commands::Decompose { image, output } => cmd_decompose(&bridge, &image, &output).await,
        Commands::Generate {
            name,
            slogan,
            industry,
            colors,
            fonts,
            layout,
            style,
            icon,
            prompt,
            reference,
            output,
        } => {
            let layout = LogoLayout::parse(&layout).with_context(|| format!("Unknown layout '{}'", layout))?;
            let mut params = GenerationParams::new(name)
                .with_colors(colors)
                .with_fonts(fonts)
                .with_layout(layout);
            params.slogan = slogan;
            params.industry = industry;
            params.style = style;
            params.icon_description = icon;
            params.prompt = prompt;
            if let Some(path) = reference {
                params.reference_image = Some(load_image(&path)?);
            }
            let dir = output.unwrap_or_else(|| config.output.dir.clone());
            cmd_generate(&bridge, params, &dir).await
        }
        Commands::Compile { .. } | Commands::Info => Ok(()),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Commands
// ─────────────────────────────────────────────────────────────────────────────

fn cmd_compile(path: &Path, transparent: bool) -> Result<()> {
    let scene = load_scene(path)?;
    let compiled = compile_with(&scene, canvas_mode(transparent));

    println!("{}", compiled.prompt());
    println!();
    if compiled.images.is_empty() {
        println!("Images: none");
    } else {
        println!("Images:");
        for (index, image) in compiled.images.iter().enumerate() {
            println!("  #{}: {} ({} bytes)", index + 1, image.mime_type(), image.byte_len());
        }
    }
    Ok(())
}

async fn cmd_composite(bridge: &AiBridge<GeminiBackend>, path: &Path, output: &Path, transparent: bool) -> Result<()> {
    let scene = load_scene(path)?;
    info!("Compositing {} layers", scene.len());
    let image = bridge.composite(&scene, canvas_mode(transparent)).await?;
    write_file(output, image.bytes())?;
    info!("Wrote {} ({})", output.display(), image.mime_type());
    Ok(())
}

async fn cmd_vectorize(bridge: &AiBridge<GeminiBackend>, path: &Path, output: &Path) -> Result<()> {
    let scene = load_scene(path)?;
    info!("Vectorizing {} layers", scene.len());
    let svg = bridge.vectorize(&scene).await?;
    write_file(output, svg.as_bytes())?;
    info!("Wrote {}", output.display());
    Ok(())
}

async fn cmd_decompose(bridge: &AiBridge<GeminiBackend>, path: &Path, output: &Path) -> Result<()> {
    let image = load_image(path)?;
    let layers = bridge.vectorize_to_layers(&image).await?;
    let json = serde_json::to_string_pretty(&layers)?;
    write_file(output, json.as_bytes())?;
    info!("Wrote {} layers to {}", layers.len(), output.display());
    Ok(())
}

async fn cmd_generate(bridge: &AiBridge<GeminiBackend>, params: GenerationParams, dir: &Path) -> Result<()> {
    fs::create_dir_all(dir).with_context(|| format!("Failed to create {}", dir.display()))?;

    let ledger = AccountLedger::new();
    let store = MemoryAssetStore::new();
    let user = UserAccount::free("Local", "local@marque").with_plan(PlanTier::Business);
    let generator = LogoGenerator::new(bridge, &ledger, &store);

    info!("Generating concepts for {}", params.name);
    let mut written = Vec::new();
    let mut write_error = None;
    let result = generator
        .generate_with(&user, &params, |logo| {
            if write_error.is_some() {
                return;
            }
            let stem = format!("{} {}", params.name, logo.index + 1);
            let path = dir.join(export_file_name(&stem, logo.image.extension()));
            match write_file(&path, logo.image.bytes()) {
                Ok(()) => {
                    info!("Concept {} written to {}", logo.index + 1, path.display());
                    written.push(path);
                }
                Err(err) => write_error = Some(err),
            }
        })
        .await;

    if let Some(err) = write_error {
        return Err(err);
    }
    result.with_context(|| format!("Generation stopped after {} concept(s)", written.len()))?;
    info!("Wrote {} concepts to {}", written.len(), dir.display());
    Ok(())
}

fn cmd_info(config: &BridgeConfig) -> Result<()> {
    println!("Marque");
    println!("======");
    println!();
    println!("Version: {}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("Backend:");
    println!("  Endpoint:    {}", config.base_url);
    println!("  Image model: {}", config.image_model);
    println!("  Text model:  {}", config.text_model);
    println!("  Timeout:     {}s", config.timeout_secs);
    println!(
        "  API key:     {}",
        if config.has_api_key() { "configured" } else { "missing" }
    );
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// Helpers
// ─────────────────────────────────────────────────────────────────────────────

fn canvas_mode(transparent: bool) -> CanvasMode {
    if transparent {
        CanvasMode::Transparent
    } else {
        CanvasMode::SceneBackground
    }
}

fn load_scene(path: &Path) -> Result<Scene> {
    let content = fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("Failed to parse scene {}", path.display()))
}

fn load_image(path: &Path) -> Result<ImagePayload> {
    ImagePayload::from_file(path).with_context(|| format!("Failed to load image {}", path.display()))
}

fn write_file(path: &Path, bytes: &[u8]) -> Result<()> {
    fs::write(path, bytes).with_context(|| format!("Failed to write {}", path.display()))
}

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use palette_pilot::api;
use palette_pilot::models::{
    AppConfig, ColorSpaceRegion, ColorspaceType, CvdSimulationState, CvdType, CvdVector,
    GenerationParameters, WhitePoint,
};
use palette_pilot::server;
use palette_pilot::services::{build_request, parse_hex_list, PipelineState, RequestState};

#[derive(Parser)]
#[command(name = "palette-pilot")]
#[command(about = "Palette Pilot - orchestrates palette generation against a palette engine")]
struct Cli {
    /// Path to config.yaml (overrides CONFIG_FILE)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve,
    /// Extract colors from free-form text and print them as #RRGGBB
    Parse {
        /// Text to scan (JSON, CSS, R vectors, comma lists...)
        text: String,
    },
    /// Print the engine request the current parameters would produce
    Request {
        /// YAML file with generation parameters (defaults from config otherwise)
        #[arg(short, long)]
        params: Option<PathBuf>,
    },
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Palette Pilot API",
        description = "Parameter normalization and generation orchestration for a palette engine",
        version = "0.1.0",
        license(name = "MIT")
    ),
    paths(
        api::handle_state,
        api::handle_update_params,
        api::handle_generate,
        api::handle_parse,
        api::handle_set_simulation,
        api::handle_toggle_simulation,
        api::handle_simulate,
        api::handle_list_palettes,
        api::handle_palette_colors,
    ),
    components(schemas(
        PipelineState,
        RequestState,
        GenerationParameters,
        ColorSpaceRegion,
        ColorspaceType,
        WhitePoint,
        CvdVector,
        CvdType,
        CvdSimulationState,
        api::AcceptedResponse,
        api::ParseRequest,
        api::ParseResponse,
        api::SimulateRequest,
        api::SimulateResponse,
        api::BuiltinPaletteResponse,
    )),
    tags(
        (name = "State", description = "Pipeline state snapshots"),
        (name = "Generation", description = "Generation parameters and requests"),
        (name = "CVD", description = "Color-vision deficiency review"),
        (name = "Palettes", description = "Built-in palette catalogue")
    )
)]
struct ApiDoc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config_file = cli
        .config
        .or_else(|| std::env::var("CONFIG_FILE").ok().map(PathBuf::from));

    match cli.command {
        Some(Commands::Serve) => run_server(config_file.as_deref()).await,
        Some(Commands::Parse { text }) => {
            run_parse_command(&text);
            Ok(())
        }
        Some(Commands::Request { params }) => {
            run_request_command(config_file.as_deref(), params.as_deref())
        }
        None => {
            run_status_command(config_file.as_deref());
            Ok(())
        }
    }
}

fn init_cli_tracing() {
    // Minimal logging for CLI
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "palette_pilot=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().without_time())
        .init();
}

/// Print the colors found in `text`, one per line
fn run_parse_command(text: &str) {
    init_cli_tracing();

    let colors = parse_hex_list(text);
    if colors.is_empty() {
        eprintln!("No colors found.");
        return;
    }
    for color in colors {
        println!("{color}");
    }
}

/// Build the engine request offline and print it as JSON
fn run_request_command(
    config_file: Option<&Path>,
    params_file: Option<&Path>,
) -> anyhow::Result<()> {
    init_cli_tracing();

    let params = match params_file {
        Some(path) => {
            let content = std::fs::read_to_string(path)
                .map_err(|e| anyhow::anyhow!("Failed to read {}: {e}", path.display()))?;
            serde_yaml::from_str::<GenerationParameters>(&content)
                .map_err(|e| anyhow::anyhow!("Invalid parameters in {}: {e}", path.display()))?
        }
        None => AppConfig::load(config_file).defaults,
    };
    params.validate()?;

    let built = build_request(&params);
    println!("{}", serde_json::to_string_pretty(&built.request)?);

    for advisory in &built.advisories {
        eprintln!("note: {advisory}");
    }

    Ok(())
}

/// Display status and configuration information
fn run_status_command(config_file: Option<&Path>) {
    const VERSION: &str = env!("CARGO_PKG_VERSION");

    let bind_addr = std::env::var("BIND_ADDR").ok();
    let config = AppConfig::load(config_file);

    // Header
    println!("Palette Pilot v{VERSION}");
    println!("Generation orchestration for a palette engine\n");

    // Environment variables section
    println!("Environment Variables:");
    println!(
        "  BIND_ADDR   = {}",
        bind_addr.as_deref().unwrap_or("(not set)")
    );
    println!(
        "  CONFIG_FILE = {}",
        config_file
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "(not set)".to_string())
    );

    // Configuration section
    let config_source = match config_file {
        Some(path) if path.exists() => path.display().to_string(),
        Some(_) => "defaults (file not found)".to_string(),
        None => "defaults".to_string(),
    };
    println!("\nConfiguration:");
    println!("  Source:      {config_source}");
    println!("  Engine:      {}", config.engine.url);
    println!("  Timeout:     {}s", config.engine.timeout_secs);
    println!("  Debounce:    {}ms", config.debounce_ms);
    println!(
        "  Listen:      {}",
        bind_addr.as_deref().unwrap_or(&config.bind_addr)
    );

    // Commands section
    println!("\nCommands:");
    println!("  palette-pilot serve     Start the HTTP server");
    println!("  palette-pilot parse     Extract colors from text");
    println!("  palette-pilot request   Print the engine request for given parameters");
    println!("\nRun 'palette-pilot --help' for more details.");
}

/// Run the HTTP server
async fn run_server(config_file: Option<&Path>) -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "palette_pilot=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::load(config_file);
    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| config.bind_addr.clone());

    // Create application state using shared server module
    let state = server::create_app_state(&config)?;

    // Build router: shared API routes plus OpenAPI documentation
    let app = server::build_router(state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(addr = %bind_addr, "Palette Pilot server listening");

    axum::serve(listener, app).await?;

    Ok(())
}

use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use terraport::config::{FileSettings, GeoConfig};
use terraport::http::{HttpClient, UreqHttp};
use terraport::location::{LocationResolver, LookupRequest, LookupTarget};
use terraport::session::{FlatTerrain, LocalSession};
use terraport::{command, server};
use tracing_subscriber::EnvFilter;

/// Terraport: put a player on the world map where they are on Earth.
///
/// Resolves a place name, a latitude/longitude pair, or an IP address and
/// prints the resulting world position as JSON.
///
/// Examples:
///   terraport Berlin
///   terraport "52.52, 13.405"
///   terraport --ip 8.8.8.8
///   terraport --where 1492000 5846000
///   terraport --serve --port 8080
#[derive(Parser)]
#[command(name = "terraport", version, about, long_about = None)]
struct Cli {
    /// Place name or "lat,lon" (positional). Example: terraport New York
    #[arg(index = 1, num_args = 0.., allow_negative_numbers = true)]
    query: Vec<String>,

    /// Look up an IP address (optionally with port) instead of a place.
    #[arg(long)]
    ip: Option<String>,

    /// Reverse lookup: which latitude/longitude a world x/z lies at.
    #[arg(long = "where", num_args = 2, value_names = ["X", "Z"], allow_hyphen_values = true)]
    where_xz: Option<Vec<f64>>,

    /// Offline mode: no HTTP provider, built-in dataset only.
    #[arg(long)]
    offline: bool,

    /// Settings file (flat JSON). Defaults to ~/.terraport/settings.json.
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Ground height used for the vertical coordinate.
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    ground: f64,

    /// Simulate a client that cannot go beyond this coordinate magnitude.
    #[arg(long)]
    max_coord: Option<f64>,

    /// Run the HTTP API instead of a one-shot lookup.
    #[arg(long)]
    serve: bool,

    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    #[arg(long, default_value_t = 8080)]
    port: u16,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("terraport=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    // ── Load configuration ──────────────────────────────────────

    let settings = match &cli.settings {
        Some(path) => FileSettings::load_from(path),
        None => FileSettings::load(),
    };
    let config = match settings.and_then(|s| GeoConfig::from_settings(&s)) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let http: Option<Arc<dyn HttpClient>> = if cli.offline { None } else { Some(Arc::new(UreqHttp)) };
    let resolver = Arc::new(LocationResolver::new(config, http));
    let terrain = FlatTerrain { height: cli.ground };

    // ── Server mode ─────────────────────────────────────────────

    if cli.serve {
        return match server::start(resolver, terrain, &cli.host, cli.port).await {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                eprintln!("Server error: {}", e);
                ExitCode::FAILURE
            }
        };
    }

    // ── Reverse lookup ──────────────────────────────────────────

    if let Some(xz) = &cli.where_xz {
        let (fix, label) = resolver.describe_position(xz[0], xz[1]);
        eprintln!("  \u{1F4CD} {}", label);
        return print_json(&fix);
    }

    // ── Forward lookup ──────────────────────────────────────────

    let target = if let Some(ip) = &cli.ip {
        LookupTarget::Address(ip.clone())
    } else if !cli.query.is_empty() {
        match command::parse_command(&cli.query.join(" ")) {
            Ok(target) => target,
            Err(e) => {
                eprintln!("Error: {}", e);
                return ExitCode::FAILURE;
            }
        }
    } else {
        eprintln!("Error: No location specified.");
        eprintln!();
        eprintln!("Usage:");
        eprintln!("  terraport Berlin");
        eprintln!("  terraport \"52.52, 13.405\"");
        eprintln!("  terraport --ip 8.8.8.8");
        eprintln!("  terraport --where 1492000 5846000");
        return ExitCode::FAILURE;
    };

    let mut session = LocalSession::new("console", None).with_echo();
    if let Some(limit) = cli.max_coord {
        session = session.with_max_coordinate(limit);
    }
    let request = LookupRequest {
        subject: "console".into(),
        target,
    };

    match resolver.handle_request(&session, &terrain, request).await {
        Ok(Some(placement)) => print_json(&placement),
        Ok(None) => {
            eprintln!("  No lookup performed (private address or no provider).");
            ExitCode::SUCCESS
        }
        Err(_) => ExitCode::FAILURE,
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> ExitCode {
    match serde_json::to_string_pretty(value) {
        Ok(json) => {
            println!("{}", json);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

use std::fs;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use canvas::consts::{CANVAS_HEIGHT, CANVAS_WIDTH, DEFAULT_COLOR, DEFAULT_LINE_WIDTH, DEFAULT_USERNAME};
use canvas::doc::{Stroke, generate_stroke_id, iso_timestamp};
use canvas::input::{AuthorFilter, Pen};
use canvas::render;
use canvas::svg::SvgSurface;
use canvas::viewport::Point;
use clap::{Parser, Subcommand};
use client::config::{DEFAULT_BASE_URL, DEFAULT_CONNECT_TIMEOUT_SECS, DEFAULT_REQUEST_TIMEOUT_SECS};
use client::{ClientConfig, ConfigError, Gateway, GatewayError, HttpGateway};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Gateway(#[from] GatewayError),
    #[error("invalid point `{0}`; expected `x,y`")]
    InvalidPoint(String),
    #[error("a stroke needs at least one point")]
    NoPoints,
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("failed to write output: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Parser, Debug)]
#[command(name = "ledgerdraw-cli", about = "Submit, fetch and export ledgerdraw strokes")]
struct Cli {
    #[arg(long, env = "LEDGERDRAW_BASE_URL", default_value = DEFAULT_BASE_URL)]
    base_url: String,

    #[arg(long, env = "LEDGERDRAW_REQUEST_TIMEOUT_SECS", default_value_t = DEFAULT_REQUEST_TIMEOUT_SECS)]
    request_timeout_secs: u64,

    #[arg(long, env = "LEDGERDRAW_CONNECT_TIMEOUT_SECS", default_value_t = DEFAULT_CONNECT_TIMEOUT_SECS)]
    connect_timeout_secs: u64,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check that the store is up.
    Ping,
    /// Submit one stroke.
    Submit {
        #[arg(long, env = "LEDGERDRAW_USERNAME", default_value = DEFAULT_USERNAME)]
        user: String,
        #[arg(long, default_value = DEFAULT_COLOR)]
        color: String,
        #[arg(long, default_value_t = DEFAULT_LINE_WIDTH)]
        width: f64,
        /// Space-separated `x,y` pairs in canvas coordinates.
        #[arg(long)]
        points: String,
    },
    /// Print decoded strokes as JSON.
    Fetch {
        #[arg(long, default_value_t = 0)]
        from: usize,
    },
    /// Print the distinct authors, one per line.
    Authors,
    /// Replay every stroke to an SVG document.
    Export {
        /// Author drawn at full opacity; everyone else is ghosted.
        #[arg(long)]
        selected: Option<String>,
        /// Output file; stdout when omitted.
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let cli = Cli::parse();
    let gateway = HttpGateway::new(&client_config(&cli)?)?;

    match cli.command {
        Command::Ping => run_ping(&gateway).await,
        Command::Submit { user, color, width, points } => run_submit(&gateway, &user, color, width, &points).await,
        Command::Fetch { from } => run_fetch(&gateway, from).await,
        Command::Authors => run_authors(&gateway).await,
        Command::Export { selected, output } => run_export(&gateway, selected.as_deref(), output).await,
    }
}

/// Client config for every command; the gateway's HTTP client carries these timeouts.
fn client_config(cli: &Cli) -> Result<ClientConfig, CliError> {
    let mut config = ClientConfig::new(&cli.base_url)?;
    config.timeouts.request_secs = cli.request_timeout_secs;
    config.timeouts.connect_secs = cli.connect_timeout_secs;
    Ok(config)
}

async fn run_ping(gateway: &HttpGateway) -> Result<(), CliError> {
    gateway.health().await?;
    println!("ok");
    Ok(())
}

async fn run_submit(gateway: &HttpGateway, user: &str, color: String, width: f64, points: &str) -> Result<(), CliError> {
    let stroke = build_stroke(color, width, parse_points(points)?, now_ms());
    gateway.submit(&stroke, user).await?;
    info!(stroke_id = %stroke.id, %user, "stroke submitted");
    print_json(&serde_json::json!({ "drawingId": stroke.id }))
}

async fn run_fetch(gateway: &HttpGateway, from: usize) -> Result<(), CliError> {
    let batch = gateway.fetch_from(from).await?;
    if batch.skipped > 0 {
        warn!(skipped = batch.skipped, "some records could not be decoded");
    }
    print_json(&serde_json::to_value(&batch.strokes)?)
}

async fn run_authors(gateway: &HttpGateway) -> Result<(), CliError> {
    let batch = gateway.fetch_from(0).await?;
    for author in render::derive_authors(&batch.strokes) {
        println!("{author}");
    }
    Ok(())
}

async fn run_export(gateway: &HttpGateway, selected: Option<&str>, output: Option<PathBuf>) -> Result<(), CliError> {
    let batch = gateway.fetch_from(0).await?;
    let svg = export_svg(&batch.strokes, &AuthorFilter::from_selection(selected.unwrap_or_default()));
    match output {
        Some(path) => {
            fs::write(&path, svg)?;
            info!(path = %path.display(), strokes = batch.strokes.len(), "svg written");
        }
        None => print!("{svg}"),
    }
    Ok(())
}

fn export_svg(strokes: &[Stroke], filter: &AuthorFilter) -> String {
    let mut surface = SvgSurface::new(CANVAS_WIDTH, CANVAS_HEIGHT);
    let Ok(()) = render::replay(&mut surface, strokes, filter);
    surface.finish()
}

fn build_stroke(color: String, width: f64, points: Vec<Point>, now_ms: i64) -> Stroke {
    let mut pen = Pen::default();
    pen.set_color(color);
    pen.set_line_width(width);
    Stroke {
        id: generate_stroke_id(now_ms),
        color: pen.color().to_owned(),
        line_width: pen.line_width(),
        points,
        timestamp: iso_timestamp(now_ms),
        author: None,
    }
}

/// Parse `"x,y x,y ..."` into points.
fn parse_points(raw: &str) -> Result<Vec<Point>, CliError> {
    let points = raw
        .split_whitespace()
        .map(|pair| {
            let (x, y) = pair.split_once(',').ok_or_else(|| CliError::InvalidPoint(pair.to_owned()))?;
            match (x.trim().parse::<f64>(), y.trim().parse::<f64>()) {
                (Ok(x), Ok(y)) if x.is_finite() && y.is_finite() => Ok(Point::new(x, y)),
                _ => Err(CliError::InvalidPoint(pair.to_owned())),
            }
        })
        .collect::<Result<Vec<_>, _>>()?;
    if points.is_empty() {
        return Err(CliError::NoPoints);
    }
    Ok(points)
}

fn now_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .ok()
        .and_then(|d| i64::try_from(d.as_millis()).ok())
        .unwrap_or(0)
}

fn print_json(value: &serde_json::Value) -> Result<(), CliError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
#[path = "main_test.rs"]
mod tests;

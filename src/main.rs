use std::{net::SocketAddr, str::FromStr};

use clap::{
    CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use spotlyrics::{
    config::{self, Config},
    error, info,
    server::{self, AppState},
    success, warning,
};

fn styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::White.on_default() | Effects::BOLD)
        .usage(AnsiColor::White.on_default() | Effects::BOLD)
        .literal(AnsiColor::BrightBlue.on_default())
        .placeholder(AnsiColor::BrightGreen.on_default())
}

#[derive(Parser, Debug, Clone)]
#[clap(
  version = env!("CARGO_PKG_VERSION"),
  name=env!("CARGO_PKG_NAME"),
  bin_name=env!("CARGO_PKG_NAME"),
  about=env!("CARGO_PKG_DESCRIPTION"),
  styles=styles(),
)]
struct Cli {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Start the web front end
    Serve(ServeOptions),

    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Parser, Debug, Clone)]
pub struct ServeOptions {
    /// Address to listen on (overrides SERVER_ADDRESS)
    #[clap(long)]
    address: Option<String>,

    /// Open the landing page in the default browser
    #[clap(long)]
    open: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct CompletionsOption {
    shell: Shell,
}

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("spotlyrics=info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .init();
}

async fn serve(opt: ServeOptions) {
    if let Err(e) = config::load_env() {
        warning!("Cannot load .env file: {}", e);
    }

    let mut cfg = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => error!("Invalid configuration: {}", e),
    };
    if let Some(address) = opt.address {
        cfg.server_address = address;
    }

    let addr = match SocketAddr::from_str(&cfg.server_address) {
        Ok(addr) => addr,
        Err(e) => error!("Failed to parse server address: {}", e),
    };

    let state = match AppState::from_config(&cfg) {
        Ok(state) => state,
        Err(e) => error!("Failed to build HTTP client: {}", e),
    };

    if cfg.openai_api_key.is_none() {
        warning!("OPENAI_API_KEY is not set, lyric interpretations are disabled");
    }

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => error!("Failed to bind {}: {}", addr, e),
    };

    let landing = format!("http://{}/", addr);
    info!("Serving on {}", landing);
    if opt.open && webbrowser::open(&landing).is_err() {
        warning!("Failed to open browser. Please navigate to {} manually.", landing);
    }

    match server::serve(listener, state).await {
        Ok(()) => success!("Server stopped"),
        Err(e) => error!("Server error: {}", e),
    }
}

#[tokio::main]
async fn main() {
    init_tracing();

    let cli = Cli::parse();

    match cli.command {
        Command::Serve(opt) => serve(opt).await,
        Command::Completions(opt) => {
            let mut cmd = Cli::command_for_update();
            let name = cmd.get_name().to_string();
            generate(opt.shell, &mut cmd, name, &mut std::io::stdout())
        }
    }
}

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, BufReader};

use griddy::models::Message;
use griddy::{ChatSession, ConsoleMap, GriddyConfig, HttpAgentClient, MapView, telemetry, web};

#[derive(Parser)]
#[command(name = "griddy")]
#[command(version, about = "Map-based chat assistant for renewable-energy siting")]
struct Cli {
    /// Path to a TOML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP server
    Serve {
        /// Override the configured port
        #[arg(long)]
        port: Option<u16>,
    },
    /// Chat with a running server from the terminal
    Chat {
        #[arg(long, default_value = "http://127.0.0.1:3000")]
        server: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let mut config =
        GriddyConfig::load_from_path(cli.config).context("Failed to load configuration")?;

    match cli.command {
        Command::Serve { port } => {
            if let Some(port) = port {
                config.server.port = port;
                config.validate()?;
            }
            let _telemetry = telemetry::init(&config.logging)?;
            tracing::info!("Starting griddy {}", griddy::VERSION);
            if let Err(e) = web::run(config).await {
                tracing::error!("{}", e.user_message());
                return Err(e).context("Web server failed");
            }
        }
        Command::Chat { server } => {
            // keep the prompt readable unless RUST_LOG asks for more
            config.logging.level = "warn".to_string();
            let _telemetry = telemetry::init(&config.logging)?;
            chat(&server, config.geocoding.public_api_key).await?;
        }
    }

    Ok(())
}

async fn chat(server: &str, map_key: Option<String>) -> Result<()> {
    let client = HttpAgentClient::new(server);
    let mut session = ChatSession::new();
    let mut map = MapView::new(ConsoleMap::default(), map_key);
    map.mount(true)?;

    for message in session.messages() {
        print_message(message);
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let text = line.trim();
        if text.is_empty() {
            continue;
        }
        if matches!(text, "/quit" | "/exit") {
            break;
        }

        let Some(resolution) = session.submit(&client, text).await else {
            continue;
        };
        print_message(&resolution.message);

        if let Some(markers) = resolution.markers
            && map.set_markers(markers)
        {
            println!("{}", map.provider().describe());
        }
    }

    Ok(())
}

fn print_message(message: &Message) {
    println!(
        "{} [{}]: {}",
        message.role.label(),
        message.timestamp.format("%H:%M"),
        message.content
    );
}

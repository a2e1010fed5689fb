mod output;
mod query_cmd;
mod scene;
mod serve_cmd;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "visprobe")]
#[command(about = "visprobe: address and inspect elements of a live visual tree")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP gateway over a headless scene
    Serve {
        /// Config file; defaults to config.yaml in the visprobe config directory
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Port to bind the HTTP server to
        #[arg(short, long)]
        port: Option<u16>,
        /// Window markup to show at startup
        #[arg(short, long)]
        scene: Option<PathBuf>,
    },
    /// Resolve one query against a scene file and print the element
    Query {
        /// Window markup; a YAML stream may hold several windows
        #[arg(short, long)]
        scene: PathBuf,
        /// Search the window with this name instead of the main window
        #[arg(short, long)]
        window_name: Option<String>,
        /// Property to read from the resolved element (repeatable)
        #[arg(short = 'P', long = "property")]
        properties: Vec<String>,
        /// Print the result as JSON
        #[arg(long)]
        json: bool,
        /// Path query, e.g. `~Form/TextBox[1]`
        query: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve {
            config,
            port,
            scene,
        } => serve_cmd::run(config, port, scene).await,
        Commands::Query {
            scene,
            window_name,
            properties,
            json,
            query,
        } => {
            visprobe_logging::init_logger(None, "warn", false);
            let markup = scene::read_scene(&scene).await?;
            let report =
                query_cmd::run_query(&markup, window_name.as_deref(), &query, &properties).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print!("{}", output::render_report(&report));
            }
            if !report.is_ok() {
                std::process::exit(1);
            }
            Ok(())
        }
    }
}

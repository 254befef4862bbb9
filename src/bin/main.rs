use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use gdrive_sheets_mcp::{ServiceConfig, create_server};

// rmcp imports for MCP stdio server mode
use rmcp::service::ServiceExt;
use rmcp::transport::stdio;

#[derive(Parser)]
#[command(name = "gdrive-sheets-mcp")]
#[command(about = "MCP server exposing Google Drive and Google Sheets tools")]
struct Cli {
    /// JSON config file; environment variables are used when omitted
    #[arg(long, env = "GDRIVE_MCP_CONFIG", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run as an MCP stdio server (for use in mcp.json)
    McpStdio,
    /// Run as an MCP HTTP server
    McpHttp {
        /// Bind address, e.g. 0.0.0.0:3943
        #[arg(long, default_value = "127.0.0.1:3943")]
        bind: String,
    },
    /// Print the registered tools and their input schemas as JSON
    ListTools,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr: stdout carries the MCP stdio stream.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("gdrive_sheets_mcp=info".parse()?)
                .add_directive("rmcp=warn".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = ServiceConfig::load(cli.config.as_deref())?;

    match cli.command {
        Commands::McpStdio => {
            warn_if_anonymous(&config);
            info!("Starting MCP stdio server (rmcp)");

            let server = create_server(&config)?;

            let service = server
                .as_ref()
                .clone()
                .serve(stdio())
                .await
                .inspect_err(|e| tracing::error!("serving error: {:?}", e))?;

            // Block until the MCP session ends.
            service.waiting().await?;
            info!("MCP stdio server session ended");
        }
        Commands::McpHttp { bind } => {
            warn_if_anonymous(&config);
            info!("Starting MCP HTTP server (rmcp) on {}", bind);

            let server = create_server(&config)?;
            gdrive_sheets_mcp::server::start_mcp_http(server, &bind).await?;
        }
        Commands::ListTools => {
            let server = create_server(&config)?;
            let tools = server.tool_registry().list_tools();
            println!("{}", serde_json::to_string_pretty(&tools)?);
        }
    }

    Ok(())
}

fn warn_if_anonymous(config: &ServiceConfig) {
    if config.access_token.is_none() {
        warn!("No Google access token configured (set GOOGLE_ACCESS_TOKEN); remote calls will be rejected");
    }
}

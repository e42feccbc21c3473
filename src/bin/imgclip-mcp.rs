use anyhow::Result;
use image_clipboard::config::Config;
use image_clipboard::mcp::ImageClipboardMcpServer;
use image_clipboard::utils::logging;
use rmcp::{ServiceExt, transport::stdio};
use std::env;
use tracing::info;

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() -> Result<()> {
    // Check for version flag before anything else
    let args: Vec<String> = env::args().collect();
    if args.iter().any(|a| a == "--version" || a == "-V") {
        println!("imgclip-mcp {}", VERSION);
        return Ok(());
    }
    logging::init();

    info!("Starting imgclip-mcp server");

    let config = Config::load()?;
    let server = ImageClipboardMcpServer::new(&config);
    let service = server.serve(stdio()).await?;

    info!("Server ready, waiting for requests...");

    service.waiting().await?;

    info!("Server shutting down");
    Ok(())
}

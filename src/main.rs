use anyhow::{Context, Result, bail};
use clap::Parser;
use image_clipboard::bridge::{MethodCall, MethodChannel, MethodResult, transport};
use image_clipboard::clipboard::{ClipboardProvider, MemoryClipboard, SystemClipboard};
use image_clipboard::cli::{Cli, Commands};
use image_clipboard::config::Config;
use image_clipboard::image_copy::copy_image_to_clipboard;
use image_clipboard::utils::logging;
use std::process::ExitCode;
use std::sync::Arc;

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    logging::init();

    let mut config = Config::load()?;
    cli.apply(&mut config);

    match cli.command {
        Commands::Copy {
            path,
            no_hold,
            dry_run,
        } => {
            let hold = config.hold_on_linux && !no_hold;
            handle_copy(&config, &path, clipboard_for(dry_run, hold))?;
        }
        Commands::Call {
            method,
            args,
            dry_run,
        } => {
            let clipboard = clipboard_for(dry_run, config.hold_on_linux);
            return handle_call(&config, method, args.as_deref(), clipboard);
        }
        Commands::Serve { dry_run, .. } => {
            handle_serve(&config, clipboard_for(dry_run, false))?;
        }
        Commands::Peek => {
            handle_peek()?;
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn clipboard_for(dry_run: bool, hold: bool) -> Arc<dyn ClipboardProvider> {
    if dry_run {
        Arc::new(MemoryClipboard::new())
    } else {
        Arc::new(SystemClipboard::new().holding(hold))
    }
}

fn handle_copy(config: &Config, path: &str, clipboard: Arc<dyn ClipboardProvider>) -> Result<()> {
    let copied = copy_image_to_clipboard(path, config.base_dir.as_deref(), clipboard.as_ref())
        .with_context(|| format!("Failed to copy '{path}' to the clipboard"))?;

    println!(
        "✓ Copied {} ({}x{}) to the clipboard",
        copied.path.display(),
        copied.width,
        copied.height
    );
    Ok(())
}

fn handle_call(
    config: &Config,
    method: String,
    args: Option<&str>,
    clipboard: Arc<dyn ClipboardProvider>,
) -> Result<ExitCode> {
    let arguments = args
        .map(serde_json::from_str::<serde_json::Value>)
        .transpose()
        .context("--args must be valid JSON")?;

    let channel = MethodChannel::image_clipboard(config, clipboard);
    let result = channel.invoke(&MethodCall::new(method, arguments));

    println!("{}", serde_json::to_string_pretty(&result)?);

    Ok(match result {
        MethodResult::Success { .. } => ExitCode::SUCCESS,
        _ => ExitCode::FAILURE,
    })
}

fn handle_serve(config: &Config, clipboard: Arc<dyn ClipboardProvider>) -> Result<()> {
    let channel = Arc::new(MethodChannel::image_clipboard(config, clipboard));

    let runtime = tokio::runtime::Runtime::new().context("Failed to start async runtime")?;
    runtime.block_on(transport::serve_stdio(channel))?;
    Ok(())
}

fn handle_peek() -> Result<()> {
    let clipboard = SystemClipboard::new();
    match clipboard.get_image()? {
        Some(image) => println!(
            "Clipboard contains image: {}x{} ({} bytes)",
            image.width,
            image.height,
            image.byte_len()
        ),
        None => bail!("Clipboard does not contain an image"),
    }
    Ok(())
}

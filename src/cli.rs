use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::{Config, DecodeFailurePolicy};

#[derive(Parser, Debug)]
#[command(name = "imgclip")]
#[command(about = "Copy image files to the system clipboard", long_about = None, version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Answer DECODE_FAILED instead of success when an image cannot be loaded
    #[arg(long, global = true)]
    pub report_decode_failures: bool,

    /// Resolve relative image paths against this directory
    #[arg(long, global = true)]
    pub base_dir: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Copy an image file to the clipboard
    Copy {
        path: String,

        /// Exit right after writing instead of holding the selection (Linux)
        #[arg(long)]
        no_hold: bool,

        /// Decode the image but write to an in-memory clipboard
        #[arg(long)]
        dry_run: bool,
    },
    /// Invoke one method on the image clipboard channel and print the reply
    Call {
        /// Method name, e.g. 'copyImage'
        method: String,

        /// Arguments as JSON, e.g. '{"path": "/tmp/a.png"}'
        #[arg(short, long)]
        args: Option<String>,

        #[arg(long)]
        dry_run: bool,
    },
    /// Serve the method channel as line-delimited JSON on stdin/stdout
    Serve {
        /// Channel name to answer on
        #[arg(long)]
        channel: Option<String>,

        #[arg(long)]
        dry_run: bool,
    },
    /// Show the image currently on the clipboard
    Peek,
}

impl Cli {
    /// Layer command-line overrides on top of the loaded config.
    pub fn apply(&self, config: &mut Config) {
        if self.report_decode_failures {
            config.decode_failure = DecodeFailurePolicy::Report;
        }
        if let Some(base_dir) = &self.base_dir {
            config.base_dir = Some(base_dir.clone());
        }
        if let Commands::Serve {
            channel: Some(channel),
            ..
        } = &self.command
        {
            config.channel = channel.clone();
        }
    }
}

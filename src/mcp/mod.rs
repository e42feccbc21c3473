pub mod errors;
pub mod schemas;
pub mod server;

pub use server::ImageClipboardMcpServer;

pub mod chat;
pub mod client;
pub mod config;
pub mod models;
pub mod renderer;
pub mod ui;
pub mod validate;

pub use chat::{ChatClient, ChatView};
pub use client::{ApiClient, Timeouts, Transport};
pub use config::Config;
pub use models::{ChatRequest, ChatResponse, Endpoint, Message, RawResponse, Reply, Sender};
pub use ui::TerminalUI;

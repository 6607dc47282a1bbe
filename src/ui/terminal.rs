use super::commands::{Command, COMMAND_BOX};
use crate::chat::{label, ChatClient, ChatView};
use crate::client::ApiClient;
use crate::config::Config;
use crate::models::{Endpoint, Message, Reply, Result, Sender};
use crate::renderer::MarkdownRenderer;
use colored::*;
use rustyline::{config::Configurer, error::ReadlineError, DefaultEditor};
use std::io::{self, Write};
use std::path::PathBuf;
use terminal_size::{terminal_size, Width};
use tracing::{debug, warn};

const WELCOME_MESSAGE: &str = "Welcome to **Superior AI**.\n\n\
Ask anything and press Enter. Replies come from the selected route:\n\n\
- `/answer` chats with the assistant, which remembers the conversation\n\
- `/kbanswer` answers from the knowledge base\n\
- `/search` lists the knowledge base passages that match";

fn terminal_width() -> usize {
    match terminal_size() {
        Some((Width(w), _)) => (w as usize).saturating_sub(2),
        None => 80,
    }
}

const LOADING_TEXT: &str = "⏳ Thinking...";

/// Draws the chat log into the terminal scrollback, or any other writer.
pub struct TerminalView<W: Write = io::Stdout> {
    out: W,
    renderer: MarkdownRenderer,
    width: usize,
    loading_shown: bool,
}

impl TerminalView<io::Stdout> {
    pub fn new(width: usize) -> Self {
        Self::with_writer(io::stdout(), width)
    }
}

impl<W: Write> TerminalView<W> {
    pub fn with_writer(out: W, width: usize) -> Self {
        Self {
            out,
            renderer: MarkdownRenderer::new(width),
            width,
            loading_shown: false,
        }
    }

    pub fn writer(&self) -> &W {
        &self.out
    }

    pub fn show_command_box(&mut self) {
        self.emit(&format!("{}\n\n", COMMAND_BOX.green()));
    }

    pub fn show_welcome(&mut self) {
        let welcome = format!("{}\n\n", self.renderer.render(WELCOME_MESSAGE).cyan());
        self.emit(&welcome);
        self.show_command_box();
    }

    fn emit(&mut self, text: &str) {
        if let Err(e) = self.out.write_all(text.as_bytes()) {
            debug!(error = %e, "could not write to the terminal");
        }
    }
}

impl<W: Write> ChatView for TerminalView<W> {
    fn render_message(&mut self, message: &Message) {
        let stamp = format!("[{}]", message.timestamp).dimmed();
        let text = match (message.sender, label(message.sender)) {
            (Sender::Assistant, Some(label)) => format!(
                "{}\n{} {}\n",
                label.cyan().bold(),
                self.renderer.render(&message.text).cyan(),
                stamp
            ),
            (_, Some(label)) => format!("{} {} {}\n", label.blue().bold(), message.text, stamp),
            (_, None) => format!("{} {}\n", message.text.yellow(), stamp),
        };
        self.emit(&text);
        self.emit("\n");
    }

    fn show_loading(&mut self, _id: &str) {
        self.emit(&format!("{}", LOADING_TEXT.yellow().italic()));
        self.loading_shown = true;
        self.scroll_to_latest();
    }

    /// Blanks the placeholder in place; nothing else may be written to the
    /// terminal while it is shown.
    fn remove_loading(&mut self, _id: &str) {
        if !self.loading_shown {
            return;
        }
        let blank = " ".repeat(self.width.max(LOADING_TEXT.chars().count() + 2));
        self.emit(&format!("\r{}\r", blank));
        self.loading_shown = false;
        self.scroll_to_latest();
    }

    fn clear(&mut self) {
        if let Err(e) = clearscreen::clear() {
            warn!(error = %e, "could not clear the terminal");
        }
        self.loading_shown = false;
        self.show_command_box();
    }

    fn scroll_to_latest(&mut self) {
        let _ = self.out.flush();
    }
}

pub struct TerminalUI {
    chat: ChatClient<ApiClient, TerminalView>,
    editor: DefaultEditor,
    history_file: Option<PathBuf>,
}

impl TerminalUI {
    pub fn new(client: ApiClient, config: &Config) -> Result<Self> {
        let mut editor = DefaultEditor::new()?;
        editor.set_max_history_size(100)?;

        let history_file = config.history_file();
        if let Some(path) = history_file.as_ref().filter(|path| path.exists()) {
            let _ = editor.load_history(path);
        }

        let chat = ChatClient::new(client, TerminalView::new(terminal_width())).with_endpoint(config.endpoint);

        Ok(Self {
            chat,
            editor,
            history_file,
        })
    }

    /// Sends a single message outside of an interactive session.
    /// Returns whether the server produced an answer.
    pub async fn send_once(client: ApiClient, endpoint: Endpoint, message: &str) -> bool {
        let mut chat = ChatClient::new(client, TerminalView::new(terminal_width())).with_endpoint(endpoint);
        matches!(chat.submit(message).await, Some(Reply::Success(_)))
    }

    pub async fn run(&mut self) -> Result<()> {
        clearscreen::clear()?;
        self.chat.view_mut().show_welcome();

        loop {
            let prompt = format!("{} ", format!("[{}] >", self.chat.endpoint()).blue().bold());
            match self.editor.readline(&prompt) {
                Ok(line) => {
                    let command = line.parse::<Command>().unwrap_or_else(|_| Command::Message(line));
                    match command {
                        Command::Exit => break,
                        Command::Clear => self.chat.clear_log(),
                        Command::Help => self.chat.view_mut().show_command_box(),
                        Command::Select(endpoint) => {
                            self.chat.select_endpoint(endpoint);
                            self.chat
                                .append_message(Sender::System, format!("🔀 Now sending to {}", endpoint.path()));
                        }
                        Command::Message(input) => {
                            if !input.is_empty() {
                                self.editor.add_history_entry(&input)?;
                            }
                            self.chat.submit(&input).await;
                        }
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    println!("Use 'exit' to quit");
                    continue;
                }
                Err(ReadlineError::Eof) => break,
                Err(err) => {
                    println!("Error: {}", err);
                    break;
                }
            }
        }

        self.save_history();
        Ok(())
    }

    fn save_history(&mut self) {
        if let Some(path) = &self.history_file {
            if let Err(e) = self.editor.save_history(path) {
                warn!(error = %e, path = %path.display(), "could not save input history");
            }
        }
    }
}

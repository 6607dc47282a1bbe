//! Runtime settings, from command-line flags or `SUPERIOR_*` environment
//! variables (a `.env` file is loaded first).

use crate::client::Timeouts;
use crate::models::{Endpoint, Error, Result};
use clap::Parser;
use reqwest::Url;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:5000";
const HISTORY_FILE: &str = ".superior_history";

#[derive(Parser, Debug, Clone)]
#[command(
    name = "superior",
    version,
    about = "Terminal chat client for the Superior AI answer server"
)]
pub struct Config {
    /// Base URL of the answer server
    #[arg(long, env = "SUPERIOR_SERVER_URL", default_value = DEFAULT_SERVER_URL)]
    pub server_url: String,

    /// Route used until changed with /search, /kbanswer or /answer
    #[arg(long, env = "SUPERIOR_ENDPOINT", default_value = "answer")]
    pub endpoint: Endpoint,

    /// Seconds to wait for a reply before giving up
    #[arg(long, env = "SUPERIOR_TIMEOUT_SECS", default_value_t = 120)]
    pub timeout_secs: u64,

    /// Seconds to wait for the TCP connection
    #[arg(long, env = "SUPERIOR_CONNECT_TIMEOUT_SECS", default_value_t = 10)]
    pub connect_timeout_secs: u64,

    /// Don't read or write the input history file
    #[arg(long)]
    pub no_history: bool,

    /// Send this message once, print the reply and exit
    pub message: Vec<String>,
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        let url = Url::parse(&self.server_url)
            .map_err(|e| Error::Config(format!("invalid server URL `{}`: {}", self.server_url, e)))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(Error::Config(format!(
                "server URL must be http or https, got `{}`",
                url.scheme()
            )));
        }
        if self.timeout_secs == 0 || self.connect_timeout_secs == 0 {
            return Err(Error::Config("timeouts must be at least one second".to_string()));
        }
        Ok(())
    }

    pub fn timeouts(&self) -> Timeouts {
        Timeouts {
            request: Duration::from_secs(self.timeout_secs),
            connect: Duration::from_secs(self.connect_timeout_secs),
        }
    }

    pub fn history_file(&self) -> Option<PathBuf> {
        if self.no_history {
            return None;
        }
        let path = dirs::home_dir()
            .map(|mut path| {
                path.push(HISTORY_FILE);
                path
            })
            .unwrap_or_else(|| HISTORY_FILE.into());
        Some(path)
    }

    pub fn one_shot_message(&self) -> Option<String> {
        if self.message.is_empty() {
            None
        } else {
            Some(self.message.join(" "))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Config {
        Config::try_parse_from(std::iter::once("superior").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn defaults() {
        let config = parse(&[]);
        assert_eq!(config.server_url, DEFAULT_SERVER_URL);
        assert_eq!(config.endpoint, Endpoint::Answer);
        assert_eq!(config.timeouts(), Timeouts::default());
        assert!(config.one_shot_message().is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn flags_override_defaults() {
        let config = parse(&[
            "--server-url",
            "https://chat.example.com",
            "--endpoint",
            "kbanswer",
            "--timeout-secs",
            "5",
            "--no-history",
        ]);
        assert_eq!(config.endpoint, Endpoint::KbAnswer);
        assert_eq!(config.timeouts().request, Duration::from_secs(5));
        assert!(config.history_file().is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn every_flag_has_help_text() {
        use clap::CommandFactory;

        let command = Config::command();
        for arg in command.get_arguments() {
            if arg.get_id() == "help" || arg.get_id() == "version" {
                continue;
            }
            assert!(arg.get_help().is_some(), "no help for --{}", arg.get_id());
        }
    }

    #[test]
    fn trailing_words_form_one_message() {
        let config = parse(&["what", "is", "rust?"]);
        assert_eq!(config.one_shot_message().as_deref(), Some("what is rust?"));
    }

    #[test]
    fn unknown_endpoint_flag_is_rejected() {
        let args = ["superior", "--endpoint", "ask"];
        assert!(Config::try_parse_from(args).is_err());
    }

    #[test]
    fn bad_urls_and_timeouts_fail_validation() {
        assert!(parse(&["--server-url", "not a url"]).validate().is_err());
        assert!(parse(&["--server-url", "ftp://host"]).validate().is_err());
        assert!(parse(&["--timeout-secs", "0"]).validate().is_err());
    }
}

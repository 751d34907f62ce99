//! Command-line interface parsing and handling
//!
//! This module handles parsing command-line arguments and executing the appropriate commands.

pub mod model_list;
pub mod say;
pub mod session_list;
pub mod settings;

use std::error::Error;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Parser, Subcommand};

use crate::api::gateway::{ChatBackend, HttpGateway};
use crate::cli::model_list::list_models;
use crate::cli::say::{run_say, SayOptions};
use crate::cli::session_list::{create_session, list_sessions, print_history};
use crate::cli::settings::helpers::mutate_config_at;
use crate::cli::settings::{SettingError, SettingRegistry};
use crate::core::config::data::path_display;
use crate::core::config::Config;
use crate::ui::chat_loop::run_chat;
use crate::utils::url::normalize_base_url;

#[derive(Parser)]
#[command(name = "lanchat", version)]
#[command(about = "A terminal chat client for a LAN AI backend")]
#[command(
    long_about = "lanchat is a full-screen terminal chat client for an AI backend on your \
local network. It keeps conversations in backend sessions, streams replies as they are \
generated, and renders them as markdown.\n\n\
Controls:\n\
  Tab               Cycle focus: sessions, message, model\n\
  Up/Down           Move in the session list or model picker, scroll the chat\n\
  Enter             Send the message, or open the highlighted session\n\
  PageUp/PageDown   Scroll the chat\n\
  Ctrl+N            Create a session\n\
  Ctrl+O            Attach a file\n\
  Ctrl+X            Remove the last attachment\n\
  Esc               Cancel a prompt\n\
  Ctrl+C            Quit\n\n\
Environment Variables:\n\
  LANCHAT_LOG       Log filter for the diagnostic log (default: warn)"
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Backend base URL for this run (overrides the config file)
    #[arg(short = 'u', long, global = true, value_name = "URL")]
    pub base_url: Option<String>,

    /// Model to select at startup or to send with
    #[arg(short = 'm', long, global = true, value_name = "MODEL")]
    pub model: Option<String>,

    /// Write diagnostics to this file instead of the default log
    #[arg(short = 'l', long, global = true, value_name = "FILE")]
    pub log: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the chat interface (default)
    Chat,
    /// List sessions
    Sessions,
    /// Create a session
    NewSession {
        /// Session title (can be multiple words)
        #[arg(trailing_var_arg = true, required = true)]
        title: Vec<String>,
    },
    /// Print the transcript of a session
    History {
        /// Session id
        session: String,
    },
    /// List models and whether they accept images
    Models,
    /// Send one prompt without the UI and stream the reply
    Say {
        /// Session to send in
        #[arg(short = 's', long)]
        session: String,
        /// File to attach (repeatable)
        #[arg(short = 'a', long = "attach", value_name = "PATH")]
        attach: Vec<PathBuf>,
        /// Prompt text (can be multiple words)
        #[arg(trailing_var_arg = true, required = true)]
        prompt: Vec<String>,
    },
    /// Set configuration values, or show them all when no key is given
    Set {
        /// Configuration key to set
        key: Option<String>,
        /// Value to set for the key
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        value: Vec<String>,
    },
    /// Unset configuration values
    Unset {
        /// Configuration key to unset
        key: String,
    },
}

/// Apply the one-run overrides from the command line.
pub fn apply_overrides(config: &mut Config, args: &Args) {
    if let Some(base_url) = &args.base_url {
        config.base_url = Some(normalize_base_url(base_url));
    }
    if let Some(model) = &args.model {
        config.default_model = Some(model.clone());
    }
}

pub fn format_settings(config: &Config, registry: &SettingRegistry) -> Vec<String> {
    registry
        .keys_display_order()
        .iter()
        .filter_map(|key| registry.get(key))
        .map(|handler| handler.format(config))
        .collect()
}

pub fn run_set(path: &Path, key: &str, value: &[String]) -> Result<String, SettingError> {
    let registry = SettingRegistry::new();
    let handler = registry
        .get(key)
        .ok_or_else(|| SettingError::UnknownKey(key.to_string()))?;
    mutate_config_at(path, |config| handler.set(value, config))
}

pub fn run_unset(path: &Path, key: &str) -> Result<String, SettingError> {
    let registry = SettingRegistry::new();
    let handler = registry
        .get(key)
        .ok_or_else(|| SettingError::UnknownKey(key.to_string()))?;
    mutate_config_at(path, |config| Ok(handler.unset(config)))
}

fn report_setting(result: Result<String, SettingError>) {
    match result {
        Ok(message) => println!("{message}"),
        Err(err) => {
            err.print();
            std::process::exit(err.exit_code());
        }
    }
}

pub fn main() -> Result<(), Box<dyn Error>> {
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async_main())
}

async fn async_main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    crate::logging::init(args.log.as_deref());

    let mut config = Config::load()?;
    apply_overrides(&mut config, &args);
    let backend: Arc<dyn ChatBackend> = Arc::new(HttpGateway::new(config.base_url()));
    let mut stdout = io::stdout();

    match args.command.unwrap_or(Commands::Chat) {
        Commands::Chat => run_chat(config, backend).await,
        Commands::Sessions => list_sessions(backend.as_ref(), &mut stdout).await,
        Commands::NewSession { title } => {
            create_session(backend.as_ref(), &title.join(" "), &mut stdout).await
        }
        Commands::History { session } => {
            print_history(backend.as_ref(), &session, &mut stdout).await
        }
        Commands::Models => {
            list_models(backend.as_ref(), config.default_model(), &mut stdout).await
        }
        Commands::Say {
            session,
            attach,
            prompt,
        } => {
            let options = SayOptions {
                session_id: session,
                model: config.default_model().to_string(),
                attachments: attach,
                history_limit: config.history_limit(),
                prompt: prompt.join(" "),
            };
            run_say(backend, options, &mut stdout).await
        }
        Commands::Set { key: None, .. } => {
            let path = Config::get_config_path()?;
            let stored = Config::load_from_path(&path)?;
            println!("⚙️  Settings ({})", path_display(&path));
            for line in format_settings(&stored, &SettingRegistry::new()) {
                println!("{line}");
            }
            Ok(())
        }
        Commands::Set {
            key: Some(key),
            value,
        } => {
            let path = Config::get_config_path()?;
            report_setting(run_set(&path, &key, &value));
            Ok(())
        }
        Commands::Unset { key } => {
            let path = Config::get_config_path()?;
            report_setting(run_unset(&path, &key));
            Ok(())
        }
    }
}

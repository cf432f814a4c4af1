//! Chat Desk CLI
//!
//! Command-line client for the chat API:
//! - Render markdown and code blocks the way the web front end does
//! - Sign in and out, keeping the session in a local file
//! - Ask the navigation guard where a path would lead

use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};

use chatdesk::config::{generate_default_config, Config};
use chatdesk::guard::{Navigation, NavigationGuard};
use chatdesk::markdown::{CodeBlockInput, MarkdownContent, Renderer, SyntectHighlighter};
use chatdesk::router::RouteTable;
use chatdesk::session::{FileStorage, SessionStore};
use chatdesk::settings::SettingsStore;
use chatdesk::{ApiClient, RecordingNavigator, RequestError};

#[derive(Parser)]
#[command(name = "chatdesk")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Command-line client for Chat Desk")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file (default: search the standard locations)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Chat API origin, overriding the configuration
    #[arg(long, global = true)]
    pub api_url: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Render markdown to HTML
    Render {
        /// Input file (default: stdin)
        file: Option<PathBuf>,
        /// Treat the input as a JSON content value
        #[arg(long)]
        json: bool,
    },

    /// Render a single code block to highlighted HTML
    Code {
        /// Input file (default: stdin)
        file: Option<PathBuf>,
        /// Language used when the block carries none
        #[arg(short, long)]
        lang: Option<String>,
        /// Treat the input as a JSON code block value
        #[arg(long)]
        json: bool,
    },

    /// Print the highlight stylesheet
    Css {
        /// Theme name (default: from configuration)
        #[arg(short, long)]
        theme: Option<String>,
        /// List available themes instead
        #[arg(long)]
        list: bool,
    },

    /// Show where the navigation guard sends a path
    Navigate {
        /// Target path, e.g. /admin/users
        path: String,
    },

    /// Sign in and store the session
    Login {
        #[arg(short, long)]
        username: String,
        #[arg(short, long)]
        password: String,
    },

    /// Sign out and erase the stored session
    Logout,

    /// Show the signed-in user
    Whoami,

    /// Fetch and print the site settings
    Settings,

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load_with_env(path)
            .with_context(|| format!("Failed to load config {:?}", path))?,
        None => Config::load_default(),
    };
    if let Some(url) = &cli.api_url {
        config.api.base_url = url.clone();
    }

    chatdesk::logging::init(&config.logging)?;

    match cli.command {
        Commands::Render { file, json } => {
            let input = read_input(file.as_ref())?;
            let content = if json {
                let value = serde_json::from_str(&input).context("Input is not valid JSON")?;
                MarkdownContent::from_value(value)
            } else {
                MarkdownContent::Text(input)
            };
            let renderer = Renderer::new(config.render.clone());
            println!("{}", renderer.render_markdown(&content));
        }

        Commands::Code { file, lang, json } => {
            let input = read_input(file.as_ref())?;
            let block = if json {
                let value = serde_json::from_str(&input).context("Input is not valid JSON")?;
                CodeBlockInput::from_value(value)
            } else {
                CodeBlockInput::Plain(input)
            };
            let renderer = Renderer::new(config.render.clone());
            println!("{}", renderer.render_code(&block, lang.as_deref()));
        }

        Commands::Css { theme, list } => {
            if list {
                for name in SyntectHighlighter::theme_names() {
                    println!("{}", name);
                }
            } else {
                let theme = theme.unwrap_or_else(|| config.render.theme.clone());
                print!("{}", SyntectHighlighter::theme_css(&theme)?);
            }
        }

        Commands::Navigate { path } => {
            let mut session = open_session(&config)?;
            let routes = RouteTable::standard();
            let guard = NavigationGuard::new(&routes, &config.router);

            match guard.before_each(&path, &mut session) {
                Navigation::Allow => match routes.redirect_for(&path) {
                    Some(to) => println!("allow (then {})", to),
                    None => println!("allow"),
                },
                Navigation::Redirect { to } => println!("redirect {}", to),
            }
        }

        Commands::Login { username, password } => {
            let storage = open_storage(&config)?;
            let client = api_client(&config, Arc::clone(&storage))?;
            let mut session = SessionStore::new(storage);

            let response = match client.login(&username, &password).await {
                Ok(response) => response,
                Err(e) => {
                    let detail = e.response().and_then(|r| r.detail());
                    bail!("Login failed: {}", detail.unwrap_or_else(|| e.to_string()));
                }
            };
            session.set_user_info(&response)?;
            tracing::info!(username = %response.username, "Signed in");
            println!("Signed in as {} ({})", response.username, response.role);
        }

        Commands::Logout => {
            let mut session = open_session(&config)?;
            session.clear_user_info()?;
            println!("Signed out");
        }

        Commands::Whoami => {
            let storage = open_storage(&config)?;
            let client = api_client(&config, Arc::clone(&storage))?;

            match client.current_user().await {
                Ok(profile) => {
                    println!("{}", serde_json::to_string_pretty(&profile)?);
                }
                Err(RequestError::Unauthorized(_)) => {
                    // Follow the forced redirect so the guard drops the stale session
                    let target = client
                        .navigator()
                        .last()
                        .unwrap_or_else(|| config.router.login_path.clone());
                    let routes = RouteTable::standard();
                    let guard = NavigationGuard::new(&routes, &config.router);
                    let mut session = SessionStore::restore(storage);
                    guard.before_each(&target, &mut session);

                    eprintln!("Not signed in (redirected to {})", target);
                    std::process::exit(1);
                }
                Err(e) => return Err(e).context("Failed to fetch current user"),
            }
        }

        Commands::Settings => {
            let storage = open_storage(&config)?;
            let client = api_client(&config, storage)?;

            let mut store = SettingsStore::new();
            store.begin_fetch();
            store.apply(client.fetch_frontend_settings().await);

            if let Some(error) = &store.error {
                bail!("Failed to fetch settings: {}", error);
            }
            println!("{}", serde_json::to_string_pretty(&store.settings)?);
        }

        Commands::Config { output } => {
            let content = generate_default_config();
            match output {
                Some(path) => {
                    std::fs::write(&path, content)
                        .with_context(|| format!("Failed to write {:?}", path))?;
                    println!("Wrote default configuration to {:?}", path);
                }
                None => print!("{}", content),
            }
        }
    }

    Ok(())
}

fn read_input(file: Option<&PathBuf>) -> anyhow::Result<String> {
    match file {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("Failed to read {:?}", path))
        }
        None => {
            let mut input = String::new();
            std::io::stdin()
                .read_to_string(&mut input)
                .context("Failed to read stdin")?;
            Ok(input)
        }
    }
}

fn open_storage(config: &Config) -> anyhow::Result<Arc<FileStorage>> {
    let path = config.session.path();
    let storage = FileStorage::open(&path)
        .with_context(|| format!("Failed to open session file {:?}", path))?;
    Ok(Arc::new(storage))
}

fn open_session(config: &Config) -> anyhow::Result<SessionStore<Arc<FileStorage>>> {
    Ok(SessionStore::restore(open_storage(config)?))
}

fn api_client(
    config: &Config,
    storage: Arc<FileStorage>,
) -> anyhow::Result<ApiClient<Arc<FileStorage>, RecordingNavigator>> {
    let client = ApiClient::new(
        &config.api,
        config.router.login_path.clone(),
        storage,
        RecordingNavigator::new(),
    )?;
    Ok(client)
}

//! CLI commands

use anyhow::{Context, Result, anyhow, bail};
use clap::{Args, Subcommand};
use inkpost_core::validation::validate_password_confirmation;
use inkpost_core::{Post, PostQuery};
use inkpost_http::ApiClient;
use inkpost_http::types::ContactMessage;
use inkpost_session::auth_guard::{Access, article_access, comment_access};
use inkpost_session::services::{CommentStore, NewsletterStore, PostStore, send_contact};
use inkpost_session::{ClientConfig, RefreshState, Session, SessionState};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::config;

/// Account credentials, taken from flags or the environment
#[derive(Args)]
pub struct Credentials {
    /// Account email
    #[arg(long, env = "INKPOST_EMAIL")]
    email: String,

    /// Account password
    #[arg(long, env = "INKPOST_PASSWORD", hide_env_values = true)]
    password: String,
}

/// Credentials for commands that also work without an account
#[derive(Args)]
pub struct OptionalCredentials {
    /// Account email
    #[arg(long, env = "INKPOST_EMAIL", requires = "password")]
    email: Option<String>,

    /// Account password
    #[arg(long, env = "INKPOST_PASSWORD", hide_env_values = true)]
    password: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(flatten)]
    Api(ApiCommands),

    /// Configuration file operations
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

/// Commands that talk to the blog API
#[derive(Subcommand)]
pub enum ApiCommands {
    /// Create an account
    Signup {
        /// Display name
        #[arg(long)]
        name: String,

        #[command(flatten)]
        credentials: Credentials,
    },

    /// Log in and show the account
    Login {
        #[command(flatten)]
        credentials: Credentials,
    },

    /// Confirm the account email with the 6-digit code
    VerifyEmail {
        code: String,

        #[command(flatten)]
        credentials: Credentials,
    },

    /// Request a password reset email
    ForgotPassword { email: String },

    /// Set a new password with the token from a reset email
    ResetPassword {
        token: String,

        /// New password
        #[arg(long, env = "INKPOST_NEW_PASSWORD", hide_env_values = true)]
        password: String,

        /// Repeat the new password
        #[arg(long)]
        confirm: String,
    },

    /// Browse posts
    Posts {
        #[command(subcommand)]
        command: PostCommands,
    },

    /// Read or write comments (requires an account)
    Comments {
        #[command(subcommand)]
        command: CommentCommands,
    },

    /// Subscribe to the newsletter
    Subscribe { email: String },

    /// Send a message through the contact form
    Contact {
        #[arg(long)]
        name: String,

        #[arg(long)]
        email: String,

        /// Service the message is about
        #[arg(long)]
        service_type: String,

        #[arg(long)]
        phone: Option<String>,

        message: String,
    },

    /// Log in and keep the session alive until interrupted
    Keepalive {
        #[command(flatten)]
        credentials: Credentials,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Generate a configuration file with the default settings
    Init {
        /// Output file path (defaults to <data-dir>/inkpost.json)
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
pub enum PostCommands {
    /// List published posts
    List {
        /// Case-insensitive text to look for
        #[arg(long, default_value = "")]
        search: String,

        /// Only posts in this category
        #[arg(long, default_value = "")]
        category: String,
    },

    /// Show a post; the full text needs an account
    Show {
        slug: String,

        #[command(flatten)]
        credentials: OptionalCredentials,
    },
}

#[derive(Subcommand)]
pub enum CommentCommands {
    /// List comments on a post
    List {
        post_id: String,

        #[command(flatten)]
        credentials: Credentials,
    },

    /// Comment on a post
    Add {
        post_id: String,

        text: String,

        #[command(flatten)]
        credentials: Credentials,
    },
}

/// Client and session shared by a command
struct App {
    client: ApiClient,
    session: Session,
}

impl App {
    fn new(config_path: Option<&Path>) -> Result<Self> {
        Self::from_config(&config::load_client_config(config_path)?)
    }

    fn from_config(config: &ClientConfig) -> Result<Self> {
        let client = config.build_client()?;
        let session = Session::from_config(&client, config);
        info!(api_url = %config.api_url, "using API");
        Ok(Self { client, session })
    }

    /// Log out if the command left a session open
    async fn close(&self) {
        if self.session.is_authenticated() {
            self.session.logout().await;
        }
    }

    async fn login(&self, credentials: &Credentials) -> Result<()> {
        self.session
            .login(&credentials.email, &credentials.password)
            .await
            .map(|_| ())
            .ok_or_else(|| failure(&self.session.state(), "Login failed"))
    }
}

fn failure(state: &SessionState, fallback: &str) -> anyhow::Error {
    anyhow!(state.error.clone().unwrap_or_else(|| fallback.to_string()))
}

impl Commands {
    pub async fn execute(self, config_path: Option<PathBuf>, data_dir: PathBuf) -> Result<()> {
        match self {
            Self::Config { command } => command.execute(&data_dir),
            Self::Api(command) => {
                let app = App::new(config_path.as_deref())?;
                command.execute(&app).await
            }
        }
    }
}

impl ApiCommands {
    /// Run against `app`, closing any session the command opened
    async fn execute(self, app: &App) -> Result<()> {
        let outcome = self.run(app).await;
        app.close().await;
        outcome
    }

    async fn run(self, app: &App) -> Result<()> {
        match self {
            Self::Signup { name, credentials } => {
                let user = app
                    .session
                    .signup(&name, &credentials.email, &credentials.password)
                    .await
                    .ok_or_else(|| failure(&app.session.state(), "Signup failed"))?;
                println!("{}", serde_json::to_string_pretty(&user)?);
                println!("Check your inbox for a verification code.");
                Ok(())
            }
            Self::Login { credentials } => {
                app.login(&credentials).await?;
                let user = app
                    .session
                    .fetch_user()
                    .await
                    .ok_or_else(|| failure(&app.session.state(), "Session was not kept"))?;
                println!("{}", serde_json::to_string_pretty(&user)?);
                Ok(())
            }
            Self::VerifyEmail { code, credentials } => {
                app.login(&credentials).await?;
                let user = app.session.verify_email(&code).await.map_err(|_| {
                    failure(&app.session.state(), "Email verification failed")
                })?;
                if let Some(notice) = app.session.state().notice {
                    println!("{notice}");
                }
                if let Some(user) = user {
                    println!("{}", serde_json::to_string_pretty(&user)?);
                }
                Ok(())
            }
            Self::ForgotPassword { email } => {
                let notice = app
                    .session
                    .forgot_password(&email)
                    .await
                    .ok_or_else(|| failure(&app.session.state(), "Forgot password failed"))?;
                println!("{notice}");
                Ok(())
            }
            Self::ResetPassword {
                token,
                password,
                confirm,
            } => {
                validate_password_confirmation(&password, &confirm)?;
                let notice = app
                    .session
                    .reset_password(&token, &password)
                    .await
                    .ok_or_else(|| failure(&app.session.state(), "Reset password failed"))?;
                println!("{notice}");
                Ok(())
            }
            Self::Posts { command } => command.execute(app).await,
            Self::Comments { command } => command.execute(app).await,
            Self::Subscribe { email } => {
                let store = NewsletterStore::new(app.client.clone(), app.session.clone());
                let message = store.subscribe_email(&email).await.map_err(|_| {
                    anyhow!(store.state().error.unwrap_or_default())
                })?;
                println!("{message}");
                Ok(())
            }
            Self::Contact {
                name,
                email,
                service_type,
                phone,
                message,
            } => {
                let message = ContactMessage {
                    name,
                    email,
                    service_type,
                    phone,
                    message,
                };
                let reply = send_contact(&app.client, &message)
                    .await
                    .context("Failed to send email")?;
                println!("{reply}");
                Ok(())
            }
            Self::Keepalive { credentials } => keepalive(app, &credentials).await,
        }
    }
}

impl ConfigCommands {
    fn execute(self, data_dir: &Path) -> Result<()> {
        match self {
            Self::Init { output } => {
                let path = output.unwrap_or_else(|| data_dir.join("inkpost.json"));
                config::generate_default_config(&path)?;
                println!("Generated configuration at: {}", path.display());
                Ok(())
            }
        }
    }
}

impl PostCommands {
    async fn execute(self, app: &App) -> Result<()> {
        let store = PostStore::new(app.client.clone(), app.session.clone());
        match self {
            Self::List { search, category } => {
                store
                    .fetch_posts()
                    .await
                    .context("Failed to fetch posts")?;
                let state = store.state();
                let query = PostQuery::new(search, category);
                let posts = state.visible(&query);
                if posts.is_empty() {
                    println!("No posts found.");
                }
                for post in posts {
                    print_summary(post);
                }
                Ok(())
            }
            Self::Show { slug, credentials } => {
                if let (Some(email), Some(password)) = (credentials.email, credentials.password) {
                    app.login(&Credentials { email, password }).await?;
                }
                let post = store
                    .fetch_post_by_slug(&slug)
                    .await
                    .context("Failed to fetch post")?;

                print_summary(&post);
                match article_access(&app.session.state()) {
                    Access::Full => println!("\n{}", post.content),
                    Access::LoginRequired(prompt) => {
                        println!("\n{}\n\n{}: {}", post.excerpt, prompt.title, prompt.message);
                    }
                    Access::Loading => {}
                }
                Ok(())
            }
        }
    }
}

impl CommentCommands {
    async fn execute(self, app: &App) -> Result<()> {
        let store = CommentStore::new(app.client.clone(), app.session.clone());
        match self {
            Self::List {
                post_id,
                credentials,
            } => {
                app.login(&credentials).await?;
                if let Access::LoginRequired(prompt) = comment_access(&app.session.state()) {
                    bail!("{}: {}", prompt.title, prompt.message);
                }
                let comments = store
                    .fetch_comments_for_post(&post_id)
                    .await
                    .map_err(|_| anyhow!(store.state().error.unwrap_or_default()))?;
                for comment in comments {
                    let edited = if comment.is_edited() { " (edited)" } else { "" };
                    println!(
                        "{} - {}{}\n  {}",
                        comment.author.name,
                        comment.created_at.format("%Y-%m-%d %H:%M"),
                        edited,
                        comment.content
                    );
                }
                Ok(())
            }
            Self::Add {
                post_id,
                text,
                credentials,
            } => {
                app.login(&credentials).await?;
                let comment = store
                    .create_comment(&post_id, &text)
                    .await
                    .map_err(|_| anyhow!(store.state().error.unwrap_or_default()))?;
                println!("Posted comment {}", comment.id);
                Ok(())
            }
        }
    }
}

fn print_summary(post: &Post) {
    let category = if post.category.is_empty() {
        String::new()
    } else {
        format!(" [{}]", post.category)
    };
    println!(
        "{} - {}{} ({}, {})",
        post.route_key(),
        post.title,
        category,
        post.author,
        post.created_at.format("%Y-%m-%d")
    );
}

/// Hold the session open, logging every refresh, until Ctrl-C or session loss
async fn keepalive(app: &App, credentials: &Credentials) -> Result<()> {
    app.login(credentials).await?;
    let mut updates = app.session.subscribe();
    info!("session established, press Ctrl-C to stop");

    let interrupted = tokio::signal::ctrl_c();
    tokio::pin!(interrupted);

    loop {
        tokio::select! {
            _ = &mut interrupted => {
                info!("interrupted, logging out");
                return Ok(());
            }
            changed = updates.changed() => {
                changed.context("session closed")?;
                let state = updates.borrow_and_update().clone();
                match state.refresh {
                    RefreshState::Refreshing => info!("refreshing credential"),
                    RefreshState::Scheduled { at } => {
                        let wait = at.saturating_duration_since(tokio::time::Instant::now());
                        info!(next_refresh_secs = wait.as_secs(), "session alive");
                    }
                    RefreshState::Idle => {}
                }
                if state.user.is_none() {
                    warn!("session lost");
                    bail!(state.error.unwrap_or_else(|| "Session lost".to_string()));
                }
            }
        }
    }
}

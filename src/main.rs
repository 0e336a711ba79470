//! Userdesk CLI
//!
//! Command-line front end for the user service:
//! - Log in, register, log out
//! - List users, show a profile
//! - Edit your own profile

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use userdesk::config::{generate_default_config, Config, LoggingConfig};
use userdesk::pages::edit::{EditForm, EditView};
use userdesk::pages::login::LoginForm;
use userdesk::pages::register::RegisterForm;
use userdesk::pages::{self, Mount, Outcome, PageContext, Route};
use userdesk::render;

#[derive(Parser)]
#[command(name = "userdesk")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Log in, register and manage your user profile")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (default: ~/.config/userdesk/config.toml or ./userdesk.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// API base URL, overrides the configured environment
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Session file
    #[arg(long, global = true)]
    pub session: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the home page
    Home,

    /// Log in
    Login {
        #[arg(short, long, default_value = "")]
        username: String,
        #[arg(short, long, default_value = "")]
        password: String,
    },

    /// Create an account and log in
    Register {
        #[arg(short, long, default_value = "")]
        username: String,
        #[arg(short, long, default_value = "")]
        name: String,
        #[arg(short, long, default_value = "")]
        password: String,
        /// Birthday (YYYY-MM-DD)
        #[arg(short, long)]
        birthday: Option<String>,
    },

    /// List users
    Users,

    /// Show a user profile
    Show {
        id: i64,
    },

    /// Edit your profile; without options, show the pre-filled form
    Edit {
        id: i64,
        #[arg(short, long)]
        username: Option<String>,
        /// Birthday (YYYY-MM-DD)
        #[arg(short, long, conflicts_with = "clear_birthday")]
        birthday: Option<String>,
        /// Remove the birthday
        #[arg(long)]
        clear_birthday: bool,
    },

    /// Log out
    Logout,

    /// Open a page by path, e.g. /users/1
    Open {
        path: String,
    },

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

    if let Commands::Config { output } = &cli.command {
        let content = generate_default_config();
        match output {
            Some(path) => {
                std::fs::write(path, content)
                    .with_context(|| format!("writing config to {:?}", path))?;
                println!("Wrote default config to {:?}", path);
            }
            None => print!("{}", content),
        }
        return Ok(());
    }

    let mut config = match &cli.config {
        Some(path) => Config::load_with_env(path)?,
        None => Config::load_default(),
    };
    if let Some(url) = &cli.api_url {
        config.api.base_url = Some(url.clone());
    }
    if let Some(path) = &cli.session {
        config.session.path = path.to_string_lossy().to_string();
    }

    init_logging(&config.logging);

    let ctx = userdesk::context_from_config(&config)?;
    tracing::debug!(?ctx, "Starting");

    let ok = run(&ctx, cli.command).await?;
    if !ok {
        std::process::exit(1);
    }
    Ok(())
}

/// Install the tracing subscriber. `RUST_LOG` wins over the config level.
fn init_logging(logging: &LoggingConfig) {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| format!("userdesk={}", logging.level)),
    );

    if logging.format == "json" {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

/// Run one command. Returns false when the user was left with a notice.
async fn run(ctx: &PageContext, command: Commands) -> anyhow::Result<bool> {
    match command {
        Commands::Home => show(ctx, Route::Home).await,
        Commands::Users => show(ctx, Route::Users).await,
        Commands::Show { id } => show(ctx, Route::User(id)).await,
        Commands::Open { path } => {
            let route = Route::parse(&path).with_context(|| format!("unknown page {}", path))?;
            show(ctx, route).await
        }

        Commands::Login { username, password } => {
            if let Mount::Redirect(route) = pages::login::mount(ctx) {
                println!("{}", render::render_outcome(&Outcome::navigate(route)).trim_end());
                return show(ctx, route).await;
            }
            let outcome = pages::login::submit(ctx, &LoginForm { username, password }).await;
            finish(ctx, outcome).await
        }

        Commands::Register {
            username,
            name,
            password,
            birthday,
        } => {
            let form = RegisterForm {
                username,
                name,
                password,
                birthday,
            };
            let outcome = pages::register::submit(ctx, &form).await;
            finish(ctx, outcome).await
        }

        Commands::Edit {
            id,
            username,
            birthday,
            clear_birthday,
        } => {
            let form = match pages::edit::mount(ctx, id).await {
                Mount::Redirect(route) => {
                    println!("{}", render::render_outcome(&Outcome::navigate(route)).trim_end());
                    show(ctx, route).await?;
                    return Ok(false);
                }
                Mount::Ready(EditView::NotFound) => {
                    print!("{}", render::render_edit(&EditView::NotFound));
                    return Ok(false);
                }
                Mount::Ready(view @ EditView::Ready { .. }) => {
                    if username.is_none() && birthday.is_none() && !clear_birthday {
                        print!("{}", render::render_edit(&view));
                        return Ok(true);
                    }
                    let EditView::Ready { form, .. } = view else {
                        return Ok(false);
                    };
                    EditForm {
                        username: username.or(form.username),
                        birthday: if clear_birthday {
                            None
                        } else {
                            birthday.or(form.birthday)
                        },
                    }
                }
            };

            let outcome = pages::edit::submit(ctx, id, &form).await;
            finish(ctx, outcome).await
        }

        Commands::Logout => {
            let outcome = pages::logout::logout(ctx).await;
            finish(ctx, outcome).await
        }

        Commands::Config { .. } => Ok(true),
    }
}

/// Print an outcome and, on navigation, render the destination
async fn finish(ctx: &PageContext, outcome: Outcome) -> anyhow::Result<bool> {
    print!("{}", render::render_outcome(&outcome));
    match outcome {
        Outcome::Navigate { to, .. } => show(ctx, to).await,
        Outcome::Stay { .. } => Ok(false),
    }
}

/// Mount and render a route
async fn show(ctx: &PageContext, route: Route) -> anyhow::Result<bool> {
    match pages::visit(ctx, route).await {
        Ok(visit) => {
            if visit.route != route {
                println!("→ {}", visit.route);
            }
            print!("{}", render::render_visit(&visit));
            Ok(true)
        }
        Err(e) => {
            tracing::error!(error = %e, route = %route, "Page failed to load");
            println!("! {}", e);
            Ok(false)
        }
    }
}

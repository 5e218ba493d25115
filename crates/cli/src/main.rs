//! Storekeep CLI - the admin dashboard from a terminal.
//!
//! # Usage
//!
//! ```bash
//! # Sign in (the token is kept in ADMIN_SESSION_FILE)
//! sk login -e admin@example.com
//!
//! # Overview counters, recent orders, low stock
//! sk dashboard
//!
//! # Browse and change records
//! sk list orders
//! sk show orders 64f1c2
//! sk status orders 64f1c2            # toggle completed/pending
//! sk delete discounts 650a1b         # asks for confirmation
//! sk create shipping-methods -f name=Express -f price=9.99 -f estimatedDays=1-2
//!
//! # Settings, with dotted paths for nested values
//! sk settings get socialMedia.facebook
//! sk settings set siteName '"My Shop"'
//!
//! # What would the dashboard show for a path?
//! sk route /admin/orders
//! ```
//!
//! # Environment Variables
//!
//! See `storekeep_admin::config`. `RUST_LOG` controls log verbosity; logs go
//! to stderr, command output to stdout.

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use storekeep_admin::api::Resource;
use storekeep_admin::config::AdminConfig;

mod commands;

use commands::CliError;

#[derive(Parser)]
#[command(name = "sk")]
#[command(author, version, about = "Storekeep admin dashboard CLI")]
struct Cli {
    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in and store the session token
    Login {
        /// Admin email address
        #[arg(short, long)]
        email: String,

        /// Password. When omitted it is read from stdin, and the terminal
        /// echoes what you type; prefer `SK_PASSWORD` on shared screens.
        #[arg(short, long, env = "SK_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },
    /// Sign out and forget the session token
    Logout,
    /// Show the signed-in admin
    Whoami,
    /// Show the dashboard overview
    Dashboard,
    /// List the records of a resource
    List {
        /// products, orders, customers, blogs, discounts or shipping-methods
        resource: Resource,
    },
    /// Show one record
    Show { resource: Resource, id: String },
    /// Delete a record
    Delete {
        resource: Resource,
        id: String,

        /// Do not ask for confirmation
        #[arg(short, long)]
        yes: bool,
    },
    /// Toggle a record's status, or set it explicitly
    Status {
        resource: Resource,
        id: String,

        /// New status (e.g. `completed`), or `true`/`false` for active flags
        #[arg(long)]
        set: Option<String>,
    },
    /// Create a record
    Create {
        resource: Resource,
        #[command(flatten)]
        fields: commands::records::FieldArgs,
    },
    /// Update a record
    Update {
        resource: Resource,
        id: String,
        #[command(flatten)]
        fields: commands::records::FieldArgs,
    },
    /// Manage blog posts
    Blog {
        #[command(subcommand)]
        action: BlogAction,
    },
    /// Read or change store settings
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },
    /// Show what the dashboard would render for a path
    Route { path: String },
}

#[derive(Subcommand)]
enum BlogAction {
    /// Write a new blog post
    Add {
        #[arg(long)]
        title: String,
        #[arg(long)]
        content: String,
        #[arg(long)]
        image: String,
        #[arg(long)]
        author: String,
        /// Comma-separated tags
        #[arg(long, default_value = "")]
        tags: String,
        #[arg(long, default_value = "draft")]
        status: String,
    },
}

#[derive(Subcommand)]
enum SettingsAction {
    /// Print all settings, or the value at a dotted path
    Get { path: Option<String> },
    /// Set the value at a dotted path (JSON, or a plain string)
    Set { path: String, value: String },
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &AdminConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config
                .sentry_environment
                .clone()
                .map(std::borrow::Cow::Owned),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    tracing::info!("Sentry initialized");
    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

fn init_tracing(json: bool) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "storekeep_admin=warn,storekeep_cli=info".into());

    let json_layer = json.then(|| {
        tracing_subscriber::fmt::layer()
            .json()
            .flatten_event(true)
            .with_writer(std::io::stderr)
    });
    let text_layer =
        (!json).then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(text_layer)
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match AdminConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            init_tracing(cli.log_json);
            tracing::error!("Failed to load configuration: {e}");
            std::process::exit(2);
        }
    };

    // Sentry must be up before the tracing subscriber
    let _sentry_guard = init_sentry(&config);
    init_tracing(cli.log_json);

    if let Err(e) = run(cli, config).await {
        if e.is_internal() {
            sentry::capture_error(&e);
        }
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli, config: AdminConfig) -> Result<(), CliError> {
    let console = commands::Console::connect(config)?;

    let result = match cli.command {
        Commands::Login { email, password } => {
            commands::session::login(&console, &email, password).await
        }
        Commands::Logout => {
            commands::session::logout(&console).await;
            Ok(())
        }
        Commands::Whoami => commands::session::whoami(&console).await,
        Commands::Dashboard => commands::dashboard::show(&console).await,
        Commands::List { resource } => commands::records::list(&console, resource).await,
        Commands::Show { resource, id } => commands::records::show(&console, resource, &id).await,
        Commands::Delete { resource, id, yes } => {
            commands::records::delete(&console, resource, &id, yes).await
        }
        Commands::Status { resource, id, set } => {
            commands::records::status(&console, resource, &id, set.as_deref()).await
        }
        Commands::Create { resource, fields } => {
            commands::records::create(&console, resource, &fields).await
        }
        Commands::Update {
            resource,
            id,
            fields,
        } => commands::records::update(&console, resource, &id, &fields).await,
        Commands::Blog { action } => match action {
            BlogAction::Add {
                title,
                content,
                image,
                author,
                tags,
                status,
            } => {
                let form = storekeep_admin::views::BlogForm {
                    title,
                    content,
                    image,
                    author,
                    tags,
                    status,
                };
                commands::records::add_blog(&console, &form).await
            }
        },
        Commands::Settings { action } => match action {
            SettingsAction::Get { path } => {
                commands::settings::get(&console, path.as_deref()).await
            }
            SettingsAction::Set { path, value } => {
                commands::settings::set(&console, &path, &value).await
            }
        },
        Commands::Route { path } => commands::route::check(&console, &path).await,
    };

    console.flush();
    result
}

/// Cadence Server - playlist API over a shared song cache
use anyhow::Context;
use cadence_catalog::{CatalogClient, TrackCatalog};
use cadence_server::{
    config::ServerConfig,
    services::{AccountService, AuthService, Registration},
    state::AppState,
};
use clap::{Parser, Subcommand};
use sqlx::SqlitePool;
use std::{
    net::SocketAddr,
    path::{Path, PathBuf},
    sync::Arc,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "cadence-server")]
#[command(about = "Cadence playlist server", long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve,
    /// Create a new user
    AddUser {
        /// Username
        #[arg(short, long)]
        username: String,
        /// Email address
        #[arg(short, long)]
        email: String,
        /// Display name
        #[arg(short, long)]
        name: String,
        /// Password
        #[arg(short, long, env = "CADENCE_NEW_USER_PASSWORD")]
        password: String,
    },
    /// List all users
    ListUsers,
    /// Delete a user and their playlists
    RemoveUser {
        /// Username
        #[arg(short, long)]
        username: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "cadence_server=info,cadence_catalog=info,tower_http=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let config = ServerConfig::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Serve => serve(config).await?,
        Commands::AddUser {
            username,
            email,
            name,
            password,
        } => {
            add_user(
                config,
                Registration {
                    username,
                    email,
                    password,
                    name,
                },
            )
            .await?;
        }
        Commands::ListUsers => list_users(config).await?,
        Commands::RemoveUser { username } => remove_user(config, &username).await?,
    }

    Ok(())
}

async fn serve(config: ServerConfig) -> anyhow::Result<()> {
    config.validate()?;

    tracing::info!("Starting Cadence Server");
    tracing::info!("Host: {}", config.server.host);
    tracing::info!("Port: {}", config.server.port);

    let pool = open_database(&config).await?;
    tracing::info!("Database connected");

    let catalog = CatalogClient::new(config.catalog.clone())?;
    if !config.catalog.is_configured() {
        tracing::warn!("Catalog credentials missing; catalog endpoints will answer 503");
    }
    let catalog: Arc<dyn TrackCatalog> = Arc::new(catalog);

    let auth_service = Arc::new(auth_service(&config));
    tracing::info!("Auth service initialized");

    let app_state = AppState::new(pool, auth_service, catalog);
    let app = cadence_server::router(app_state);

    let addr = SocketAddr::from((
        config
            .server
            .host
            .parse::<std::net::IpAddr>()
            .with_context(|| format!("invalid host {}", config.server.host))?,
        config.server.port,
    ));

    tracing::info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn add_user(config: ServerConfig, registration: Registration) -> anyhow::Result<()> {
    let pool = open_database(&config).await?;
    let accounts = AccountService::new(pool, Arc::new(auth_service(&config)));

    let user = accounts.create_user(registration).await?;
    println!("Created user {} ({})", user.username, user.id);

    Ok(())
}

async fn list_users(config: ServerConfig) -> anyhow::Result<()> {
    let pool = open_database(&config).await?;
    let users = cadence_storage::users::get_all(&pool).await?;

    println!("Users:");
    for user in users {
        println!("  {} - {} <{}> ({})", user.id, user.username, user.email, user.name);
    }

    Ok(())
}

async fn remove_user(config: ServerConfig, username: &str) -> anyhow::Result<()> {
    let pool = open_database(&config).await?;
    let username = username.trim().to_lowercase();

    let user = cadence_storage::users::find_by_username(&pool, &username)
        .await?
        .with_context(|| format!("no user named {username}"))?;

    cadence_storage::users::delete(&pool, &user.id).await?;
    tracing::info!(user_id = %user.id, "Removed user");
    println!("Removed user {} and their playlists", user.username);

    Ok(())
}

async fn open_database(config: &ServerConfig) -> anyhow::Result<SqlitePool> {
    // SQLite creates the file but not its directory
    if let Some(path) = config.storage.database_url.strip_prefix("sqlite://") {
        let path = Path::new(path.split('?').next().unwrap_or_default());
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("creating {}", parent.display()))?;
        }
    }

    let pool = cadence_storage::create_pool(&config.storage.database_url).await?;
    cadence_storage::run_migrations(&pool).await?;
    Ok(pool)
}

fn auth_service(config: &ServerConfig) -> AuthService {
    AuthService::new(
        config.auth.jwt_secret.clone(),
        config.auth.token_expiration_days,
    )
    .with_cost(config.auth.bcrypt_cost)
}

use std::{env, sync::Arc};

use tessera_db_postgres::{PgTenantStore, create_pool, migrations};
use tessera_server::config::loader::load_config;
use tessera_server::{AppState, ServerBuilder, create_cache_backend, observability};

/// How the configuration path was determined.
#[derive(Debug, Clone, Copy)]
enum ConfigSource {
    /// From --config CLI argument
    CliArgument,
    /// From TESSERA_CONFIG environment variable
    EnvironmentVariable,
    /// Default path (tessera.toml)
    Default,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CliArgument => write!(f, "CLI argument (--config)"),
            Self::EnvironmentVariable => write!(f, "environment variable (TESSERA_CONFIG)"),
            Self::Default => write!(f, "default"),
        }
    }
}

#[tokio::main]
async fn main() {
    // Load .env file if present (before anything else), so local
    // development can keep credentials out of the shell profile.
    if let Err(e) = dotenvy::dotenv() {
        // Not an error if .env doesn't exist - it's optional
        if !matches!(e, dotenvy::Error::Io(ref io_err) if io_err.kind() == std::io::ErrorKind::NotFound)
        {
            eprintln!("Warning: Failed to load .env file: {e}");
        }
    }

    // Initialize tracing early with the default level
    observability::init_tracing();

    // Parse config path from CLI, environment, or use default
    let (config_path, source) = resolve_config_path();

    let cfg = match load_config(Some(&config_path)) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Configuration error: {e}");
            std::process::exit(2);
        }
    };

    tracing::info!(
        path = %config_path,
        source = %source,
        "Configuration loaded"
    );

    observability::apply_logging_level(&cfg.logging.level);

    // Store of record. validate() guarantees the section is present.
    let Some(pg_cfg) = cfg.storage.postgres.clone() else {
        eprintln!("Configuration error: storage.postgres is required");
        std::process::exit(2);
    };

    let pool = match create_pool(&pg_cfg).await {
        Ok(p) => p,
        Err(e) => {
            eprintln!("PostgreSQL connection failed: {e}");
            std::process::exit(2);
        }
    };

    if pg_cfg.run_migrations {
        if let Err(e) = migrations::run(&pool).await {
            eprintln!("Migration failed: {e}");
            std::process::exit(2);
        }
    }

    let store = Arc::new(PgTenantStore::new(pool));
    let cache = create_cache_backend(&cfg.redis).await;

    let state = AppState::new(store, cache, cfg.admin.api_key.clone(), cfg.tenant_ttl());
    let server = ServerBuilder::new(&cfg, state).build();

    if let Err(err) = server.run().await {
        eprintln!("Server error: {err}");
    }
}

/// Resolve the configuration file path.
///
/// Priority order:
/// 1. CLI argument: --config <path>
/// 2. Environment variable: TESSERA_CONFIG
/// 3. Default: tessera.toml
fn resolve_config_path() -> (String, ConfigSource) {
    // 1. Check CLI: --config <path>
    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        if arg == "--config" {
            if let Some(path) = args.next() {
                return (path, ConfigSource::CliArgument);
            }
        }
    }

    // 2. Check environment variable
    if let Ok(path) = env::var("TESSERA_CONFIG") {
        if !path.is_empty() {
            return (path, ConfigSource::EnvironmentVariable);
        }
    }

    // 3. Default to tessera.toml
    ("tessera.toml".to_string(), ConfigSource::Default)
}

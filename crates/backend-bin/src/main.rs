use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tokio::net::TcpListener;
use tracing::info;
use zeroize::Zeroize;

use promptdesk_backend_lib::auth::CredentialStore;
use promptdesk_backend_lib::config::Settings;
use promptdesk_backend_lib::llm::{HuggingFaceClient, LlmService};
use promptdesk_backend_lib::{create_router, AppState};

/// PromptDesk chat assistant backend
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Path to the configuration file
    #[arg(long, default_value = "config/default.toml")]
    config: PathBuf,

    /// Override the bind address from the configuration
    #[arg(long)]
    bind: Option<SocketAddr>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut settings = Settings::load_from(&args.config)
        .with_context(|| format!("loading settings from {}", args.config.display()))?;
    if let Some(bind) = args.bind {
        settings.bind_addr = bind;
    }

    init_tracing(&settings.log_level);

    // Provision accounts before the server accepts connections; plaintext
    // seed passwords are wiped once hashed.
    let credentials = CredentialStore::with_requirements(settings.password_requirements.clone());
    for seed in &mut settings.seed_users {
        let mut password = std::mem::take(&mut seed.password);
        credentials
            .add_user(&seed.username, &password)
            .with_context(|| format!("provisioning user {}", seed.username))?;
        password.zeroize();
    }
    info!(users = credentials.len(), "credential store provisioned");

    let api_token = settings
        .hf_api_token
        .clone()
        .or_else(|| std::env::var("HUGGINGFACE_API_TOKEN").ok())
        .context("no inference API token: set hf_api_token or HUGGINGFACE_API_TOKEN")?;
    let backend = HuggingFaceClient::new(api_token, settings.inference_base_url.clone())?;
    let llm = LlmService::new(Arc::new(backend), &settings.default_model)?;
    info!(model = %llm.current_model(), "inference service ready");

    let state = Arc::new(AppState::new(credentials, llm, settings));

    // Periodic session sweep plus login-limiter housekeeping, independent of
    // request traffic.
    let sweep_interval = Duration::from_secs(state.settings.sweep_interval_secs);
    let max_age = Duration::from_secs(state.settings.session_ttl_secs);
    state.sessions.spawn_sweeper(sweep_interval, max_age);

    let limiter = state.login_limiter.clone();
    tokio::spawn(async move {
        loop {
            tokio::time::sleep(Duration::from_secs(60 * 60)).await;
            limiter.cleanup();
        }
    });

    let app = create_router(state.clone());
    let listener = TcpListener::bind(state.settings.bind_addr).await?;
    info!(addr = %state.settings.bind_addr, "listening");

    axum::serve(listener, app).await?;

    Ok(())
}

fn init_tracing(default_level: &str) {
    // RUST_LOG wins over the configured level
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}

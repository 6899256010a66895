use std::sync::Arc;

use crate::config::Config;
use commissions_core::proposals::{ProposalService, ProposalServiceTrait};
use commissions_storage_sqlite::{db, proposals::ProposalRepository};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

pub struct AppState {
    pub proposal_service: Arc<dyn ProposalServiceTrait + Send + Sync>,
}

pub fn init_tracing() {
    let log_format = std::env::var("CM_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_current_span(false))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .init();
    }
}

pub async fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    let db_path = db::init(&config.db_path)?;
    tracing::info!("Database path in use: {}", db_path);

    let pool = db::create_pool(&db_path)?;
    db::run_migrations(&pool)?;
    let writer = db::spawn_writer(pool.as_ref().clone());

    let proposal_repository = Arc::new(ProposalRepository::new(pool.clone(), writer));
    let proposal_service: Arc<dyn ProposalServiceTrait + Send + Sync> =
        Arc::new(ProposalService::new(proposal_repository));

    if config.seed_sample_data {
        proposal_service.seed_sample_proposals().await?;
    }

    Ok(Arc::new(AppState { proposal_service }))
}

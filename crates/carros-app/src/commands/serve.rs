//! carros serve command

use std::path::{Path, PathBuf};
use std::sync::Arc;

use carros_adapter::controller::server::{bind_tcp, serve_stdio, serve_tcp};
use carros_adapter::{CarsEndpoint, InMemoryCarRepository};
use carros_usecase::CarRegistrationService;
use clap::Args;
use shared::{ServiceConfig, DEFAULT_CONFIG_FILE};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Args)]
pub struct ServeCommand {
    /// Configuration file (defaults to ./carros.json when present)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Serve over TCP on this address instead of the configured transport
    #[arg(long)]
    pub bind: Option<String>,
}

impl ServeCommand {
    /// Resolve the effective configuration: file, then `--bind` override
    pub fn load_config(&self) -> anyhow::Result<ServiceConfig> {
        self.load_config_from(Path::new(DEFAULT_CONFIG_FILE))
    }

    fn load_config_from(&self, default_path: &Path) -> anyhow::Result<ServiceConfig> {
        let config = match &self.config {
            Some(path) => ServiceConfig::from_file(path)?,
            None if default_path.exists() => ServiceConfig::from_file(default_path)?,
            None => ServiceConfig::default(),
        };

        let config = match &self.bind {
            Some(bind) => config.with_bind(bind.clone()),
            None => config,
        };
        config.validate()?;
        if let Some(filter) = &config.log_filter {
            EnvFilter::try_new(filter)
                .map_err(|e| anyhow::anyhow!("invalid logFilter '{}': {}", filter, e))?;
        }
        Ok(config)
    }

    pub async fn run(&self, config: ServiceConfig) -> anyhow::Result<()> {
        let repository = InMemoryCarRepository::new();
        let service = Arc::new(CarRegistrationService::new(repository));
        let endpoint = CarsEndpoint::new(service);

        match config.tcp_addr()? {
            None => serve_stdio(endpoint).await?,
            Some(addr) => {
                let listener = bind_tcp(addr).await?;
                serve_tcp(endpoint, listener, shutdown_signal()).await?;
            }
        }

        info!("Carros stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_err() {
        // No signal handler available; run until killed.
        std::future::pending::<()>().await;
    }
}

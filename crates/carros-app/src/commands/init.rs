//! carros init command

use std::path::PathBuf;

use clap::Args;
use shared::{ServiceConfig, DEFAULT_BIND, DEFAULT_CONFIG_FILE};
use tracing::info;

#[derive(Debug, Args)]
pub struct InitCommand {
    /// Directory to initialize
    #[arg(default_value = ".")]
    pub directory: PathBuf,

    /// Configure the TCP transport instead of stdio
    #[arg(long)]
    pub tcp: bool,

    /// Overwrite an existing carros.json
    #[arg(long)]
    pub force: bool,
}

impl InitCommand {
    pub fn run(&self) -> anyhow::Result<()> {
        std::fs::create_dir_all(&self.directory)?;

        let path = self.directory.join(DEFAULT_CONFIG_FILE);
        if path.exists() && !self.force {
            anyhow::bail!("{} already exists (use --force to overwrite)", path.display());
        }

        let mut config = ServiceConfig {
            log_filter: Some("info".to_string()),
            ..Default::default()
        };
        if self.tcp {
            config = config.with_bind(DEFAULT_BIND);
        }
        config.write_to(&path)?;

        info!(path = %path.display(), "Wrote configuration");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::TransportConfig;

    fn command(directory: PathBuf, tcp: bool, force: bool) -> InitCommand {
        InitCommand {
            directory,
            tcp,
            force,
        }
    }

    #[test]
    fn test_writes_stdio_config() {
        let dir = tempfile::tempdir().unwrap();

        command(dir.path().to_path_buf(), false, false).run().unwrap();

        let config = ServiceConfig::from_file(&dir.path().join(DEFAULT_CONFIG_FILE)).unwrap();
        assert_eq!(config.transport, TransportConfig::Stdio);
        assert_eq!(config.log_filter.as_deref(), Some("info"));
    }

    #[test]
    fn test_writes_tcp_config_in_new_directory() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("nested").join("service");

        command(target.clone(), true, false).run().unwrap();

        let config = ServiceConfig::from_file(&target.join(DEFAULT_CONFIG_FILE)).unwrap();
        assert_eq!(
            config.transport,
            TransportConfig::Tcp {
                bind: DEFAULT_BIND.to_string()
            }
        );
    }

    #[test]
    fn test_refuses_to_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        command(dir.path().to_path_buf(), false, false).run().unwrap();

        let err = command(dir.path().to_path_buf(), true, false).run().unwrap_err();
        assert!(err.to_string().contains("already exists"));

        command(dir.path().to_path_buf(), true, true).run().unwrap();
        let config = ServiceConfig::from_file(&dir.path().join(DEFAULT_CONFIG_FILE)).unwrap();
        assert!(config.tcp_addr().unwrap().is_some());
    }
}

use async_trait::async_trait;
use dnscoord_application::ports::ConfigurationSource;
use dnscoord_domain::{ClusterConfig, ClusterError};
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::{Duration, SystemTime};
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

const POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Configuration from a TOML file, re-checked on a five-second poll.
///
/// A change in the file's modification time or size bumps the watch channel;
/// subscribers re-read via `snapshot`. The poller never parses the file
/// itself, so a half-written file only fails the reload that reads it.
pub struct TomlConfigurationSource {
    path: PathBuf,
    poll_interval: Duration,
    generation: watch::Sender<u64>,
    token: Mutex<Option<CancellationToken>>,
}

impl TomlConfigurationSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let (generation, _) = watch::channel(0);
        Self {
            path: path.into(),
            poll_interval: POLL_INTERVAL,
            generation,
            token: Mutex::new(None),
        }
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }

    fn fingerprint(&self) -> Option<(SystemTime, u64)> {
        let metadata = std::fs::metadata(&self.path).ok()?;
        let modified = metadata.modified().ok()?;
        Some((modified, metadata.len()))
    }
}

#[async_trait]
impl ConfigurationSource for TomlConfigurationSource {
    async fn start(&self) -> Result<(), ClusterError> {
        let token = CancellationToken::new();
        {
            let mut guard = self.token.lock().unwrap_or_else(|e| e.into_inner());
            if let Some(previous) = guard.take() {
                previous.cancel();
            }
            *guard = Some(token.clone());
        }

        info!(path = %self.path.display(), "watching configuration file");

        let path = self.path.clone();
        let poll_interval = self.poll_interval;
        let generation = self.generation.clone();
        let initial = self.fingerprint();

        tokio::spawn(async move {
            let mut fingerprint = initial;
            let mut interval = tokio::time::interval(poll_interval);
            interval.tick().await;
            loop {
                tokio::select! {
                    _ = token.cancelled() => break,
                    _ = interval.tick() => {}
                }

                let current = match std::fs::metadata(&path) {
                    Ok(metadata) => match metadata.modified() {
                        Ok(modified) => Some((modified, metadata.len())),
                        Err(e) => {
                            warn!(error = %e, "cannot read configuration mtime");
                            continue;
                        }
                    },
                    Err(e) => {
                        warn!(path = %path.display(), error = %e, "cannot stat configuration file");
                        continue;
                    }
                };

                if current != fingerprint {
                    fingerprint = current;
                    debug!(path = %path.display(), "configuration file changed");
                    generation.send_modify(|g| *g += 1);
                }
            }
        });

        Ok(())
    }

    async fn stop(&self) {
        let mut guard = self.token.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(token) = guard.take() {
            token.cancel();
        }
    }

    fn snapshot(&self) -> Result<ClusterConfig, ClusterError> {
        ClusterConfig::load(&self.path)
    }

    fn changes(&self) -> watch::Receiver<u64> {
        self.generation.subscribe()
    }
}

//! Server management - spawning and health checking the application server

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::process::{Child, Command, Stdio};
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tokio::time::sleep;
use tracing::{info, warn};

use crate::error::{E2eError, E2eResult};

/// Handle to a running server process
pub struct ServerHandle {
    child: Child,
    pub base_url: String,
    pub port: u16,
}

impl ServerHandle {
    /// Spawn the Phoenix server and wait until it answers
    pub async fn spawn(config: ServerConfig) -> E2eResult<Self> {
        let port = match config.port {
            Some(port) => port,
            None => find_free_port()?,
        };
        let base_url = format!("http://127.0.0.1:{}", port);

        info!("Spawning `{} {}` on port {}", config.command, config.args.join(" "), port);

        let mut cmd = Command::new(&config.command);
        cmd.args(&config.args)
            .env("PORT", port.to_string())
            .envs(&config.env)
            .stdout(Stdio::null())
            .stderr(Stdio::inherit());

        if let Some(dir) = &config.working_dir {
            cmd.current_dir(dir);
        }

        let child = cmd.spawn().map_err(|e| {
            E2eError::ServerStartup(format!("Failed to spawn {}: {}", config.command, e))
        })?;

        let handle = ServerHandle {
            child,
            base_url: base_url.clone(),
            port,
        };

        wait_for_healthy(&base_url, &config.health_path, config.startup_timeout()).await?;

        info!("Server is healthy at {}", base_url);
        Ok(handle)
    }

    /// Get the base URL for this server
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Stop the server
    pub fn stop(&mut self) -> E2eResult<()> {
        if let Ok(Some(_)) = self.child.try_wait() {
            return Ok(());
        }

        info!("Stopping server (pid: {})", self.child.id());

        // SIGTERM first so the BEAM can shut down cleanly
        #[cfg(unix)]
        {
            use nix::sys::signal::{kill, Signal};
            use nix::unistd::Pid;

            let pid = Pid::from_raw(self.child.id() as i32);
            if kill(pid, Signal::SIGTERM).is_ok() {
                std::thread::sleep(Duration::from_millis(500));
            }
        }

        let _ = self.child.kill();
        let _ = self.child.wait();

        Ok(())
    }
}

impl Drop for ServerHandle {
    fn drop(&mut self) {
        let _ = self.stop();
    }
}

/// Poll `GET {base_url}{health_path}` until it succeeds or `timeout` passes
pub async fn wait_for_healthy(base_url: &str, health_path: &str, timeout: Duration) -> E2eResult<()> {
    let health_url = format!("{}{}", base_url.trim_end_matches('/'), health_path);
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(2))
        .build()?;

    let start = Instant::now();
    let mut attempts = 0;

    while start.elapsed() < timeout {
        attempts += 1;

        match client.get(&health_url).send().await {
            Ok(resp) if resp.status().is_success() => {
                return Ok(());
            }
            Ok(resp) => {
                warn!("Health check returned {}", resp.status());
            }
            Err(e) => {
                if attempts == 1 {
                    info!("Waiting for server at {}...", health_url);
                }
                // Connection refused is expected while the server boots
                if !e.is_connect() {
                    warn!("Health check error: {}", e);
                }
            }
        }

        sleep(Duration::from_millis(250)).await;
    }

    Err(E2eError::ServerHealthCheck(attempts))
}

/// Configuration for spawning a server
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Program to run
    pub command: String,

    /// Arguments to the program
    pub args: Vec<String>,

    /// Directory of the Phoenix project
    pub working_dir: Option<PathBuf>,

    /// Port to listen on, exported as PORT (None = find a free port)
    pub port: Option<u16>,

    /// Extra environment variables
    pub env: BTreeMap<String, String>,

    /// Path polled until it answers with a success status
    pub health_path: String,

    /// Timeout for server startup
    pub startup_timeout_ms: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            command: "mix".to_string(),
            args: vec!["phx.server".to_string()],
            working_dir: None,
            port: None,
            env: BTreeMap::new(),
            health_path: "/".to_string(),
            startup_timeout_ms: 60_000,
        }
    }
}

impl ServerConfig {
    pub fn startup_timeout(&self) -> Duration {
        Duration::from_millis(self.startup_timeout_ms)
    }
}

/// Find a free port to use
fn find_free_port() -> E2eResult<u16> {
    use std::net::TcpListener;

    let listener = TcpListener::bind("127.0.0.1:0")?;
    Ok(listener.local_addr()?.port())
}

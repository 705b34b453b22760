//! Playwright browser automation
//!
//! [`PlaywrightDriver`] launches one Node process per session running the
//! bridge script in `bridge.js`, then exchanges newline-delimited JSON with
//! it. Commands are serialized through a single mutex so replies always pair
//! with the request that produced them.

use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines};
use tokio::process::{Child, ChildStdin, ChildStdout, Command as TokioCommand};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::driver::{Driver, LoadState, WaitState};
use crate::error::{E2eError, E2eResult};
use crate::locator::Locator;

const BRIDGE_BODY: &str = include_str!("bridge.js");

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Browser {
    #[default]
    Chromium,
    Firefox,
    Webkit,
}

impl Browser {
    pub fn as_str(&self) -> &'static str {
        match self {
            Browser::Chromium => "chromium",
            Browser::Firefox => "firefox",
            Browser::Webkit => "webkit",
        }
    }
}

/// Configuration for Playwright
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaywrightConfig {
    pub base_url: String,
    pub browser: Browser,
    pub headless: bool,
    pub viewport_width: u32,
    pub viewport_height: u32,

    /// Node executable used to run the bridge
    pub node_binary: PathBuf,

    /// Directory with the `playwright` package (exported as NODE_PATH)
    pub node_modules_dir: Option<PathBuf>,

    /// Bound on browser startup
    pub launch_timeout_ms: u64,
}

impl Default for PlaywrightConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:4000".to_string(),
            browser: Browser::Chromium,
            headless: true,
            viewport_width: 1280,
            viewport_height: 720,
            node_binary: PathBuf::from("node"),
            node_modules_dir: None,
            launch_timeout_ms: 30_000,
        }
    }
}

/// One bridge request; `op` is the tag the script switches on
#[derive(Debug, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
enum BridgeCommand<'a> {
    Goto {
        path: &'a str,
        timeout_ms: u64,
    },
    Click {
        locator: &'a Locator,
        timeout_ms: u64,
    },
    PressSequentially {
        locator: &'a Locator,
        text: &'a str,
        delay_ms: u64,
        timeout_ms: u64,
    },
    Clear {
        locator: &'a Locator,
        timeout_ms: u64,
    },
    WaitFor {
        locator: &'a Locator,
        state: WaitState,
        timeout_ms: u64,
    },
    WaitForUrl {
        path: &'a str,
        timeout_ms: u64,
    },
    WaitForFunction {
        expression: &'a str,
        timeout_ms: u64,
    },
    WaitForLoadState {
        state: LoadState,
        timeout_ms: u64,
    },
    TextContent {
        locator: &'a Locator,
        timeout_ms: u64,
    },
    GetAttribute {
        locator: &'a Locator,
        name: &'a str,
        timeout_ms: u64,
    },
    InputValue {
        locator: &'a Locator,
        timeout_ms: u64,
    },
    Count {
        locator: &'a Locator,
    },
    Close,
}

impl BridgeCommand<'_> {
    /// Short description for logs and errors
    fn describe(&self) -> String {
        match self {
            BridgeCommand::Goto { path, .. } => format!("goto:{}", path),
            BridgeCommand::Click { locator, .. } => format!("click:{}", locator),
            BridgeCommand::PressSequentially { locator, .. } => format!("type:{}", locator),
            BridgeCommand::Clear { locator, .. } => format!("clear:{}", locator),
            BridgeCommand::WaitFor { locator, state, .. } => format!("wait:{:?}:{}", state, locator),
            BridgeCommand::WaitForUrl { path, .. } => format!("wait_url:{}", path),
            BridgeCommand::WaitForFunction { expression, .. } => {
                format!("wait_fn:{}", expression.chars().take(40).collect::<String>())
            }
            BridgeCommand::WaitForLoadState { state, .. } => format!("wait_load:{:?}", state),
            BridgeCommand::TextContent { locator, .. } => format!("text:{}", locator),
            BridgeCommand::GetAttribute { locator, name, .. } => format!("attr:{}:{}", name, locator),
            BridgeCommand::InputValue { locator, .. } => format!("value:{}", locator),
            BridgeCommand::Count { locator } => format!("count:{}", locator),
            BridgeCommand::Close => "close".to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct Response {
    id: u64,
    ok: bool,
    #[serde(default)]
    value: Value,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    kind: Option<String>,
}

struct BridgeIo {
    stdin: ChildStdin,
    stdout: Lines<BufReader<ChildStdout>>,
}

impl BridgeIo {
    async fn read_response(&mut self) -> E2eResult<Response> {
        loop {
            let line = self.stdout.next_line().await?.ok_or_else(|| {
                E2eError::Playwright("bridge process closed its output".to_string())
            })?;

            if line.trim().is_empty() {
                continue;
            }

            return Ok(serde_json::from_str(&line)?);
        }
    }
}

/// Playwright browser session
pub struct PlaywrightDriver {
    child: Child,
    io: Mutex<BridgeIo>,
    next_id: AtomicU64,

    // Holds the bridge script for the lifetime of the process
    _script_dir: tempfile::TempDir,
}

impl PlaywrightDriver {
    /// Launch a browser and wait until the bridge reports ready
    pub async fn launch(config: PlaywrightConfig) -> E2eResult<Self> {
        Self::check_playwright_installed()?;

        let script_dir = tempfile::tempdir()?;
        let script_path = script_dir.path().join("bridge.js");
        std::fs::write(&script_path, Self::build_script(&config)?)?;

        info!(
            "Launching {} (headless: {}) against {}",
            config.browser.as_str(),
            config.headless,
            config.base_url
        );

        let mut cmd = TokioCommand::new(&config.node_binary);
        cmd.arg(&script_path)
            .current_dir(script_dir.path())
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .kill_on_drop(true);

        if let Some(modules) = &config.node_modules_dir {
            cmd.env("NODE_PATH", modules);
        }

        let mut child = cmd.spawn().map_err(|e| {
            E2eError::Playwright(format!(
                "Failed to spawn {}: {}",
                config.node_binary.display(),
                e
            ))
        })?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| E2eError::Playwright("bridge stdin unavailable".to_string()))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| E2eError::Playwright("bridge stdout unavailable".to_string()))?;

        let mut io = BridgeIo {
            stdin,
            stdout: BufReader::new(stdout).lines(),
        };

        let launch_timeout = Duration::from_millis(config.launch_timeout_ms);
        let ready = tokio::time::timeout(launch_timeout, io.read_response())
            .await
            .map_err(|_| E2eError::Timeout("browser launch".to_string()))??;

        if !ready.ok {
            return Err(E2eError::Playwright(
                ready.error.unwrap_or_else(|| "bridge failed to start".to_string()),
            ));
        }

        debug!("Bridge ready");

        Ok(Self {
            child,
            io: Mutex::new(io),
            next_id: AtomicU64::new(1),
            _script_dir: script_dir,
        })
    }

    /// Check if Playwright is installed
    fn check_playwright_installed() -> E2eResult<()> {
        let output = Command::new("npx")
            .args(["playwright", "--version"])
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status();

        match output {
            Ok(status) if status.success() => Ok(()),
            _ => Err(E2eError::PlaywrightNotFound),
        }
    }

    /// Bridge script with the session config inlined
    pub fn build_script(config: &PlaywrightConfig) -> E2eResult<String> {
        let header = serde_json::json!({
            "base_url": config.base_url,
            "browser": config.browser.as_str(),
            "headless": config.headless,
            "viewport_width": config.viewport_width,
            "viewport_height": config.viewport_height,
        });

        Ok(format!(
            "const config = {};\n{}",
            serde_json::to_string(&header)?,
            BRIDGE_BODY
        ))
    }

    async fn send(&self, command: BridgeCommand<'_>) -> E2eResult<Value> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let name = command.describe();

        let mut payload = serde_json::to_value(&command)?;
        if let Value::Object(fields) = &mut payload {
            fields.insert("id".to_string(), Value::from(id));
        }
        let mut line = serde_json::to_string(&payload)?;
        line.push('\n');

        debug!("[{}] {}", id, name);

        let mut io = self.io.lock().await;
        io.stdin.write_all(line.as_bytes()).await?;
        io.stdin.flush().await?;

        let response = loop {
            let response = io.read_response().await?;
            if response.id == id {
                break response;
            }
            warn!("Discarding stale bridge reply {} (waiting for {})", response.id, id);
        };

        if response.ok {
            return Ok(response.value);
        }

        let reason = response.error.unwrap_or_else(|| "unknown error".to_string());
        match response.kind.as_deref() {
            Some("timeout") => Err(E2eError::Timeout(format!("{} - {}", name, reason))),
            _ => Err(E2eError::Playwright(format!("{} - {}", name, reason))),
        }
    }

    /// Close the browser and wait for the bridge to exit
    pub async fn close(mut self) -> E2eResult<()> {
        self.send(BridgeCommand::Close).await?;
        let status = self.child.wait().await?;
        debug!("Bridge exited with {}", status);
        Ok(())
    }
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

fn optional_string(value: Value, what: &str) -> E2eResult<Option<String>> {
    match value {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s)),
        other => Err(E2eError::Playwright(format!(
            "{}: expected a string, got {}",
            what, other
        ))),
    }
}

#[async_trait]
impl Driver for PlaywrightDriver {
    async fn goto(&self, path: &str, timeout: Duration) -> E2eResult<()> {
        self.send(BridgeCommand::Goto {
            path,
            timeout_ms: millis(timeout),
        })
        .await
        .map(drop)
    }

    async fn click(&self, locator: &Locator, timeout: Duration) -> E2eResult<()> {
        self.send(BridgeCommand::Click {
            locator,
            timeout_ms: millis(timeout),
        })
        .await
        .map(drop)
    }

    async fn press_sequentially(
        &self,
        locator: &Locator,
        text: &str,
        delay: Duration,
        timeout: Duration,
    ) -> E2eResult<()> {
        self.send(BridgeCommand::PressSequentially {
            locator,
            text,
            delay_ms: millis(delay),
            timeout_ms: millis(timeout),
        })
        .await
        .map(drop)
    }

    async fn clear(&self, locator: &Locator, timeout: Duration) -> E2eResult<()> {
        self.send(BridgeCommand::Clear {
            locator,
            timeout_ms: millis(timeout),
        })
        .await
        .map(drop)
    }

    async fn wait_for(&self, locator: &Locator, state: WaitState, timeout: Duration) -> E2eResult<()> {
        self.send(BridgeCommand::WaitFor {
            locator,
            state,
            timeout_ms: millis(timeout),
        })
        .await
        .map(drop)
    }

    async fn wait_for_url(&self, path: &str, timeout: Duration) -> E2eResult<()> {
        self.send(BridgeCommand::WaitForUrl {
            path,
            timeout_ms: millis(timeout),
        })
        .await
        .map(drop)
    }

    async fn wait_for_function(&self, expression: &str, timeout: Duration) -> E2eResult<()> {
        self.send(BridgeCommand::WaitForFunction {
            expression,
            timeout_ms: millis(timeout),
        })
        .await
        .map(drop)
    }

    async fn wait_for_load_state(&self, state: LoadState, timeout: Duration) -> E2eResult<()> {
        self.send(BridgeCommand::WaitForLoadState {
            state,
            timeout_ms: millis(timeout),
        })
        .await
        .map(drop)
    }

    async fn text_content(&self, locator: &Locator, timeout: Duration) -> E2eResult<Option<String>> {
        let value = self
            .send(BridgeCommand::TextContent {
                locator,
                timeout_ms: millis(timeout),
            })
            .await?;
        optional_string(value, "textContent")
    }

    async fn get_attribute(
        &self,
        locator: &Locator,
        name: &str,
        timeout: Duration,
    ) -> E2eResult<Option<String>> {
        let value = self
            .send(BridgeCommand::GetAttribute {
                locator,
                name,
                timeout_ms: millis(timeout),
            })
            .await?;
        optional_string(value, "getAttribute")
    }

    async fn input_value(&self, locator: &Locator, timeout: Duration) -> E2eResult<String> {
        let value = self
            .send(BridgeCommand::InputValue {
                locator,
                timeout_ms: millis(timeout),
            })
            .await?;
        Ok(optional_string(value, "inputValue")?.unwrap_or_default())
    }

    async fn count(&self, locator: &Locator) -> E2eResult<usize> {
        let value = self.send(BridgeCommand::Count { locator }).await?;
        value
            .as_u64()
            .map(|n| n as usize)
            .ok_or_else(|| E2eError::Playwright(format!("count: expected a number, got {}", value)))
    }
}

//! Journey runner
//!
//! A journey is an ordered list of named steps against one browser session.
//! Steps run strictly in sequence; the first failure ends the journey and
//! every later step is skipped. Results are kept per step and can be written
//! out as JSON next to the other test artifacts.

use std::fmt::Debug;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::error::{E2eError, E2eResult};

/// Result of executing a journey step
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepResult {
    pub step_name: String,
    pub success: bool,
    pub duration_ms: u64,
    pub error: Option<String>,
}

/// Result of running a whole journey
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JourneyResult {
    pub name: String,
    pub success: bool,
    pub started_at: DateTime<Utc>,
    pub duration_ms: u64,
    pub steps: Vec<StepResult>,
    pub error: Option<String>,
}

pub struct Journey {
    name: String,
    started_at: DateTime<Utc>,
    start: Instant,
    steps: Vec<StepResult>,
}

impl Journey {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        info!("Starting journey: {}", name);
        Self {
            name,
            started_at: Utc::now(),
            start: Instant::now(),
            steps: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Run one named step
    ///
    /// A failing step is recorded and its error is returned wrapped in
    /// [`E2eError::StepFailed`], so `?` ends the journey right there.
    pub async fn step<T, F>(&mut self, name: &str, step: F) -> E2eResult<T>
    where
        F: Future<Output = E2eResult<T>>,
    {
        if let Some(failed) = self.steps.iter().find(|s| !s.success) {
            return Err(E2eError::StepFailed {
                step: name.to_string(),
                reason: format!("skipped after '{}' failed", failed.step_name),
            });
        }

        let start = Instant::now();
        let outcome = step.await;
        let duration_ms = start.elapsed().as_millis() as u64;

        match outcome {
            Ok(value) => {
                info!("✓ {} ({} ms)", name, duration_ms);
                self.steps.push(StepResult {
                    step_name: name.to_string(),
                    success: true,
                    duration_ms,
                    error: None,
                });
                Ok(value)
            }
            Err(e) => {
                error!("✗ {} - {}", name, e);
                self.steps.push(StepResult {
                    step_name: name.to_string(),
                    success: false,
                    duration_ms,
                    error: Some(e.to_string()),
                });
                Err(E2eError::StepFailed {
                    step: name.to_string(),
                    reason: e.to_string(),
                })
            }
        }
    }

    /// Close the journey, folding in the error that ended it (if any)
    pub fn finish(self, outcome: E2eResult<()>) -> JourneyResult {
        let duration_ms = self.start.elapsed().as_millis() as u64;
        let error = outcome.err().map(|e| e.to_string());
        let success = error.is_none() && self.steps.iter().all(|s| s.success);

        if success {
            info!("Journey '{}' passed ({} ms)", self.name, duration_ms);
        } else {
            error!(
                "Journey '{}' failed - {}",
                self.name,
                error.as_deref().unwrap_or("unknown error")
            );
        }

        JourneyResult {
            name: self.name,
            success,
            started_at: self.started_at,
            duration_ms,
            steps: self.steps,
            error,
        }
    }
}

/// Compare an observed value with the expected one
pub fn expect_eq<T>(what: &str, actual: T, expected: T) -> E2eResult<()>
where
    T: PartialEq + Debug,
{
    if actual == expected {
        Ok(())
    } else {
        Err(E2eError::AssertionFailed(format!(
            "{}: expected {:?}, got {:?}",
            what, expected, actual
        )))
    }
}

/// Write journey results to `<output_dir>/<name>.json`
pub fn write_results(output_dir: &Path, result: &JourneyResult) -> E2eResult<PathBuf> {
    std::fs::create_dir_all(output_dir)?;

    let file_name: String = result
        .name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
        .collect();
    let path = output_dir.join(format!("{}.json", file_name));
    let json = serde_json::to_string_pretty(result)?;
    std::fs::write(&path, json)?;

    info!("Results written to: {}", path.display());
    Ok(path)
}

//! In-memory rendering engine for exercising the pipeline without a browser.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use error_stack::Report;

use super::rendering::{RenderingEngine, RenderingError, RenderingSession};
use super::row_extractor::RowSnapshot;
use crate::script::TABLE_ROWS_SCRIPT;

#[derive(Debug, Default)]
pub struct SessionLog {
    pub launches: usize,
    pub navigations: Vec<String>,
    pub idle_waits: usize,
    pub waits: Vec<Duration>,
    pub evaluations: usize,
    pub closed: bool,
}

/// Serves one scripted snapshot per evaluation, repeating the last one when exhausted.
#[derive(Clone, Default)]
pub struct FakeEngine {
    snapshots: Arc<Vec<serde_json::Value>>,
    fail_launch: bool,
    fail_navigation: bool,
    fail_idle_waits: bool,
    /// 0-based evaluation indices that return a script error
    failing_evaluations: Arc<Vec<usize>>,
    log: Arc<Mutex<SessionLog>>,
}

/// A table row whose 4th cell holds `apy`.
pub fn label_row(name: &str, apy: &str) -> RowSnapshot {
    RowSnapshot {
        text: format!("{} {}", name, apy).trim().to_owned(),
        cells: vec![name.to_owned(), String::new(), String::new(), apy.to_owned()],
        descendants: vec![name.to_owned(), apy.to_owned()],
    }
}

impl FakeEngine {
    pub fn with_attempts(attempts: Vec<Vec<RowSnapshot>>) -> Self {
        let snapshots = attempts
            .into_iter()
            .map(|rows| {
                serde_json::Value::Array(
                    rows.into_iter()
                        .map(|row| {
                            serde_json::json!({
                                "text": row.text,
                                "cells": row.cells,
                                "descendants": row.descendants,
                            })
                        })
                        .collect(),
                )
            })
            .collect();
        Self::with_raw_attempts(snapshots)
    }

    pub fn with_raw_attempts(snapshots: Vec<serde_json::Value>) -> Self {
        Self {
            snapshots: Arc::new(snapshots),
            ..Self::default()
        }
    }

    pub fn failing_launch() -> Self {
        Self {
            fail_launch: true,
            ..Self::default()
        }
    }

    pub fn failing_navigation() -> Self {
        Self {
            fail_navigation: true,
            ..Self::default()
        }
    }

    /// Every network-idle wait reports an error.
    pub fn with_failing_idle_waits(mut self) -> Self {
        self.fail_idle_waits = true;
        self
    }

    /// The listed evaluations (0-based) fail instead of returning a snapshot.
    pub fn with_failing_evaluations(mut self, evaluations: Vec<usize>) -> Self {
        self.failing_evaluations = Arc::new(evaluations);
        self
    }

    pub fn log(&self) -> MutexGuard<'_, SessionLog> {
        self.log.lock().unwrap()
    }
}

pub struct FakeSession {
    engine: FakeEngine,
}

#[async_trait::async_trait]
impl RenderingEngine for FakeEngine {
    type Session = FakeSession;

    async fn launch(&self) -> error_stack::Result<FakeSession, RenderingError> {
        if self.fail_launch {
            return Err(Report::new(RenderingError::Launch));
        }
        self.log().launches += 1;
        Ok(FakeSession {
            engine: self.clone(),
        })
    }
}

#[async_trait::async_trait]
impl RenderingSession for FakeSession {
    async fn navigate(
        &mut self,
        url: &str,
        _timeout: Duration,
    ) -> error_stack::Result<(), RenderingError> {
        self.engine.log().navigations.push(url.to_owned());
        if self.engine.fail_navigation {
            return Err(Report::new(RenderingError::Navigation {
                url: url.to_owned(),
            }));
        }
        Ok(())
    }

    async fn wait_for_network_idle(
        &mut self,
        _timeout: Duration,
    ) -> error_stack::Result<(), RenderingError> {
        self.engine.log().idle_waits += 1;
        if self.engine.fail_idle_waits {
            return Err(Report::new(RenderingError::Script));
        }
        Ok(())
    }

    async fn wait(&mut self, duration: Duration) {
        self.engine.log().waits.push(duration);
    }

    async fn evaluate(
        &mut self,
        script: &str,
    ) -> error_stack::Result<serde_json::Value, RenderingError> {
        if script != TABLE_ROWS_SCRIPT {
            return Err(Report::new(RenderingError::Script));
        }

        let index = {
            let mut log = self.engine.log();
            log.evaluations += 1;
            log.evaluations - 1
        };

        if self.engine.failing_evaluations.contains(&index) {
            return Err(Report::new(RenderingError::Script));
        }

        Ok(self
            .engine
            .snapshots
            .get(index)
            .or_else(|| self.engine.snapshots.last())
            .cloned()
            .unwrap_or_else(|| serde_json::json!([])))
    }

    async fn close(self) -> error_stack::Result<(), RenderingError> {
        self.engine.log().closed = true;
        Ok(())
    }
}

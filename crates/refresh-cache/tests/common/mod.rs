//! Common test utilities for refresh-cache tests
//!
//! Provides a scripted provider whose fetches:
//! - Return a queued sequence of results
//! - Can hang forever to simulate a stuck upstream
//! - Can be held at a gate until the test releases them

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use passport_common::{ConfigError, FetchError};
use refresh_cache::Provider;
use tokio::sync::Semaphore;

/// One scripted fetch result.
pub enum Step<T> {
    Ok(T),
    Err(FetchError),
    Hang,
}

struct Inner<T> {
    steps: Mutex<VecDeque<Step<T>>>,
    calls: AtomicUsize,
    gate: Option<Semaphore>,
}

/// Provider replaying a fixed script. Clones share the script and counters.
pub struct Scripted<T> {
    inner: Arc<Inner<T>>,
}

impl<T> Clone for Scripted<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T> Scripted<T> {
    pub fn new(steps: Vec<Step<T>>) -> Self {
        Self::build(steps, None)
    }

    /// Every fetch waits for a permit from [`Scripted::release`].
    pub fn gated(steps: Vec<Step<T>>) -> Self {
        Self::build(steps, Some(Semaphore::new(0)))
    }

    fn build(steps: Vec<Step<T>>, gate: Option<Semaphore>) -> Self {
        Self {
            inner: Arc::new(Inner {
                steps: Mutex::new(steps.into()),
                calls: AtomicUsize::new(0),
                gate,
            }),
        }
    }

    /// Number of fetches started so far.
    pub fn calls(&self) -> usize {
        self.inner.calls.load(Ordering::SeqCst)
    }

    pub fn release(&self, permits: usize) {
        if let Some(gate) = &self.inner.gate {
            gate.add_permits(permits);
        }
    }

    /// Poll until `n` fetches have started, panicking after two seconds.
    pub async fn wait_for_calls(&self, n: usize) {
        tokio::time::timeout(Duration::from_secs(2), async {
            while self.calls() < n {
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await
        .unwrap_or_else(|_| panic!("expected {} fetches, saw {}", n, self.calls()));
    }
}

#[async_trait]
impl<T> Provider for Scripted<T>
where
    T: Clone + Default + Send + Sync + 'static,
{
    type Output = T;

    fn name(&self) -> &str {
        "scripted"
    }

    fn validate(&self) -> Result<(), ConfigError> {
        Ok(())
    }

    async fn fetch(&self) -> Result<T, FetchError> {
        self.inner.calls.fetch_add(1, Ordering::SeqCst);

        if let Some(gate) = &self.inner.gate {
            gate.acquire().await.expect("gate closed").forget();
        }

        let step = self.inner.steps.lock().unwrap().pop_front();
        match step {
            Some(Step::Ok(value)) => Ok(value),
            Some(Step::Err(e)) => Err(e),
            Some(Step::Hang) => std::future::pending().await,
            None => Err(FetchError::Transport("script exhausted".to_string())),
        }
    }
}

pub fn provider_error() -> FetchError {
    FetchError::Provider {
        code: Some(401),
        message: "Invalid API key".to_string(),
    }
}

pub fn transport_error() -> FetchError {
    FetchError::Transport("connection refused".to_string())
}

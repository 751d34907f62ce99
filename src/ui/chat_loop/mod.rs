//! Main chat event loop and terminal lifecycle.
//!
//! The loop owns the only [`App`]; key events, backend results and stream
//! progress all reach it as [`crate::core::app::AppAction`]s.

mod event_loop;
pub mod executors;
pub mod keybindings;
mod lifecycle;

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::core::app::App;

pub use event_loop::run_chat;

/// Shared access to the app state for the loop and its helpers.
#[derive(Clone)]
pub struct AppHandle {
    inner: Arc<Mutex<App>>,
}

impl AppHandle {
    pub fn new(inner: Arc<Mutex<App>>) -> Self {
        Self { inner }
    }

    pub async fn read<R>(&self, f: impl FnOnce(&App) -> R) -> R {
        let guard = self.inner.lock().await;
        f(&guard)
    }

    pub async fn update<R>(&self, f: impl FnOnce(&mut App) -> R) -> R {
        let mut guard = self.inner.lock().await;
        f(&mut guard)
    }
}

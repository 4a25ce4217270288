//! Shared fakes for integration tests.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use portal_guard::config::GuardConfig;
use portal_guard::guard::MemoryLoginErrorStore;
use portal_guard::{Navigator, RouteGuard};

/// In-memory browser router.
///
/// With `follow` unset it records SPA navigations without moving, like a
/// router that silently drops `navigate` during an auth transition.
#[derive(Default)]
pub struct RecordingNavigator {
    pub location: Mutex<String>,
    pub follow: bool,
    pub navigations: Mutex<Vec<String>>,
    pub replaces: Mutex<Vec<String>>,
}

impl RecordingNavigator {
    pub fn at(path: &str, follow: bool) -> Arc<Self> {
        Arc::new(Self {
            location: Mutex::new(path.to_string()),
            follow,
            ..Self::default()
        })
    }

    pub fn set_location(&self, path: &str) {
        *self.location.lock().unwrap() = path.to_string();
    }

    pub fn navigations(&self) -> Vec<String> {
        self.navigations.lock().unwrap().clone()
    }

    pub fn replaces(&self) -> Vec<String> {
        self.replaces.lock().unwrap().clone()
    }
}

impl Navigator for RecordingNavigator {
    fn current_path(&self) -> String {
        self.location.lock().unwrap().clone()
    }

    fn navigate(&self, path: &str) {
        self.navigations.lock().unwrap().push(path.to_string());
        if self.follow {
            self.set_location(path);
        }
    }

    fn hard_replace(&self, url: &str) {
        self.replaces.lock().unwrap().push(url.to_string());
    }
}

/// Guard over the default configuration with no recorded login failures.
pub fn default_guard(navigator: &Arc<RecordingNavigator>) -> RouteGuard {
    guard_with(&GuardConfig::default(), navigator, 0)
}

pub fn guard_with(config: &GuardConfig, navigator: &Arc<RecordingNavigator>, failures: u32) -> RouteGuard {
    RouteGuard::from_config(
        config,
        navigator.clone(),
        Arc::new(MemoryLoginErrorStore::new(failures)),
    )
}

use std::sync::RwLock;

use crate::ports::session::{SessionStore, UserAlert};

#[derive(Debug, Default, Clone)]
struct Credentials {
    access_token: Option<String>,
    current_user_id: Option<String>,
}

/// Session held in memory for the lifetime of the process.
#[derive(Debug, Default)]
pub struct InMemorySession {
    credentials: RwLock<Credentials>,
}

impl InMemorySession {
    pub fn new(access_token: Option<String>, current_user_id: Option<String>) -> Self {
        Self {
            credentials: RwLock::new(Credentials {
                access_token,
                current_user_id,
            }),
        }
    }

    fn read(&self) -> Credentials {
        self.credentials
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

impl SessionStore for InMemorySession {
    fn access_token(&self) -> Option<String> {
        self.read().access_token
    }

    fn current_user_id(&self) -> Option<String> {
        self.read().current_user_id
    }

    fn clean_access(&self) {
        tracing::info!("Clearing Spotify session");
        let mut credentials = self
            .credentials
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *credentials = Credentials::default();
    }
}

/// Prints alerts to stderr.
pub struct TerminalAlert;

impl UserAlert for TerminalAlert {
    fn alert(&self, message: &str) {
        eprintln!("{}", message);
    }
}

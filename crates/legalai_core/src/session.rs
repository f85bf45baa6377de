//! crates/legalai_core/src/session.rs
//!
//! The process-wide session store. Only this module mutates the session; every
//! other component reads it through [`SessionStore::current`].

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tracing::{info, warn};

use crate::domain::Session;
use crate::ports::{PortResult, SessionStorage};

/// Whether a session is known to exist.
///
/// `Unknown` lasts from process start until [`SessionStore::initialize`] has read
/// the persisted state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPresence {
    Unknown,
    Absent,
    Present,
}

#[derive(Debug, Clone)]
enum SessionSlot {
    Uninitialized,
    Loaded(Option<Session>),
}

pub struct SessionStore {
    storage: Arc<dyn SessionStorage>,
    slot: RwLock<SessionSlot>,
}

impl SessionStore {
    pub fn new(storage: Arc<dyn SessionStorage>) -> Self {
        Self {
            storage,
            slot: RwLock::new(SessionSlot::Uninitialized),
        }
    }

    /// Reads the persisted session into memory.
    ///
    /// A storage failure is logged and treated as "no session" so the portal keeps
    /// running memory-only.
    pub async fn initialize(&self) {
        let loaded = match self.storage.load().await {
            Ok(session) => session,
            Err(e) => {
                warn!("Could not read persisted session, continuing without one: {}", e);
                None
            }
        };
        if let Some(session) = &loaded {
            info!("Restored session for user {}", session.user_id);
        }
        *self.slot.write().await = SessionSlot::Loaded(loaded);
    }

    /// Stores `session` in memory and durably. Subsequent API calls carry its token.
    pub async fn login(&self, session: Session) {
        if let Err(e) = self.storage.save(&session).await {
            warn!("Session will not survive a restart: {}", e);
        }
        info!("User {} signed in", session.user_id);
        *self.slot.write().await = SessionSlot::Loaded(Some(session));
    }

    /// Clears the session in memory and durably. Subsequent API calls are unauthenticated.
    pub async fn logout(&self) {
        if let Err(e) = self.storage.clear().await {
            warn!("Could not remove persisted session: {}", e);
        }
        info!("Signed out");
        *self.slot.write().await = SessionSlot::Loaded(None);
    }

    /// The current session, `None` while absent or not yet initialized.
    pub async fn current(&self) -> Option<Session> {
        match &*self.slot.read().await {
            SessionSlot::Loaded(session) => session.clone(),
            SessionSlot::Uninitialized => None,
        }
    }

    pub async fn presence(&self) -> SessionPresence {
        match &*self.slot.read().await {
            SessionSlot::Uninitialized => SessionPresence::Unknown,
            SessionSlot::Loaded(None) => SessionPresence::Absent,
            SessionSlot::Loaded(Some(_)) => SessionPresence::Present,
        }
    }
}

//=========================================================================================
// In-memory storage
//=========================================================================================

/// Session storage that lives only as long as the process.
#[derive(Default)]
pub struct MemorySessionStorage {
    session: Mutex<Option<Session>>,
}

impl MemorySessionStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_session(session: Session) -> Self {
        Self {
            session: Mutex::new(Some(session)),
        }
    }
}

#[async_trait]
impl SessionStorage for MemorySessionStorage {
    async fn load(&self) -> PortResult<Option<Session>> {
        Ok(self.session.lock().await.clone())
    }

    async fn save(&self, session: &Session) -> PortResult<()> {
        *self.session.lock().await = Some(session.clone());
        Ok(())
    }

    async fn clear(&self) -> PortResult<()> {
        *self.session.lock().await = None;
        Ok(())
    }
}

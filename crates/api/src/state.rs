//! Shared handler state

use crate::auth::{ConfigTokenVerifier, TokenVerifier};
use pelilauta_engine::{Database, PelilautaConfig};
use pelilauta_primitives::{
    MetaStore, NotificationStore, PageStore, ProfileStore, ReactionStore, ReplyStore, SiteStore,
    TagIndex, ThreadStore,
};
use std::sync::Arc;

/// State handed to every handler
///
/// Facades are built per request; they only clone the database handle.
#[derive(Clone)]
pub struct AppState {
    db: Arc<Database>,
    verifier: Arc<dyn TokenVerifier>,
}

impl AppState {
    /// State with an explicit token verifier
    pub fn new(db: Arc<Database>, verifier: Arc<dyn TokenVerifier>) -> Self {
        Self { db, verifier }
    }

    /// State verifying tokens against the database configuration
    pub fn from_database(db: Arc<Database>) -> Self {
        let verifier = ConfigTokenVerifier::from_config(&db.config().auth);
        Self::new(db, Arc::new(verifier))
    }

    /// Database handle
    pub fn db(&self) -> &Arc<Database> {
        &self.db
    }

    /// Active configuration
    pub fn config(&self) -> &PelilautaConfig {
        self.db.config()
    }

    /// Token verifier
    pub fn verifier(&self) -> &dyn TokenVerifier {
        self.verifier.as_ref()
    }

    pub(crate) fn threads(&self) -> ThreadStore {
        ThreadStore::new(self.db.clone())
    }

    pub(crate) fn replies(&self) -> ReplyStore {
        ReplyStore::new(self.db.clone())
    }

    pub(crate) fn reactions(&self) -> ReactionStore {
        ReactionStore::new(self.db.clone())
    }

    pub(crate) fn sites(&self) -> SiteStore {
        SiteStore::new(self.db.clone())
    }

    pub(crate) fn pages(&self) -> PageStore {
        PageStore::new(self.db.clone())
    }

    pub(crate) fn profiles(&self) -> ProfileStore {
        ProfileStore::new(self.db.clone())
    }

    pub(crate) fn tags(&self) -> TagIndex {
        TagIndex::new(self.db.clone())
    }

    pub(crate) fn notifications(&self) -> NotificationStore {
        NotificationStore::new(self.db.clone())
    }

    pub(crate) fn meta(&self) -> MetaStore {
        MetaStore::new(self.db.clone())
    }
}

//! Hash engine wrapper that counts sessions

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use treehash_core::{HashEngine, StreamingHasher};

/// Delegates to a real engine and counts opened sessions
///
/// Used to check that oversized files are never hashed and that every
/// file gets its own session.
pub struct CountingEngine {
    inner: Arc<dyn HashEngine>,
    sessions: AtomicUsize,
}

impl CountingEngine {
    pub fn new(inner: Arc<dyn HashEngine>) -> Self {
        Self {
            inner,
            sessions: AtomicUsize::new(0),
        }
    }

    /// Sessions opened so far
    pub fn sessions(&self) -> usize {
        self.sessions.load(Ordering::SeqCst)
    }
}

impl HashEngine for CountingEngine {
    fn id(&self) -> &'static str {
        self.inner.id()
    }

    fn new_session(&self) -> Box<dyn StreamingHasher> {
        self.sessions.fetch_add(1, Ordering::SeqCst);
        self.inner.new_session()
    }

    fn digest_len(&self) -> usize {
        self.inner.digest_len()
    }
}

//! Core traits for the hash engine adapter

/// A shareable hashing capability
///
/// One engine is shared by every worker. Implementations must allow
/// any number of sessions to be open at once without cross-talk;
/// all per-file state lives in the [`StreamingHasher`] returned by
/// [`HashEngine::new_session`].
pub trait HashEngine: Send + Sync {
    /// Unique identifier for this algorithm
    fn id(&self) -> &'static str;

    /// Open a fresh hashing session
    fn new_session(&self) -> Box<dyn StreamingHasher>;

    /// Length of the rendered hex digest
    fn digest_len(&self) -> usize;

    /// Calculate hash for in-memory data
    fn hash_bytes(&self, data: &[u8]) -> String {
        let mut session = self.new_session();
        session.update(data);
        session.finalize()
    }
}

/// Trait for streaming hash calculation
pub trait StreamingHasher: Send {
    /// Update the hasher with new data
    fn update(&mut self, data: &[u8]);

    /// Finalize the hash calculation and return the lowercase hex digest
    fn finalize(self: Box<Self>) -> String;
}

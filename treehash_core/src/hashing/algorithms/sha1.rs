//! SHA-1 hash engine

use crate::hashing::traits::{HashEngine, StreamingHasher};
use sha1::{Digest, Sha1};

pub struct Sha1Engine;

struct Sha1StreamingHasher {
    hasher: Sha1,
}

impl StreamingHasher for Sha1StreamingHasher {
    fn update(&mut self, data: &[u8]) {
        Digest::update(&mut self.hasher, data);
    }

    fn finalize(self: Box<Self>) -> String {
        format!("{:x}", Digest::finalize(self.hasher))
    }
}

impl HashEngine for Sha1Engine {
    fn id(&self) -> &'static str {
        "sha1"
    }

    fn new_session(&self) -> Box<dyn StreamingHasher> {
        Box::new(Sha1StreamingHasher { hasher: Sha1::new() })
    }

    fn digest_len(&self) -> usize {
        40
    }
}

//! SHA-256 hash engine

use crate::hashing::traits::{HashEngine, StreamingHasher};
use sha2::{Digest, Sha256};

pub struct Sha256Engine;

struct Sha256StreamingHasher {
    hasher: Sha256,
}

impl StreamingHasher for Sha256StreamingHasher {
    fn update(&mut self, data: &[u8]) {
        Digest::update(&mut self.hasher, data);
    }

    fn finalize(self: Box<Self>) -> String {
        format!("{:x}", Digest::finalize(self.hasher))
    }
}

impl HashEngine for Sha256Engine {
    fn id(&self) -> &'static str {
        "sha256"
    }

    fn new_session(&self) -> Box<dyn StreamingHasher> {
        Box::new(Sha256StreamingHasher {
            hasher: Sha256::new(),
        })
    }

    fn digest_len(&self) -> usize {
        64
    }
}

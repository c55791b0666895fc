//! BLAKE3 hash engine

use crate::hashing::traits::{HashEngine, StreamingHasher};

pub struct Blake3Engine;

struct Blake3StreamingHasher {
    hasher: blake3::Hasher,
}

impl StreamingHasher for Blake3StreamingHasher {
    fn update(&mut self, data: &[u8]) {
        self.hasher.update(data);
    }

    fn finalize(self: Box<Self>) -> String {
        self.hasher.finalize().to_hex().to_string()
    }
}

impl HashEngine for Blake3Engine {
    fn id(&self) -> &'static str {
        "blake3"
    }

    fn new_session(&self) -> Box<dyn StreamingHasher> {
        Box::new(Blake3StreamingHasher {
            hasher: blake3::Hasher::new(),
        })
    }

    fn digest_len(&self) -> usize {
        64
    }
}

//! CRC32 checksum engine
//!
//! Not cryptographic. Useful for quick change detection on trees where
//! collision resistance does not matter.

use crate::hashing::traits::{HashEngine, StreamingHasher};
use crc32fast::Hasher;

pub struct Crc32Engine;

struct Crc32StreamingHasher {
    hasher: Hasher,
}

impl StreamingHasher for Crc32StreamingHasher {
    fn update(&mut self, data: &[u8]) {
        self.hasher.update(data);
    }

    fn finalize(self: Box<Self>) -> String {
        format!("{:08x}", self.hasher.finalize())
    }
}

impl HashEngine for Crc32Engine {
    fn id(&self) -> &'static str {
        "crc32"
    }

    fn new_session(&self) -> Box<dyn StreamingHasher> {
        Box::new(Crc32StreamingHasher {
            hasher: Hasher::new(),
        })
    }

    fn digest_len(&self) -> usize {
        8
    }
}

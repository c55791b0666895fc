//! MD5 hash engine

use crate::hashing::traits::{HashEngine, StreamingHasher};
use md5::{Digest as Md5Digest, Md5};

pub struct Md5Engine;

/// MD5 streaming hasher
struct Md5StreamingHasher {
    hasher: Md5,
}

impl StreamingHasher for Md5StreamingHasher {
    fn update(&mut self, data: &[u8]) {
        Md5Digest::update(&mut self.hasher, data);
    }

    fn finalize(self: Box<Self>) -> String {
        format!("{:x}", Md5Digest::finalize(self.hasher))
    }
}

impl HashEngine for Md5Engine {
    fn id(&self) -> &'static str {
        "md5"
    }

    fn new_session(&self) -> Box<dyn StreamingHasher> {
        Box::new(Md5StreamingHasher { hasher: Md5::new() })
    }

    fn digest_len(&self) -> usize {
        32
    }
}

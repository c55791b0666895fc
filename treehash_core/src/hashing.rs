//! Hash engine adapter
//!
//! The pipeline only ever sees a [`HashEngine`] trait object. Which
//! algorithm backs it is decided once at startup through
//! [`HashAlgorithm::engine`], and the resulting handle is passed
//! explicitly to whoever needs it; there is no global instance.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::{self, Read};
use std::str::FromStr;
use std::sync::Arc;

pub mod algorithms;
pub mod traits;

pub use traits::{HashEngine, StreamingHasher};

use crate::error::ValidationError;

/// Default read buffer size used when streaming file content
pub const DEFAULT_BUFFER_SIZE: usize = 64 * 1024;

/// Supported hash algorithms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HashAlgorithm {
    #[default]
    Md5,
    Sha1,
    Sha256,
    Crc32,
    Blake3,
}

impl HashAlgorithm {
    /// Every algorithm, in display order
    pub const ALL: [HashAlgorithm; 5] = [
        HashAlgorithm::Md5,
        HashAlgorithm::Sha1,
        HashAlgorithm::Sha256,
        HashAlgorithm::Crc32,
        HashAlgorithm::Blake3,
    ];

    /// Build a shareable engine for this algorithm
    pub fn engine(self) -> Arc<dyn HashEngine> {
        match self {
            HashAlgorithm::Md5 => Arc::new(algorithms::Md5Engine),
            HashAlgorithm::Sha1 => Arc::new(algorithms::Sha1Engine),
            HashAlgorithm::Sha256 => Arc::new(algorithms::Sha256Engine),
            HashAlgorithm::Crc32 => Arc::new(algorithms::Crc32Engine),
            HashAlgorithm::Blake3 => Arc::new(algorithms::Blake3Engine),
        }
    }

    /// Stable identifier, as used in configuration files
    pub fn id(self) -> &'static str {
        match self {
            HashAlgorithm::Md5 => "md5",
            HashAlgorithm::Sha1 => "sha1",
            HashAlgorithm::Sha256 => "sha256",
            HashAlgorithm::Crc32 => "crc32",
            HashAlgorithm::Blake3 => "blake3",
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for HashAlgorithm {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        HashAlgorithm::ALL
            .into_iter()
            .find(|algo| algo.id() == wanted)
            .ok_or_else(|| {
                ValidationError::invalid_parameter(
                    "algorithm",
                    &format!("unknown algorithm '{s}'"),
                )
            })
    }
}

/// Stream a reader through a fresh session of `engine`
///
/// `buf` is scratch space owned by the caller so that a worker can
/// reuse one allocation across files. The session itself is dropped
/// when this returns, successful or not.
pub fn hash_reader<R: Read>(
    engine: &dyn HashEngine,
    mut reader: R,
    buf: &mut [u8],
) -> io::Result<String> {
    let mut session = engine.new_session();
    loop {
        match reader.read(buf) {
            Ok(0) => break,
            Ok(n) => session.update(&buf[..n]),
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(session.finalize())
}

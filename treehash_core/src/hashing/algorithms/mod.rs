//! Hash engine implementations

mod blake3;
mod crc32;
mod md5;
mod sha1;
mod sha256;

pub use self::blake3::Blake3Engine;
pub use self::crc32::Crc32Engine;
pub use self::md5::Md5Engine;
pub use self::sha1::Sha1Engine;
pub use self::sha256::Sha256Engine;

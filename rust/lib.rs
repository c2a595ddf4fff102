#![deny(missing_docs)]
//! `s2tiles` reads and writes S2Tiles archives: a single-file, cloud-optimized
//! format for pyramidal tile data addressed either by web-mercator
//! `(zoom, x, y)` or by six-face S2 spherical coordinates `(face, zoom, x, y)`.

/// The top-level archive engine: [`archive::OpenOptions`] and [`archive::Archive`].
pub mod archive;
/// Directory node-array LRU cache.
pub mod cache;
/// Gzip/Brotli/Zstd compression facade.
pub mod compression;
/// Errors and the crate's `Result` alias.
pub mod error;
/// Directory sizing and byte-offset geometry.
pub mod geometry;
/// The fixed 128 KiB header codec.
pub mod header;
/// The 10-byte directory slot codec.
pub mod node;
/// Converts `(zoom, x, y)` into a root-to-leaf directory slot path.
pub mod path;
/// The random-access byte store contract, plus file- and memory-backed implementations.
pub mod store;
/// Stateful descent through a face's quad-trie.
pub mod trie;

pub use archive::{Archive, OpenOptions};
pub use compression::Compression;
pub use error::{Error, Result};
pub use store::{ByteStore, FileStore, MemStore};

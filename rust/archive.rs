//! Top-level archive engine: open/create an archive over a [`ByteStore`],
//! read and write tiles by S2 or web-mercator coordinate, and commit the
//! final header.

use log::{debug, trace};

use crate::cache::{NodeCache, DEFAULT_CACHE_SIZE};
use crate::compression::{self, Compression};
use crate::error::{Error, Result};
use crate::geometry::{DATA_REGION_START, HEADER_SIZE};
use crate::header::Header;
use crate::node::Node;
use crate::store::ByteStore;
use crate::trie::{self, Cursor};

fn check_face(face: u8) -> Result<()> {
    if face < 6 {
        Ok(())
    } else {
        Err(Error::InvalidFace(face))
    }
}

/// Configures how an archive is created or reopened.
///
/// Mirrors the builder pattern of `std::fs::OpenOptions`: set the knobs that
/// matter, then call [`create`](OpenOptions::create) or
/// [`open`](OpenOptions::open). On reopen, values recorded in the archive's
/// header always win over whatever was passed to the builder.
#[derive(Debug, Clone)]
pub struct OpenOptions {
    maxzoom: u8,
    compression: Compression,
    cache_size: usize,
}

impl Default for OpenOptions {
    fn default() -> Self {
        OpenOptions {
            maxzoom: 0,
            compression: Compression::default(),
            cache_size: DEFAULT_CACHE_SIZE,
        }
    }
}

impl OpenOptions {
    /// Start from the default configuration (maxzoom 0, no compression, a
    /// 64-directory cache).
    pub fn new() -> Self {
        OpenOptions::default()
    }

    /// Maximum zoom level this archive will hold tiles for.
    pub fn maxzoom(mut self, maxzoom: u8) -> Self {
        self.maxzoom = maxzoom;
        self
    }

    /// Compression applied to tile payloads and the metadata blob.
    pub fn compression(mut self, compression: Compression) -> Self {
        self.compression = compression;
        self
    }

    /// Number of directories kept warm in the LRU cache.
    pub fn cache_size(mut self, cache_size: usize) -> Self {
        self.cache_size = cache_size;
        self
    }

    /// Create a brand new archive: zero-fills the header and all six root
    /// directories, leaving metadata to be supplied at [`commit`](Archive::commit).
    pub fn create<S: ByteStore>(self, mut store: S) -> Result<Archive<S>> {
        debug!(
            "creating archive: maxzoom={} compression={:?}",
            self.maxzoom, self.compression
        );
        store.write_at(DATA_REGION_START - 1, &[0u8])?;
        Ok(Archive {
            store,
            cache: NodeCache::new(self.cache_size),
            maxzoom: self.maxzoom,
            compression: self.compression,
        })
    }

    /// Open an already-committed archive. The header's `maxzoom` and
    /// `compression` replace whatever this builder was configured with.
    pub fn open<S: ByteStore>(self, mut store: S) -> Result<Archive<S>> {
        let mut buf = vec![0u8; HEADER_SIZE as usize];
        store.read_at(0, &mut buf)?;
        let header = Header::from_bytes(&buf)?;
        trace!(
            "opened archive: version={} maxzoom={} compression={:?}",
            header.version,
            header.maxzoom,
            header.compression
        );
        Ok(Archive {
            store,
            cache: NodeCache::new(self.cache_size),
            maxzoom: header.maxzoom,
            compression: header.compression,
        })
    }
}

/// A handle on an S2Tiles archive, backed by any [`ByteStore`].
pub struct Archive<S: ByteStore> {
    store: S,
    cache: NodeCache,
    maxzoom: u8,
    compression: Compression,
}

impl<S: ByteStore> Archive<S> {
    /// Maximum zoom level this archive holds tiles for.
    pub fn maxzoom(&self) -> u8 {
        self.maxzoom
    }

    /// Compression used for tile payloads and the metadata blob.
    pub fn compression(&self) -> Compression {
        self.compression
    }

    /// Read and decompress the archive's metadata blob. Only valid after
    /// [`commit`](Archive::commit) (or on an archive opened with
    /// [`OpenOptions::open`]).
    pub fn get_metadata(&mut self) -> Result<Vec<u8>> {
        let mut buf = vec![0u8; HEADER_SIZE as usize];
        self.store.read_at(0, &mut buf)?;
        let header = Header::from_bytes(&buf)?;
        compression::decompress(&header.metadata, header.compression)
    }

    /// `true` if a tile exists at the given S2 face coordinate.
    pub fn has_tile_s2(&mut self, face: u8, zoom: u8, x: u64, y: u64) -> Result<bool> {
        check_face(face)?;
        Ok(self.locate(face, zoom, x, y, false)?.is_some_and(|c| c.node.is_present()))
    }

    /// Fetch and decompress the tile at the given S2 face coordinate, if present.
    pub fn get_tile_s2(&mut self, face: u8, zoom: u8, x: u64, y: u64) -> Result<Option<Vec<u8>>> {
        check_face(face)?;
        let Some(cursor) = self.locate(face, zoom, x, y, false)? else {
            return Ok(None);
        };
        if !cursor.node.is_present() {
            return Ok(None);
        }
        let mut raw = vec![0u8; cursor.node.length as usize];
        self.store.read_at(cursor.node.offset, &mut raw)?;
        Ok(Some(compression::decompress(&raw, self.compression)?))
    }

    /// Compress and store `data` as the tile at the given S2 face coordinate.
    pub fn put_tile_s2(&mut self, face: u8, zoom: u8, x: u64, y: u64, data: &[u8]) -> Result<()> {
        check_face(face)?;

        let compressed = compression::compress(data, self.compression)?;
        let offset = self.store.len()?;
        self.store.write_at(offset, &compressed)?;

        let cursor = self
            .locate(face, zoom, x, y, true)?
            .expect("create=true always resolves a terminal slot");
        let node = Node {
            offset,
            length: compressed.len() as u32,
        };
        trace!(
            "wrote tile face={} z={} x={} y={} -> offset={} length={}",
            face, zoom, x, y, node.offset, node.length
        );
        trie::write_slot(&mut self.store, &mut self.cache, cursor, node)
    }

    /// `true` if a tile exists at the given web-mercator coordinate (face 0).
    pub fn has_tile(&mut self, zoom: u8, x: u64, y: u64) -> Result<bool> {
        self.has_tile_s2(0, zoom, x, y)
    }

    /// Fetch and decompress the tile at the given web-mercator coordinate
    /// (face 0), if present.
    pub fn get_tile(&mut self, zoom: u8, x: u64, y: u64) -> Result<Option<Vec<u8>>> {
        self.get_tile_s2(0, zoom, x, y)
    }

    /// Compress and store `data` as the tile at the given web-mercator
    /// coordinate (face 0).
    pub fn put_tile(&mut self, zoom: u8, x: u64, y: u64, data: &[u8]) -> Result<()> {
        self.put_tile_s2(0, zoom, x, y, data)
    }

    /// Finalize the archive: compress `metadata` and write the header.
    /// Further tile writes remain allowed, and `commit` may be called again
    /// — each call overwrites the header in place with the latest metadata.
    pub fn commit(&mut self, metadata: &[u8]) -> Result<()> {
        let compressed_metadata = compression::compress(metadata, self.compression)?;
        let header = Header::new(self.maxzoom, self.compression, compressed_metadata)?;
        let bytes = header.to_bytes()?;
        self.store.write_at(0, &bytes)?;
        debug!("committed archive: maxzoom={}", self.maxzoom);
        Ok(())
    }

    /// Reclaim the backing store, e.g. to hand a [`MemStore`](crate::store::MemStore)'s
    /// bytes off to another owner or to reopen it.
    pub fn into_store(self) -> S {
        self.store
    }

    fn locate(&mut self, face: u8, zoom: u8, x: u64, y: u64, create: bool) -> Result<Option<Cursor>> {
        trie::locate(
            &mut self.store,
            &mut self.cache,
            face,
            zoom,
            x,
            y,
            self.maxzoom,
            create,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemStore;

    #[test]
    fn put_then_get_round_trips() {
        let mut archive = OpenOptions::new()
            .maxzoom(12)
            .compression(Compression::None)
            .create(MemStore::new())
            .unwrap();

        archive.put_tile(10, 500, 300, b"tile-bytes").unwrap();
        assert!(archive.has_tile(10, 500, 300).unwrap());
        assert_eq!(
            archive.get_tile(10, 500, 300).unwrap(),
            Some(b"tile-bytes".to_vec())
        );
        assert!(!archive.has_tile(10, 501, 300).unwrap());
    }

    #[test]
    fn s2_faces_are_independent() {
        let mut archive = OpenOptions::new()
            .maxzoom(5)
            .create(MemStore::new())
            .unwrap();

        archive.put_tile_s2(0, 3, 1, 1, b"face-zero").unwrap();
        archive.put_tile_s2(4, 3, 1, 1, b"face-four").unwrap();

        assert_eq!(
            archive.get_tile_s2(0, 3, 1, 1).unwrap(),
            Some(b"face-zero".to_vec())
        );
        assert_eq!(
            archive.get_tile_s2(4, 3, 1, 1).unwrap(),
            Some(b"face-four".to_vec())
        );
    }

    #[test]
    fn commit_writes_recoverable_metadata() {
        let mut archive = OpenOptions::new()
            .maxzoom(8)
            .create(MemStore::new())
            .unwrap();
        archive.put_tile(2, 1, 1, b"x").unwrap();
        archive.commit(b"{\"name\":\"demo\"}").unwrap();

        assert_eq!(archive.get_metadata().unwrap(), b"{\"name\":\"demo\"}");
    }

    #[test]
    fn put_and_recommit_after_commit_are_both_honored() {
        let mut archive = OpenOptions::new()
            .maxzoom(4)
            .create(MemStore::new())
            .unwrap();
        archive.commit(b"meta").unwrap();

        archive.put_tile(1, 0, 0, b"late").unwrap();
        assert_eq!(archive.get_tile(1, 0, 0).unwrap(), Some(b"late".to_vec()));

        archive.commit(b"meta-v2").unwrap();
        assert_eq!(archive.get_metadata().unwrap(), b"meta-v2");
    }

    #[test]
    fn invalid_face_is_rejected_on_all_entry_points() {
        let mut archive = OpenOptions::new()
            .maxzoom(4)
            .create(MemStore::new())
            .unwrap();
        assert!(matches!(
            archive.put_tile_s2(6, 1, 0, 0, b"x"),
            Err(Error::InvalidFace(6))
        ));
        assert!(matches!(
            archive.has_tile_s2(6, 1, 0, 0),
            Err(Error::InvalidFace(6))
        ));
        assert!(matches!(
            archive.get_tile_s2(6, 1, 0, 0),
            Err(Error::InvalidFace(6))
        ));
    }

    #[test]
    fn reopen_recovers_header_settings() {
        let mut archive = OpenOptions::new()
            .maxzoom(9)
            .compression(Compression::None)
            .create(MemStore::new())
            .unwrap();
        archive.put_tile(6, 10, 10, b"payload").unwrap();
        archive.commit(b"meta").unwrap();
        let store = archive.into_store();

        let mut reopened = OpenOptions::new().open(store).unwrap();
        assert_eq!(reopened.maxzoom(), 9);
        assert_eq!(
            reopened.get_tile(6, 10, 10).unwrap(),
            Some(b"payload".to_vec())
        );
    }
}

use crate::node::NODE_SIZE;

/// `4^k` for `k` in `0..=5`: the slot count of each individual quad-trie level.
pub const LEVEL_SLOTS: [u64; 6] = [1, 4, 16, 64, 256, 1024];

/// `sum_{k<z} 4^k` for `z` in `0..=5`: the first slot index of level `z`.
pub const LEVEL_START: [u64; 6] = [0, 1, 5, 21, 85, 341];

/// Slot count of the full six-level inner quad-trie (`1+4+16+64+256+1024`).
pub const INNER_TRIE_SLOTS: u64 = 1365;

/// Fixed slot count of a root directory (one per S2 face), per spec.md §9's
/// explicit correction to the §3 prose: `2 * INNER_TRIE_SLOTS`, preallocating
/// both the inner trie and the leaf-expanded tile level.
pub const ROOT_SLOTS: u64 = 2 * INNER_TRIE_SLOTS;

/// Byte size of one face's root directory (`27 300`).
pub const ROOT_DIR_BYTES: u64 = ROOT_SLOTS * NODE_SIZE;

/// Byte size of the fixed header region (`128 KiB`).
pub const HEADER_SIZE: u64 = 131_072;

/// Number of S2 faces (web-mercator callers use face 0).
pub const FACE_COUNT: u64 = 6;

/// Byte size of the contiguous root-directory region following the header.
pub const ROOT_REGION_SIZE: u64 = FACE_COUNT * ROOT_DIR_BYTES;

/// Byte offset where tile payloads and leaf directories begin.
pub const DATA_REGION_START: u64 = HEADER_SIZE + ROOT_REGION_SIZE;

/// Byte offset of the root directory for a given face, `0..=5`.
pub fn face_root_offset(face: u8) -> u64 {
    HEADER_SIZE + face as u64 * ROOT_DIR_BYTES
}

/// Byte size of a leaf directory created at `depth_written_so_far` zoom
/// levels of descent, for an archive whose declared max zoom is `maxzoom`.
///
/// `remainder = min(maxzoom - depth_written_so_far, 5)`; the directory holds
/// `sum_{k=0..=remainder} 4^k` slots.
pub fn directory_byte_size(depth_written_so_far: u8, maxzoom: u8) -> u64 {
    let remainder = maxzoom.saturating_sub(depth_written_so_far).min(5) as usize;
    let slots: u64 = LEVEL_SLOTS[..=remainder].iter().sum();
    slots * NODE_SIZE
}

/// Byte offset of `slot` within a directory that starts at `directory_offset`.
pub fn slot_offset(directory_offset: u64, slot: usize) -> u64 {
    directory_offset + slot as u64 * NODE_SIZE
}

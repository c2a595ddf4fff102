//! Stateful descent through a face's quad-trie: root directory down to the
//! terminal slot that holds either an absent sentinel or a tile pointer,
//! lazily allocating leaf directories along the way when writing.

use crate::cache::NodeCache;
use crate::geometry::{directory_byte_size, face_root_offset, slot_offset, ROOT_DIR_BYTES};
use crate::node::{Node, NODE_SIZE};
use crate::path::{slots_for, CHUNK};
use crate::store::ByteStore;

/// The resolved location of a terminal slot: its byte offset in the store
/// (so a caller can overwrite it) and the node currently recorded there.
#[derive(Debug, Clone, Copy)]
pub struct Cursor {
    /// byte offset of the directory this slot belongs to (cache key)
    pub dir_offset: u64,
    /// byte offset of this slot within its directory
    pub slot_offset: u64,
    /// the node currently stored at that slot (`Node::ABSENT` if never written)
    pub node: Node,
}

/// Descend to the terminal slot for `(face, zoom, x, y)`.
///
/// When `create` is `false`, returns `Ok(None)` as soon as an intermediate
/// directory pointer turns out absent — the tile was never written, and no
/// further reads are needed. When `create` is `true`, absent intermediate
/// directories are allocated (zero-filled, sized by [`directory_byte_size`])
/// and linked in as the descent proceeds, so the walk always reaches the
/// terminal slot.
///
/// Terminal shortcut: when `maxzoom` is an exact multiple of 5 and `zoom ==
/// maxzoom`, [`slots_for`] appends a trailing zero-width residual chunk that
/// doesn't correspond to a real extra directory hop — the directory already
/// descended into was sized by [`directory_byte_size`] with its level-5 tier
/// meant to hold the tile nodes directly. The walk stops one step early in
/// that case and returns the current slot instead of allocating a
/// superfluous single-slot directory just to hold the residual.
pub fn locate<S: ByteStore>(
    store: &mut S,
    cache: &mut NodeCache,
    face: u8,
    zoom: u8,
    x: u64,
    y: u64,
    maxzoom: u8,
    create: bool,
) -> crate::error::Result<Option<Cursor>> {
    let path = slots_for(zoom, x, y);
    let mut dir_offset = face_root_offset(face);
    let mut dir_size = ROOT_DIR_BYTES;
    let mut depth_written: u8 = 0;

    for (i, &slot) in path.iter().enumerate() {
        let node = read_node(store, cache, dir_offset, dir_size, slot)?;
        let remaining = path.len() - i;

        if remaining == 1 {
            return Ok(Some(Cursor {
                dir_offset,
                slot_offset: slot_offset(dir_offset, slot),
                node,
            }));
        }

        if remaining == 2 && maxzoom % CHUNK == 0 && zoom == maxzoom && path[i + 1] == 0 {
            return Ok(Some(Cursor {
                dir_offset,
                slot_offset: slot_offset(dir_offset, slot),
                node,
            }));
        }

        if node.is_present() {
            dir_offset = node.offset;
            dir_size = node.length as u64;
            depth_written += CHUNK;
            continue;
        }

        if !create {
            return Ok(None);
        }

        let next_depth = depth_written + CHUNK;
        let new_size = directory_byte_size(next_depth, maxzoom);
        let new_offset = store.len()?;
        store.write_at(new_offset, &vec![0u8; new_size as usize])?;
        write_node(
            store,
            cache,
            dir_offset,
            slot,
            Node {
                offset: new_offset,
                length: new_size as u32,
            },
        )?;

        dir_offset = new_offset;
        dir_size = new_size;
        depth_written = next_depth;
    }

    unreachable!("slots_for always yields at least one slot")
}

/// Write a tile pointer at an already-resolved slot.
pub fn write_slot<S: ByteStore>(
    store: &mut S,
    cache: &mut NodeCache,
    cursor: Cursor,
    node: Node,
) -> crate::error::Result<()> {
    store.write_at(cursor.slot_offset, &node.encode()?)?;
    cache.delete(&cursor.dir_offset);
    Ok(())
}

fn read_node<S: ByteStore>(
    store: &mut S,
    cache: &mut NodeCache,
    dir_offset: u64,
    dir_size: u64,
    slot: usize,
) -> crate::error::Result<Node> {
    if let Some(nodes) = cache.get(&dir_offset) {
        return Ok(nodes[slot]);
    }
    let slots = (dir_size / NODE_SIZE) as usize;
    let mut buf = vec![0u8; dir_size as usize];
    store.read_at(dir_offset, &mut buf)?;
    let mut nodes = Vec::with_capacity(slots);
    for i in 0..slots {
        let mut raw = [0u8; 10];
        raw.copy_from_slice(&buf[i * 10..i * 10 + 10]);
        nodes.push(Node::decode(&raw));
    }
    let node = nodes[slot];
    cache.set(dir_offset, nodes);
    Ok(node)
}

fn write_node<S: ByteStore>(
    store: &mut S,
    cache: &mut NodeCache,
    dir_offset: u64,
    slot: usize,
    node: Node,
) -> crate::error::Result<()> {
    store.write_at(slot_offset(dir_offset, slot), &node.encode()?)?;
    cache.delete(&dir_offset);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemStore;

    fn new_archive_data() -> (MemStore, NodeCache) {
        let mut store = MemStore::new();
        // six zero-filled root directories, as if written right after the header
        store
            .write_at(face_root_offset(5) + ROOT_DIR_BYTES - 1, &[0u8])
            .unwrap();
        (store, NodeCache::new(8))
    }

    #[test]
    fn single_chunk_read_miss_is_present_but_absent_not_none() {
        // zoom=3 fits in one chunk: the final slot is resolved directly in
        // the root directory, so a miss is `Some(cursor)` with an absent
        // node, not `None` (`None` means descent itself could not continue).
        let (mut store, mut cache) = new_archive_data();
        let cursor = locate(&mut store, &mut cache, 0, 3, 1, 1, 10, false)
            .unwrap()
            .unwrap();
        assert!(!cursor.node.is_present());
    }

    #[test]
    fn multi_chunk_read_miss_with_no_create_returns_none() {
        // zoom=12 needs a leaf directory that was never allocated.
        let (mut store, mut cache) = new_archive_data();
        let cursor = locate(&mut store, &mut cache, 0, 12, 7, 3, 12, false).unwrap();
        assert!(cursor.is_none());
    }

    #[test]
    fn create_then_read_round_trips_through_leaf_directories() {
        let (mut store, mut cache) = new_archive_data();
        let cursor = locate(&mut store, &mut cache, 0, 12, 7, 3, 12, true)
            .unwrap()
            .unwrap();
        assert!(!cursor.node.is_present());

        let tile_node = Node {
            offset: 500_000,
            length: 42,
        };
        write_slot(&mut store, &mut cache, cursor, tile_node).unwrap();

        let cursor2 = locate(&mut store, &mut cache, 0, 12, 7, 3, 12, false)
            .unwrap()
            .unwrap();
        assert_eq!(cursor2.node, tile_node);
    }

    #[test]
    fn different_faces_do_not_collide() {
        let (mut store, mut cache) = new_archive_data();
        let a = locate(&mut store, &mut cache, 0, 3, 2, 2, 5, true)
            .unwrap()
            .unwrap();
        let b = locate(&mut store, &mut cache, 1, 3, 2, 2, 5, true)
            .unwrap()
            .unwrap();
        assert_ne!(a.slot_offset, b.slot_offset);
    }

    #[test]
    fn zoom_within_first_chunk_never_allocates_leaf_directory() {
        let (mut store, mut cache) = new_archive_data();
        let before = store.len().unwrap();
        locate(&mut store, &mut cache, 0, 4, 1, 1, 20, true)
            .unwrap()
            .unwrap();
        assert_eq!(store.len().unwrap(), before);
    }

    #[test]
    fn exact_multiple_of_five_maxzoom_uses_terminal_shortcut() {
        // maxzoom=10, zoom=10: the trailing residual chunk is never turned
        // into its own directory hop. Only the depth-5 full directory is
        // allocated; the terminal tile slot lives in its level-5 tier.
        let (mut store, mut cache) = new_archive_data();
        let before = store.len().unwrap();
        let cursor = locate(&mut store, &mut cache, 0, 10, 500, 300, 10, true)
            .unwrap()
            .unwrap();
        assert!(!cursor.node.is_present());
        assert_eq!(store.len().unwrap() - before, directory_byte_size(5, 10));

        let tile_node = Node {
            offset: 999_000,
            length: 7,
        };
        write_slot(&mut store, &mut cache, cursor, tile_node).unwrap();

        let cursor2 = locate(&mut store, &mut cache, 0, 10, 500, 300, 10, false)
            .unwrap()
            .unwrap();
        assert_eq!(cursor2.node, tile_node);

        // no further directory was allocated to resolve the read
        assert_eq!(store.len().unwrap() - before, directory_byte_size(5, 10));
    }
}

//! Converts a `(zoom, x, y)` web-mercator tile (or the per-face equivalent in
//! S2 coordinates) into the root-to-leaf sequence of directory slot indices
//! the trie walker descends through.

use crate::geometry::LEVEL_START;

/// Chunk width, in zoom levels, of each directory tier.
pub(crate) const CHUNK: u8 = 5;

/// One step of a descent: which slot to index within the directory at this depth.
pub type Slot = usize;

/// Decompose `(zoom, x, y)` into a root-to-leaf sequence of directory slot
/// indices. Each of the first `zoom / 5` chunks takes a full 5 bits from the
/// top of the coordinate; a final residual chunk takes whatever's left
/// (`zoom % 5` bits, which is `0` — an empty, always-slot-0 chunk — when
/// `zoom` is an exact multiple of 5). The residual always trails the full
/// chunks, so it lands in the deepest, narrowest directory of the descent,
/// matching how that directory was sized when it was allocated.
///
/// `zoom == 0` returns `[0]` directly: the single root-directory slot for the
/// tile at the face's apex.
pub fn slots_for(zoom: u8, x: u64, y: u64) -> Vec<Slot> {
    if zoom == 0 {
        return vec![0];
    }

    let mut chunks: Vec<(u8, u64, u64)> = Vec::new();
    let mut remaining = zoom;
    while remaining >= CHUNK {
        let shift = remaining - CHUNK;
        let xi = (x >> shift) & 0x1f;
        let yi = (y >> shift) & 0x1f;
        chunks.push((CHUNK, xi, yi));
        remaining -= CHUNK;
    }

    // residual: the bottom `remaining` bits, always appended last (0 width,
    // value 0 when zoom divides evenly, per the terminal shortcut).
    let mask = (1u64 << remaining) - 1;
    chunks.push((remaining, x & mask, y & mask));

    chunks
        .into_iter()
        .map(|(z, xi, yi)| chunk_slot(z, xi, yi))
        .collect()
}

/// Flat slot index of a chunk-local `(x, y)` pair at chunk-local zoom `z`:
/// `val = y * 2^z + x + LEVEL_START[z]`.
fn chunk_slot(z: u8, xi: u64, yi: u64) -> Slot {
    let val = yi * (1u64 << z) + xi + LEVEL_START[z as usize];
    val as Slot
}

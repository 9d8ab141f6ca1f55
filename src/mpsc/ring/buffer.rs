// Byte-addressed ring transport shared by all producers and the consumer.

use std::fmt;
use std::sync::atomic::AtomicU32;

use crossbeam_utils::CachePadded;

/// A bounded, lock-free, multi-producer single-consumer byte ring.
///
/// The ring stores variable-length records: a 12-byte header (length, level,
/// timestamp) followed by the payload, padded to a 4-byte boundary. Both
/// cursors address bytes modulo `capacity`, which must be a power of two so
/// wrap arithmetic reduces to a bitwise AND with `mask`.
///
/// ### Concurrency design
/// - **Producers (enqueue):** claim a byte range by compare-exchanging the
///   write cursor forward. The claimed range is exclusively theirs until they
///   publish the length word with a release store; a zero length word is the
///   "not yet committed" state the consumer keys on.
/// - **Consumer (dequeue):** exactly one agent advances the read cursor. It
///   never skips a reserved-but-uncommitted slot, so records never tear.
/// - **Cache-line padding:** the cursors are wrapped in `CachePadded` to keep
///   producer-side and consumer-side traffic off each other's cache line.
///
/// One byte of capacity is sacrificed so that `write == read` unambiguously
/// means empty.
#[repr(C)]
pub struct RingBuffer {
    /// Start of the caller-provided backing region. The ring borrows this
    /// memory; it never allocates or frees.
    pub(crate) buffer: *mut u8,

    /// Backing region size in bytes. Power of two.
    pub(crate) capacity: u32,

    /// `capacity - 1`; ANDed with a cursor to get a byte offset.
    pub(crate) mask: u32,

    /// Next byte to reserve. Mutated only by producers, via CAS.
    pub(crate) write_pos: CachePadded<AtomicU32>,

    /// Next byte to drain. Mutated only by the consumer.
    pub(crate) read_pos: CachePadded<AtomicU32>,
}

// SAFETY: every byte of the backing region is mutated by at most one agent
// at a time -- the producer that won the reservation until it commits, the
// consumer from commit until it re-zeroes the slot and advances the read
// cursor. All cross-agent hand-offs go through release/acquire pairs on the
// length word and the two cursors.
unsafe impl Send for RingBuffer {}
unsafe impl Sync for RingBuffer {}

impl fmt::Debug for RingBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RingBuffer")
            .field("buffer", &format_args!("{:#x}", self.buffer as usize))
            .field("capacity", &self.capacity)
            .finish_non_exhaustive()
    }
}

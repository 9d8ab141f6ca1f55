use std::sync::atomic::Ordering::{Acquire, Relaxed, Release};
use std::sync::atomic::AtomicU32;

use super::buffer::RingBuffer;
use crate::mpsc::types::{EntryHeader, Error, Level, ENTRY_HEADER_LEN};

/// Size of the length word that prefixes every record.
const LEN_WORD: u32 = std::mem::size_of::<u32>() as u32;

/// Round a record size up to the 4-byte slot granularity.
#[inline]
const fn align_up(size: u32) -> u32 {
    (size + 3) & !3
}

impl RingBuffer {
    /// Create a ring view over an existing memory region.
    ///
    /// # Safety
    /// `buffer` must point to at least `capacity` writable bytes, aligned to
    /// 4 bytes, zero-filled, and valid (and not otherwise accessed) for the
    /// lifetime of the ring. `capacity` must be a nonzero power of two.
    pub unsafe fn new(buffer: *mut u8, capacity: u32) -> Self {
        debug_assert!(capacity.is_power_of_two());
        debug_assert!(buffer as usize % std::mem::align_of::<AtomicU32>() == 0);
        Self {
            buffer,
            capacity,
            mask: capacity - 1,
            write_pos: crossbeam_utils::CachePadded::new(AtomicU32::new(0)),
            read_pos: crossbeam_utils::CachePadded::new(AtomicU32::new(0)),
        }
    }

    #[inline]
    fn wrap(&self, pos: u32) -> u32 {
        pos & self.mask
    }

    /// View the four record bytes at `pos` as the atomic length word.
    /// `pos` must be a reservation-aligned offset inside the ring.
    #[inline]
    unsafe fn length_word(&self, pos: u32) -> &AtomicU32 {
        &*(self.buffer.add(pos as usize) as *const AtomicU32)
    }

    #[inline]
    fn put(&self, pos: u32, byte: u8) {
        unsafe { *self.buffer.add(pos as usize) = byte }
    }

    /// Copy `src` into the ring at `pos`, wrapping as needed. Returns the
    /// position one past the last byte written.
    #[inline]
    fn copy_in(&self, mut pos: u32, src: &[u8]) -> u32 {
        for &byte in src {
            self.put(pos, byte);
            pos = self.wrap(pos.wrapping_add(1));
        }
        pos
    }

    /// Copy ring bytes at `pos` into `dst`, zeroing each source byte as it
    /// is read. Returns the position one past the last byte taken.
    #[inline]
    fn take(&self, mut pos: u32, dst: &mut [u8]) -> u32 {
        for slot in dst.iter_mut() {
            unsafe {
                let src = self.buffer.add(pos as usize);
                *slot = *src;
                *src = 0;
            }
            pos = self.wrap(pos.wrapping_add(1));
        }
        pos
    }

    /// Reserve `advance` bytes for exclusive writing.
    ///
    /// Returns the start position of the claimed range, or `Full` when the
    /// ring cannot fit the record right now. Never blocks and never retries
    /// on `Full`; contention with other producers retries the claim only.
    ///
    /// A reservation MUST be followed by [`commit`](Self::commit): until the
    /// length word is published the consumer reports `Busy` at this slot and
    /// everything behind it stays undrainable.
    ///
    /// `advance` must be a multiple of the 4-byte slot granularity; anything
    /// else would knock every later length word off its alignment.
    pub fn try_reserve(&self, advance: u32) -> Result<u32, Error> {
        if advance % 4 != 0 {
            return Err(Error::Invalid);
        }
        let mut write = self.write_pos.load(Acquire);
        loop {
            let read = self.read_pos.load(Acquire);
            let used = write.wrapping_sub(read) & self.mask;
            // One byte stays unused so full and empty are distinguishable.
            let available = self.capacity - used - 1;
            if advance > available {
                return Err(Error::Full);
            }
            let new_write = self.wrap(write.wrapping_add(advance));
            match self
                .write_pos
                .compare_exchange_weak(write, new_write, Release, Acquire)
            {
                Ok(_) => return Ok(write),
                Err(current) => write = current,
            }
        }
    }

    /// Publish a reserved record. The release store of the length word is
    /// what hands the slot bytes over to the consumer.
    ///
    /// # Safety
    /// `pos` must be a value returned by [`try_reserve`](Self::try_reserve)
    /// on this ring, committed exactly once.
    pub unsafe fn commit(&self, pos: u32, length: u32) {
        self.length_word(pos).store(length, Release);
    }

    /// Write one record: reserve, fill header tail and payload, zero the
    /// padding, then commit length-last.
    pub fn enqueue(&self, level: Level, timestamp: u32, payload: &[u8]) -> Result<(), Error> {
        let total = (ENTRY_HEADER_LEN + payload.len()) as u64;
        if total > u64::from(self.capacity / 2) {
            return Err(Error::Invalid);
        }
        let header = EntryHeader {
            length: total as u32,
            level: level as u32,
            timestamp,
        };

        let advance = align_up(header.length);
        let start = self.try_reserve(advance)?;
        let end = self.wrap(start.wrapping_add(advance));

        // We own [start, end) now. Skip the length word; it goes last.
        let mut pos = self.wrap(start.wrapping_add(LEN_WORD));
        pos = self.copy_in(pos, &header.level.to_ne_bytes());
        pos = self.copy_in(pos, &header.timestamp.to_ne_bytes());
        pos = self.copy_in(pos, payload);
        while pos != end {
            self.put(pos, 0);
            pos = self.wrap(pos.wrapping_add(1));
        }

        // Publish. No record byte is consumer-visible before this store.
        unsafe { self.commit(start, header.length) };
        Ok(())
    }

    /// Drain one record into `out`.
    ///
    /// Single-consumer only. Returns the decoded header and the number of
    /// payload bytes copied; the copy is truncated to `out.len() - 1` and
    /// NUL-terminated at the copy length. Truncation is silent and the read
    /// cursor still advances past the whole record.
    ///
    /// # Errors
    /// - `Invalid` -- empty `out`, or a corrupt on-ring length.
    /// - `Empty` -- no records.
    /// - `Busy` -- the record at the read cursor is reserved but not yet
    ///   committed; retry once its producer finishes.
    pub fn dequeue(&self, out: &mut [u8]) -> Result<(EntryHeader, usize), Error> {
        if out.is_empty() {
            return Err(Error::Invalid);
        }

        let read = self.read_pos.load(Acquire);
        let write = self.write_pos.load(Acquire);
        if read == write {
            return Err(Error::Empty);
        }

        let length_word = unsafe { self.length_word(read) };
        let total = length_word.load(Acquire);
        if total == 0 {
            return Err(Error::Busy);
        }
        if total < ENTRY_HEADER_LEN as u32 || total > self.capacity / 2 {
            return Err(Error::Invalid);
        }

        // Erase the completion flag before dismantling the rest of the slot.
        length_word.store(0, Relaxed);

        let mut level = [0u8; 4];
        let mut timestamp = [0u8; 4];
        let mut pos = self.wrap(read.wrapping_add(LEN_WORD));
        pos = self.take(pos, &mut level);
        pos = self.take(pos, &mut timestamp);

        let payload_len = total as usize - ENTRY_HEADER_LEN;
        let copied = payload_len.min(out.len() - 1);
        pos = self.take(pos, &mut out[..copied]);
        out[copied] = 0;

        let advance = align_up(total);
        let new_read = self.wrap(read.wrapping_add(advance));

        // Zero the uncopied tail and the padding while the slot is still
        // ours; after the cursor store below producers may reclaim it.
        while pos != new_read {
            self.put(pos, 0);
            pos = self.wrap(pos.wrapping_add(1));
        }
        self.read_pos.store(new_read, Release);

        let header = EntryHeader {
            length: total,
            level: u32::from_ne_bytes(level),
            timestamp: u32::from_ne_bytes(timestamp),
        };
        Ok((header, copied))
    }

    /// Bytes currently occupied, as a possibly-stale snapshot.
    pub fn available(&self) -> u32 {
        let read = self.read_pos.load(Acquire);
        let write = self.write_pos.load(Acquire);
        write.wrapping_sub(read) & self.mask
    }

    pub fn is_empty(&self) -> bool {
        let read = self.read_pos.load(Acquire);
        let write = self.write_pos.load(Acquire);
        read == write
    }

    #[inline]
    pub const fn capacity(&self) -> u32 {
        self.capacity
    }
}

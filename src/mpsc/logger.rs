use std::fmt;
use std::marker::PhantomData;
use std::sync::atomic::{AtomicU32, AtomicU8, Ordering};

use crate::mpsc::ring::RingBuffer;
use crate::mpsc::types::{Entry, Error, Level};

/// Scratch size for [`RingLog::write_format`]. Longer messages are silently
/// truncated to this many bytes before they reach the ring.
const FORMAT_BUF_LEN: usize = 256;

/// Stack-only render target for formatted writes. Overflow is dropped, not
/// reported, so formatting never fails for length reasons.
struct FormatBuffer {
    buf: [u8; FORMAT_BUF_LEN],
    len: usize,
}

impl FormatBuffer {
    const fn new() -> Self {
        Self {
            buf: [0u8; FORMAT_BUF_LEN],
            len: 0,
        }
    }

    fn as_bytes(&self) -> &[u8] {
        &self.buf[..self.len]
    }
}

impl fmt::Write for FormatBuffer {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        let room = FORMAT_BUF_LEN - self.len;
        let take = room.min(s.len());
        self.buf[self.len..self.len + take].copy_from_slice(&s.as_bytes()[..take]);
        self.len += take;
        Ok(())
    }
}

/// A lock-free log over a borrowed byte buffer.
///
/// Many producers, one consumer. `write` and `write_raw` are safe to call
/// from any context, including interrupt and signal handlers: no locks, no
/// allocation, no blocking. `write_format` renders through `core::fmt` and
/// is therefore thread-safe but NOT async-signal-safe.
///
/// The logger borrows its backing buffer for `'a`; it never owns or frees
/// the allocation.
pub struct RingLog<'a> {
    ring: RingBuffer,
    min_level: AtomicU8,
    _backing: PhantomData<&'a mut [u8]>,
}

impl<'a> RingLog<'a> {
    /// Initialize a logger over `buf`.
    ///
    /// The buffer length must be a nonzero power of two that fits in `u32`,
    /// and the buffer must be 4-byte aligned (the per-record length word is
    /// accessed as an `AtomicU32` in place). The region is zero-filled, both
    /// cursors start at zero, and the minimum level starts at
    /// [`Level::Trace`].
    ///
    /// # Errors
    /// `Invalid` when any of the capacity or alignment requirements fail.
    pub fn new(buf: &'a mut [u8]) -> Result<Self, Error> {
        let capacity = u32::try_from(buf.len()).map_err(|_| Error::Invalid)?;
        if capacity == 0 || !capacity.is_power_of_two() {
            return Err(Error::Invalid);
        }
        if buf.as_ptr() as usize % std::mem::align_of::<AtomicU32>() != 0 {
            return Err(Error::Invalid);
        }
        buf.fill(0);
        let ring = unsafe { RingBuffer::new(buf.as_mut_ptr(), capacity) };
        Ok(Self {
            ring,
            min_level: AtomicU8::new(Level::Trace as u8),
            _backing: PhantomData,
        })
    }

    /// Initialize a logger over a raw region, for callers that only have a
    /// pointer (the C ABI goes through here).
    ///
    /// # Safety
    /// `buffer` must point to `capacity` writable bytes that stay valid, and
    /// untouched by anything else, for as long as the logger exists.
    ///
    /// # Errors
    /// `Invalid` on a null or misaligned pointer, or a capacity that is zero
    /// or not a power of two.
    pub unsafe fn from_raw(buffer: *mut u8, capacity: u32) -> Result<RingLog<'static>, Error> {
        if buffer.is_null()
            || buffer as usize % std::mem::align_of::<AtomicU32>() != 0
            || capacity == 0
            || !capacity.is_power_of_two()
        {
            return Err(Error::Invalid);
        }
        std::ptr::write_bytes(buffer, 0, capacity as usize);
        Ok(RingLog {
            ring: RingBuffer::new(buffer, capacity),
            min_level: AtomicU8::new(Level::Trace as u8),
            _backing: PhantomData,
        })
    }

    /// Set the minimum level. Records below it are dropped at the gate.
    /// Callable from any context; concurrent producers observe the change
    /// with an unspecified but bounded delay.
    pub fn set_level(&self, level: Level) {
        self.min_level.store(level as u8, Ordering::Relaxed);
    }

    /// Current minimum level.
    pub fn level(&self) -> Level {
        Level::from_raw(u32::from(self.min_level.load(Ordering::Relaxed))).unwrap_or(Level::None)
    }

    /// Record a message. Interrupt- and signal-safe.
    ///
    /// A record below the minimum level is dropped and still reports
    /// success; the return code does not distinguish filtered from
    /// recorded.
    pub fn write(&self, level: Level, timestamp: u32, message: &str) -> Result<(), Error> {
        self.write_raw(level, timestamp, message.as_bytes())
    }

    /// Record a raw byte payload. Interrupt- and signal-safe.
    ///
    /// # Errors
    /// - `Invalid` -- the record (header + payload) would exceed half the
    ///   ring capacity.
    /// - `Full` -- not enough free space; nothing was written.
    pub fn write_raw(&self, level: Level, timestamp: u32, payload: &[u8]) -> Result<(), Error> {
        if level < self.level() {
            return Ok(());
        }
        self.ring.enqueue(level, timestamp, payload)
    }

    /// Record a formatted message, rendered into a 256-byte stack scratch
    /// and silently truncated beyond that.
    ///
    /// NOT async-signal-safe: `core::fmt` may call arbitrary `Display`
    /// impls. Use [`write`](Self::write) or [`write_raw`](Self::write_raw)
    /// from handlers.
    pub fn write_format(
        &self,
        level: Level,
        timestamp: u32,
        args: fmt::Arguments<'_>,
    ) -> Result<(), Error> {
        if level < self.level() {
            return Ok(());
        }
        let mut scratch = FormatBuffer::new();
        if fmt::write(&mut scratch, args).is_err() {
            return Err(Error::Invalid);
        }
        self.ring.enqueue(level, timestamp, scratch.as_bytes())
    }

    /// Drain the next record into `out`. Consumer-side only; exactly one
    /// agent may call this.
    ///
    /// On success the payload occupies `out[..entry.len]`, NUL-terminated at
    /// `entry.len`; a payload longer than `out.len() - 1` is silently
    /// truncated while the ring still advances past the full record.
    ///
    /// # Errors
    /// - `Empty` -- nothing to drain.
    /// - `Busy` -- the next record is still being written; retry shortly.
    ///   Skipping it is not an option, so everything behind it waits too.
    /// - `Invalid` -- empty `out` or a corrupt on-ring length.
    pub fn read(&self, out: &mut [u8]) -> Result<Entry, Error> {
        let (header, len) = self.ring.dequeue(out)?;
        Ok(Entry {
            level: Level::from_raw(header.level).unwrap_or(Level::None),
            timestamp: header.timestamp,
            len,
        })
    }

    /// Occupied bytes, as a possibly-stale snapshot.
    pub fn available(&self) -> u32 {
        self.ring.available()
    }

    pub fn is_empty(&self) -> bool {
        self.ring.is_empty()
    }

    /// The underlying transport.
    pub fn ring(&self) -> &RingBuffer {
        &self.ring
    }
}

impl fmt::Debug for RingLog<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RingLog")
            .field("ring", &self.ring)
            .field("min_level", &self.level())
            .finish()
    }
}

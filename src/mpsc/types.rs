// Wire-level types shared by the transport and the public API.

use std::fmt;

/// Severity of a log record, ordered by ordinal.
///
/// `None` is the filter sentinel: setting the minimum level to `None`
/// rejects every record at `Trace..=Fatal`.
#[repr(u32)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Level {
    Trace = 0,
    Debug = 1,
    Info = 2,
    Warn = 3,
    Error = 4,
    Fatal = 5,
    None = 6,
}

impl Level {
    /// Constant display name for the level.
    pub const fn name(self) -> &'static str {
        match self {
            Level::Trace => "TRACE",
            Level::Debug => "DEBUG",
            Level::Info => "INFO",
            Level::Warn => "WARN",
            Level::Error => "ERROR",
            Level::Fatal => "FATAL",
            Level::None => "NONE",
        }
    }

    /// Maps a stored ordinal back to a level. Returns `None` for values
    /// outside the defined range.
    pub const fn from_raw(raw: u32) -> Option<Level> {
        match raw {
            0 => Some(Level::Trace),
            1 => Some(Level::Debug),
            2 => Some(Level::Info),
            3 => Some(Level::Warn),
            4 => Some(Level::Error),
            5 => Some(Level::Fatal),
            6 => Some(Level::None),
            _ => Option::None,
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Header stored at the start of every record slot.
///
/// It is marked `#[repr(C)]` to ensure a defined and stable memory layout;
/// the on-ring byte image of a record is exactly this header followed by the
/// payload, padded to a 4-byte boundary. `length` counts header plus payload
/// (padding excluded) and doubles as the completion flag: producers store it
/// last, so a consumer reading zero knows the slot is not yet committed.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct EntryHeader {
    /// Total record length in bytes, header included.
    pub length: u32,
    /// Level ordinal, stored host-native in 4 bytes.
    pub level: u32,
    /// Caller-supplied timestamp; units are the caller's business.
    pub timestamp: u32,
}

/// Size of [`EntryHeader`] as laid out on the ring.
pub const ENTRY_HEADER_LEN: usize = std::mem::size_of::<EntryHeader>();

/// A successfully drained record. The payload itself was copied into the
/// output buffer passed to the drain call; `len` is the number of bytes
/// actually copied (truncation is silent).
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Entry {
    pub level: Level,
    pub timestamp: u32,
    pub len: usize,
}

/// Failure codes for transport operations.
///
/// The discriminants are the stable C ABI codes; [`ffi`](crate::ffi) returns
/// them verbatim. Fieldless so that no error path ever allocates.
#[repr(i32)]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Error {
    /// Insufficient free space for the record. Transient back-pressure.
    Full = -1,
    /// Programmer error: bad capacity, oversize record, null or undersized
    /// argument, or a corrupt on-ring length.
    Invalid = -2,
    /// Drain found the ring quiescent.
    Empty = -3,
    /// Drain found a reserved-but-uncommitted record at the read cursor.
    /// Retry after the stalled producer finishes.
    Busy = -4,
}

impl Error {
    /// The C ABI code for this error.
    pub const fn code(self) -> i32 {
        self as i32
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            Error::Full => "ring full",
            Error::Invalid => "invalid argument or corrupt record",
            Error::Empty => "ring empty",
            Error::Busy => "record not yet committed",
        };
        f.write_str(msg)
    }
}

impl std::error::Error for Error {}

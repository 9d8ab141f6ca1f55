//! Bounded, lock-free, multi-producer single-consumer log transport.
//!
//! Log records are deposited into a caller-provided power-of-two byte buffer
//! by any number of producers (threads, interrupt or signal handlers) and
//! drained by exactly one consumer. No locks, no allocation after init, no
//! blocking on either side.
//!
//! ```
//! use ringlog::{Level, RingLog};
//!
//! #[repr(align(4))]
//! struct Backing([u8; 1024]);
//!
//! let mut backing = Backing([0u8; 1024]);
//! let log = RingLog::new(&mut backing.0).unwrap();
//!
//! log.write(Level::Info, 12345, "hello").unwrap();
//!
//! let mut out = [0u8; 256];
//! let entry = log.read(&mut out).unwrap();
//! assert_eq!(entry.level, Level::Info);
//! assert_eq!(&out[..entry.len], b"hello");
//! ```

pub mod ffi;
pub mod mpsc;

pub use mpsc::ring::RingBuffer;
pub use mpsc::{Entry, EntryHeader, Error, Level, RingLog};

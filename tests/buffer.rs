use ringlog::{Error, Level, RingLog};

#[repr(align(4))]
struct Backing<const N: usize>([u8; N]);

#[test]
fn wraps_around_the_buffer_end() {
    let mut backing = Backing([0u8; 256]);
    let log = RingLog::new(&mut backing.0).unwrap();
    let mut out = [0u8; 256];

    // Fill until full
    let mut written = 0;
    for i in 0..10u32 {
        match log.write_format(Level::Info, i, format_args!("Message {i}")) {
            Ok(()) => written += 1,
            Err(Error::Full) => break,
            Err(e) => panic!("unexpected error: {e}"),
        }
    }
    assert!(written > 0);

    // Free some space, then write across the wrap point
    for _ in 0..written.min(5) {
        assert!(log.read(&mut out).is_ok());
    }
    for i in 10..15u32 {
        match log.write_format(Level::Info, i, format_args!("Message {i}")) {
            Ok(()) | Err(Error::Full) => {}
            Err(e) => panic!("unexpected error: {e}"),
        }
    }

    // Everything left must still drain intact
    let mut last_seen = None;
    while let Ok(entry) = log.read(&mut out) {
        assert!(out[..entry.len].starts_with(b"Message "));
        last_seen = Some(entry.timestamp);
    }
    assert!(last_seen.is_some());
}

#[test]
fn fills_up_and_reports_full() {
    let mut backing = Backing([0u8; 256]);
    let log = RingLog::new(&mut backing.0).unwrap();

    let mut count = 0;
    for i in 0..100u32 {
        match log.write_format(Level::Info, i, format_args!("Test message {i}")) {
            Ok(()) => count += 1,
            Err(Error::Full) => break,
            Err(e) => panic!("unexpected error: {e}"),
        }
    }

    assert!(count > 0, "should fit at least one message");
    assert!(count < 100, "should hit the full condition");
}

#[test]
fn empty_ring_reads_empty_not_busy() {
    let mut backing = Backing([0u8; 1024]);
    let log = RingLog::new(&mut backing.0).unwrap();

    let mut out = [0u8; 256];
    assert_eq!(log.read(&mut out).unwrap_err(), Error::Empty);
}

#[test]
fn uncommitted_reservation_reads_busy() {
    let mut backing = Backing([0u8; 1024]);
    let log = RingLog::new(&mut backing.0).unwrap();

    // A producer stalled between reservation and commit: the slot is claimed
    // but its length word still reads zero.
    log.ring().try_reserve(16).unwrap();
    assert!(!log.is_empty());

    let mut out = [0u8; 256];
    assert_eq!(log.read(&mut out).unwrap_err(), Error::Busy);
    // The consumer must not advance past the stalled slot.
    assert_eq!(log.read(&mut out).unwrap_err(), Error::Busy);
}

#[test]
fn busy_slot_blocks_later_committed_records() {
    let mut backing = Backing([0u8; 1024]);
    let log = RingLog::new(&mut backing.0).unwrap();

    log.ring().try_reserve(16).unwrap();
    // Another producer commits a record behind the stalled one.
    log.write(Level::Info, 7, "behind the stall").unwrap();

    let mut out = [0u8; 256];
    assert_eq!(log.read(&mut out).unwrap_err(), Error::Busy);
}

#[test]
fn oversize_record_is_rejected_untouched() {
    let mut backing = Backing([0u8; 1024]);
    let log = RingLog::new(&mut backing.0).unwrap();

    // 12 + 600 > 1024 / 2
    let large = vec![b'A'; 600];
    assert_eq!(log.write_raw(Level::Info, 0, &large).unwrap_err(), Error::Invalid);

    // Cursors untouched: the ring still works end to end.
    assert!(log.is_empty());
    assert_eq!(log.available(), 0);
    log.write(Level::Info, 1, "still fine").unwrap();
    let mut out = [0u8; 256];
    let entry = log.read(&mut out).unwrap();
    assert_eq!(&out[..entry.len], b"still fine");
}

#[test]
fn largest_fitting_record_is_accepted() {
    let mut backing = Backing([0u8; 1024]);
    let log = RingLog::new(&mut backing.0).unwrap();

    // total = 12 + 500 = 512 == capacity / 2
    let payload = vec![b'B'; 500];
    log.write_raw(Level::Info, 0, &payload).unwrap();
    // One more byte goes over the limit.
    let too_big = vec![b'B'; 501];
    assert_eq!(log.write_raw(Level::Info, 0, &too_big).unwrap_err(), Error::Invalid);

    let mut out = [0u8; 512];
    let entry = log.read(&mut out).unwrap();
    assert_eq!(entry.len, 500);
}

#[test]
fn truncated_read_is_nul_terminated() {
    let mut backing = Backing([0u8; 1024]);
    let log = RingLog::new(&mut backing.0).unwrap();

    log.write(Level::Info, 1, "This is a very long message").unwrap();

    let mut small = [0xFFu8; 10];
    let entry = log.read(&mut small).unwrap();
    assert_eq!(entry.len, small.len() - 1);
    assert_eq!(&small[..entry.len], b"This is a");
    assert_eq!(small[entry.len], 0);

    // The cursor advanced past the whole record regardless.
    assert!(log.is_empty());
}

#[test]
fn zero_sized_output_is_invalid() {
    let mut backing = Backing([0u8; 1024]);
    let log = RingLog::new(&mut backing.0).unwrap();
    log.write(Level::Info, 1, "msg").unwrap();

    let mut out = [0u8; 8];
    assert_eq!(log.read(&mut out[..0]).unwrap_err(), Error::Invalid);
    // The record is still there.
    let entry = log.read(&mut out).unwrap();
    assert_eq!(&out[..entry.len], b"msg");
}

#[test]
fn alternating_write_read() {
    let mut backing = Backing([0u8; 1024]);
    let log = RingLog::new(&mut backing.0).unwrap();
    let mut out = [0u8; 256];

    for i in 0..20u32 {
        log.write_format(Level::Info, i, format_args!("Message {i}")).unwrap();
        let entry = log.read(&mut out).unwrap();
        assert_eq!(entry.timestamp, i);
        assert_eq!(out[..entry.len], *format!("Message {i}").as_bytes());
    }
    assert!(log.is_empty());
}

#[test]
fn drained_slots_read_as_zero() {
    let mut backing = Backing([0u8; 256]);
    {
        let log = RingLog::new(&mut backing.0).unwrap();
        log.write(Level::Fatal, u32::MAX, "scrub me").unwrap();
        let mut out = [0u8; 64];
        log.read(&mut out).unwrap();
        assert!(log.is_empty());
    }
    assert!(backing.0.iter().all(|&b| b == 0));
}

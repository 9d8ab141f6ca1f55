// Several producer threads (stand-ins for interrupt contexts) write
// concurrently while the main thread drains and prints. The drain loop keeps
// polling through Empty/Busy until the producers have gone quiet.

use std::thread;
use std::time::{Duration, Instant};

use ringlog::{Level, RingLog};

#[repr(align(4))]
struct Backing([u8; 4096]);

const NUM_THREADS: u32 = 4;
const MESSAGES_PER_THREAD: u32 = 10;

fn timestamp_ms(epoch: Instant) -> u32 {
    epoch.elapsed().as_millis() as u32
}

fn main() {
    let mut backing = Backing([0u8; 4096]);
    let log = RingLog::new(&mut backing.0).expect("init failed");
    let log = &log;
    let epoch = Instant::now();

    println!("Interrupt-safe logging example");
    println!("Creating {NUM_THREADS} producer threads...");
    println!("----------------------------------------");

    let mut messages_read = 0u32;
    thread::scope(|s| {
        for thread_id in 0..NUM_THREADS {
            s.spawn(move || {
                for i in 0..MESSAGES_PER_THREAD {
                    log.write_format(
                        Level::Info,
                        timestamp_ms(epoch),
                        format_args!("Thread {thread_id}: message {i}"),
                    )
                    .unwrap();
                    thread::sleep(Duration::from_millis(1));
                }
            });
        }

        // Drain until the ring has stayed quiet for a while.
        let mut out = [0u8; 256];
        let mut empty_polls = 0;
        while empty_polls < 100 {
            match log.read(&mut out) {
                Ok(entry) => {
                    let text = std::str::from_utf8(&out[..entry.len]).unwrap_or("<non-utf8>");
                    println!("[{}] {}: {}", entry.timestamp, entry.level.name(), text);
                    messages_read += 1;
                    empty_polls = 0;
                }
                Err(_) => {
                    empty_polls += 1;
                    thread::sleep(Duration::from_millis(1));
                }
            }
        }
    });

    // Producers are done; pick up anything that slipped in late.
    let mut out = [0u8; 256];
    while let Ok(entry) = log.read(&mut out) {
        let text = std::str::from_utf8(&out[..entry.len]).unwrap_or("<non-utf8>");
        println!("[{}] {}: {}", entry.timestamp, entry.level.name(), text);
        messages_read += 1;
    }

    println!("----------------------------------------");
    println!("Total messages read: {messages_read}");
    println!("Expected messages:   {}", NUM_THREADS * MESSAGES_PER_THREAD);
}

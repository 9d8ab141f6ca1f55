// Minimal walkthrough: init over a stack buffer, write at a few levels,
// flip the level gate, drain and pretty-print everything.

use ringlog::{Error, Level, RingLog};

#[repr(align(4))]
struct Backing([u8; 1024]);

fn main() {
    let mut backing = Backing([0u8; 1024]);
    let log = RingLog::new(&mut backing.0).expect("init failed");

    println!("Basic logging example");
    println!("----------------------------------------");

    log.write(Level::Info, 1, "System initialized").unwrap();
    log.write(Level::Debug, 2, "Debug details").unwrap();
    log.write_format(Level::Warn, 3, format_args!("Voltage low: {} mV", 3100)).unwrap();
    log.write(Level::Error, 4, "Sensor timeout").unwrap();

    // Raise the gate: anything below WARN is now dropped at the door.
    log.set_level(Level::Warn);
    log.write(Level::Info, 5, "This one is filtered").unwrap();
    log.write(Level::Fatal, 6, "This one is not").unwrap();

    println!("Occupied bytes before drain: {}", log.available());
    println!();

    let mut out = [0u8; 256];
    loop {
        match log.read(&mut out) {
            Ok(entry) => {
                let text = std::str::from_utf8(&out[..entry.len]).unwrap_or("<non-utf8>");
                println!("[{}] {}: {}", entry.timestamp, entry.level, text);
            }
            Err(Error::Empty) => break,
            Err(e) => {
                eprintln!("drain error: {e}");
                break;
            }
        }
    }

    println!("----------------------------------------");
    println!("Ring empty: {}", log.is_empty());
}

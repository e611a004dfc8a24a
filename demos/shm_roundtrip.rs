// Fills an arena hosted in /dev/shm, then drains it through a second
// mapping of the same region.
// Run with: cargo run --example shm_roundtrip [num_bytes]
use dmxp_queue_arena::Arena::ArenaBuilder;
use dmxp_queue_arena::Core::unlink_shared_memory;
use std::env;
use tracing_subscriber::EnvFilter;

const SHM_NAME: &str = "qarena_demo";

fn main() -> dmxp_queue_arena::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let num_bytes: usize = match env::args().nth(1) {
        Some(arg) => arg.parse().unwrap_or_else(|_| {
            eprintln!("Invalid number of bytes: {}", arg);
            std::process::exit(1);
        }),
        None => 100,
    };

    let mut writer = ArenaBuilder::new()
        .with_capacity(4096)
        .with_shared_memory(SHM_NAME)
        .build()?;

    let even = writer.create_queue()?;
    let odd = writer.create_queue()?;
    let mut written = 0;
    for i in 0..num_bytes {
        let queue = if i % 2 == 0 { even } else { odd };
        match writer.enqueue_byte(queue, i as u8) {
            Ok(()) => written += 1,
            Err(e) if e.is_out_of_memory() => {
                println!("Writer: arena full after {} bytes", written);
                break;
            }
            Err(e) => return Err(e),
        }
    }
    println!("Writer: enqueued {} bytes, usage {}", written, writer.usage());

    let mut reader = ArenaBuilder::new()
        .with_capacity(4096)
        .with_shared_memory(SHM_NAME)
        .attach()?;

    for queue in reader.queues() {
        let mut drained = Vec::new();
        while !reader.is_empty(queue)? {
            drained.push(reader.dequeue_byte(queue)?);
        }
        println!("Reader: slot {} -> {} bytes", queue.index(), drained.len());
        reader.destroy_queue(queue)?;
    }
    println!("Reader: usage back to {}", reader.usage());

    // The writer's mapping observes the reader's changes.
    assert_eq!(writer.usage(), reader.usage());

    unlink_shared_memory(SHM_NAME)?;
    Ok(())
}

// Interleaves two queues in one arena and prints what comes out.
// Run with: cargo run --example scenario
use dmxp_queue_arena::Arena::ArenaBuilder;
use tracing_subscriber::EnvFilter;

fn main() -> dmxp_queue_arena::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let mut arena = ArenaBuilder::new().build()?;
    let initial_usage = arena.usage();

    let q0 = arena.create_queue()?;
    arena.enqueue_byte(q0, 0)?;
    arena.enqueue_byte(q0, 1)?;
    let q1 = arena.create_queue()?;
    arena.enqueue_byte(q1, 3)?;
    arena.enqueue_byte(q0, 2)?;
    arena.enqueue_byte(q1, 4)?;
    print!("{} ", arena.dequeue_byte(q0)?);
    println!("{}", arena.dequeue_byte(q0)?);

    arena.enqueue_byte(q0, 5)?;
    arena.enqueue_byte(q1, 6)?;
    print!("{} ", arena.dequeue_byte(q0)?);
    println!("{}", arena.dequeue_byte(q0)?);
    arena.destroy_queue(q0)?;

    print!("{} ", arena.dequeue_byte(q1)?);
    print!("{} ", arena.dequeue_byte(q1)?);
    println!("{}", arena.dequeue_byte(q1)?);
    arena.destroy_queue(q1)?;

    assert_eq!(arena.usage(), initial_usage);
    println!("{:?}", arena);

    Ok(())
}

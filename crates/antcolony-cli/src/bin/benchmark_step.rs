use antcolony_core::{SimConfig, World};
use std::time::{Duration, Instant};

fn main() {
    let ant_count = 20_000;
    let config = SimConfig {
        width: 1920.0,
        height: 1080.0,
        ant_count,
        seed: 42,
        ..SimConfig::default()
    };
    println!(
        "Benchmarking {} ants on a {}x{} field (cell size {})",
        ant_count, config.width, config.height, config.cell_size
    );

    let mut world = World::new(config);
    let warmup = 50;
    for _ in 0..warmup {
        world.step();
    }

    let steps = 200u32;
    let mut field_total = Duration::ZERO;
    let mut ants_total = Duration::ZERO;
    let start = Instant::now();
    for _ in 0..steps {
        let timings = world.step();
        field_total += Duration::from_micros(timings.field_us);
        ants_total += Duration::from_micros(timings.ants_us);
    }
    let elapsed = start.elapsed();

    println!("Time for {} steps: {:?}", steps, elapsed);
    println!("Avg time per step: {:?}", elapsed / steps);
    println!("  field phase: {:?}", field_total / steps);
    println!("  ant phase:   {:?}", ants_total / steps);

    let metrics = world.collect_step_metrics();
    println!(
        "Pickups: {}, deliveries: {}, carrying now: {}",
        metrics.total_pickups, metrics.total_deliveries, metrics.carrying_count
    );
}

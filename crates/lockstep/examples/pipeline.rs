//! A polled two-sensor pipeline: camera frames drive, IMU samples follow.
//!
//! Run with: cargo run --example pipeline

use lockstep::drivers::Next;
use lockstep::followers::ClosestBefore;
use lockstep::{DriverCaptor, FollowerCaptor, Stamped, Synchronizer};

fn main() {
    // Camera at ~10 stamp ticks per frame; IMU at ~3 ticks per sample.
    let mut group = (
        DriverCaptor::new(Next::new()),
        FollowerCaptor::new(ClosestBefore::<i64>::new(0, 4).unwrap()),
    );
    let mut sinks: (Vec<Stamped<i64, &str>>, Vec<Stamped<i64, [f32; 3]>>) =
        (Vec::new(), Vec::new());

    for tick in 0..60i64 {
        if tick % 10 == 0 {
            group.0.inject(Stamped::new(tick, "frame"));
        }
        if tick % 3 == 0 {
            group
                .1
                .inject(Stamped::new(tick, [0.1 * tick as f32, 0.0, 9.8]));
        }

        let result = Synchronizer::capture(&mut group, &mut sinks);
        if result.is_primed() {
            let frame = sinks.0.last().map(|d| d.stamp).unwrap_or_default();
            let imu = sinks.1.last().map(|d| d.stamp).unwrap_or_default();
            println!("frame @ {frame:>3} paired with imu @ {imu:>3}");
        }
    }

    println!(
        "captured {} frames, {} imu samples",
        sinks.0.len(),
        sinks.1.len()
    );
}

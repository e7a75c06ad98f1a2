//! Producer threads feeding shared captors while the main thread blocks in
//! group capture.
//!
//! Run with: cargo run --example threaded

use lockstep::drivers::Chunk;
use lockstep::followers::Before;
use lockstep::{
    CaptureSignal, DriverCaptor, FollowerCaptor, SharedDriver, SharedFollower, Synchronizer,
};
use std::thread;
use std::time::{Duration, Instant};

const FRAMES: usize = 10;

fn main() {
    let signal = CaptureSignal::new();
    let scans = SharedDriver::new(DriverCaptor::new(Chunk::new(2).unwrap()), &signal);
    let odometry = SharedFollower::new(FollowerCaptor::new(Before::<i64>::new(0)), &signal);

    let scan_producer = {
        let scans = scans.clone();
        thread::spawn(move || {
            for i in 0..(FRAMES as i64 * 2) {
                scans.inject(i * 50);
                thread::sleep(Duration::from_millis(2));
            }
        })
    };
    let odom_producer = {
        let odometry = odometry.clone();
        thread::spawn(move || {
            for i in 0..(FRAMES as i64 * 10) {
                odometry.inject(i * 10 + 5);
                thread::sleep(Duration::from_millis(1));
            }
        })
    };

    let mut group = (scans, odometry);
    let mut sinks: (Vec<i64>, Vec<i64>) = (Vec::new(), Vec::new());

    for frame in 0..FRAMES {
        let deadline = Instant::now() + Duration::from_secs(2);
        let result = Synchronizer::capture_until(&mut group, &mut sinks, deadline);
        println!(
            "frame {frame}: {:?} range {:?} ({} scans, {} odom so far)",
            result.state,
            result.range,
            sinks.0.len(),
            sinks.1.len()
        );
        if !result.is_primed() {
            break;
        }
    }

    scan_producer.join().unwrap();
    odom_producer.join().unwrap();
}

//! Reproducible random streams.
//!
//! Every unit of work derives its own generator from `(seed, salt, index)`, so
//! rayon workers never share generator state and the results do not depend on
//! how points are split between threads.

use rand::SeedableRng;
use rand_xorshift::XorShiftRng;

pub type SimRng = XorShiftRng;

/// Salt of the streams used while generating the initial galaxy.
pub const SPAWN_SALT: u64 = 0;

const SPARKLE_SALT: u64 = 0x5350_4152_4b4c_4553;

/// Generator for point `index` in the stream identified by `salt`.
pub fn point_stream(seed: u64, salt: u64, index: u64) -> SimRng {
    let key = splitmix64(splitmix64(seed ^ splitmix64(salt)) ^ index);
    XorShiftRng::seed_from_u64(key)
}

/// Salt of the respawn streams of the given frame.
pub fn respawn_salt(frame: u64) -> u64 {
    frame.wrapping_add(1)
}

/// The single stream owned by the sparkle emitter.
pub fn sparkle_stream(seed: u64) -> SimRng {
    XorShiftRng::seed_from_u64(splitmix64(seed ^ SPARKLE_SALT))
}

fn splitmix64(x: u64) -> u64 {
    let mut z = x.wrapping_add(0x9e37_79b9_7f4a_7c15);
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    z ^ (z >> 31)
}

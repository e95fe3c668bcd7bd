//! Nearest tank-level sample lookup

use crate::app::models::{TankLevelSample, non_negative_volume};

/// Sample whose timestamp is nearest to `timestamp`
///
/// Linear scan; on equal distance the first sample encountered wins.
pub fn nearest_sample(samples: &[TankLevelSample], timestamp: i64) -> Option<&TankLevelSample> {
    let mut best: Option<(&TankLevelSample, u64)> = None;

    for sample in samples {
        let distance = sample.timestamp.abs_diff(timestamp);
        match best {
            Some((_, best_distance)) if distance >= best_distance => {}
            _ => best = Some((sample, distance)),
        }
    }

    best.map(|(sample, _)| sample)
}

/// Dispensed volume from the level drop between two readings
///
/// A rising level is a measurement artifact and yields zero.
pub fn level_drop_volume(start: &TankLevelSample, end: &TankLevelSample) -> f64 {
    non_negative_volume(start.volume - end.volume)
}

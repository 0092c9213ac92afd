//! In-memory stream driver.

use crate::alert::Alert;
use crate::reading::Reading;
use crate::tracker::ViolationTracker;

/// Feed readings through the tracker in arrival order and collect every alert.
pub fn collect_alerts<'a, I>(tracker: &mut ViolationTracker, readings: I) -> Vec<Alert>
where
    I: IntoIterator<Item = &'a Reading>,
{
    readings
        .into_iter()
        .filter_map(|reading| tracker.process(reading))
        .collect()
}

// Helpers shared by the example binaries

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, TryFromFloatSecsError};

/// Convert a `--max-seconds` budget into a duration. Negative, infinite, NaN
/// or out-of-range values are rejected.
pub fn budget(seconds: f64) -> Result<Duration, TryFromFloatSecsError> {
    Duration::try_from_secs_f64(seconds)
}

/// Cancel flag that a timer thread sets once `budget` elapses. With no
/// budget the flag is never set.
pub fn cancel_after(budget: Option<Duration>) -> Arc<AtomicBool> {
    let cancel = Arc::new(AtomicBool::new(false));
    if let Some(budget) = budget {
        let flag = Arc::clone(&cancel);
        thread::spawn(move || {
            thread::sleep(budget);
            flag.store(true, Ordering::Relaxed);
        });
    }
    cancel
}

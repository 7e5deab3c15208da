use std::time::Duration;

use tokio::time::sleep;
use tokio_util::sync::CancellationToken;

/// Wait out `delay` unless `cancel` fires first.
/// Returns `false` when the pause was cut short by cancellation.
pub async fn pause(delay: Duration, cancel: &CancellationToken) -> bool {
    if delay.is_zero() {
        return !cancel.is_cancelled();
    }

    tokio::select! {
        _ = sleep(delay) => true,
        _ = cancel.cancelled() => false,
    }
}

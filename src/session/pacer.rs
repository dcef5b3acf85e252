//! Frame pacing: a fixed delay followed by the next display refresh.

use std::time::Duration;

use tokio::time::Instant;

use crate::foundation::error::{PlaybackError, PlaybackResult};

/// Pacing configuration.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct PacingOpts {
    /// Delay after a render before the next tick may start, in milliseconds.
    pub frame_delay_ms: u64,
    /// Display refresh rate the tick aligns to after the delay.
    pub refresh_hz: f64,
}

impl Default for PacingOpts {
    fn default() -> Self {
        Self {
            frame_delay_ms: 400,
            refresh_hz: 60.0,
        }
    }
}

impl PacingOpts {
    /// Delay as a [`Duration`].
    pub fn frame_delay(&self) -> Duration {
        Duration::from_millis(self.frame_delay_ms)
    }

    /// Length of one refresh period.
    pub fn refresh_period(&self) -> PlaybackResult<Duration> {
        if !self.refresh_hz.is_finite() || self.refresh_hz <= 0.0 {
            return Err(PlaybackError::validation(format!(
                "refresh_hz must be a positive number, got {}",
                self.refresh_hz
            )));
        }
        let period = Duration::from_secs_f64(1.0 / self.refresh_hz);
        if period.is_zero() {
            return Err(PlaybackError::validation("refresh_hz is too large"));
        }
        Ok(period)
    }
}

/// Waits `frame_delay`, then until the next refresh boundary.
///
/// Refresh boundaries are `epoch + k * period`, where `epoch` is the pacer's creation time.
#[derive(Clone, Debug)]
pub struct FramePacer {
    frame_delay: Duration,
    period: Duration,
    epoch: Instant,
}

impl FramePacer {
    /// Pacer whose refresh boundaries start now.
    pub fn new(opts: &PacingOpts) -> PlaybackResult<Self> {
        Self::with_epoch(opts, Instant::now())
    }

    /// Pacer with an explicit refresh epoch.
    pub fn with_epoch(opts: &PacingOpts, epoch: Instant) -> PlaybackResult<Self> {
        Ok(Self {
            frame_delay: opts.frame_delay(),
            period: opts.refresh_period()?,
            epoch,
        })
    }

    /// Smallest refresh boundary at or after `t`.
    pub fn next_refresh_at_or_after(&self, t: Instant) -> Instant {
        let elapsed = t.saturating_duration_since(self.epoch).as_nanos();
        let period = self.period.as_nanos();
        let k = elapsed.div_ceil(period);
        let offset = period.saturating_mul(k);
        self.epoch + Duration::from_nanos(u64::try_from(offset).unwrap_or(u64::MAX))
    }

    /// Sleep for the frame delay, then until the next refresh boundary.
    pub async fn wait(&self) {
        tokio::time::sleep(self.frame_delay).await;
        let paint = self.next_refresh_at_or_after(Instant::now());
        tokio::time::sleep_until(paint).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn refresh_period_validation() {
        let bad = PacingOpts {
            refresh_hz: 0.0,
            ..PacingOpts::default()
        };
        assert!(bad.refresh_period().is_err());
        let bad = PacingOpts {
            refresh_hz: f64::NAN,
            ..PacingOpts::default()
        };
        assert!(bad.refresh_period().is_err());
        let ok = PacingOpts {
            refresh_hz: 50.0,
            ..PacingOpts::default()
        };
        assert_eq!(ok.refresh_period().unwrap(), Duration::from_millis(20));
    }

    #[tokio::test(start_paused = true)]
    async fn boundary_is_rounded_up_to_period() {
        let opts = PacingOpts {
            frame_delay_ms: 400,
            refresh_hz: 50.0,
        };
        let epoch = Instant::now();
        let pacer = FramePacer::with_epoch(&opts, epoch).unwrap();
        assert_eq!(pacer.next_refresh_at_or_after(epoch), epoch);
        assert_eq!(
            pacer.next_refresh_at_or_after(epoch + Duration::from_millis(1)),
            epoch + Duration::from_millis(20)
        );
        assert_eq!(
            pacer.next_refresh_at_or_after(epoch + Duration::from_millis(40)),
            epoch + Duration::from_millis(40)
        );
    }

    #[tokio::test(start_paused = true)]
    async fn wait_lands_on_refresh_boundary_after_delay() {
        let opts = PacingOpts {
            frame_delay_ms: 400,
            refresh_hz: 50.0,
        };
        let start = Instant::now();
        let pacer = FramePacer::new(&opts).unwrap();
        tokio::time::sleep(Duration::from_millis(5)).await;
        pacer.wait().await;
        // 5ms + 400ms delay, then the 20ms grid rounds up to 420ms.
        assert_eq!(start.elapsed(), Duration::from_millis(420));
    }
}

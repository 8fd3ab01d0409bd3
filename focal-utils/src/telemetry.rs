//! Stage timing for the crop pipeline.
//!
//! A [`TimingGuard`] records when a stage started and logs the elapsed time on
//! the `focal::telemetry` target when dropped. Guards only activate when
//! telemetry has been switched on through [`configure`] and the logger accepts
//! the requested level, so leaving them in hot paths costs an `Instant::now()`.

use std::{
    borrow::Cow,
    sync::atomic::{AtomicBool, AtomicUsize, Ordering},
    time::{Duration, Instant},
};

use log::{Level, LevelFilter, log, log_enabled};

/// Log target used for every timing line.
pub const TELEMETRY_TARGET: &str = "focal::telemetry";

static ENABLED: AtomicBool = AtomicBool::new(false);
static THRESHOLD: AtomicUsize = AtomicUsize::new(LevelFilter::Off as usize);

/// RAII helper that logs how long a pipeline stage took when dropped.
pub struct TimingGuard {
    stage: Cow<'static, str>,
    level: Level,
    started: Instant,
    active: bool,
}

impl TimingGuard {
    /// Returns `true` when the guard will emit a log entry on drop.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Stop the guard without logging and return the elapsed time.
    pub fn finish(mut self) -> Duration {
        self.active = false;
        self.started.elapsed()
    }
}

impl Drop for TimingGuard {
    fn drop(&mut self) {
        if self.active {
            log!(
                target: TELEMETRY_TARGET,
                self.level,
                "{} took {:.2?}",
                self.stage,
                self.started.elapsed()
            );
        }
    }
}

/// Start timing `stage`, logging at `level` if telemetry allows it.
pub fn timing_guard(stage: impl Into<Cow<'static, str>>, level: Level) -> TimingGuard {
    timing_guard_if(stage, level, true)
}

/// Like [`timing_guard`] but also gated on a caller-supplied flag.
pub fn timing_guard_if(
    stage: impl Into<Cow<'static, str>>,
    level: Level,
    enabled: bool,
) -> TimingGuard {
    let active =
        enabled && telemetry_allows(level) && log_enabled!(target: TELEMETRY_TARGET, level);
    TimingGuard {
        stage: stage.into(),
        level,
        started: Instant::now(),
        active,
    }
}

/// Switch telemetry on or off and set the most verbose level it may log at.
pub fn configure(enabled: bool, level: LevelFilter) {
    ENABLED.store(enabled, Ordering::Relaxed);
    THRESHOLD.store(level as usize, Ordering::Relaxed);
}

/// Whether telemetry is currently switched on.
pub fn telemetry_enabled() -> bool {
    ENABLED.load(Ordering::Relaxed)
}

/// The configured telemetry threshold.
pub fn telemetry_level() -> LevelFilter {
    let index = THRESHOLD.load(Ordering::Relaxed);
    LevelFilter::iter()
        .find(|filter| *filter as usize == index)
        .unwrap_or(LevelFilter::Off)
}

/// Returns `true` when telemetry is on and `level` is within the threshold.
pub fn telemetry_allows(level: Level) -> bool {
    telemetry_enabled() && level <= telemetry_level()
}

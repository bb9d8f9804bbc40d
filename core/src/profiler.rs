//! Per-category frame timing
//!
//! Handlers time themselves with [`Profiler::timer`]. Sleep time may be
//! reported from any thread; only sleeps on the render thread count toward
//! the frame, the rest are tallied separately. Reports are produced for
//! frames slower than the configured threshold.

use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, OnceLock};
use std::thread::ThreadId;
use std::time::{Duration, Instant};

use tracing::info;

use crate::debug::DebugStat;
use crate::texture::HasherStats;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProfCategory {
    TextureSource,
    MotionPrediction,
    Draw,
    DrawBatches,
    TextureDownload,
    Sleep,
    Present,
    Hooks,
}

const CATEGORY_COUNT: usize = 8;
/// Slot accumulating all categories
const TOTAL: usize = CATEGORY_COUNT;

impl ProfCategory {
    pub const ALL: [ProfCategory; CATEGORY_COUNT] = [
        ProfCategory::TextureSource,
        ProfCategory::MotionPrediction,
        ProfCategory::Draw,
        ProfCategory::DrawBatches,
        ProfCategory::TextureDownload,
        ProfCategory::Sleep,
        ProfCategory::Present,
        ProfCategory::Hooks,
    ];

    fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            ProfCategory::TextureSource => "TextureSource",
            ProfCategory::MotionPrediction => "MotionPrediction",
            ProfCategory::Draw => "Draw",
            ProfCategory::DrawBatches => "DrawBatches",
            ProfCategory::TextureDownload => "TextureDownload",
            ProfCategory::Sleep => "Sleep",
            ProfCategory::Present => "Present",
            ProfCategory::Hooks => "Hooks",
        }
    }
}

/// Accumulated time and event count
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Timing {
    pub time: Duration,
    pub events: u32,
}

/// Snapshot of one frame's profile
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileReport {
    pub frame_time: Duration,
    pub total: Timing,
    pub categories: [(ProfCategory, Timing); CATEGORY_COUNT],
    /// Sleeps reported from threads other than the render thread
    pub other_sleep: Timing,
    pub texture_hash: HasherStats,
}

impl ProfileReport {
    pub fn timing(&self, category: ProfCategory) -> Timing {
        self.categories[category.index()].1
    }

    pub fn to_debug_stats(&self) -> Vec<DebugStat> {
        let mut stats = Vec::with_capacity(CATEGORY_COUNT + 5);
        stats.push(DebugStat::new(
            "Time",
            format!("{:.4}ms", self.frame_time.as_secs_f64() * 1000.0),
        ));
        stats.push(DebugStat::timing("Profiled time", self.total.time, self.total.events));
        for (category, t) in &self.categories {
            stats.push(DebugStat::timing(category.name(), t.time, t.events));
        }
        stats.push(DebugStat::timing(
            "Sleep (other)",
            self.other_sleep.time,
            self.other_sleep.events,
        ));
        stats.push(DebugStat::new(
            "TextureHash misses",
            format!("{}/{}", self.texture_hash.misses, self.texture_hash.lookups),
        ));
        stats.push(DebugStat::bytes("TextureHash miss bytes", self.texture_hash.miss_bytes));
        stats
    }
}

#[derive(Debug)]
pub struct Profiler {
    enabled: bool,
    threshold: Duration,
    render_thread: OnceLock<ThreadId>,
    times_ns: [AtomicU64; CATEGORY_COUNT + 1],
    events: [AtomicU32; CATEGORY_COUNT + 1],
    other_sleep_ns: AtomicU64,
    other_sleep_events: AtomicU32,
    halt_sleep: AtomicU32,
    last_report: Mutex<Instant>,
}

impl Profiler {
    pub fn new(enabled: bool, threshold: Duration) -> Self {
        Self {
            enabled,
            threshold,
            render_thread: OnceLock::new(),
            times_ns: std::array::from_fn(|_| AtomicU64::new(0)),
            events: std::array::from_fn(|_| AtomicU32::new(0)),
            other_sleep_ns: AtomicU64::new(0),
            other_sleep_events: AtomicU32::new(0),
            halt_sleep: AtomicU32::new(0),
            last_report: Mutex::new(Instant::now()),
        }
    }

    pub fn disabled() -> Self {
        Self::new(false, Duration::MAX)
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Identify the thread the host renders on. Only the first call counts.
    pub fn set_render_thread(&self, id: ThreadId) {
        let _ = self.render_thread.set(id);
    }

    fn add(&self, slot: usize, time: Duration) {
        let ns = time.as_nanos() as u64;
        self.times_ns[slot].fetch_add(ns, Ordering::Relaxed);
        self.times_ns[TOTAL].fetch_add(ns, Ordering::Relaxed);
        self.events[slot].fetch_add(1, Ordering::Relaxed);
        self.events[TOTAL].fetch_add(1, Ordering::Relaxed);
    }

    pub fn record(&self, category: ProfCategory, time: Duration) {
        if !self.enabled {
            return;
        }
        if category == ProfCategory::Sleep {
            self.record_sleep(time);
        } else {
            self.add(category.index(), time);
        }
    }

    /// Record time spent sleeping, from whichever thread slept
    pub fn record_sleep(&self, time: Duration) {
        if !self.enabled || self.halt_sleep.load(Ordering::Relaxed) > 0 {
            return;
        }
        let on_render_thread = self.render_thread.get() == Some(&std::thread::current().id());
        if on_render_thread {
            self.add(ProfCategory::Sleep.index(), time);
        } else {
            self.other_sleep_ns
                .fetch_add(time.as_nanos() as u64, Ordering::Relaxed);
            self.other_sleep_events.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Time the enclosing scope under `category`
    pub fn timer(self: &Arc<Self>, category: ProfCategory) -> ScopedTimer {
        ScopedTimer {
            inner: self
                .enabled
                .then(|| (Arc::clone(self), category, Instant::now())),
        }
    }

    /// Suppress sleep accounting while the guard lives
    pub fn halt_sleep_profile(self: &Arc<Self>) -> HaltSleepProfile {
        self.halt_sleep.fetch_add(1, Ordering::Relaxed);
        HaltSleepProfile {
            profiler: Arc::clone(self),
        }
    }

    fn timing(&self, slot: usize) -> Timing {
        Timing {
            time: Duration::from_nanos(self.times_ns[slot].load(Ordering::Relaxed)),
            events: self.events[slot].load(Ordering::Relaxed),
        }
    }

    pub fn snapshot(&self, frame_time: Duration, texture_hash: HasherStats) -> ProfileReport {
        ProfileReport {
            frame_time,
            total: self.timing(TOTAL),
            categories: ProfCategory::ALL.map(|c| (c, self.timing(c.index()))),
            other_sleep: Timing {
                time: Duration::from_nanos(self.other_sleep_ns.load(Ordering::Relaxed)),
                events: self.other_sleep_events.load(Ordering::Relaxed),
            },
            texture_hash,
        }
    }

    fn reset(&self) {
        for t in &self.times_ns {
            t.store(0, Ordering::Relaxed);
        }
        for e in &self.events {
            e.store(0, Ordering::Relaxed);
        }
        self.other_sleep_ns.store(0, Ordering::Relaxed);
        self.other_sleep_events.store(0, Ordering::Relaxed);
    }

    /// Close the frame's profile.
    ///
    /// Every frame restarts the frame clock and resets the counters. Only
    /// gameplay frames longer than the threshold are logged and returned.
    pub fn write_profile(&self, in_game: bool, texture_hash: HasherStats) -> Option<ProfileReport> {
        if !self.enabled {
            return None;
        }

        let now = Instant::now();
        let frame_time = match self.last_report.lock() {
            Ok(mut last) => now.duration_since(std::mem::replace(&mut *last, now)),
            Err(_) => return None,
        };

        let report = (in_game && frame_time > self.threshold).then(|| {
            let report = self.snapshot(frame_time, texture_hash);
            let lines: Vec<String> = report
                .to_debug_stats()
                .into_iter()
                .map(|s| format!("{}: {}", s.name, s.value))
                .collect();
            info!("Frame profile:\n{}", lines.join("\n"));
            report
        });

        self.reset();
        report
    }
}

/// Records elapsed time into the profiler when dropped
#[must_use]
pub struct ScopedTimer {
    inner: Option<(Arc<Profiler>, ProfCategory, Instant)>,
}

impl Drop for ScopedTimer {
    fn drop(&mut self) {
        if let Some((profiler, category, start)) = self.inner.take() {
            profiler.record(category, start.elapsed());
        }
    }
}

/// While alive, sleep reports are ignored
#[must_use]
pub struct HaltSleepProfile {
    profiler: Arc<Profiler>,
}

impl Drop for HaltSleepProfile {
    fn drop(&mut self) {
        self.profiler.halt_sleep.fetch_sub(1, Ordering::Relaxed);
    }
}

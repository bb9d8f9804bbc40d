//! Diagnostics: runtime statistics and texture dumps

mod dump;
mod stats;

pub use dump::dump_texture;
pub use stats::DebugStat;

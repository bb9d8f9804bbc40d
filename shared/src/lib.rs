//! Shared types for the glidebridge Glide renderer.
//!
//! Screen-space geometry and the fixed platform limits that both the
//! engine core and backend implementations agree on.

pub mod constants;
pub mod math;

pub use constants::*;
pub use math::{Offset, OffsetF, Rect, Size};

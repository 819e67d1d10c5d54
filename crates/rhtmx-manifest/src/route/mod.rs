/// Route module for file-based routing
///
/// Pure components that turn file names into compiled routes:
/// - `segment` - one file name → typed parts
/// - `specificity` - sibling ordering (match priority)
/// - `pattern` - segment tree → matcher + generator

pub mod pattern;
pub mod segment;
pub mod specificity;

// Re-export commonly used types
pub use pattern::{compile, RouteGenerator, RouteMatcher, SegmentTree};
pub use segment::{parse_segment, Part};
pub use specificity::{compare_items, Item};

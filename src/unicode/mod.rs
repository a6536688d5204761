//! Unicode utilities for cluster iteration, character classes and
//! fixed-width measurement.

mod class;
mod grapheme;
mod width;

pub use class::{CharClass, is_line_break, line_break_len};
pub use grapheme::{Cluster, clusters, next_cluster_boundary, prev_cluster_boundary};
pub use width::{WidthMethod, display_width_with_method};

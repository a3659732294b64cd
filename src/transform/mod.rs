//! Table transform steps applied between parsing and joining

pub mod percentage;
pub mod pivot;
pub mod sanitize;
pub mod week;

pub use percentage::{coerce_percentage, normalize_percentages, trim_headers};
pub use pivot::{pivot, rename_age_columns};
pub use sanitize::{filter_degenerate, DEFAULT_MIN_DISTINCT};
pub use week::{derive_weeks, year_week};

//! Reusable widget components.

pub mod detail;
pub mod filter;
pub mod pagination;
pub mod status;

pub use detail::DetailPanel;
pub use filter::{FilterBar, FilterOption};
pub use pagination::PaginationBar;
pub use status::StatusIndicator;

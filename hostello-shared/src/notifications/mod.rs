//! Notification read-state overlay, polling support and list view helpers.

pub mod center;
pub mod overlay;
pub mod view;

pub use center::{FetchMode, NotificationCenter, ReadAck};
pub use overlay::{Arrival, ReadStateOverlay, merge};
pub use view::{NotificationQuery, PAGE_SIZE, Pager, ReadFilter, Selection};

//! menubar-search: expose the frontmost application's menu bar items as
//! searchable, activatable results.
//!
//! The crate walks the focused application's accessibility menu tree,
//! flattens the enabled, actionable items into a flat list with computed
//! shortcut labels, caches that list per frontmost process, and ranks it
//! against query text. Selecting an item performs its press action through
//! the retained accessibility handle.
//!
//! # Quick start
//!
//! ```no_run
//! # #[cfg(target_os = "macos")] {
//! use menubar_search::{CancelFlag, MenuSearch};
//!
//! let search = MenuSearch::system();
//! let results = search.query("paste", &CancelFlag::new())?;
//! for ranked in &results {
//!     println!("{}  {}", ranked.record.breadcrumb(), ranked.record.shortcut);
//! }
//! if let Some(best) = results.first() {
//!     search.activate(&best.record)?;
//! }
//! # }
//! # Ok::<(), menubar_search::MenuError>(())
//! ```
//!
//! # Modules
//!
//! - [`types`]: records, tri-state attribute decoding, errors
//! - [`glyph`] / [`modifiers`]: shortcut label translation tables
//! - [`walker`]: the recursive menu tree traversal
//! - [`cache`]: per-frontmost-process snapshot cache
//! - [`dispatch`]: handoff to the thread owning accessibility access
//! - [`matcher`]: fuzzy ranking of cached items
//! - [`search`]: the facade a host launcher embeds
//! - [`platform`]: the macOS accessibility backend (macOS only)
//!
//! The core is platform-independent: everything above `platform` runs
//! against synthetic trees in tests. Only the system backend requires
//! macOS and granted accessibility permission.

pub mod cache;
pub mod dispatch;
pub mod glyph;
pub mod matcher;
pub mod modifiers;
pub mod search;
pub mod types;
pub mod walker;

#[cfg(target_os = "macos")]
pub mod platform;

pub use cache::MenuCache;
pub use dispatch::{DispatchError, UiDispatcher};
pub use matcher::{rank, Ranked};
pub use search::{FrontmostApp, FrontmostSource, MenuSearch, SearchOptions};
pub use types::{Attr, CancelFlag, IconData, MenuError, MenuItemInfo, MenuItemRecord};
pub use walker::{walk, MenuNode, NodeAttributes, MAX_MENU_DEPTH, PRESS_ACTION};

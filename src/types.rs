//! Core data types for the menubar-search crate.
//!
//! This module defines the fundamental types used throughout the crate:
//! - `Attr`: tri-state result of decoding one accessibility attribute
//! - `MenuItemRecord`: one actionable menu entry produced by the walker
//! - `IconData`: the owning application's icon, shared across one snapshot
//! - `CancelFlag`: cooperative cancellation observed by the walker
//! - `MenuError`: error types surfaced by the search facade

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::dispatch::DispatchError;

/// Outcome of reading a single accessibility attribute.
///
/// The accessibility tree is inherently unreliable: third-party applications
/// implement it with varying correctness. Every attribute read therefore
/// decodes to one of three states instead of raising an error:
///
/// - `Value(T)`: the attribute was present and well-typed.
/// - `Missing`: the node simply lacks the attribute (expected, frequent;
///   a submenu container has no shortcut). Never logged.
/// - `Malformed`: the returned value had the wrong type or was an error
///   sentinel. Logged at debug severity by the consumer, then treated as
///   absent.
///
/// No `Attr` state is fatal; failures stay scoped to the attribute, node,
/// or subtree they occurred in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Attr<T> {
    /// Attribute present and well-typed.
    Value(T),
    /// Attribute not provided by this node.
    Missing,
    /// Attribute present but undecodable (wrong type or error sentinel).
    Malformed,
}

impl<T> Attr<T> {
    /// Returns the contained value, discarding the missing/malformed
    /// distinction.
    pub fn value(self) -> Option<T> {
        match self {
            Attr::Value(v) => Some(v),
            Attr::Missing | Attr::Malformed => None,
        }
    }

    /// Borrowing accessor for the contained value.
    pub fn as_value(&self) -> Option<&T> {
        match self {
            Attr::Value(v) => Some(v),
            Attr::Missing | Attr::Malformed => None,
        }
    }
}

impl<T> From<Option<T>> for Attr<T> {
    fn from(opt: Option<T>) -> Self {
        match opt {
            Some(v) => Attr::Value(v),
            None => Attr::Missing,
        }
    }
}

/// Icon data for the application owning a menu snapshot.
///
/// Pixel data is behind an `Arc` so that every record of one traversal can
/// share the same decoded icon without copying it.
#[derive(Debug, Clone)]
pub enum IconData {
    /// Pre-decoded RGBA pixel data.
    Rgba {
        width: u32,
        height: u32,
        pixels: Arc<Vec<u8>>,
    },
    /// Text/emoji fallback when no icon could be decoded.
    Text(String),
}

/// One actionable, enabled menu entry.
///
/// Produced by the tree walker for leaves that are enabled and expose the
/// primary press action. The record exclusively owns one retained reference
/// to the underlying OS node: `Clone` retains, `Drop` releases exactly once
/// (on macOS this is the CoreFoundation retain/release pair carried by the
/// wrapped handle type).
#[derive(Debug, Clone)]
pub struct MenuItemRecord<N> {
    /// Menu titles from the top-level menu down to this item, in traversal
    /// order. Only non-empty trimmed titles are recorded.
    pub path: Vec<String>,
    /// Human-readable keyboard shortcut label ("⇧⌘S"), possibly empty.
    pub shortcut: String,
    /// Icon of the owning application, shared across the snapshot.
    pub icon: Option<IconData>,
    /// Retained handle used to trigger the press action later.
    pub node: N,
}

impl<N> MenuItemRecord<N> {
    /// Display text: the last path segment.
    ///
    /// Leaves with an empty title are permitted; their text falls back to
    /// the nearest titled ancestor, which can produce duplicate-looking
    /// entries for unnamed actionable leaves.
    pub fn text(&self) -> &str {
        self.path.last().map(String::as_str).unwrap_or("")
    }

    /// Display breadcrumb: all path segments joined with `" > "`.
    pub fn breadcrumb(&self) -> String {
        self.path.join(" > ")
    }

    /// Stable identity key: the concatenated path titles.
    pub fn id(&self) -> String {
        self.path.concat()
    }

    /// Serializable summary of this record (the record itself owns a live
    /// OS handle and cannot round-trip through serde).
    pub fn info(&self) -> MenuItemInfo {
        MenuItemInfo {
            path: self.path.clone(),
            text: self.text().to_string(),
            shortcut: self.shortcut.clone(),
        }
    }
}

/// Serializable summary of a menu item, for CLI/JSON output.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MenuItemInfo {
    /// Menu titles from top-level menu to leaf.
    pub path: Vec<String>,
    /// Display text (last path segment).
    pub text: String,
    /// Keyboard shortcut label, empty when the item has none.
    pub shortcut: String,
}

/// Cooperative cancellation for an in-flight traversal.
///
/// Reflects "is the originating query still the active query". The flag
/// starts live; the host flips it when the query is superseded. The walker
/// checks it at the start of every recursive call and returns partial
/// results promptly, without treating cancellation as an error.
#[derive(Debug, Clone)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    /// A fresh, live flag.
    pub fn new() -> Self {
        CancelFlag(Arc::new(AtomicBool::new(true)))
    }

    /// True while the originating query is still active.
    pub fn is_live(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }

    /// Mark the originating query as superseded.
    pub fn cancel(&self) {
        self.0.store(false, Ordering::Relaxed);
    }
}

impl Default for CancelFlag {
    fn default() -> Self {
        Self::new()
    }
}

/// Errors surfaced by the search facade.
///
/// Traversal itself cannot fail (it yields a list, possibly empty, plus
/// logs); these cover the boundaries around it: permissions, frontmost-app
/// discovery, the UI-thread handoff, and action invocation.
#[derive(Debug, Error)]
pub enum MenuError {
    /// Accessibility permission not granted to this process.
    #[error("accessibility permission not granted")]
    PermissionDenied,

    /// No application currently has input focus.
    #[error("no frontmost application")]
    NoFrontmostApp,

    /// The frontmost application exposes no readable menu bar.
    #[error("menu bar unavailable: {0}")]
    MenuBarUnavailable(String),

    /// Performing the item's press action failed.
    #[error("menu action failed: {0}")]
    ActionFailed(String),

    /// The UI-thread handoff failed or timed out.
    #[error("ui dispatch failed: {0}")]
    Dispatch(#[from] DispatchError),

    /// Running on a platform without an accessibility backend.
    #[error("platform not supported")]
    Unsupported,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn record(path: &[&str], shortcut: &str) -> MenuItemRecord<u8> {
        MenuItemRecord {
            path: path.iter().map(|s| s.to_string()).collect(),
            shortcut: shortcut.to_string(),
            icon: None,
            node: 0,
        }
    }

    #[test]
    fn test_attr_value_accessors() {
        assert_eq!(Attr::Value(7).value(), Some(7));
        assert_eq!(Attr::<i32>::Missing.value(), None);
        assert_eq!(Attr::<i32>::Malformed.value(), None);
        assert_eq!(Attr::Value("x").as_value(), Some(&"x"));
    }

    #[test]
    fn test_attr_from_option() {
        assert_eq!(Attr::from(Some(1)), Attr::Value(1));
        assert_eq!(Attr::<i32>::from(None), Attr::Missing);
    }

    #[test]
    fn test_record_text_is_last_segment() {
        let r = record(&["File", "Export", "PDF…"], "");
        assert_eq!(r.text(), "PDF…");
    }

    #[test]
    fn test_record_breadcrumb_and_id() {
        let r = record(&["File", "New"], "⌘N");
        assert_eq!(r.breadcrumb(), "File > New");
        assert_eq!(r.id(), "FileNew");
    }

    #[test]
    fn test_record_info_round_trips_through_json() {
        let info = record(&["Edit", "Undo"], "⌘Z").info();
        let json = serde_json::to_string(&info).unwrap();
        let back: MenuItemInfo = serde_json::from_str(&json).unwrap();
        assert_eq!(back, info);
        assert_eq!(back.text, "Undo");
    }

    #[test]
    fn test_cancel_flag_starts_live_and_latches() {
        let flag = CancelFlag::new();
        assert!(flag.is_live());
        let observer = flag.clone();
        flag.cancel();
        assert!(!observer.is_live());
    }

    #[test]
    fn test_menu_error_messages() {
        assert_eq!(
            MenuError::PermissionDenied.to_string(),
            "accessibility permission not granted"
        );
        assert_eq!(
            MenuError::MenuBarUnavailable("AXMenuBar missing".into()).to_string(),
            "menu bar unavailable: AXMenuBar missing"
        );
    }
}

//! Recursive menu tree traversal.
//!
//! The walker flattens an application's menu tree into the ordered list of
//! actionable items: enabled leaves that expose the primary press action.
//! It is written against the [`MenuNode`] abstraction so the same algorithm
//! runs over real accessibility elements and over synthetic trees in tests.
//!
//! Failure policy: no error anywhere aborts the overall traversal. Every
//! attribute-read failure is scoped to the smallest possible unit (a
//! single attribute, a single node, a single subtree) and the walk
//! always yields a list, possibly empty, plus log messages.

use crate::glyph;
use crate::modifiers::{self, ModifierEncoding};
use crate::types::{Attr, CancelFlag, IconData, MenuItemRecord};

/// The capability tag that marks a leaf as activatable.
pub const PRESS_ACTION: &str = "AXPress";

/// Maximum traversal depth.
///
/// Real menu trees are a handful of levels deep; the cap guards against
/// applications that expose cyclic or degenerate element graphs.
pub const MAX_MENU_DEPTH: usize = 32;

/// Attribute bundle for one menu node, fetched in a single batched call.
///
/// Batching matters because the accessibility API crosses a process
/// boundary and each round trip is costly; it is not required for
/// correctness, and implementations may fill the bundle attribute by
/// attribute.
#[derive(Debug, Clone)]
pub struct NodeAttributes<N> {
    /// Whether the item is enabled. Unreadable counts as disabled.
    pub enabled: Attr<bool>,
    /// The item's title.
    pub title: Attr<String>,
    /// Child nodes, each decoded independently so one invalid element in
    /// the collection cannot take down its siblings.
    pub children: Attr<Vec<Attr<N>>>,
    /// Literal shortcut key character, for leaf candidates.
    pub shortcut_char: Attr<String>,
    /// Shortcut key-glyph code, preferred over the literal character when
    /// the code is known.
    pub shortcut_glyph: Attr<i64>,
    /// Raw shortcut modifier bits in the menu-item encoding.
    pub shortcut_modifiers: Attr<i64>,
}

impl<N> NodeAttributes<N> {
    /// A bundle with every attribute missing (the decode result for a node
    /// whose batched fetch failed outright).
    pub fn missing() -> Self {
        NodeAttributes {
            enabled: Attr::Missing,
            title: Attr::Missing,
            children: Attr::Missing,
            shortcut_char: Attr::Missing,
            shortcut_glyph: Attr::Missing,
            shortcut_modifiers: Attr::Missing,
        }
    }
}

/// One element of the menu tree, as consumed by the walker.
///
/// `Clone` must retain the underlying handle and `Drop` release it:
/// records hold cloned nodes for the lifetime of a snapshot and trigger
/// their press action long after the traversal finished.
pub trait MenuNode: Clone {
    /// Fetch the node's attribute bundle.
    fn attributes(&self) -> NodeAttributes<Self>;

    /// Names of the actions this node supports. Queried only for leaves;
    /// `Missing` means the node is an inert container.
    fn actions(&self) -> Attr<Vec<String>>;

    /// Perform the node's primary press action.
    fn press(&self) -> Result<(), crate::types::MenuError>;
}

/// Flatten `roots` into the ordered list of actionable menu items.
///
/// Records are emitted in pre-order traversal order, which corresponds to
/// the on-screen left-to-right, top-to-bottom menu layout. Skipping the
/// application's own first top-level menu is the caller's policy, not the
/// walker's.
///
/// `icon` is the owning application's icon, cloned into every record of
/// this snapshot. `cancel` is checked at the start of every recursive
/// call: once it goes dead the walker returns promptly with whatever was
/// emitted so far, and that partial result is not an error.
pub fn walk<N: MenuNode>(
    roots: &[N],
    icon: Option<&IconData>,
    cancel: &CancelFlag,
) -> Vec<MenuItemRecord<N>> {
    let mut out = Vec::new();
    let mut path = Vec::new();
    for root in roots {
        if !cancel.is_live() {
            break;
        }
        walk_node(root, &mut path, icon, cancel, 0, &mut out);
    }
    out
}

fn walk_node<N: MenuNode>(
    node: &N,
    path: &mut Vec<String>,
    icon: Option<&IconData>,
    cancel: &CancelFlag,
    depth: usize,
    out: &mut Vec<MenuItemRecord<N>>,
) {
    if !cancel.is_live() {
        return;
    }
    if depth > MAX_MENU_DEPTH {
        log::warn!("menu tree deeper than {} levels, pruning", MAX_MENU_DEPTH);
        return;
    }

    let attrs = node.attributes();

    // A disabled item, or one whose enabled flag cannot be read, takes
    // its whole subtree with it. This is a skip, not an error.
    match attrs.enabled {
        Attr::Value(true) => {}
        Attr::Value(false) | Attr::Missing | Attr::Malformed => return,
    }

    let mut pushed = false;
    match attrs.title {
        Attr::Value(title) => {
            let title = title.trim();
            if !title.is_empty() {
                path.push(title.to_string());
                pushed = true;
            }
        }
        Attr::Missing => {}
        Attr::Malformed => {
            log::debug!("unreadable menu title under {:?}", path);
        }
    }

    match attrs.children {
        Attr::Value(children) if !children.is_empty() => {
            for child in &children {
                if !cancel.is_live() {
                    break;
                }
                match child {
                    Attr::Value(child) => {
                        walk_node(child, path, icon, cancel, depth + 1, out);
                    }
                    Attr::Missing | Attr::Malformed => {
                        log::debug!("invalid child element under {:?}", path);
                    }
                }
            }
        }
        _ => {
            // Leaf. Items with no action set are inert containers
            // (separators, headers) and produce nothing.
            if let Attr::Value(actions) = node.actions() {
                if actions.iter().any(|a| a == PRESS_ACTION) {
                    out.push(MenuItemRecord {
                        path: path.clone(),
                        shortcut: shortcut_label(
                            &attrs.shortcut_char,
                            &attrs.shortcut_glyph,
                            &attrs.shortcut_modifiers,
                        ),
                        icon: icon.cloned(),
                        node: node.clone(),
                    });
                }
            }
        }
    }

    if pushed {
        path.pop();
    }
}

/// Compose a human-readable shortcut label.
///
/// The glyph-derived symbol wins over the literal character when a glyph
/// code is present and known. Without a resolvable key the label is empty
/// even if modifier bits were reported. Absent modifier bits decode as 0,
/// which under the menu-item encoding means "Command only".
fn shortcut_label(ch: &Attr<String>, glyph_code: &Attr<i64>, mod_bits: &Attr<i64>) -> String {
    let key = match glyph_code {
        Attr::Value(code) => glyph::symbol(*code).map(str::to_string),
        _ => None,
    }
    .or_else(|| match ch {
        Attr::Value(c) => {
            let c = c.trim();
            if c.is_empty() {
                None
            } else {
                Some(c.to_string())
            }
        }
        _ => None,
    });

    let key = match key {
        Some(k) => k,
        None => return String::new(),
    };

    let bits = mod_bits.clone().value().unwrap_or(0);
    let mods = modifiers::decode(bits, ModifierEncoding::MenuItem);
    format!("{}{}", mods.symbols(), key)
}

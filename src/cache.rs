//! Snapshot cache keyed by the frontmost application's process id.
//!
//! Menu traversal is expensive (one cross-process round trip per node
//! batch), so the flat item list is rebuilt only when the frontmost
//! application changes. The cache is an explicit object owned by the
//! search facade, not ambient global state, and its contents are
//! replaced, never mutated in place.

use std::sync::Arc;

use crate::types::MenuItemRecord;
use crate::walker::MenuNode;

/// The most recently extracted item list, owned by one process id.
pub struct MenuCache<N> {
    owner: Option<i32>,
    items: Arc<Vec<MenuItemRecord<N>>>,
}

impl<N: MenuNode> MenuCache<N> {
    /// An empty cache with no owner.
    pub fn new() -> Self {
        MenuCache {
            owner: None,
            items: Arc::new(Vec::new()),
        }
    }

    /// Process id the current snapshot belongs to, if any.
    pub fn owner(&self) -> Option<i32> {
        self.owner
    }

    /// Return the snapshot for `pid`, rebuilding it when the frontmost
    /// process changed.
    ///
    /// When `pid` matches the current owner the cached sequence is
    /// returned unchanged and `rebuild` is never invoked. Otherwise
    /// `rebuild` produces the new sequence (the caller routes it through
    /// whatever execution context owns accessibility access) and the
    /// snapshot `Arc` is swapped. An action handler still holding the
    /// previous `Arc` keeps a valid snapshot until it drops it; the old
    /// records release their node handles at that point.
    ///
    /// A failed rebuild leaves owner and items untouched.
    pub fn items_for<E>(
        &mut self,
        pid: i32,
        rebuild: impl FnOnce() -> Result<Vec<MenuItemRecord<N>>, E>,
    ) -> Result<Arc<Vec<MenuItemRecord<N>>>, E> {
        if self.owner == Some(pid) {
            return Ok(Arc::clone(&self.items));
        }

        let fresh = rebuild()?;
        log::debug!(
            "[MENUBAR] rebuilt snapshot for pid {}: {} items",
            pid,
            fresh.len()
        );
        self.items = Arc::new(fresh);
        self.owner = Some(pid);
        Ok(Arc::clone(&self.items))
    }

    /// Drop the snapshot and its owner (plugin teardown).
    pub fn invalidate(&mut self) {
        self.owner = None;
        self.items = Arc::new(Vec::new());
    }
}

impl<N: MenuNode> Default for MenuCache<N> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Attr, MenuError};
    use crate::walker::NodeAttributes;

    #[derive(Clone, PartialEq, Debug)]
    struct StubNode(u32);

    impl MenuNode for StubNode {
        fn attributes(&self) -> NodeAttributes<Self> {
            NodeAttributes::missing()
        }
        fn actions(&self) -> Attr<Vec<String>> {
            Attr::Missing
        }
        fn press(&self) -> Result<(), MenuError> {
            Ok(())
        }
    }

    fn item(tag: u32) -> MenuItemRecord<StubNode> {
        MenuItemRecord {
            path: vec![format!("Item{}", tag)],
            shortcut: String::new(),
            icon: None,
            node: StubNode(tag),
        }
    }

    #[test]
    fn test_same_pid_rebuilds_at_most_once() {
        let mut cache = MenuCache::new();
        let mut builds = 0;
        for _ in 0..3 {
            let items = cache
                .items_for(7, || -> Result<_, MenuError> {
                    builds += 1;
                    Ok(vec![item(1)])
                })
                .unwrap();
            assert_eq!(items.len(), 1);
        }
        assert_eq!(builds, 1);
        assert_eq!(cache.owner(), Some(7));
    }

    #[test]
    fn test_pid_change_invalidates_and_rebuilds() {
        let mut cache = MenuCache::new();
        cache
            .items_for(7, || -> Result<_, MenuError> { Ok(vec![item(1)]) })
            .unwrap();

        let mut rebuilt = false;
        let items = cache
            .items_for(8, || -> Result<_, MenuError> {
                rebuilt = true;
                Ok(vec![item(2), item(3)])
            })
            .unwrap();
        assert!(rebuilt);
        assert_eq!(items.len(), 2);
        assert_eq!(cache.owner(), Some(8));
    }

    #[test]
    fn test_previous_snapshot_survives_replacement() {
        let mut cache = MenuCache::new();
        let held = cache
            .items_for(7, || -> Result<_, MenuError> { Ok(vec![item(1)]) })
            .unwrap();

        cache
            .items_for(8, || -> Result<_, MenuError> { Ok(vec![item(2)]) })
            .unwrap();

        // An in-flight action handler keeps the prior snapshot intact.
        assert_eq!(held[0].node, StubNode(1));
        assert_eq!(held[0].path, vec!["Item1"]);
    }

    #[test]
    fn test_failed_rebuild_leaves_cache_untouched() {
        let mut cache = MenuCache::new();
        cache
            .items_for(7, || -> Result<_, MenuError> { Ok(vec![item(1)]) })
            .unwrap();

        let err = cache.items_for(8, || Err::<Vec<_>, _>(MenuError::NoFrontmostApp));
        assert!(err.is_err());
        assert_eq!(cache.owner(), Some(7));

        // The old owner still answers from cache without rebuilding.
        let items = cache
            .items_for(7, || -> Result<_, MenuError> {
                panic!("must not rebuild for the cached owner")
            })
            .unwrap();
        assert_eq!(items.len(), 1);
    }

    #[test]
    fn test_invalidate_clears_owner_and_items() {
        let mut cache = MenuCache::new();
        cache
            .items_for(7, || -> Result<_, MenuError> { Ok(vec![item(1)]) })
            .unwrap();
        cache.invalidate();
        assert_eq!(cache.owner(), None);

        let mut rebuilt = false;
        cache
            .items_for(7, || -> Result<_, MenuError> {
                rebuilt = true;
                Ok(Vec::new())
            })
            .unwrap();
        assert!(rebuilt);
    }
}

//! Search facade: permission gate, snapshot lifecycle, query ranking.
//!
//! `MenuSearch` ties the pieces together the way a host launcher consumes
//! them: each query checks the permission gate, compares the frontmost
//! process id against the cached snapshot, rebuilds the snapshot on the
//! dedicated accessibility thread when the frontmost application changed,
//! and ranks the cached items against the query text. Activation dispatches
//! the stored press handle on the same thread.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use serde::Deserialize;

use crate::cache::MenuCache;
use crate::dispatch::UiDispatcher;
use crate::matcher::{rank, Ranked};
use crate::types::{CancelFlag, IconData, MenuError, MenuItemRecord};
use crate::walker::{walk, MenuNode};

/// The frontmost-application interface consumed by the facade.
///
/// `frontmost_pid` is a cheap probe callable from the query thread; it
/// drives the cache compare. `frontmost` performs real accessibility reads
/// and is only ever invoked on the dispatcher thread.
pub trait FrontmostSource: Send + Sync + 'static {
    type Node: MenuNode + Send + Sync + 'static;

    /// Process id of the application currently receiving input focus.
    fn frontmost_pid(&self) -> Option<i32>;

    /// Menu roots and icon of the frontmost application.
    fn frontmost(&self) -> Result<FrontmostApp<Self::Node>, MenuError>;

    /// Whether this process may read accessibility data.
    fn accessibility_trusted(&self) -> bool;

    /// Show the system's permission prompt.
    fn prompt_accessibility(&self);
}

/// Snapshot of the frontmost application's menu bar.
pub struct FrontmostApp<N> {
    pub pid: i32,
    /// Top-level menus in on-screen order. The first entry is the
    /// application's own menu and is skipped before traversal.
    pub menus: Vec<N>,
    pub icon: Option<IconData>,
}

/// Tunables for the search facade.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SearchOptions {
    /// Bounded wait for the accessibility-thread handoff, in milliseconds.
    /// An application with a hung accessibility server fails the query
    /// instead of stalling it forever.
    pub dispatch_timeout_ms: u64,
    /// Maximum number of ranked results returned per query.
    pub max_results: usize,
}

impl Default for SearchOptions {
    fn default() -> Self {
        SearchOptions {
            dispatch_timeout_ms: 3000,
            max_results: 100,
        }
    }
}

impl SearchOptions {
    fn dispatch_timeout(&self) -> Duration {
        Duration::from_millis(self.dispatch_timeout_ms)
    }
}

/// Searchable view over the frontmost application's menu bar items.
pub struct MenuSearch<P: FrontmostSource> {
    provider: Arc<P>,
    dispatcher: UiDispatcher,
    cache: Mutex<MenuCache<P::Node>>,
    options: SearchOptions,
    /// One-shot latch: the permission prompt is shown at most once per
    /// denial episode and re-armed when permission is granted.
    prompted: AtomicBool,
}

impl<P: FrontmostSource> MenuSearch<P> {
    pub fn new(provider: P) -> Self {
        Self::with_options(provider, SearchOptions::default())
    }

    pub fn with_options(provider: P, options: SearchOptions) -> Self {
        MenuSearch {
            provider: Arc::new(provider),
            dispatcher: UiDispatcher::new(),
            cache: Mutex::new(MenuCache::new()),
            options,
            prompted: AtomicBool::new(false),
        }
    }

    /// Rank the frontmost application's menu items against `query`.
    ///
    /// Without accessibility permission the result is simply empty, with a
    /// single user-facing prompt per denial; permission is re-checked on
    /// every query. `cancel` lets a superseded query stop an in-flight
    /// traversal early; partial results become the snapshot, exactly as a
    /// completed walk would.
    pub fn query(
        &self,
        query: &str,
        cancel: &CancelFlag,
    ) -> Result<Vec<Ranked<P::Node>>, MenuError> {
        if !self.provider.accessibility_trusted() {
            if !self.prompted.swap(true, Ordering::SeqCst) {
                log::info!("[MENUBAR] accessibility permission missing, prompting once");
                self.provider.prompt_accessibility();
            }
            return Ok(Vec::new());
        }
        self.prompted.store(false, Ordering::SeqCst);

        let pid = match self.provider.frontmost_pid() {
            Some(pid) => pid,
            None => {
                log::debug!("[MENUBAR] no frontmost application, empty result");
                return Ok(Vec::new());
            }
        };

        let items = {
            let mut cache = self
                .cache
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            cache.items_for(pid, || {
                let provider = Arc::clone(&self.provider);
                let cancel = cancel.clone();
                self.dispatcher
                    .run(self.options.dispatch_timeout(), move || {
                        let app = provider.frontmost()?;
                        // Skip the application's own first menu.
                        let roots = app.menus.get(1..).unwrap_or_default();
                        Ok::<_, MenuError>(walk(roots, app.icon.as_ref(), &cancel))
                    })?
            })?
        };

        Ok(rank(&items, query, self.options.max_results))
    }

    /// Perform the press action of a previously returned record.
    ///
    /// From the user's perspective the action is already committed when
    /// this is called; a platform failure is logged and reported but does
    /// not disturb the cached snapshot.
    pub fn activate(&self, record: &MenuItemRecord<P::Node>) -> Result<(), MenuError> {
        let node = record.node.clone();
        let outcome = self
            .dispatcher
            .run(self.options.dispatch_timeout(), move || node.press())?;
        if let Err(e) = &outcome {
            log::warn!("[MENUBAR] press failed for {:?}: {}", record.path, e);
        }
        outcome
    }

    /// The underlying frontmost-application source.
    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Drop the current snapshot (plugin teardown).
    pub fn invalidate(&self) {
        self.cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .invalidate();
    }
}

#[cfg(target_os = "macos")]
impl MenuSearch<crate::platform::macos::SystemFrontmost> {
    /// Facade over the live system: frontmost application via the
    /// system-wide accessibility element, menus via `AXMenuBar`.
    pub fn system() -> Self {
        Self::new(crate::platform::macos::SystemFrontmost::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Attr;
    use crate::walker::NodeAttributes;
    use std::sync::atomic::AtomicU32;

    #[derive(Clone, Debug)]
    struct StubNode;

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

    struct GatedProvider {
        trusted: AtomicBool,
        prompts: AtomicU32,
    }

    impl GatedProvider {
        fn new(trusted: bool) -> Self {
            GatedProvider {
                trusted: AtomicBool::new(trusted),
                prompts: AtomicU32::new(0),
            }
        }
    }

    impl FrontmostSource for GatedProvider {
        type Node = StubNode;

        fn frontmost_pid(&self) -> Option<i32> {
            None
        }
        fn frontmost(&self) -> Result<FrontmostApp<StubNode>, MenuError> {
            Err(MenuError::NoFrontmostApp)
        }
        fn accessibility_trusted(&self) -> bool {
            self.trusted.load(Ordering::SeqCst)
        }
        fn prompt_accessibility(&self) {
            self.prompts.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn test_denied_permission_yields_empty_and_prompts_once() {
        let search = MenuSearch::new(GatedProvider::new(false));
        for _ in 0..3 {
            let results = search.query("anything", &CancelFlag::new()).unwrap();
            assert!(results.is_empty());
        }
        assert_eq!(search.provider.prompts.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_prompt_rearms_after_permission_was_granted() {
        let search = MenuSearch::new(GatedProvider::new(false));
        search.query("", &CancelFlag::new()).unwrap();
        assert_eq!(search.provider.prompts.load(Ordering::SeqCst), 1);

        // Granted: the latch resets even though there is no frontmost app.
        search.provider.trusted.store(true, Ordering::SeqCst);
        assert!(search.query("", &CancelFlag::new()).unwrap().is_empty());

        // Revoked again: one more prompt, not zero.
        search.provider.trusted.store(false, Ordering::SeqCst);
        search.query("", &CancelFlag::new()).unwrap();
        assert_eq!(search.provider.prompts.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_options_defaults() {
        let options: SearchOptions = serde_json::from_str("{}").unwrap();
        assert_eq!(options.dispatch_timeout_ms, 3000);
        assert_eq!(options.max_results, 100);

        let options: SearchOptions =
            serde_json::from_str(r#"{"dispatch_timeout_ms": 250}"#).unwrap();
        assert_eq!(options.dispatch_timeout_ms, 250);
        assert_eq!(options.max_results, 100);
    }
}

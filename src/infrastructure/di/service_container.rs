//! Service container for dependency injection
//!
//! Wires up the tree service with its settings.

use std::sync::Arc;

use crate::application::services::TreeService;
use crate::config::Settings;

/// Container holding all application services.
///
/// Owns the single tree instance for the lifetime of the process; callers
/// borrow it instead of reaching for global state.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// The directory tree
    pub tree: TreeService,
}

impl ServiceContainer {
    /// Create a new service container from loaded settings.
    pub fn new(settings: Settings) -> Self {
        let tree = TreeService::with_options(settings.tree_options());
        Self::with_deps(settings, tree)
    }

    /// Create a service container with a prepared tree (for testing).
    pub fn with_deps(settings: Settings, tree: TreeService) -> Self {
        Self {
            settings: Arc::new(settings),
            tree,
        }
    }
}

impl Default for ServiceContainer {
    fn default() -> Self {
        Self::new(Settings::default())
    }
}

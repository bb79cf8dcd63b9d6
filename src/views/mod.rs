mod animation;
mod app;
mod error_screen;
mod home;
mod library;
mod profile;
mod punch_in;
mod share_guide;
mod stats;

use std::cell::RefCell;
use std::rc::Rc;

use yew::prelude::*;

use crate::config::AppConfig;
use crate::poems::PoemCatalog;
use crate::progress::{CompletedPoems, ProgressTracker};
use crate::route::Route;
use crate::storage::LocalStorage;
use crate::theme::ThemeState;

pub use app::{App, AppProps};

/// Completion history shared by every page. `completed` is a render
/// snapshot of the tracker, refreshed after each write.
#[derive(Clone)]
pub struct ProgressHandle {
    tracker: Rc<RefCell<ProgressTracker<LocalStorage>>>,
    completed: UseStateHandle<CompletedPoems>,
}

impl PartialEq for ProgressHandle {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.tracker, &other.tracker) && self.completed == other.completed
    }
}

impl ProgressHandle {
    pub fn completed(&self) -> &CompletedPoems {
        &self.completed
    }

    /// Run `f` against the tracker, then publish the new snapshot.
    pub fn update<T>(&self, f: impl FnOnce(&mut ProgressTracker<LocalStorage>) -> T) -> T {
        let mut tracker = self.tracker.borrow_mut();
        let out = f(&mut tracker);
        self.completed.set(tracker.completed().clone());
        out
    }
}

#[derive(Clone, PartialEq)]
pub struct AppContext {
    pub catalog: Rc<PoemCatalog>,
    pub config: Rc<AppConfig>,
    pub theme: ThemeState,
    pub toggle_mode: Callback<()>,
    pub navigate: Callback<Route>,
    pub progress: ProgressHandle,
}

impl AppContext {
    pub fn is_tech(&self) -> bool {
        self.theme.theme.is_tech()
    }
}

// Pages render nothing outside the shell's provider
#[hook]
fn use_app() -> Option<AppContext> {
    use_context::<AppContext>()
}

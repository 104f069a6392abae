#![forbid(unsafe_code)]

//! Headless binding between one dialog and a [`ModalStore`].
//!
//! A [`ModalHandle`] carries the lifecycle a dialog component runs against
//! the queue, without any rendering:
//!
//! - mounting with `visible = true` registers the modal;
//! - a change of `visible`, `priority`, `stackable` or `name` hides the old
//!   registration and, if still visible, shows the new one (fresh
//!   `opened_at`), reported to observers as a single change;
//! - a close request runs the caller's handler, then hides;
//! - dropping the handle hides.
//!
//! What to draw comes from [`ModalHandle::presentation`].
//!
//! # Example
//!
//! ```
//! use modalq_runtime::{ModalHandle, ModalProps, ModalStore, Presentation};
//!
//! let store = ModalStore::new();
//! let mut settings = ModalHandle::mount(&store, ModalProps::named("settings"));
//! assert_eq!(settings.presentation(), Presentation::Unmounted);
//!
//! settings.set_visible(true);
//! assert_eq!(settings.presentation(), Presentation::Shown);
//!
//! settings.request_close();
//! assert!(store.is_empty());
//! ```
//!
//! # Id collisions
//!
//! Handles with the same non-empty name share one registration. The first
//! `show` wins, and any of them hiding (or dropping) removes it for all.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use modalq_core::{ClockSource, ModalClock, ModalId, QueueConfig};

use crate::reactive::{BatchScope, Subscription};
use crate::store::ModalStore;

/// Inputs a dialog passes to its handle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModalProps {
    /// Registration id. Empty means "generate one".
    pub name: String,
    pub visible: bool,
    pub priority: i32,
    pub stackable: bool,
    /// Drop the dialog's content entirely while it is not visible.
    pub unmount_on_hide: bool,
}

impl Default for ModalProps {
    fn default() -> Self {
        Self::from_config(&QueueConfig::default())
    }
}

impl ModalProps {
    /// Props carrying the configured default priority and stackability.
    #[must_use]
    pub fn from_config(config: &QueueConfig) -> Self {
        Self {
            name: String::new(),
            visible: false,
            priority: config.default_priority,
            stackable: config.default_stackable,
            unmount_on_hide: true,
        }
    }

    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self::default().name(name)
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    #[must_use]
    pub fn visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    #[must_use]
    pub fn priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    #[must_use]
    pub fn stackable(mut self, stackable: bool) -> Self {
        self.stackable = stackable;
        self
    }

    #[must_use]
    pub fn unmount_on_hide(mut self, unmount: bool) -> Self {
        self.unmount_on_hide = unmount;
        self
    }
}

/// What the presentation layer should do with the dialog right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presentation {
    /// Render nothing.
    Unmounted,
    /// Keep the dialog mounted but not shown.
    Hidden,
    Shown,
}

/// One dialog's registration in a store.
pub struct ModalHandle<C: ModalClock + Clone + 'static = ClockSource> {
    store: ModalStore<C>,
    /// Shared with visibility callbacks so they follow renames.
    id: Rc<RefCell<ModalId>>,
    props: ModalProps,
    on_request_close: Option<Box<dyn Fn()>>,
}

impl<C: ModalClock + Clone + 'static> ModalHandle<C> {
    /// Attach to `store`, registering immediately if `props.visible`.
    #[must_use]
    pub fn mount(store: &ModalStore<C>, props: ModalProps) -> Self {
        let handle = Self {
            store: store.clone(),
            id: Rc::new(RefCell::new(ModalId::from_name_or_generate(&props.name))),
            props,
            on_request_close: None,
        };
        handle.sync();
        handle
    }

    /// Run `f` when the dialog asks to close, before the handle hides it.
    #[must_use]
    pub fn on_request_close(mut self, f: impl Fn() + 'static) -> Self {
        self.on_request_close = Some(Box::new(f));
        self
    }

    /// Current registration id. Changes when `set_props` renames the handle.
    #[must_use]
    pub fn id(&self) -> ModalId {
        self.id.borrow().clone()
    }

    #[must_use]
    pub fn props(&self) -> &ModalProps {
        &self.props
    }

    /// Apply new props.
    ///
    /// Only `visible`, `priority`, `stackable` and `name` touch the store.
    /// When any of them changed, the old registration is hidden and the new
    /// one shown inside a single [`BatchScope`].
    pub fn set_props(&mut self, props: ModalProps) {
        let name_changed = props.name != self.props.name;
        let registration_changed = name_changed
            || props.visible != self.props.visible
            || props.priority != self.props.priority
            || props.stackable != self.props.stackable;

        if !registration_changed {
            self.props = props;
            return;
        }

        let _batch = BatchScope::new();
        self.hide_registration();
        if name_changed {
            *self.id.borrow_mut() = ModalId::from_name_or_generate(&props.name);
        }
        self.props = props;
        self.sync();
    }

    pub fn set_visible(&mut self, visible: bool) {
        let props = self.props.clone().visible(visible);
        self.set_props(props);
    }

    /// Dismiss request from the dialog (Escape, back button, backdrop).
    ///
    /// The caller's handler runs first; the modal is hidden either way.
    /// `props.visible` is left untouched, so the owner decides whether to
    /// show it again.
    pub fn request_close(&self) {
        if let Some(handler) = &self.on_request_close {
            handler();
        }
        self.hide_registration();
    }

    /// Whether this modal is in the store's resolved visible set.
    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.store.is_visible(self.id.borrow().as_str())
    }

    #[must_use]
    pub fn presentation(&self) -> Presentation {
        match (self.is_visible(), self.props.unmount_on_hide) {
            (true, _) => Presentation::Shown,
            (false, true) => Presentation::Unmounted,
            (false, false) => Presentation::Hidden,
        }
    }

    /// Call `callback` whenever this modal's visibility flips.
    ///
    /// Changes to other modals that leave this one's visibility unchanged do
    /// not fire. A rename through [`ModalHandle::set_props`] is followed: the
    /// callback watches whatever id the handle has when a change lands.
    #[must_use = "dropping the subscription unsubscribes immediately"]
    pub fn on_visibility_change(&self, callback: impl Fn(bool) + 'static) -> Subscription {
        let id = Rc::clone(&self.id);
        let last = Cell::new(self.is_visible());
        self.store.subscribe(move |queue| {
            let now = queue.is_visible(id.borrow().as_str());
            if now != last.get() {
                last.set(now);
                callback(now);
            }
        })
    }

    fn sync(&self) {
        if self.props.visible {
            let id = self.id();
            self.store
                .show(id, self.props.priority, self.props.stackable);
        } else {
            self.hide_registration();
        }
    }

    fn hide_registration(&self) {
        let id = self.id();
        self.store.hide(id.as_str());
    }
}

impl<C: ModalClock + Clone + 'static> Drop for ModalHandle<C> {
    fn drop(&mut self) {
        self.hide_registration();
    }
}

impl<C: ModalClock + Clone + 'static> std::fmt::Debug for ModalHandle<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModalHandle")
            .field("id", &*self.id.borrow())
            .field("props", &self.props)
            .field("has_close_handler", &self.on_request_close.is_some())
            .finish()
    }
}

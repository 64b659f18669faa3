// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-node listener table.
//!
//! ## Overview
//!
//! An [`EventRegistry`] maps an event name to the subscribers of that name.
//! The namespace is open: any string is a legal event name.
//!
//! - Subscribers are invoked in subscription order.
//! - [`EventRegistry::on`] returns a [`SubscriptionId`]; pass it to [`EventRegistry::off`] to unsubscribe.
//! - [`EventRegistry::fire`] applies a stamp hook to the event once, then delivers it.
//!
//! ## Minimal example
//!
//! ```
//! use std::cell::RefCell;
//! use std::rc::Rc;
//! use strata_events::EventRegistry;
//!
//! #[derive(Default)]
//! struct Ev { origin: Option<u32> }
//!
//! let seen = Rc::new(RefCell::new(Vec::new()));
//! let mut reg: EventRegistry<Ev> = EventRegistry::new();
//! let log = seen.clone();
//! let sub = reg.on("click", move |ev: &Ev| log.borrow_mut().push(ev.origin));
//!
//! let mut ev = Ev::default();
//! assert_eq!(reg.fire("click", &mut ev, |ev| ev.origin = Some(7)), 1);
//! assert_eq!(*seen.borrow(), [Some(7)]);
//!
//! assert!(reg.off(sub));
//! assert!(!reg.off(sub), "second off is a silent no-op");
//! ```

use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;
use core::num::NonZeroU64;

use hashbrown::HashMap;

/// Token returned by [`EventRegistry::on`], used to unsubscribe.
///
/// Tokens are unique within the registry that issued them.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(NonZeroU64);

impl SubscriptionId {
    /// The raw token value.
    #[inline]
    pub const fn get(self) -> u64 {
        self.0.get()
    }
}

/// A subscriber callback.
pub type Listener<E> = Box<dyn FnMut(&E)>;

/// Event name → ordered subscriber list.
pub struct EventRegistry<E> {
    issued: u64,
    listeners: HashMap<String, Vec<(SubscriptionId, Listener<E>)>>,
}

impl<E> fmt::Debug for EventRegistry<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names = f.debug_map();
        for (name, list) in &self.listeners {
            names.entry(name, &list.len());
        }
        names.finish()
    }
}

impl<E> Default for EventRegistry<E> {
    fn default() -> Self {
        Self {
            issued: 0,
            listeners: HashMap::new(),
        }
    }
}

impl<E> EventRegistry<E> {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe `listener` to `name`. Subscribers run in the order they subscribed.
    pub fn on(
        &mut self,
        name: impl Into<String>,
        listener: impl FnMut(&E) + 'static,
    ) -> SubscriptionId {
        let id = SubscriptionId(NonZeroU64::MIN.saturating_add(self.issued));
        self.issued += 1;
        self.listeners
            .entry(name.into())
            .or_default()
            .push((id, Box::new(listener)));
        id
    }

    /// Unsubscribe the listener behind `id`.
    ///
    /// Returns `false` if no such subscription exists; that is not an error.
    pub fn off(&mut self, id: SubscriptionId) -> bool {
        let mut emptied = None;
        let mut found = false;
        for (name, list) in &mut self.listeners {
            if let Some(pos) = list.iter().position(|(sub, _)| *sub == id) {
                list.remove(pos);
                found = true;
                if list.is_empty() {
                    emptied = Some(name.clone());
                }
                break;
            }
        }
        if let Some(name) = emptied {
            self.listeners.remove(&name);
        }
        found
    }

    /// Unsubscribe every listener of `name`. Returns how many were removed.
    pub fn off_all(&mut self, name: &str) -> usize {
        self.listeners.remove(name).map_or(0, |list| list.len())
    }

    /// Deliver `event` to every subscriber of `name`.
    ///
    /// `stamp` runs exactly once before any subscriber sees the event. Returns the
    /// number of subscribers invoked.
    pub fn fire(&mut self, name: &str, event: &mut E, stamp: impl FnOnce(&mut E)) -> usize {
        stamp(event);
        let Some(list) = self.listeners.get_mut(name) else {
            return 0;
        };
        for (_, listener) in list.iter_mut() {
            listener(event);
        }
        list.len()
    }

    /// Number of subscribers of `name`.
    pub fn listener_count(&self, name: &str) -> usize {
        self.listeners.get(name).map_or(0, Vec::len)
    }

    /// True if nothing is subscribed to any name.
    pub fn is_empty(&self) -> bool {
        self.listeners.values().all(Vec::is_empty)
    }

    /// Names with at least one subscriber, in no particular order.
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.listeners.keys().map(String::as_str)
    }
}

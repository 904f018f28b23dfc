//! The route table built at registration time.

use std::collections::HashMap;
use std::fmt;

use herald_core::{EventKind, InboundEvent};

use crate::handler::BoxedHandler;
use crate::param::ParamSpec;

/// The key an event is routed by.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RouteKey {
    pub kind: EventKind,
    /// Command name or modal id; `None` for ready and raw messages.
    pub identifier: Option<String>,
    /// Focused option name; autocomplete only.
    pub focused: Option<String>,
}

impl RouteKey {
    /// Computes the key of an inbound event.
    pub fn of(event: &InboundEvent) -> Self {
        Self {
            kind: event.kind(),
            identifier: event.identifier().map(str::to_owned),
            focused: event.focused_option().map(str::to_owned),
        }
    }
}

impl fmt::Display for RouteKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)?;
        if let Some(identifier) = &self.identifier {
            write!(f, " '{identifier}'")?;
        }
        if let Some(focused) = &self.focused {
            write!(f, " focused on '{focused}'")?;
        }
        Ok(())
    }
}

/// A validated handler registration.
pub struct Registration {
    /// Position in registration order across all controllers.
    pub seq: usize,
    pub key: RouteKey,
    pub params: Vec<ParamSpec>,
    pub handler: BoxedHandler,
    /// Handler type name, for logs.
    pub name: String,
}

impl fmt::Debug for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration")
            .field("seq", &self.seq)
            .field("key", &self.key)
            .field("params", &self.params)
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Registrations grouped by route key, each group in registration order.
#[derive(Debug, Default)]
pub struct Registry {
    routes: HashMap<RouteKey, Vec<Registration>>,
    len: usize,
}

impl Registry {
    pub(crate) fn insert(&mut self, registration: Registration) {
        self.routes
            .entry(registration.key.clone())
            .or_default()
            .push(registration);
        self.len += 1;
    }

    /// Returns the registrations for `key`, in registration order.
    pub fn lookup(&self, key: &RouteKey) -> &[Registration] {
        self.routes.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Returns all registrations in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Registration> {
        let mut all: Vec<_> = self.routes.values().flatten().collect();
        all.sort_by_key(|r| r.seq);
        all.into_iter()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

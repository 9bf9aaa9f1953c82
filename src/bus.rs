//! Named-event notification bus.
//!
//! Hosts use it to tell bodies when the mover roster changed. Listeners are
//! plain closures keyed by event name; they run synchronously, in connection
//! order, on the thread that invokes the event.

use alloc::boxed::Box;
use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec as AllocVec;
use core::fmt;

use crate::error::{PhysicsError, PhysicsResult};

/// Event fired after movers are spawned or destroyed.
pub const ROSTER_CHANGED: &str = "roster_changed";

/// Handle returned by [`EventBus::connect`], used to disconnect.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ListenerId(pub u64);

type Listener<E> = Box<dyn FnMut(&E)>;

/// Broadcasts named events with a payload of type `E`.
///
/// The event table is created by the first [`connect`](EventBus::connect).
/// Invoking or disconnecting before that is an error; naming an event nobody
/// connected to afterwards is only worth a warning.
pub struct EventBus<E> {
    events: Option<BTreeMap<String, AllocVec<(ListenerId, Listener<E>)>>>,
    next_id: u64,
}

impl<E> EventBus<E> {
    pub fn new() -> Self {
        EventBus { events: None, next_id: 0 }
    }

    pub fn is_initialized(&self) -> bool {
        self.events.is_some()
    }

    pub fn connect<L>(&mut self, name: &str, listener: L) -> ListenerId
    where
        L: FnMut(&E) + 'static,
    {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.events
            .get_or_insert_with(BTreeMap::new)
            .entry(String::from(name))
            .or_default()
            .push((id, Box::new(listener)));
        tracing::debug!(event = name, listener = id.0, "listener connected");
        id
    }

    pub fn disconnect(&mut self, name: &str, listener: ListenerId) -> PhysicsResult<()> {
        let events = self.events.as_mut().ok_or(PhysicsError::BusUninitialized)?;
        match events.get_mut(name) {
            Some(listeners) => {
                listeners.retain(|(id, _)| *id != listener);
            }
            None => tracing::warn!(event = name, "no event to remove listeners from"),
        }
        Ok(())
    }

    /// Call every listener of `name` with `payload`.
    pub fn invoke(&mut self, name: &str, payload: &E) -> PhysicsResult<()> {
        let events = self.events.as_mut().ok_or(PhysicsError::BusUninitialized)?;
        match events.get_mut(name) {
            Some(listeners) => {
                tracing::trace!(event = name, listeners = listeners.len(), "invoking event");
                for (_, listener) in listeners.iter_mut() {
                    listener(payload);
                }
            }
            None => tracing::warn!(event = name, "no event to invoke"),
        }
        Ok(())
    }

    /// Listeners currently connected to `name`.
    pub fn listener_count(&self, name: &str) -> usize {
        self.events
            .as_ref()
            .and_then(|events| events.get(name))
            .map_or(0, |listeners| listeners.len())
    }
}

impl<E> Default for EventBus<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> fmt::Debug for EventBus<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: AllocVec<&str> = self
            .events
            .iter()
            .flat_map(|events| events.keys().map(String::as_str))
            .collect();
        f.debug_struct("EventBus")
            .field("events", &names)
            .field("next_id", &self.next_id)
            .finish()
    }
}

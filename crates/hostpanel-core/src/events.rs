//! Event manager for hooks around account operations
//!
//! Listeners are plain synchronous functions. `AfterAddUser` is triggered from
//! inside the account creation transaction, so a listener must not wait on
//! anything that could need the database.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

use crate::prelude::*;
use hostpanel_types::account_adapter::NewAccount;

/// Event type enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventType {
	BeforeAddUser,
	AfterAddUser,
}

impl EventType {
	pub fn as_str(&self) -> &'static str {
		match self {
			EventType::BeforeAddUser => "before_add_user",
			EventType::AfterAddUser => "after_add_user",
		}
	}
}

#[derive(Debug)]
pub enum Event<'a> {
	/// Fired before anything is written, an error aborts the operation
	BeforeAddUser { user_data: &'a NewAccount<'a> },
	/// Fired inside the transaction after all rows are inserted, an error rolls
	/// the operation back
	AfterAddUser { user_id: UserId, user_data: &'a NewAccount<'a> },
}

impl Event<'_> {
	pub fn event_type(&self) -> EventType {
		match self {
			Event::BeforeAddUser { .. } => EventType::BeforeAddUser,
			Event::AfterAddUser { .. } => EventType::AfterAddUser,
		}
	}
}

pub type Listener = Arc<dyn Fn(&Event<'_>) -> ClResult<()> + Send + Sync>;

#[derive(Default)]
pub struct EventManager {
	listeners: RwLock<HashMap<EventType, Vec<Listener>>>,
}

impl std::fmt::Debug for EventManager {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let listeners = self.listeners.read();
		let mut dbg = f.debug_struct("EventManager");
		for (typ, list) in listeners.iter() {
			dbg.field(typ.as_str(), &list.len());
		}
		dbg.finish()
	}
}

impl EventManager {
	pub fn new() -> Self {
		Self::default()
	}

	/// Register a listener for an event type
	pub fn on<F>(&self, event_type: EventType, listener: F)
	where
		F: Fn(&Event<'_>) -> ClResult<()> + Send + Sync + 'static,
	{
		self.listeners.write().entry(event_type).or_default().push(Arc::new(listener));
	}

	/// Call every listener of the event in registration order
	///
	/// Stops at the first failing listener and returns its error.
	pub fn trigger(&self, event: &Event<'_>) -> ClResult<()> {
		let event_type = event.event_type();
		// Clone the list so listeners may register further listeners
		let listeners = self.listeners.read().get(&event_type).cloned().unwrap_or_default();

		for listener in &listeners {
			if let Err(err) = listener(event) {
				warn!(event = event_type.as_str(), error = %err, "Event listener failed");
				return Err(err);
			}
		}
		Ok(())
	}
}


// vim: ts=4

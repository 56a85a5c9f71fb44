//! # dl-events
//!
//! Event log, state reduction, and subscription fan-out for devloop.
//!
//! Subsystems append [`Event`](dl_proto::Event)s to the [`EventHub`]. Each
//! append is stamped into the [`EventLog`], folded into the aggregate
//! [`State`](dl_proto::State) by the [`StateReducer`], and pushed to every
//! live [`Subscription`] — all inside one critical section, so every reader
//! sees the three in agreement.
//!
//! ## Quick Example
//!
//! ```rust,no_run
//! use dl_events::{BroadcastPolicy, EventHub};
//! use dl_proto::{Event, State};
//!
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let hub = EventHub::new(State::default(), BroadcastPolicy::default());
//! hub.append(Event::build("app", "In Progress"))?;
//!
//! let mut sub = hub.subscribe()?;
//! hub.append(Event::build("app", "Complete"))?;
//!
//! while let Some(entry) = sub.recv().await? {
//!     println!("{}: {}", entry.sequence, entry.entry);
//! }
//! # Ok(())
//! # }
//! ```

pub mod broadcast;
pub mod error;
pub mod hub;
pub mod log;
pub mod reducer;

pub use broadcast::{BroadcastPolicy, Broadcaster, Subscription};
pub use error::{EventsError, SubscriptionError};
pub use hub::EventHub;
pub use log::EventLog;
pub use reducer::{fold, reduce, StateReducer};

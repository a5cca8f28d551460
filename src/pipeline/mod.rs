//! Producer/consumer update pipeline.
//!
//! The poll loop owns the [`Tracker`](crate::records::Tracker) and turns each fetch into a
//! self-contained [`UpdateEvent`]; the dispatcher drains those events on the display tick
//! and pushes display-ready values to a [`RenderSurface`]. The channel is the only thing
//! the two sides share.

pub mod channel;
pub mod dispatcher;
pub mod events;
pub mod poller;

pub use channel::{update_channel, UpdateReceiver, UpdateSender};
pub use dispatcher::{Dispatcher, RenderSurface};
pub use events::{Direction, QuoteUpdate, UpdateEvent};
pub use poller::{spawn_poll_loop, PollLoop, PollState, PollerHandle};

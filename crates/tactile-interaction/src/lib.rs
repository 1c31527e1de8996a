//! Client-side interaction engine.
//!
//! [`InteractionController`] turns pointer buttons, the block under the cursor
//! and the entities in view into protocol actions (digging, placing, using
//! items, attacking) and UI events. The client drives it through an
//! [`InteractionHost`] and drains the queued output once per tick.

pub mod action;
pub mod controller;
pub mod error;
pub mod host;
pub mod settings;
pub mod state;
pub mod timer;

pub use action::{ENTITY_INTERACT_CURSOR, EntityInteraction, InteractionEvent, ProtocolAction};
pub use controller::{DIG_ABORTED_MESSAGE, InteractionController, placement_cursor, progress_stage};
pub use error::InteractionError;
pub use host::{HostFeature, InteractionHost};
pub use settings::{BreakTimeOverrides, InteractionSettings, ServerSettings};
pub use state::{ButtonState, CurrentBreak, DigSession, DigStatus, ItemUseSession, StopReason};
pub use timer::{TimerId, TimerWheel};

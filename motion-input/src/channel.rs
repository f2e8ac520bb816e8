//! Exposed channels which can be used to share motion events across tasks

use embassy_sync::channel::Channel;
pub use embassy_sync::{blocking_mutex, channel};

use crate::event::RelativeMotionEvent;
use crate::{MOTION_EVENT_CHANNEL_SIZE, RawMutex};

/// Channel for relative motion events from all devices to the event consumer
///
/// `MOTION_EVENT_CHANNEL.sender()` can be handed to any device as its sink.
pub static MOTION_EVENT_CHANNEL: Channel<RawMutex, RelativeMotionEvent, MOTION_EVENT_CHANNEL_SIZE> = Channel::new();

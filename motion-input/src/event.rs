//! Relative motion events and the sink they are delivered to

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::channel::Sender;
use heapless::Vec;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Axis {
    X,
    Y,
}

/// One axis of a relative motion update
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RelativeMotionEvent {
    /// The axis name
    pub axis: Axis,
    /// Relative movement, never zero
    pub value: i16,
    /// The sink should treat all axes since the previous marker as one atomic update
    pub last_in_frame: bool,
}

/// Conditioned motion of one poll cycle
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MotionFrame {
    pub x: i16,
    pub y: i16,
}

impl MotionFrame {
    pub fn new(x: i16, y: i16) -> Self {
        Self { x, y }
    }

    pub fn is_empty(&self) -> bool {
        self.x == 0 && self.y == 0
    }

    /// Split the frame into per-axis events.
    ///
    /// Zero axes are dropped, X comes before Y and only the final event carries the frame marker.
    pub fn events(&self) -> Vec<RelativeMotionEvent, 2> {
        let mut events = Vec::new();
        for (axis, value) in [(Axis::X, self.x), (Axis::Y, self.y)] {
            if value != 0 {
                // Capacity is 2, one push per axis
                let _ = events.push(RelativeMotionEvent {
                    axis,
                    value,
                    last_in_frame: false,
                });
            }
        }
        if let Some(last) = events.last_mut() {
            last.last_in_frame = true;
        }
        events
    }
}

/// Consumer of relative motion events
pub trait MotionSink {
    async fn report(&mut self, event: RelativeMotionEvent);

    /// Deliver every non-zero axis of `frame`, returns the number of events sent
    async fn report_frame(&mut self, frame: MotionFrame) -> usize {
        let events = frame.events();
        for event in events.iter() {
            self.report(*event).await;
        }
        events.len()
    }
}

impl<S: MotionSink> MotionSink for &mut S {
    async fn report(&mut self, event: RelativeMotionEvent) {
        (**self).report(event).await
    }
}

impl<'ch, M: RawMutex, const N: usize> MotionSink for Sender<'ch, M, RelativeMotionEvent, N> {
    async fn report(&mut self, event: RelativeMotionEvent) {
        self.send(event).await
    }
}

/// Sink that keeps every event, for tests
#[cfg(test)]
#[derive(Default)]
pub(crate) struct RecordingSink {
    pub events: std::vec::Vec<RelativeMotionEvent>,
}

#[cfg(test)]
impl MotionSink for RecordingSink {
    async fn report(&mut self, event: RelativeMotionEvent) {
        self.events.push(event);
    }
}

//! Endpoint traits
//!
//! The dispatcher is generic over [`EventSource`] and the publisher over
//! [`EventSink`], so both run unchanged against a shared-memory channel or an
//! in-process queue.

use std::collections::VecDeque;

use hermes_core::Event;

use crate::channel::{ChannelReader, ChannelWriter};

/// Non-blocking supplier of events
pub trait EventSource {
    /// Take the next event; `None` when nothing is pending
    fn try_read(&mut self) -> Option<Event>;
}

/// Non-blocking consumer of events
pub trait EventSink {
    /// Offer one event; `false` if it was not accepted
    fn try_write(&mut self, event: &Event) -> bool;
}

impl EventSource for ChannelReader {
    fn try_read(&mut self) -> Option<Event> {
        ChannelReader::try_read(self)
    }
}

impl EventSink for ChannelWriter {
    fn try_write(&mut self, event: &Event) -> bool {
        ChannelWriter::try_write(self, event)
    }
}

impl EventSource for VecDeque<Event> {
    fn try_read(&mut self) -> Option<Event> {
        self.pop_front()
    }
}

impl EventSink for VecDeque<Event> {
    fn try_write(&mut self, event: &Event) -> bool {
        self.push_back(*event);
        true
    }
}

impl<S: EventSource + ?Sized> EventSource for Box<S> {
    fn try_read(&mut self) -> Option<Event> {
        (**self).try_read()
    }
}

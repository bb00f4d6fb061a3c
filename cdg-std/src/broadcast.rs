use cdg_core::{Event, Observer};
use std::sync::mpsc::{self, Receiver, Sender};

/// Fans player events out to any number of channel receivers.
///
/// Receivers that have been dropped are forgotten on the next event.
#[derive(Default)]
pub struct Broadcast {
    senders: Vec<Sender<Event>>,
}

impl Broadcast {
    #[must_use]
    pub fn subscribe(&mut self) -> Receiver<Event> {
        let (sender, receiver) = mpsc::channel();
        self.senders.push(sender);
        receiver
    }

    #[must_use]
    pub fn subscribers(&self) -> usize {
        self.senders.len()
    }
}

impl Observer for Broadcast {
    fn notify(&mut self, event: Event) {
        self.senders
            .retain(|sender| sender.send(event.clone()).is_ok());
    }

    fn wants_frames(&self) -> bool {
        !self.senders.is_empty()
    }
}

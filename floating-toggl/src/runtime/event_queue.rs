use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::view_model::Event;

pub(super) type EventTx = UnboundedSender<Event>;
pub(super) type EventRx = UnboundedReceiver<Event>;

pub(super) fn channel() -> (EventTx, EventRx) {
    mpsc::unbounded_channel()
}

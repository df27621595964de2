mod event_stream;
mod server_sent_event;

pub use event_stream::{EventStream, connect, events};
pub use server_sent_event::ServerSentEvent;

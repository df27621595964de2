use crate::sse::server_sent_event::ServerSentEvent;
use crate::tommotica::{TransportError, ensure_success};
use futures::stream::{self, BoxStream};
use futures::{Stream, StreamExt};
use reqwest::RequestBuilder;
use reqwest::header::ACCEPT;
use tracing::{info, instrument, trace};

pub type EventStream = BoxStream<'static, Result<ServerSentEvent, TransportError>>;

/// Opens an event stream, the returned stream ends when the server closes the connection.
#[instrument(skip_all)]
pub async fn connect(request: RequestBuilder) -> Result<EventStream, TransportError> {
    let response = ensure_success(request.header(ACCEPT, "text/event-stream").send().await?)?;
    info!(status = %response.status(), "Connecting to event stream {}... OK", response.url().path());

    Ok(events(response.bytes_stream()).boxed())
}

/// Splits a byte stream into events. Chunks don't have to align with event boundaries.
pub fn events<S, B, E>(bytes: S) -> impl Stream<Item = Result<ServerSentEvent, TransportError>> + Send + 'static
where
    S: Stream<Item = Result<B, E>> + Send + 'static,
    B: AsRef<[u8]> + Send + 'static,
    E: Into<TransportError> + Send + 'static,
{
    let state = (Box::pin(bytes), Vec::<u8>::new(), false);

    stream::unfold(state, |(mut bytes, mut buffer, mut done)| async move {
        loop {
            if let Some(block) = next_block(&mut buffer) {
                trace!(block = %block, "🔸 Received event block");
                return Some((Ok(ServerSentEvent::parse(&block)), (bytes, buffer, done)));
            }

            if done {
                return None;
            }

            match bytes.next().await {
                Some(Ok(chunk)) => buffer.extend(chunk.as_ref().iter().filter(|b| **b != b'\r')),
                Some(Err(e)) => {
                    done = true;
                    return Some((Err(e.into()), (bytes, buffer, done)));
                }
                None => done = true,
            }
        }
    })
}

// Takes the first complete event block, an unterminated remainder stays in the buffer
fn next_block(buffer: &mut Vec<u8>) -> Option<String> {
    let position = buffer.windows(2).position(|window| window == b"\n\n")?;
    let block = String::from_utf8_lossy(&buffer[..position]).into_owned();
    buffer.drain(..position + 2);
    Some(block)
}

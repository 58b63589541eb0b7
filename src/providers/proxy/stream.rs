use std::collections::VecDeque;
use std::fmt::Display;

use bytes::Bytes;
use futures::stream::{self, Stream, StreamExt};

use crate::core::types::StreamEvent;
use crate::providers::error::ProviderError;
use crate::providers::http::sse::{SseFrame, SseParser};

use super::convert::{Frame, parse_frame};

struct DecodeState<S> {
    bytes: S,
    parser: SseParser,
    pending: VecDeque<SseFrame>,
    body_ended: bool,
    finished: bool,
}

/// Turns a response body into reply events.
///
/// Deltas come out in the order they were framed. The stream ends with
/// exactly one `Done` or `Error` and yields nothing after it; a body that
/// closes without a terminator frame counts as `Done`.
pub fn decode_events<S, E>(bytes: S) -> impl Stream<Item = StreamEvent>
where
    S: Stream<Item = Result<Bytes, E>> + Unpin,
    E: Display,
{
    let state = DecodeState {
        bytes,
        parser: SseParser::new(),
        pending: VecDeque::new(),
        body_ended: false,
        finished: false,
    };

    stream::unfold(state, |mut st| async move {
        loop {
            if st.finished {
                return None;
            }

            if let Some(frame) = st.pending.pop_front() {
                match parse_frame(&frame) {
                    Ok(Frame::Delta(text)) => return Some((StreamEvent::Delta(text), st)),
                    Ok(Frame::Skip) => continue,
                    Ok(Frame::Done) => {
                        tracing::debug!("Stream terminated by [DONE]");
                        st.finished = true;
                        return Some((StreamEvent::Done, st));
                    }
                    Err(err) => {
                        tracing::warn!(error = %err, "Rejected stream frame");
                        st.finished = true;
                        return Some((StreamEvent::Error(err), st));
                    }
                }
            }

            if st.body_ended {
                tracing::debug!("Stream body ended without [DONE]");
                st.finished = true;
                return Some((StreamEvent::Done, st));
            }

            match st.bytes.next().await {
                Some(Ok(chunk)) => st.pending.extend(st.parser.process_chunk(&chunk)),
                Some(Err(e)) => {
                    let err = ProviderError::Network(e.to_string());
                    tracing::warn!(error = %err, "Stream read failed");
                    st.finished = true;
                    return Some((StreamEvent::Error(err), st));
                }
                None => {
                    st.body_ended = true;
                    st.pending.extend(st.parser.finish());
                }
            }
        }
    })
}

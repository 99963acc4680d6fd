use futures::{Stream, StreamExt};
use serde::de::DeserializeOwned;
use sluice_types::EventStreamBatch;
use std::pin::Pin;

use super::buffering::LineBuffer;
use crate::error::{Error, Result};
use crate::traits::ByteStream;

pub type BatchStream<T> = Pin<Box<dyn Stream<Item = Result<EventStreamBatch<T>>> + Send>>;

/// Decode one record line.
///
/// Blank lines yield `None`; anything else must be a complete batch.
pub fn decode_line<T: DeserializeOwned>(line: &[u8]) -> Result<Option<EventStreamBatch<T>>> {
    let trimmed = line.trim_ascii();
    if trimmed.is_empty() {
        return Ok(None);
    }

    serde_json::from_slice(trimmed)
        .map(Some)
        .map_err(|source| Error::DeserializationFailure {
            raw: line.to_vec(),
            source,
        })
}

/// Turn a newline-delimited response body into typed batches.
///
/// The first transport or decode error ends the stream.
pub fn decode_batches<T>(body: ByteStream) -> BatchStream<T>
where
    T: DeserializeOwned + Send + 'static,
{
    Box::pin(async_stream::stream! {
        let mut body = body;
        let mut buffer = LineBuffer::with_capacity(64 * 1024);

        while let Some(chunk_result) = body.next().await {
            match chunk_result {
                Ok(bytes) => buffer.extend(&bytes),
                Err(e) => {
                    yield Err(e);
                    return;
                }
            }

            while let Some(line) = buffer.next_line() {
                match decode_line::<T>(&line) {
                    Ok(Some(batch)) => yield Ok(batch),
                    Ok(None) => {}
                    Err(e) => {
                        yield Err(e);
                        return;
                    }
                }
            }
        }

        match decode_line::<T>(&buffer.take_remaining()) {
            Ok(Some(batch)) => yield Ok(batch),
            Ok(None) => {}
            Err(e) => yield Err(e),
        }
    })
}

mod buffering;
mod decoder;

pub use buffering::LineBuffer;
pub use decoder::{decode_batches, decode_line, BatchStream};

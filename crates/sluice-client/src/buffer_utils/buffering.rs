use std::collections::VecDeque;

/// Accumulates streamed bytes and hands out complete `\n`-terminated lines.
///
/// Chunk boundaries of the transport are unrelated to record boundaries, so
/// a line may arrive spread over several chunks.
pub struct LineBuffer {
    buffer: VecDeque<u8>,
    // bytes at the front already known to contain no newline
    scanned: usize,
}

impl LineBuffer {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buffer: VecDeque::with_capacity(capacity),
            scanned: 0,
        }
    }

    pub fn extend(&mut self, bytes: &[u8]) {
        self.buffer.extend(bytes);
    }

    /// Next complete line without its terminator (`\n` or `\r\n`)
    pub fn next_line(&mut self) -> Option<Vec<u8>> {
        let newline_pos = match self.buffer.iter().skip(self.scanned).position(|&b| b == b'\n') {
            Some(pos) => self.scanned + pos,
            None => {
                self.scanned = self.buffer.len();
                return None;
            }
        };

        let mut line: Vec<u8> = self.buffer.drain(..=newline_pos).collect();
        self.scanned = 0;

        line.pop();
        if line.last() == Some(&b'\r') {
            line.pop();
        }
        Some(line)
    }

    /// Drain whatever is left, terminated or not
    pub fn take_remaining(&mut self) -> Vec<u8> {
        self.scanned = 0;
        self.buffer.drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_complete_lines() {
        let mut buffer = LineBuffer::with_capacity(64);

        buffer.extend(b"line1\nline2\r\n");

        assert_eq!(buffer.next_line().unwrap(), b"line1");
        assert_eq!(buffer.next_line().unwrap(), b"line2");
        assert!(buffer.next_line().is_none());
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_line_split_across_chunks() {
        let mut buffer = LineBuffer::with_capacity(64);

        buffer.extend(b"{\"cursor\":");
        assert!(buffer.next_line().is_none());

        buffer.extend(b"1}");
        assert!(buffer.next_line().is_none());

        buffer.extend(b"\n{\"next");
        assert_eq!(buffer.next_line().unwrap(), b"{\"cursor\":1}");
        assert!(buffer.next_line().is_none());
        assert_eq!(buffer.take_remaining(), b"{\"next");
    }

    #[test]
    fn test_empty_line() {
        let mut buffer = LineBuffer::with_capacity(8);
        buffer.extend(b"\n");
        assert_eq!(buffer.next_line().unwrap(), b"");
    }
}

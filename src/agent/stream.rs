//! Character-by-character delivery of a finished reply.
//!
//! The reply is fully computed before the first character is yielded; this
//! only paces output for display, it does not stream tokens from the model.

use std::time::Duration;

use tokio_stream::{Stream, StreamExt};

/// Finite sequence of the characters of one reply.
///
/// Cloning yields an independent stream starting at the same position;
/// [`ResponseStream::restart`] rewinds to the first character.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseStream {
    text: String,
    pos: usize,
}

impl ResponseStream {
    /// Wraps a finished reply.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            pos: 0,
        }
    }

    /// The whole reply, regardless of how much has been consumed.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Characters not yet yielded.
    #[must_use]
    pub fn remaining(&self) -> &str {
        &self.text[self.pos..]
    }

    /// Rewinds to the first character.
    pub const fn restart(&mut self) {
        self.pos = 0;
    }

    /// Yields the remaining characters with `delay` between each, for a
    /// typing effect. The returned stream must be pinned before polling.
    pub fn paced(self, delay: Duration) -> impl Stream<Item = char> {
        tokio_stream::iter(self).throttle(delay)
    }
}

impl Iterator for ResponseStream {
    type Item = char;

    fn next(&mut self) -> Option<char> {
        let ch = self.remaining().chars().next()?;
        self.pos += ch.len_utf8();
        Some(ch)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let bytes = self.text.len() - self.pos;
        (bytes.div_ceil(4), Some(bytes))
    }
}

impl std::iter::FusedIterator for ResponseStream {}

use std::io;

use crate::error::SourceError;

/// How the wrapped source finished. Recorded once, never overwritten.
#[derive(Debug, Clone)]
pub(crate) enum Terminal {
    Eof,
    Failed(SourceError),
}

impl Terminal {
    /// Replays the outcome as a `Read::read` result with no bytes transferred.
    pub(crate) fn replay(&self) -> io::Result<usize> {
        match self {
            Terminal::Eof => Ok(0),
            Terminal::Failed(err) => Err(err.to_io()),
        }
    }
}

/// Append-only ledger of every byte pulled from the source so far.
#[derive(Debug, Default)]
pub(crate) struct SharedCache {
    bytes: Vec<u8>,
    terminal: Option<Terminal>,
}

impl SharedCache {
    pub(crate) fn len(&self) -> usize {
        self.bytes.len()
    }

    pub(crate) fn terminal(&self) -> Option<&Terminal> {
        self.terminal.as_ref()
    }

    /// Whether a reader positioned at `cursor` can make progress without the source.
    pub(crate) fn can_serve(&self, cursor: usize) -> bool {
        cursor < self.bytes.len() || self.terminal.is_some()
    }

    pub(crate) fn append(&mut self, data: &[u8]) {
        self.bytes.extend_from_slice(data);
    }

    /// Records the source's terminal outcome. First write wins.
    pub(crate) fn finish(&mut self, outcome: Terminal) -> bool {
        if self.terminal.is_some() {
            return false;
        }
        self.terminal = Some(outcome);
        true
    }

    /// Copies `cache[cursor..]` into `buf`, returning how many bytes were copied.
    pub(crate) fn copy_to(&self, cursor: usize, buf: &mut [u8]) -> usize {
        let available = self.bytes.get(cursor..).unwrap_or_default();
        let n = available.len().min(buf.len());
        buf[..n].copy_from_slice(&available[..n]);
        n
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_copy_is_bounded_by_buffer_and_cache() {
        let mut cache = SharedCache::default();
        cache.append(b"hello ");
        cache.append(b"world");

        let mut small = [0u8; 4];
        assert_eq!(cache.copy_to(0, &mut small), 4);
        assert_eq!(&small, b"hell");

        let mut large = [0u8; 32];
        assert_eq!(cache.copy_to(6, &mut large), 5);
        assert_eq!(&large[..5], b"world");

        assert_eq!(cache.copy_to(11, &mut large), 0);
        assert_eq!(cache.copy_to(99, &mut large), 0);
    }

    #[test]
    fn test_first_terminal_outcome_wins() {
        let mut cache = SharedCache::default();
        assert!(!cache.can_serve(0));

        assert!(cache.finish(Terminal::Eof));
        let late = SourceError::new(io::Error::other("late failure"));
        assert!(!cache.finish(Terminal::Failed(late)));

        assert!(matches!(cache.terminal(), Some(Terminal::Eof)));
        assert!(cache.can_serve(0));
        assert_eq!(cache.terminal().unwrap().replay().unwrap(), 0);
    }

    #[test]
    fn test_failed_outcome_replays_as_error() {
        let outcome = Terminal::Failed(SourceError::new(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            "truncated body",
        )));

        let err = outcome.replay().unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
        assert_eq!(err.to_string(), "truncated body");
    }
}

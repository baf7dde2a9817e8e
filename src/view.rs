use std::fmt;
use std::io::{self, Read};
use std::sync::Arc;

use tracing::trace;

use crate::error::ViewId;
use crate::factory::Inner;

/// An independent reader over a [`Factory`](crate::Factory)'s shared cache.
///
/// Every view starts at byte zero and keeps a private cursor. Reads are served
/// from the cache when possible; otherwise the factory is asked to pull more
/// from the source. A read may return fewer bytes than the buffer holds.
///
/// Dropping a view closes it.
pub struct View<R> {
    inner: Arc<Inner<R>>,
    id: ViewId,
    cursor: usize,
    closed: bool,
}

impl<R> View<R> {
    pub(crate) fn new(inner: Arc<Inner<R>>, id: ViewId) -> Self {
        Self {
            inner,
            id,
            cursor: 0,
            closed: false,
        }
    }

    pub(crate) fn belongs_to(&self, inner: &Arc<Inner<R>>) -> bool {
        Arc::ptr_eq(&self.inner, inner)
    }

    /// This view's identifier within its factory.
    pub fn id(&self) -> ViewId {
        self.id
    }

    /// Number of bytes this view has delivered so far.
    pub fn position(&self) -> usize {
        self.cursor
    }

    /// Whether [`close`](Self::close) has been called.
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Closes this view. Every later read reports end of data.
    ///
    /// The view unregisters itself from its factory. If the factory no longer
    /// knows about it (for example after
    /// [`Factory::remove_view`](crate::Factory::remove_view)) this is ignored.
    /// The shared cache and other views are unaffected.
    pub fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        if let Err(err) = self.inner.unregister(self.id) {
            trace!(view = %self.id, error = %err, "view already unregistered");
        }
    }
}

impl<R: Read> Read for View<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.closed {
            return Ok(0);
        }

        self.inner.ensure_available(self.cursor, buf.len())?;

        let cache = self.inner.cache().read();
        let n = cache.copy_to(self.cursor, buf);
        if n == 0 && !buf.is_empty() {
            // Cache exhausted for this view: replay the terminal outcome, or
            // end of data if the factory was closed before one was recorded.
            return cache.terminal().map_or(Ok(0), |outcome| outcome.replay());
        }
        self.cursor += n;
        Ok(n)
    }
}

impl<R> Drop for View<R> {
    fn drop(&mut self) {
        self.close();
    }
}

impl<R> fmt::Debug for View<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("View")
            .field("id", &self.id)
            .field("position", &self.cursor)
            .field("closed", &self.closed)
            .finish()
    }
}

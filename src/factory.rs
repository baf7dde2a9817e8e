use std::collections::HashSet;
use std::fmt;
use std::io::{self, Read};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use tracing::{debug, trace};

use crate::cache::{SharedCache, Terminal};
use crate::error::{Error, Result, SourceError, ViewId};
use crate::view::View;

/// State shared between a [`Factory`] and every [`View`] it mints.
pub(crate) struct Inner<R> {
    // Held for the whole duration of a source read; the only serialization point.
    source: Mutex<Option<R>>,
    has_source: bool,
    cache: RwLock<SharedCache>,
    closed: AtomicBool,
    views: Mutex<HashSet<ViewId>>,
    next_id: AtomicU64,
    #[cfg(feature = "stats")]
    stats: crate::stats::Stats,
}

impl<R> Inner<R> {
    pub(crate) fn cache(&self) -> &RwLock<SharedCache> {
        &self.cache
    }

    fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    pub(crate) fn unregister(&self, id: ViewId) -> Result<()> {
        if !self.views.lock().remove(&id) {
            debug!(view = %id, "rejecting removal of unregistered view");
            return Err(Error::NotRegistered { id });
        }
        #[cfg(feature = "stats")]
        self.stats.view_removed();
        trace!(view = %id, "view removed");
        Ok(())
    }
}

impl<R: Read> Inner<R> {
    /// Makes sure a reader at `cursor` asking for `want` bytes can be answered
    /// from the cache, consulting the source at most once.
    ///
    /// On `Ok(())` the cache either holds a byte past `cursor`, carries a
    /// terminal outcome, or the factory is closed (end of data). Errors are
    /// limited to the permanent no-source condition and transient
    /// interruptions, neither of which touches the cache.
    pub(crate) fn ensure_available(&self, cursor: usize, want: usize) -> io::Result<()> {
        if !self.has_source {
            return Err(Error::NoSource.into());
        }
        if want == 0 || self.cache.read().can_serve(cursor) || self.is_closed() {
            return Ok(());
        }

        let mut source = self.source.lock();

        // Another view may have filled the gap while we waited on the guard.
        let shortfall = {
            let cache = self.cache.read();
            if cache.can_serve(cursor) || self.is_closed() {
                return Ok(());
            }
            (cursor + want).saturating_sub(cache.len()).max(1)
        };
        let reader = source.as_mut().ok_or(Error::NoSource)?;

        let mut scratch = vec![0u8; shortfall];
        let result = reader.read(&mut scratch);

        let mut cache = self.cache.write();
        match result {
            Ok(0) => {
                if cache.finish(Terminal::Eof) {
                    debug!(cached = cache.len(), "source reached end of data");
                }
                #[cfg(feature = "stats")]
                self.stats.source_read(0);
            }
            Ok(n) => {
                cache.append(&scratch[..n]);
                trace!(requested = shortfall, received = n, cached = cache.len(), "source fetch");
                #[cfg(feature = "stats")]
                self.stats.source_read(n);
            }
            Err(err) if err.kind() == io::ErrorKind::Interrupted => {
                trace!("source read interrupted");
                return Err(err);
            }
            Err(err) => {
                debug!(error = %err, cached = cache.len(), "source failed");
                cache.finish(Terminal::Failed(SourceError::new(err)));
                #[cfg(feature = "stats")]
                self.stats.source_read(0);
            }
        }
        Ok(())
    }
}

/// Owner of a single-pass source and the cache of everything read from it.
///
/// A `Factory` mints any number of [`View`]s. Each view reads the source's
/// content from byte zero at its own pace; the source itself is read once,
/// and only as far as the furthest view has asked.
///
/// # Examples
///
/// ```
/// use doppelganger::Factory;
/// use std::io::Read;
///
/// let factory = Factory::new(&b"Hello World"[..]);
///
/// let mut first = factory.new_view();
/// let mut body = String::new();
/// first.read_to_string(&mut body).unwrap();
///
/// let mut second = factory.new_view();
/// let mut again = String::new();
/// second.read_to_string(&mut again).unwrap();
///
/// assert_eq!(body, "Hello World");
/// assert_eq!(body, again);
/// ```
pub struct Factory<R> {
    inner: Arc<Inner<R>>,
}

impl<R> Factory<R> {
    /// Wraps `source`. Nothing is read until a view asks for data.
    pub fn new(source: R) -> Self {
        Self::from_option(Some(source))
    }

    /// Wraps an optional source.
    ///
    /// With `None`, every read on every view reports [`Error::NoSource`].
    pub fn from_option(source: Option<R>) -> Self {
        let has_source = source.is_some();
        Self {
            inner: Arc::new(Inner {
                source: Mutex::new(source),
                has_source,
                cache: RwLock::new(SharedCache::default()),
                closed: AtomicBool::new(false),
                views: Mutex::new(HashSet::new()),
                next_id: AtomicU64::new(0),
                #[cfg(feature = "stats")]
                stats: crate::stats::Stats::new(),
            }),
        }
    }

    /// Mints a view positioned at byte zero.
    ///
    /// Always succeeds, including after [`close`](Self::close): a closed
    /// factory keeps serving whatever it has already cached.
    pub fn new_view(&self) -> View<R> {
        let id = ViewId(self.inner.next_id.fetch_add(1, Ordering::Relaxed));
        self.inner.views.lock().insert(id);
        #[cfg(feature = "stats")]
        self.inner.stats.view_registered();
        trace!(view = %id, "view registered");
        View::new(Arc::clone(&self.inner), id)
    }

    /// Unregisters `view` without closing it.
    ///
    /// Fails with [`Error::NotRegistered`] if the view was already removed and
    /// with [`Error::ForeignView`] if another factory minted it.
    pub fn remove_view(&self, view: &View<R>) -> Result<()> {
        if !view.belongs_to(&self.inner) {
            debug!(view = %view.id(), "rejecting removal of foreign view");
            return Err(Error::ForeignView { id: view.id() });
        }
        self.inner.unregister(view.id())
    }

    /// Stops all further reads from the source.
    ///
    /// Views keep reading what is already cached and then see end of data.
    /// The source is not dropped or otherwise released: it lives until the
    /// factory and all of its views are gone. A source read already in
    /// progress on another thread is allowed to finish.
    pub fn close(&self) {
        if !self.inner.closed.swap(true, Ordering::AcqRel) {
            debug!(cached = self.cached_len(), "factory closed");
        }
    }

    /// Whether [`close`](Self::close) has been called.
    pub fn is_closed(&self) -> bool {
        self.inner.is_closed()
    }

    /// Number of bytes cached from the source so far.
    pub fn cached_len(&self) -> usize {
        self.inner.cache.read().len()
    }

    /// Number of views currently registered.
    pub fn view_count(&self) -> usize {
        self.inner.views.lock().len()
    }

    /// Returns a handle to this factory's runtime counters.
    ///
    /// ```
    /// use doppelganger::Factory;
    /// use std::io::Read;
    ///
    /// let factory = Factory::new(&b"abc"[..]);
    /// let stats = factory.stats();
    ///
    /// let mut view = factory.new_view();
    /// assert_eq!(stats.active_views(), 1);
    ///
    /// let mut buf = Vec::new();
    /// view.read_to_end(&mut buf).unwrap();
    /// assert_eq!(stats.cached_bytes(), 3);
    ///
    /// drop(view);
    /// assert_eq!(stats.active_views(), 0);
    /// ```
    #[cfg(feature = "stats")]
    #[cfg_attr(docsrs, doc(cfg(feature = "stats")))]
    pub fn stats(&self) -> crate::stats::Stats {
        self.inner.stats.clone()
    }
}

impl Factory<io::Empty> {
    /// Builds a factory with no source at all.
    ///
    /// ```
    /// use doppelganger::Factory;
    /// use std::io::Read;
    ///
    /// let factory = Factory::empty();
    /// let err = factory.new_view().read(&mut [0u8; 8]).unwrap_err();
    /// assert_eq!(err.to_string(), "no source to mimic");
    /// ```
    pub fn empty() -> Self {
        Self::from_option(None)
    }
}

impl<R> fmt::Debug for Factory<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cache = self.inner.cache.read();
        f.debug_struct("Factory")
            .field("has_source", &self.inner.has_source)
            .field("cached", &cache.len())
            .field("terminal", &cache.terminal().is_some())
            .field("closed", &self.is_closed())
            .field("views", &self.view_count())
            .finish()
    }
}

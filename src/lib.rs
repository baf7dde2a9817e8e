//! A library for reading a single-pass source many times over.
//!
//! [`Factory`] wraps any [`Read`](std::io::Read) and mints [`View`]s. Every view
//! reads the source's full content from byte zero, independently of the other
//! views, while the source itself is consumed exactly once. Bytes pulled from
//! the source are kept in a shared, append-only cache.
//!
//! # Examples
//!
//! ```
//! use doppelganger::Factory;
//! use std::io::Read;
//!
//! let body = std::io::Cursor::new(br#"{"name":"doppelganger"}"#.to_vec());
//! let factory = Factory::new(body);
//!
//! // One consumer inspects the first bytes only.
//! let mut sniff = [0u8; 1];
//! factory.new_view().read_exact(&mut sniff).unwrap();
//! assert_eq!(&sniff, b"{");
//!
//! // Another still sees the whole body.
//! let mut full = String::new();
//! factory.new_view().read_to_string(&mut full).unwrap();
//! assert_eq!(full, r#"{"name":"doppelganger"}"#);
//! ```
//!
//! # Behavior
//!
//! - A new view always starts at byte zero, even after the factory is closed.
//! - The source is only read as far as the furthest view has asked, and never
//!   twice for the same bytes.
//! - When the source reports end of data or fails, the outcome is cached and
//!   replayed to every view that reaches the end of the cache. A failure keeps
//!   its [`io::ErrorKind`](std::io::ErrorKind) and message on every replay.
//! - [`Factory::close`] stops further source reads without dropping the
//!   source. Views then read what is cached and see end of data.
//! - A factory built without a source reports [`Error::NoSource`] on every read.
//!
//! ```
//! use doppelganger::Factory;
//! use std::io::Read;
//!
//! let factory = Factory::new(&b"Hello World"[..]);
//! let mut first = Vec::new();
//! factory.new_view().read_to_end(&mut first).unwrap();
//!
//! factory.close();
//!
//! let mut late = Vec::new();
//! factory.new_view().read_to_end(&mut late).unwrap();
//! assert_eq!(late, b"Hello World");
//! ```
//!
//! # Thread Safety
//!
//! `Factory` and `View` are [`Send`] and [`Sync`] when the source is `Send`.
//! Views can be minted and read on different threads. Reads served from the
//! cache never wait on another view; only source reads are serialized.
//!
//! ```
//! use doppelganger::Factory;
//! use std::io::Read;
//! use std::sync::Arc;
//! use std::thread;
//!
//! let factory = Arc::new(Factory::new(std::io::repeat(7).take(64)));
//!
//! let handles: Vec<_> = (0..4)
//!     .map(|_| {
//!         let factory = Arc::clone(&factory);
//!         thread::spawn(move || {
//!             let mut out = Vec::new();
//!             factory.new_view().read_to_end(&mut out).unwrap();
//!             out
//!         })
//!     })
//!     .collect();
//!
//! for handle in handles {
//!     assert_eq!(handle.join().unwrap(), vec![7u8; 64]);
//! }
//! ```
//!
//! # Memory
//!
//! The cache keeps every byte ever read from the source until the factory and
//! all of its views are dropped. Bound the source (for example with
//! [`Read::take`](std::io::Read::take)) when its length is not known to be
//! reasonable.
//!
//! # Feature flags
//!
//! - `stats`: enables `Factory::stats` and the `Stats` counters.

#![cfg_attr(docsrs, feature(doc_cfg))]

mod cache;
mod error;
mod ext;
mod factory;
#[cfg(feature = "stats")]
mod stats;
mod view;

pub use error::{Error, Result, SourceError, ViewId};
pub use ext::ReadExt;
pub use factory::Factory;
#[cfg(feature = "stats")]
pub use stats::Stats;
pub use view::View;

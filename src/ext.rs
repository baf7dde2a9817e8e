//! Extension trait for converting readers into a [`Factory`].
//!
//! This module provides the `ReadExt` trait which adds an `into_factory` method
//! to any type that implements [`Read`].

use crate::Factory;
use std::io::Read;

/// Extension trait for [`Read`] that provides the `into_factory` method.
///
/// This trait allows any reader to be wrapped in a [`Factory`] so that several
/// consumers can each read it from the beginning.
pub trait ReadExt: Read {
    /// Converts this reader into a [`Factory`].
    ///
    /// The reader is moved into the factory. Nothing is read until one of the
    /// factory's views asks for data.
    ///
    /// ```
    /// use doppelganger::ReadExt;
    /// use std::io::Read;
    ///
    /// let factory = std::io::Cursor::new("hello").into_factory();
    /// let mut text = String::new();
    /// factory.new_view().read_to_string(&mut text).unwrap();
    /// assert_eq!(text, "hello");
    /// ```
    fn into_factory(self) -> Factory<Self>
    where
        Self: Sized,
    {
        Factory::new(self)
    }
}

impl<R> ReadExt for R where R: Read {}

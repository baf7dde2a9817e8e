#![allow(dead_code)]

use std::collections::VecDeque;
use std::io::{self, Read};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use rand::{rngs::StdRng, RngCore, SeedableRng};

/// Source that replays a fixed list of read results and counts its calls.
///
/// Once the script runs out it reports end of data forever.
pub struct ScriptedSource {
    script: VecDeque<io::Result<Vec<u8>>>,
    calls: Arc<AtomicUsize>,
}

impl ScriptedSource {
    pub fn new(script: Vec<io::Result<Vec<u8>>>) -> (Self, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let source = Self {
            script: script.into(),
            calls: Arc::clone(&calls),
        };
        (source, calls)
    }
}

impl Read for ScriptedSource {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.script.pop_front() {
            Some(Ok(mut chunk)) => {
                if chunk.len() > buf.len() {
                    let rest = chunk.split_off(buf.len());
                    self.script.push_front(Ok(rest));
                }
                buf[..chunk.len()].copy_from_slice(&chunk);
                Ok(chunk.len())
            }
            Some(Err(err)) => Err(err),
            None => Ok(0),
        }
    }
}

/// Endless pseudo-random bytes, counting how many times it was read.
pub struct NoiseSource {
    rng: StdRng,
    calls: Arc<AtomicUsize>,
}

impl NoiseSource {
    pub fn new(seed: u64) -> (Self, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let source = Self {
            rng: StdRng::seed_from_u64(seed),
            calls: Arc::clone(&calls),
        };
        (source, calls)
    }
}

impl Read for NoiseSource {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.rng.fill_bytes(buf);
        Ok(buf.len())
    }
}

/// Source whose release is observable: sets a flag when dropped.
pub struct ReleaseTracked {
    inner: io::Cursor<Vec<u8>>,
    released: Arc<AtomicBool>,
}

impl ReleaseTracked {
    pub fn new(data: &[u8]) -> (Self, Arc<AtomicBool>) {
        let released = Arc::new(AtomicBool::new(false));
        let source = Self {
            inner: io::Cursor::new(data.to_vec()),
            released: Arc::clone(&released),
        };
        (source, released)
    }
}

impl Read for ReleaseTracked {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.inner.read(buf)
    }
}

impl Drop for ReleaseTracked {
    fn drop(&mut self) {
        self.released.store(true, Ordering::SeqCst);
    }
}

use std::io::{self, Read};

// --- Data Types and Constants ---

pub const NUM_VIEWS: usize = 5;
pub const CHUNK: usize = 8 * 1024;

// --- Source Generators ---

// Source A: In-Memory (Minimal Read Latency)
pub fn generate_in_memory_source(len: usize) -> io::Cursor<Vec<u8>> {
    io::Cursor::new((0..len).map(|i| (i % 251) as u8).collect())
}

// Source B: Trickling I/O (at most one small chunk per call, like a socket)
pub struct TrickleSource {
    data: Vec<u8>,
    pos: usize,
    step: usize,
}

impl Read for TrickleSource {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let end = (self.pos + self.step.min(buf.len())).min(self.data.len());
        let n = end - self.pos;
        buf[..n].copy_from_slice(&self.data[self.pos..end]);
        self.pos = end;
        Ok(n)
    }
}

pub fn generate_trickle_source(len: usize) -> TrickleSource {
    TrickleSource {
        data: (0..len).map(|i| (i % 251) as u8).collect(),
        pos: 0,
        step: 1500,
    }
}

// --- Consumers ---

// Drains a reader in fixed-size chunks, returning the byte count.
pub fn drain<R: Read>(mut reader: R) -> usize {
    let mut buf = [0u8; CHUNK];
    let mut total = 0;
    loop {
        match reader.read(&mut buf) {
            Ok(0) => return total,
            Ok(n) => total += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => panic!("read failed: {e}"),
        }
    }
}

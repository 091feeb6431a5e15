//! A byte source with position accounting and a stack of byte-length
//! limits.
//!
//! Bounded scopes appear in several places of a DICOM stream: the file
//! meta group is bounded by its group length, and sequences and items
//! with defined lengths bound their contents as well. The
//! [`LimitedSource`] keeps a stack of such scopes so that a read which
//! would cross the narrowest active limit is cut short, surfacing as a
//! truncation error at the consumer, and so that scope exhaustion can be
//! queried cheaply at any moment.

use std::io::{BufRead, Read};

/// A reader wrapper which accounts for the number of bytes consumed and
/// enforces a stack of byte-length limits.
///
/// Reads are clamped at the narrowest active limit: once a scope is
/// exhausted, reads return 0 bytes, which a caller using `read_exact`
/// perceives as an unexpected end of stream. An empty limit stack means
/// that reading is only bounded by the underlying source.
///
/// Limits are declared in relative terms via [`push_limit`], and must be
/// popped once the scope is fully consumed; draining any residue is the
/// caller's responsibility.
///
/// [`push_limit`]: LimitedSource::push_limit
#[derive(Debug)]
pub struct LimitedSource<S> {
    inner: S,
    /// number of bytes consumed since construction
    position: u64,
    /// absolute end offsets of the active scopes, outermost first
    limits: Vec<u64>,
}

impl<S> LimitedSource<S> {
    /// Create a new unbounded source.
    pub fn new(inner: S) -> Self {
        LimitedSource {
            inner,
            position: 0,
            limits: Vec::new(),
        }
    }

    /// Create a new source bounded to the given total number of bytes.
    ///
    /// This is useful when the full size of the input is known upfront.
    pub fn with_limit(inner: S, limit: u64) -> Self {
        LimitedSource {
            inner,
            position: 0,
            limits: vec![limit],
        }
    }

    /// Retrieve the number of bytes consumed so far.
    #[inline]
    pub fn position(&self) -> u64 {
        self.position
    }

    /// Declare that the next `n` bytes constitute a bounded scope.
    ///
    /// Reads crossing this mark will be cut short until the scope is
    /// popped with [`pop_limit`](LimitedSource::pop_limit).
    pub fn push_limit(&mut self, n: u64) {
        self.limits.push(self.position + n);
    }

    /// Leave the current bounded scope,
    /// returning the number of bytes which were left unconsumed in it.
    ///
    /// The caller is expected to have drained the scope; leftovers are
    /// reported back so that the caller can decide whether to skip them
    /// or treat the situation as an inconsistency.
    pub fn pop_limit(&mut self) -> Option<u64> {
        self.limits.pop().map(|end| end.saturating_sub(self.position))
    }

    /// Report the number of bytes left until the narrowest active limit,
    /// or `None` if no limit is active.
    pub fn bytes_left_until_limit(&self) -> Option<u64> {
        self.limits
            .iter()
            .min()
            .map(|end| end.saturating_sub(self.position))
    }

    /// Check whether the narrowest active limit has been reached.
    /// Always `false` when no limit is active.
    pub fn is_limit_exhausted(&self) -> bool {
        self.bytes_left_until_limit() == Some(0)
    }
}

impl<S> LimitedSource<S>
where
    S: Read,
{
    /// Advance the source by exactly `n` bytes without keeping the data.
    ///
    /// Limits apply as if the bytes were read.
    pub fn skip(&mut self, n: u64) -> std::io::Result<()> {
        let mut remaining = n;
        let mut buf = [0u8; 1024];
        while remaining > 0 {
            let chunk = remaining.min(buf.len() as u64) as usize;
            self.read_exact(&mut buf[..chunk])?;
            remaining -= chunk as u64;
        }
        Ok(())
    }
}

impl<S> LimitedSource<S>
where
    S: BufRead,
{
    /// Obtain a non-consuming lookahead of the next bytes in the source.
    ///
    /// Fills `buf` from the underlying reader's buffer without advancing
    /// the position, returning how many bytes were actually peeked.
    /// The outcome is bounded by the underlying buffer capacity and by
    /// the narrowest active limit.
    pub fn peek(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        let left = self.bytes_left_until_limit();
        let available = self.inner.fill_buf()?;
        let mut n = available.len().min(buf.len());
        if let Some(left) = left {
            n = n.min(left as usize);
        }
        buf[..n].copy_from_slice(&available[..n]);
        Ok(n)
    }
}

impl<S> Read for LimitedSource<S>
where
    S: Read,
{
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        let buf = match self.bytes_left_until_limit() {
            Some(left) => {
                let n = (left as usize).min(buf.len());
                &mut buf[..n]
            }
            None => buf,
        };
        if buf.is_empty() {
            return Ok(0);
        }
        let n = self.inner.read(buf)?;
        self.position += n as u64;
        Ok(n)
    }
}

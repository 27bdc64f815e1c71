//! Upload progress reporting.
//!
//! A transport session opened with an observer calls
//! [`UploadProgressDelegate::did_send`] each time a chunk of the request body
//! is handed to the connection. Callbacks run on whichever task is driving the
//! upload; implementations must not block.

use std::fmt;

/// Receives byte-level upload progress from a transport.
pub trait UploadProgressDelegate: Send + Sync {
    /// Called after `bytes_sent` more bytes were written.
    ///
    /// `total_bytes_sent` is the running total and `total_bytes_expected` the
    /// full body size, zero when the body is empty.
    fn did_send(&self, bytes_sent: u64, total_bytes_sent: u64, total_bytes_expected: u64);
}

/// Turns byte counts into a fraction and hands it to a callback.
///
/// ## Examples
///
/// ```rust
/// use std::sync::Arc;
/// use api_client::{UploadProgress, UploadProgressDelegate};
///
/// let observer: Arc<dyn UploadProgressDelegate> =
///     Arc::new(UploadProgress::new(|fraction| println!("{:.0}%", fraction * 100.0)));
/// observer.did_send(512, 512, 1024); // prints "50%"
/// ```
pub struct UploadProgress {
    handler: Box<dyn Fn(f64) + Send + Sync>,
}

impl UploadProgress {
    pub fn new(handler: impl Fn(f64) + Send + Sync + 'static) -> Self {
        Self {
            handler: Box::new(handler),
        }
    }

    /// Fraction of the body sent, clamped to `[0, 1]`.
    ///
    /// An empty body counts as fully sent.
    pub fn fraction(total_bytes_sent: u64, total_bytes_expected: u64) -> f64 {
        if total_bytes_expected == 0 {
            return 1.0;
        }
        (total_bytes_sent as f64 / total_bytes_expected as f64).clamp(0.0, 1.0)
    }
}

impl UploadProgressDelegate for UploadProgress {
    fn did_send(&self, _bytes_sent: u64, total_bytes_sent: u64, total_bytes_expected: u64) {
        (self.handler)(Self::fraction(total_bytes_sent, total_bytes_expected));
    }
}

impl fmt::Debug for UploadProgress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UploadProgress").finish_non_exhaustive()
    }
}

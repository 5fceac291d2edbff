//! Barcode decoder contract
//!
//! The core does not decode images itself; a decoder adapter wraps whatever
//! vision backend the platform provides (ML Kit, zbar, a test double) behind
//! this trait.

use std::future::Future;

use super::error::DecodeError;
use super::frame::{CameraFrame, Detection};

/// Adapter over an external barcode decoding backend
///
/// One-shot per frame: given an image, report every code found together with
/// its screen-space bounding box. Zero detections is a valid, non-error
/// outcome for a frame with no codes in view.
///
/// The returned future must be `Send` because the analysis loop runs on the
/// runtime's worker threads. Implementations can still use `async fn`:
///
/// ```ignore
/// impl BarcodeDecoder for MyBackend {
///     async fn decode(&self, frame: &CameraFrame) -> Result<Vec<Detection>, DecodeError> {
///         // ...
///     }
/// }
/// ```
pub trait BarcodeDecoder: Send + Sync + 'static {
    /// Decode all barcodes visible in the frame
    fn decode(
        &self,
        frame: &CameraFrame,
    ) -> impl Future<Output = Result<Vec<Detection>, DecodeError>> + Send;
}

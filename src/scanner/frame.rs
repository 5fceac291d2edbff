//! Camera frames, detections, and the keep-only-latest handoff
//!
//! The frame pipeline driver produces frames faster than the analysis loop
//! consumes them. The [`FrameSlot`] implements the keep-only-latest policy:
//! a newly submitted frame supersedes an unconsumed older one, which is
//! dropped on the spot rather than queued. The core never assumes every
//! frame gets processed.

use bytes::Bytes;

use tokio::sync::{Mutex, Notify};

use crate::geometry::BoundingBox;

/// One frame from the camera pipeline
///
/// Cheap to move around; the pixel data is reference counted via `Bytes`.
/// Release back to the driver is modeled by ownership: whoever holds the
/// frame last drops it, which releases the underlying buffer exactly once.
#[derive(Debug, Clone)]
pub struct CameraFrame {
    /// Raw image data (layout is the decoder's business)
    pub data: Bytes,
    /// Frame width in pixels
    pub width: u32,
    /// Frame height in pixels
    pub height: u32,
    /// Rotation applied by the capture pipeline, in degrees
    pub rotation_degrees: u32,
}

impl CameraFrame {
    /// Create a new frame
    pub fn new(data: Bytes, width: u32, height: u32) -> Self {
        Self {
            data,
            width,
            height,
            rotation_degrees: 0,
        }
    }

    /// Set the capture rotation
    pub fn with_rotation(mut self, degrees: u32) -> Self {
        self.rotation_degrees = degrees;
        self
    }

    /// Size of the frame data in bytes
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the frame carries no data
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// One decoded code in a frame
#[derive(Debug, Clone, PartialEq)]
pub struct Detection {
    /// Raw decoded payload
    pub raw_text: String,
    /// Screen-space rectangle where the code was found
    pub bounding_box: BoundingBox,
}

impl Detection {
    /// Create a new detection
    pub fn new(raw_text: impl Into<String>, bounding_box: BoundingBox) -> Self {
        Self {
            raw_text: raw_text.into(),
            bounding_box,
        }
    }
}

struct PendingFrame {
    frame: Option<CameraFrame>,
    closed: bool,
}

/// Keep-only-latest frame handoff between the driver and the analysis loop
///
/// Single-consumer: one analysis loop calls [`recv`](Self::recv), any number
/// of producer callbacks call [`submit`](Self::submit). Submitting while a
/// frame is still pending drops the pending frame.
pub struct FrameSlot {
    pending: Mutex<PendingFrame>,
    notify: Notify,
}

impl FrameSlot {
    /// Create an empty slot
    pub fn new() -> Self {
        Self {
            pending: Mutex::new(PendingFrame {
                frame: None,
                closed: false,
            }),
            notify: Notify::new(),
        }
    }

    /// Submit a frame, superseding any unconsumed older one
    ///
    /// Returns `true` if an older pending frame was dropped. After
    /// [`close`](Self::close) the submitted frame is dropped immediately and
    /// `false` is returned.
    pub async fn submit(&self, frame: CameraFrame) -> bool {
        let mut pending = self.pending.lock().await;
        if pending.closed {
            return false;
        }

        let superseded = pending.frame.replace(frame).is_some();
        drop(pending);

        self.notify.notify_one();
        superseded
    }

    /// Wait for the newest pending frame
    ///
    /// Returns `None` once the slot is closed and drained.
    pub async fn recv(&self) -> Option<CameraFrame> {
        loop {
            {
                let mut pending = self.pending.lock().await;
                if let Some(frame) = pending.frame.take() {
                    return Some(frame);
                }
                if pending.closed {
                    return None;
                }
            }
            self.notify.notified().await;
        }
    }

    /// Close the slot, dropping any pending frame and waking the consumer
    pub async fn close(&self) {
        let mut pending = self.pending.lock().await;
        pending.closed = true;
        pending.frame = None;
        drop(pending);

        self.notify.notify_one();
    }
}

impl Default for FrameSlot {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(tag: &str) -> CameraFrame {
        CameraFrame::new(Bytes::copy_from_slice(tag.as_bytes()), 640, 480)
    }

    #[tokio::test]
    async fn test_submit_then_recv() {
        let slot = FrameSlot::new();

        assert!(!slot.submit(frame("a")).await);
        let received = slot.recv().await.unwrap();
        assert_eq!(received.data, Bytes::from_static(b"a"));
    }

    #[tokio::test]
    async fn test_newer_frame_supersedes_older() {
        let slot = FrameSlot::new();

        assert!(!slot.submit(frame("old")).await);
        assert!(slot.submit(frame("new")).await);

        // Only the newest frame is ever handed out
        let received = slot.recv().await.unwrap();
        assert_eq!(received.data, Bytes::from_static(b"new"));
    }

    #[tokio::test]
    async fn test_recv_waits_for_submission() {
        let slot = std::sync::Arc::new(FrameSlot::new());

        let consumer = {
            let slot = std::sync::Arc::clone(&slot);
            tokio::spawn(async move { slot.recv().await })
        };

        tokio::task::yield_now().await;
        slot.submit(frame("x")).await;

        let received = consumer.await.unwrap().unwrap();
        assert_eq!(received.data, Bytes::from_static(b"x"));
    }

    #[tokio::test]
    async fn test_close_drains_and_wakes() {
        let slot = std::sync::Arc::new(FrameSlot::new());

        slot.submit(frame("pending")).await;
        slot.close().await;

        // The pending frame was dropped at close; the consumer sees the end
        assert!(slot.recv().await.is_none());
    }

    #[tokio::test]
    async fn test_submit_after_close_is_dropped() {
        let slot = FrameSlot::new();

        slot.close().await;
        assert!(!slot.submit(frame("late")).await);
        assert!(slot.recv().await.is_none());
    }

    #[tokio::test]
    async fn test_close_wakes_blocked_consumer() {
        let slot = std::sync::Arc::new(FrameSlot::new());

        let consumer = {
            let slot = std::sync::Arc::clone(&slot);
            tokio::spawn(async move { slot.recv().await })
        };

        tokio::task::yield_now().await;
        slot.close().await;

        assert!(consumer.await.unwrap().is_none());
    }
}

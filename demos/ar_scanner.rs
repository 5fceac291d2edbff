//! AR scanner demo with scripted camera frames
//!
//! Run with: cargo run --example ar_scanner
//!
//! Simulates a camera session: frames carrying QR payloads stream through
//! the keep-only-latest slot, decoded ids resolve against an in-memory
//! profile store, and overlays appear, move, and expire as the "camera"
//! pans. No real camera or decoder backend is involved; the decoder double
//! reads the payload straight out of the frame bytes.
//!
//! ## What to watch
//!
//! - Overlays appear only for payloads that parse as ids AND exist in the
//!   store ("hello" and id 999 never show up)
//! - Re-detections move the panel instead of duplicating it
//! - Once frames stop carrying a code, its overlay expires within the
//!   staleness timeout

use std::time::Duration;

use bytes::Bytes;

use qrtrack_rs::{
    BarcodeDecoder, BoundingBox, CameraFrame, DecodeError, Detection, MemoryProfileStore,
    ProfileId, ProfileSnapshot, RegistryConfig, ScanSession,
};

/// Decoder double: the frame data is the QR payload, the bounding box is
/// scripted via the rotation field (stand-ins for real pixel analysis)
struct ScriptedDecoder;

impl BarcodeDecoder for ScriptedDecoder {
    async fn decode(&self, frame: &CameraFrame) -> Result<Vec<Detection>, DecodeError> {
        let payload = std::str::from_utf8(&frame.data)
            .map_err(|e| DecodeError::InvalidFrame(e.to_string()))?;

        if payload.is_empty() {
            return Ok(Vec::new());
        }

        // Drift the box horizontally so re-detections visibly move
        let offset = (frame.rotation_degrees % 300) as f32;
        Ok(vec![Detection::new(
            payload,
            BoundingBox::new(40.0 + offset, 120.0, 140.0 + offset, 220.0),
        )])
    }
}

fn payload_frame(payload: &str, drift: u32) -> CameraFrame {
    CameraFrame::new(Bytes::copy_from_slice(payload.as_bytes()), 1280, 720).with_rotation(drift)
}

async fn print_overlays(session: &ScanSession, label: &str) {
    let mut overlays = session.overlays().await;
    overlays.sort_by_key(|o| o.profile_id);

    if overlays.is_empty() {
        println!("[{label}] no overlays");
        return;
    }
    for overlay in overlays {
        println!(
            "[{label}] {} <{}> at {}",
            overlay.profile.name, overlay.profile.email, overlay.bounding_box
        );
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("qrtrack_rs=debug".parse()?),
        )
        .init();

    // Profiles "stored" on the device
    let store = MemoryProfileStore::new();
    store
        .insert(
            ProfileSnapshot::new(ProfileId::new(1), "Ada Lovelace", "ada@example.com")
                .phone_number("+44 20 7946 0001"),
        )
        .await;
    store
        .insert(
            ProfileSnapshot::new(ProfileId::new(2), "Grace Hopper", "grace@example.com")
                .picture_url("https://example.com/grace.jpg"),
        )
        .await;

    let config = RegistryConfig::new()
        .sweep_interval(Duration::from_millis(250))
        .staleness_timeout(Duration::from_millis(1500));
    let session = ScanSession::start(config, ScriptedDecoder, store);

    println!("=== Panning across Ada's badge ===");
    for step in 0u32..5 {
        session.submit_frame(payload_frame("1", step * 30)).await;
        tokio::time::sleep(Duration::from_millis(200)).await;
        print_overlays(&session, "pan").await;
    }

    println!();
    println!("=== Both badges in view, plus junk codes ===");
    for step in 0u32..3 {
        session.submit_frame(payload_frame("1", 150)).await;
        tokio::time::sleep(Duration::from_millis(120)).await;
        session.submit_frame(payload_frame("2", step * 40)).await;
        tokio::time::sleep(Duration::from_millis(120)).await;
        // A URL-bearing QR code and an id nobody stored: both invisible
        session.submit_frame(payload_frame("hello", 0)).await;
        tokio::time::sleep(Duration::from_millis(60)).await;
        session.submit_frame(payload_frame("999", 0)).await;
        tokio::time::sleep(Duration::from_millis(60)).await;
        print_overlays(&session, "both").await;
    }

    // Tap wherever Ada's panel ended up
    let overlays = session.overlays().await;
    if let Some(overlay) = overlays.iter().find(|o| o.profile_id == ProfileId::new(1)) {
        let (x, y) = overlay.bounding_box.center();
        match session.overlay_at(x, y).await {
            Some(id) => println!("Tap at panel center navigates to profile {id}"),
            None => println!("Tap missed (panel already expired)"),
        }
    }

    println!();
    println!("=== Camera moves away; overlays expire ===");
    tokio::time::sleep(Duration::from_millis(2000)).await;
    print_overlays(&session, "idle").await;

    let stats = session.stats();
    println!();
    println!(
        "Stats: analyzed={} dropped={} codes={} resolved={} misses={} decode_failures={}",
        stats.frames_analyzed,
        stats.frames_dropped,
        stats.codes_detected,
        stats.profiles_resolved,
        stats.resolver_misses,
        stats.decode_failures,
    );

    session.shutdown().await;
    println!("Session shut down");

    Ok(())
}

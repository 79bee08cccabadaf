//! WASM bindings for availability-engine.
//!
//! Exposes slot generation, queue estimation and booking conflict checks to
//! the booking front end via `wasm-bindgen`. Requests and results cross the
//! boundary as JSON strings using the same camelCase documents the front end
//! stores.
//!
//! ## Build process
//!
//! ```sh
//! cargo build -p availability-wasm --target wasm32-unknown-unknown --release
//! wasm-bindgen --target web --out-dir pkg/ \
//!   target/wasm32-unknown-unknown/release/availability_wasm.wasm
//! ```

use availability_engine::request::{parse_instant, ConflictRequest, QueueRequest, SlotRequest};
use availability_engine::EngineError;
use chrono::{DateTime, Utc};
use serde::Serialize;
use wasm_bindgen::prelude::*;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn js_error(e: EngineError) -> JsValue {
    JsValue::from_str(&e.to_string())
}

fn to_json<T: Serialize>(value: &T) -> Result<String, JsValue> {
    serde_json::to_string(value)
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
}

/// `now_iso` is required: the browser clock is sampled by the caller, which
/// keeps the engine deterministic.
fn parse_now(now_iso: &str) -> Result<DateTime<Utc>, JsValue> {
    parse_instant(now_iso).map_err(js_error)
}

// ---------------------------------------------------------------------------
// WASM exports
// ---------------------------------------------------------------------------

/// List bookable slots for the day in a slot request.
///
/// `request_json` is a `{company, service, provider, date, bookings}` document.
/// Returns a JSON array of `{start, end, displayLabel}` objects; an empty array
/// means closed, misconfigured or fully booked.
#[wasm_bindgen(js_name = "generateSlots")]
pub fn generate_slots(request_json: &str, now_iso: &str) -> Result<String, JsValue> {
    let request = SlotRequest::from_json(request_json).map_err(js_error)?;
    let now = parse_now(now_iso)?;

    to_json(&request.generate(now))
}

/// Estimate when someone joining the queue at `now_iso` would be served.
///
/// `request_json` is a `{company, service, provider, bookings, queue}` document.
/// Returns a JSON `{estimatedStart, peopleAhead, waitMinutes}` object, or
/// `null` when no estimate is possible today.
#[wasm_bindgen(js_name = "estimateQueue")]
pub fn estimate_queue(request_json: &str, now_iso: &str) -> Result<String, JsValue> {
    let request = QueueRequest::from_json(request_json).map_err(js_error)?;
    let now = parse_now(now_iso)?;

    to_json(&request.estimate(now))
}

/// Check a proposed booking against existing ones before storing it.
///
/// `request_json` is a `{proposed, bookings}` document. Returns a JSON array of
/// `{booking, overlapMinutes}` objects; empty means the booking is safe.
#[wasm_bindgen(js_name = "findBookingConflicts")]
pub fn find_booking_conflicts(request_json: &str) -> Result<String, JsValue> {
    let request = ConflictRequest::from_json(request_json).map_err(js_error)?;

    to_json(&request.conflicts())
}

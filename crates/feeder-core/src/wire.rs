//! JSON wire format of the feeder HTTP API.
//!
//! Response decoding is kept separate from the HTTP client so it can be
//! exercised without a server. Decoders accept the shapes the device firmware
//! actually sends, which are looser than the documented ones in two places:
//! `distance` may be a number or a string, and "no last feed" may be `[]`,
//! `""` or `null`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use feeder_types::{FeedLogEntry, FeedSize, FeedType, LastFeedEntry, Reading, ScheduledFeed};

use crate::error::{Error, Result};

/// Type code recorded when the device does not send one.
const UNKNOWN_TYPE_CODE: i64 = -1;

/// Endpoint paths, relative to the device base URL.
pub mod endpoints {
    pub const GET_DISTANCE: &str = "/api/getDistance";
    pub const GET_LAST_FEED: &str = "/api/getLastFeed";
    pub const GET_FEED_TIMES: &str = "/api/getFeedTimes";
    pub const GET_FEEDING_TIMES: &str = "/api/getFeedingTimes";
    pub const MANUAL_FEED: &str = "/api/manualFeed";
    pub const ADD_FEED_TIME: &str = "/api/addFeedTime";
    pub const DELETE_FEED_TIME: &str = "/api/deleteFeedTime";
    pub const TOGGLE_CAMERA: &str = "/api/toggleCamera";
}

/// Body of `POST /api/manualFeed`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManualFeedRequest {
    pub size: FeedSize,
}

/// Body of `POST /api/addFeedTime`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddFeedTimeRequest {
    /// Zero-padded 24-hour `HH:MM`.
    pub time: String,
    #[serde(rename = "type")]
    pub feed_type: FeedType,
    pub size: FeedSize,
}

/// Body of `POST /api/deleteFeedTime`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteFeedTimeRequest {
    pub time: String,
}

#[derive(Deserialize)]
struct DistanceBody {
    distance: Value,
}

#[derive(Deserialize)]
struct LastFeedBody {
    #[serde(default)]
    last_feed: Value,
}

#[derive(Deserialize)]
struct FeedTimesBody {
    feed_times: Vec<(String, i64, i64)>,
}

#[derive(Deserialize)]
struct FeedingTimesBody {
    feeding_times: Vec<(String, String, i64, i64)>,
}

fn parse_body<T: serde::de::DeserializeOwned>(endpoint: &str, body: Value) -> Result<T> {
    serde_json::from_value(body).map_err(|e| Error::malformed(endpoint, e.to_string()))
}

/// Decode `/api/getDistance`.
pub fn decode_reading(body: Value) -> Result<Reading> {
    let endpoint = endpoints::GET_DISTANCE;
    let DistanceBody { distance } = parse_body(endpoint, body)?;

    let raw = match distance {
        Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| Error::malformed(endpoint, format!("distance {} is not finite", n)))?,
        Value::String(text) => match text.trim().trim_end_matches('%').parse::<f64>() {
            Ok(value) => value,
            // The firmware reports a missing sensor as free text in place of the number.
            Err(_) => return Err(Error::SensorUnavailable(text)),
        },
        other => {
            return Err(Error::malformed(
                endpoint,
                format!("distance has unexpected type: {}", other),
            ));
        }
    };

    Reading::from_percent(raw)
        .ok_or_else(|| Error::malformed(endpoint, format!("distance {} is not a percentage", raw)))
}

/// Decode `/api/getLastFeed`. `None` means the device has not fed yet.
pub fn decode_last_feed(body: Value) -> Result<Option<LastFeedEntry>> {
    let endpoint = endpoints::GET_LAST_FEED;
    let LastFeedBody { last_feed } = parse_body(endpoint, body)?;

    match last_feed {
        Value::Null => Ok(None),
        Value::String(s) if s.is_empty() => Ok(None),
        Value::Array(items) if items.is_empty() => Ok(None),
        Value::Array(items) => {
            let time = items
                .first()
                .and_then(Value::as_str)
                .ok_or_else(|| Error::malformed(endpoint, "last_feed[0] is not a time string"))?;
            // Some firmware sends the feed date here; keep the entry with an unknown type.
            let type_code = items
                .get(1)
                .and_then(Value::as_i64)
                .unwrap_or(UNKNOWN_TYPE_CODE);
            Ok(Some(LastFeedEntry {
                time: time.to_string(),
                type_code,
            }))
        }
        other => Err(Error::malformed(
            endpoint,
            format!("last_feed has unexpected shape: {}", other),
        )),
    }
}

/// Decode `/api/getFeedTimes`.
pub fn decode_feed_times(body: Value) -> Result<Vec<ScheduledFeed>> {
    let FeedTimesBody { feed_times } = parse_body(endpoints::GET_FEED_TIMES, body)?;
    Ok(feed_times
        .into_iter()
        .map(|(time, type_code, size_code)| ScheduledFeed {
            time,
            type_code,
            size_code,
        })
        .collect())
}

/// Decode `/api/getFeedingTimes`. Server order (oldest first) is preserved.
pub fn decode_feed_logs(body: Value) -> Result<Vec<FeedLogEntry>> {
    let FeedingTimesBody { feeding_times } = parse_body(endpoints::GET_FEEDING_TIMES, body)?;
    Ok(feeding_times
        .into_iter()
        .map(|(date, time, type_code, size_code)| FeedLogEntry {
            date,
            time,
            type_code,
            size_code,
        })
        .collect())
}

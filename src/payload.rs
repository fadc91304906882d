//! Image submission payload and its session-scoped response projection.

use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

/// How long a confirmed session stays live before the uploaded image expires.
const SESSION_TTL_MS: u64 = 24 * 60 * 60 * 1000;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SubmissionStatus {
    Uploaded,
    NinoConfirmed,
    MobileConfirmed,
}

/// One confirmation submission, built by the validator for a single request.
///
/// Exactly one of `nino` / `mobile_number` is populated, determined by which
/// route was invoked. The same instance flows through the storage update and
/// the response renderer; it is never cached or shared across requests.
#[derive(Clone, Debug)]
pub struct ImagePayload {
    pub session_id: String,
    pub nino: Option<String>,
    pub mobile_number: Option<String>,
    pub fitnote_status: SubmissionStatus,
    pub expiry_time: u64,
}

impl ImagePayload {
    pub fn new(session_id: String) -> Self {
        Self {
            session_id,
            nino: None,
            mobile_number: None,
            fitnote_status: SubmissionStatus::Uploaded,
            expiry_time: expiry_from_now(),
        }
    }

    /// Project the fields safe to return to the caller.
    ///
    /// The raw nino/mobile values and any storage-only detail must never cross
    /// this boundary; the view is a narrow struct rather than a filtered dump
    /// of the payload.
    pub fn session_view(&self) -> SessionView {
        SessionView {
            session_id: self.session_id.clone(),
            fitnote_status: self.fitnote_status,
            expiry_time: self.expiry_time,
        }
    }
}

/// Unix-millis expiry a TTL from now.
pub fn expiry_from_now() -> u64 {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as u64)
        .unwrap_or(0);
    now.saturating_add(SESSION_TTL_MS)
}

/// Session-only response body. Produced fresh per response, never persisted.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    session_id: String,
    fitnote_status: SubmissionStatus,
    expiry_time: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn view_excludes_confirmed_values() {
        let mut payload = ImagePayload::new("abc-123".to_string());
        payload.nino = Some("AA370773A".to_string());
        payload.mobile_number = Some("07700900123".to_string());

        let view = serde_json::to_value(payload.session_view()).unwrap();
        let mut keys: Vec<&str> = view.as_object().unwrap().keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(keys, ["expiryTime", "fitnoteStatus", "sessionId"]);
        assert_eq!(view["sessionId"], "abc-123");
        assert_eq!(view["fitnoteStatus"], "uploaded");
    }

    #[test]
    fn expiry_is_in_the_future() {
        let payload = ImagePayload::new("s".to_string());
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_millis() as u64;
        assert!(payload.expiry_time > now);
    }
}

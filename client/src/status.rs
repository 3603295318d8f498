//! Request lifecycle status

use serde::{Deserialize, Serialize};

/// Phase of an asynchronous operation
///
/// Used in two places: the app-wide flag tracking the most recent operation
/// (driving global loading indicators) and the per-record entity annotation
/// (driving per-row disabled states). A record whose operation is in flight
/// is `Loading`; one whose operation was refused is `Failed`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    /// No operation in flight
    #[default]
    Idle,
    /// An operation is in flight
    Loading,
    /// The most recent operation was confirmed
    Succeeded,
    /// The most recent operation was rejected
    Failed,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_idle() {
        assert_eq!(RequestStatus::default(), RequestStatus::Idle);
    }

    #[test]
    fn serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&RequestStatus::Loading).unwrap(),
            "\"loading\""
        );
    }
}

use std::cmp::Ordering;
use std::fmt;

use crate::ports::spotify::Track;

/// Track attribute a playlist can be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum FeatureKey {
    Tempo,
    Energy,
    Danceability,
    Valence,
    Acousticness,
    Instrumentalness,
    Loudness,
    Duration,
}

impl FeatureKey {
    /// `None` when the value lives in audio features the track does not have yet.
    fn value(self, track: &Track) -> Option<f64> {
        let features = track.features.as_ref();
        let value = match self {
            FeatureKey::Duration => return Some(track.duration_ms as f64),
            FeatureKey::Tempo => features?.tempo,
            FeatureKey::Energy => features?.energy,
            FeatureKey::Danceability => features?.danceability,
            FeatureKey::Valence => features?.valence,
            FeatureKey::Acousticness => features?.acousticness,
            FeatureKey::Instrumentalness => features?.instrumentalness,
            FeatureKey::Loudness => features?.loudness,
        };
        Some(f64::from(value))
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FeatureKey::Tempo => "tempo",
            FeatureKey::Energy => "energy",
            FeatureKey::Danceability => "danceability",
            FeatureKey::Valence => "valence",
            FeatureKey::Acousticness => "acousticness",
            FeatureKey::Instrumentalness => "instrumentalness",
            FeatureKey::Loudness => "loudness",
            FeatureKey::Duration => "duration",
        }
    }
}

impl fmt::Display for FeatureKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackOrdering {
    pub key: FeatureKey,
    pub descending: bool,
}

/// Returns a copy of `tracks` sorted by the ordering's key.
///
/// The sort is stable. Tracks without a value for the key go last in either direction.
pub fn sort_tracks(tracks: &[Track], ordering: TrackOrdering) -> Vec<Track> {
    let mut sorted = tracks.to_vec();
    sorted.sort_by(
        |a, b| match (ordering.key.value(a), ordering.key.value(b)) {
            (Some(a), Some(b)) if ordering.descending => b.total_cmp(&a),
            (Some(a), Some(b)) => a.total_cmp(&b),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        },
    );
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{track, track_with_tempo};

    fn ids(tracks: &[Track]) -> Vec<&str> {
        tracks.iter().map(|t| t.id.as_str()).collect()
    }

    #[test]
    fn test_sort_by_tempo_ascending() {
        let tracks = vec![
            track_with_tempo("fast", 170.0),
            track_with_tempo("slow", 70.0),
            track_with_tempo("mid", 120.0),
        ];

        let sorted = sort_tracks(
            &tracks,
            TrackOrdering {
                key: FeatureKey::Tempo,
                descending: false,
            },
        );

        assert_eq!(ids(&sorted), vec!["slow", "mid", "fast"]);
    }

    #[test]
    fn test_missing_features_go_last_when_descending() {
        let tracks = vec![
            track("unknown", 1),
            track_with_tempo("slow", 70.0),
            track_with_tempo("fast", 170.0),
        ];

        let sorted = sort_tracks(
            &tracks,
            TrackOrdering {
                key: FeatureKey::Tempo,
                descending: true,
            },
        );

        assert_eq!(ids(&sorted), vec!["fast", "slow", "unknown"]);
    }

    #[test]
    fn test_sort_is_stable_for_ties() {
        let tracks = vec![
            track("first", 2_000),
            track("short", 1_000),
            track("second", 2_000),
        ];

        let sorted = sort_tracks(
            &tracks,
            TrackOrdering {
                key: FeatureKey::Duration,
                descending: true,
            },
        );

        assert_eq!(ids(&sorted), vec!["first", "second", "short"]);
    }
}

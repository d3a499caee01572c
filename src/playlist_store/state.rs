use std::collections::HashSet;

use crate::playlist_store::ordering::TrackOrdering;
use crate::ports::spotify::{PlaylistObject, Track};

pub const DEFAULT_PLAYLIST_NAME: &str = "My Playlist";

/// In-memory mirror of the playlist being edited.
///
/// Fields are only written by [`crate::playlist_store::mutations::apply`].
#[derive(Debug, Clone, PartialEq)]
pub struct PlaylistState {
    pub(super) playlist: Vec<Track>,
    /// Single-slot undo buffer; each reorder overwrites it.
    pub(super) previous_playlist: Option<Vec<Track>>,
    /// The playlist as last loaded or saved.
    pub(super) original_playlist: Vec<Track>,
    pub(super) playlist_object: Option<PlaylistObject>,
    pub(super) playlist_name: String,
    pub(super) ordered_by: Option<TrackOrdering>,
}

impl Default for PlaylistState {
    fn default() -> Self {
        Self {
            playlist: Vec::new(),
            previous_playlist: None,
            original_playlist: Vec::new(),
            playlist_object: None,
            playlist_name: DEFAULT_PLAYLIST_NAME.to_string(),
            ordered_by: None,
        }
    }
}

impl PlaylistState {
    pub fn playlist(&self) -> &[Track] {
        &self.playlist
    }

    pub fn playlist_name(&self) -> &str {
        &self.playlist_name
    }

    pub fn playlist_is_empty(&self) -> bool {
        self.playlist.is_empty()
    }

    /// Sum of all track durations, in milliseconds.
    pub fn total_duration_playlist(&self) -> u64 {
        self.playlist.iter().map(|track| track.duration_ms).sum()
    }

    pub fn total_songs(&self) -> usize {
        self.playlist.len()
    }

    pub fn previous_playlist(&self) -> Option<&[Track]> {
        self.previous_playlist.as_deref()
    }

    pub fn original_playlist(&self) -> &[Track] {
        &self.original_playlist
    }

    pub fn playlist_object(&self) -> Option<&PlaylistObject> {
        self.playlist_object.as_ref()
    }

    pub fn ordered_by(&self) -> Option<TrackOrdering> {
        self.ordered_by
    }

    /// Tracks of the working copy whose id is not in the original playlist, in playlist order.
    pub fn new_tracks(&self) -> Vec<&Track> {
        let original_ids: HashSet<&str> = self
            .original_playlist
            .iter()
            .map(|track| track.id.as_str())
            .collect();

        self.playlist
            .iter()
            .filter(|track| !original_ids.contains(track.id.as_str()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::track;

    #[test]
    fn test_default_state() {
        let state = PlaylistState::default();

        assert!(state.playlist_is_empty());
        assert_eq!(state.playlist_name(), "My Playlist");
        assert_eq!(state.total_duration_playlist(), 0);
        assert_eq!(state.total_songs(), 0);
        assert!(state.previous_playlist().is_none());
        assert!(state.playlist_object().is_none());
    }

    #[test]
    fn test_total_duration_is_sum_of_durations() {
        let state = PlaylistState {
            playlist: vec![track("a", 1_000), track("b", 2_500), track("c", 500)],
            ..Default::default()
        };

        assert_eq!(state.total_duration_playlist(), 4_000);
        assert_eq!(state.total_songs(), 3);
        assert!(!state.playlist_is_empty());
    }

    #[test]
    fn test_new_tracks_by_id() {
        let state = PlaylistState {
            playlist: vec![track("a", 1), track("x", 1), track("b", 1), track("y", 1)],
            original_playlist: vec![track("b", 1), track("a", 1), track("gone", 1)],
            ..Default::default()
        };

        let ids: Vec<&str> = state.new_tracks().iter().map(|t| t.id.as_str()).collect();

        assert_eq!(ids, vec!["x", "y"]);
    }
}

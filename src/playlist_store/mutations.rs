use crate::playlist_store::ordering::TrackOrdering;
use crate::playlist_store::state::PlaylistState;
use crate::ports::spotify::{PlaylistObject, Track};

/// Every state transition the store can make.
#[derive(Debug, Clone, PartialEq)]
pub enum Mutation {
    Push(Track),
    /// Drops every track with this id.
    Remove { track_id: String },
    ChangePlaylistName(String),
    ReplacePlaylist(Vec<Track>),
    ReplaceOriginalPlaylist(Vec<Track>),
    SetPlaylistObject(PlaylistObject),
    UpdatePreviousPlaylist(Option<Vec<Track>>),
    SetOrderedBy(Option<TrackOrdering>),
}

impl Mutation {
    fn name(&self) -> &'static str {
        match self {
            Mutation::Push(_) => "push",
            Mutation::Remove { .. } => "remove",
            Mutation::ChangePlaylistName(_) => "change_playlist_name",
            Mutation::ReplacePlaylist(_) => "replace_playlist",
            Mutation::ReplaceOriginalPlaylist(_) => "replace_original_playlist",
            Mutation::SetPlaylistObject(_) => "set_playlist_object",
            Mutation::UpdatePreviousPlaylist(_) => "update_previous_playlist",
            Mutation::SetOrderedBy(_) => "set_ordered_by",
        }
    }
}

/// Applies a mutation. Synchronous and free of side effects beyond `state`.
pub fn apply(state: &mut PlaylistState, mutation: Mutation) {
    tracing::trace!(mutation = mutation.name(), "Committing mutation");

    match mutation {
        Mutation::Push(track) => state.playlist.push(track),
        Mutation::Remove { track_id } => state.playlist.retain(|track| track.id != track_id),
        Mutation::ChangePlaylistName(name) => state.playlist_name = name,
        Mutation::ReplacePlaylist(tracks) => state.playlist = tracks,
        Mutation::ReplaceOriginalPlaylist(tracks) => state.original_playlist = tracks,
        Mutation::SetPlaylistObject(playlist) => state.playlist_object = Some(playlist),
        Mutation::UpdatePreviousPlaylist(tracks) => state.previous_playlist = tracks,
        Mutation::SetOrderedBy(ordering) => state.ordered_by = ordering,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::playlist_store::ordering::FeatureKey;
    use crate::test_utils::{playlist_object, track};

    #[test]
    fn test_push_appends() {
        let mut state = PlaylistState::default();
        apply(&mut state, Mutation::Push(track("a", 1)));
        apply(&mut state, Mutation::Push(track("b", 1)));

        let ids: Vec<&str> = state.playlist().iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn test_remove_by_id() {
        let mut state = PlaylistState::default();
        apply(
            &mut state,
            Mutation::ReplacePlaylist(vec![track("a", 1), track("b", 1), track("c", 1)]),
        );

        apply(
            &mut state,
            Mutation::Remove {
                track_id: "b".into(),
            },
        );
        apply(
            &mut state,
            Mutation::Remove {
                track_id: "missing".into(),
            },
        );

        let ids: Vec<&str> = state.playlist().iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "c"]);
    }

    #[test]
    fn test_remove_drops_every_duplicate() {
        let mut state = PlaylistState::default();
        apply(
            &mut state,
            Mutation::ReplacePlaylist(vec![track("a", 1), track("b", 1), track("a", 1)]),
        );

        apply(
            &mut state,
            Mutation::Remove {
                track_id: "a".into(),
            },
        );

        let ids: Vec<&str> = state.playlist().iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["b"]);
    }

    #[test]
    fn test_replace_original_leaves_working_copy() {
        let mut state = PlaylistState::default();
        apply(&mut state, Mutation::ReplacePlaylist(vec![track("a", 1)]));
        apply(
            &mut state,
            Mutation::ReplaceOriginalPlaylist(vec![track("z", 1)]),
        );

        assert_eq!(state.playlist()[0].id, "a");
        assert_eq!(state.original_playlist()[0].id, "z");
    }

    #[test]
    fn test_metadata_and_name() {
        let mut state = PlaylistState::default();
        apply(&mut state, Mutation::SetPlaylistObject(playlist_object("pl1", "Old")));
        apply(&mut state, Mutation::ChangePlaylistName("New".into()));

        assert_eq!(state.playlist_object().unwrap().id, "pl1");
        assert_eq!(state.playlist_object().unwrap().name, "Old");
        assert_eq!(state.playlist_name(), "New");
    }

    #[test]
    fn test_previous_playlist_and_ordering() {
        let mut state = PlaylistState::default();
        apply(
            &mut state,
            Mutation::UpdatePreviousPlaylist(Some(vec![track("a", 1)])),
        );
        let ordering = TrackOrdering {
            key: FeatureKey::Tempo,
            descending: false,
        };
        apply(&mut state, Mutation::SetOrderedBy(Some(ordering)));

        assert_eq!(state.previous_playlist().unwrap().len(), 1);
        assert_eq!(state.ordered_by(), Some(ordering));

        apply(&mut state, Mutation::UpdatePreviousPlaylist(None));
        assert!(state.previous_playlist().is_none());
    }
}

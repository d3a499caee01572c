//! Client-side mirror of a Spotify playlist.
//!
//! Commands on [`PlaylistStore`] are the only code that talks to the Spotify
//! client and the session. They change state exclusively by committing a
//! [`Mutation`], which [`mutations::apply`] reduces into [`PlaylistState`].

pub mod error;
pub mod mutations;
pub mod ordering;
pub mod state;

use crate::playlist_store::error::PlaylistError;
use crate::playlist_store::mutations::Mutation;
use crate::playlist_store::ordering::{TrackOrdering, sort_tracks};
use crate::playlist_store::state::PlaylistState;
use crate::ports::session::{SessionStore, UserAlert};
use crate::ports::spotify::{PlaylistObject, SpotifyClient, Track};

/// Spotify accepts at most this many tracks per replace/append request.
pub const MAXIMUM_PER_REQUEST: usize = 100;

const LOGIN_AGAIN_MESSAGE: &str = "Please login again";

struct Credentials {
    access_token: String,
    user_id: String,
}

/// Outcome of a successful [`PlaylistStore::save_playlist`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveSummary {
    pub requests: usize,
    pub tracks: usize,
    pub snapshot_id: Option<String>,
}

pub struct PlaylistStore<C: SpotifyClient, S: SessionStore, A: UserAlert> {
    state: PlaylistState,
    client: C,
    session: S,
    alert: A,
}

impl<C: SpotifyClient, S: SessionStore, A: UserAlert> PlaylistStore<C, S, A> {
    pub fn new(client: C, session: S, alert: A) -> Self {
        Self {
            state: PlaylistState::default(),
            client,
            session,
            alert,
        }
    }

    pub fn state(&self) -> &PlaylistState {
        &self.state
    }

    fn commit(&mut self, mutation: Mutation) {
        mutations::apply(&mut self.state, mutation);
    }

    fn access_token(&self) -> Option<String> {
        self.session
            .access_token()
            .filter(|token| !token.is_empty())
    }

    fn credentials(&self) -> Option<Credentials> {
        let access_token = self.access_token()?;
        let user_id = self.session.current_user_id()?;
        Some(Credentials {
            access_token,
            user_id,
        })
    }

    /// Guard for commands that write to Spotify: without a session the user
    /// is told to log in again and the session is invalidated.
    fn require_session(&self) -> Result<Credentials, PlaylistError> {
        match self.credentials() {
            Some(credentials) => Ok(credentials),
            None => Err(self.reject_session()),
        }
    }

    /// Same guard as [`Self::require_session`] for calls that need no user id.
    fn require_access_token(&self) -> Result<String, PlaylistError> {
        match self.access_token() {
            Some(access_token) => Ok(access_token),
            None => Err(self.reject_session()),
        }
    }

    fn reject_session(&self) -> PlaylistError {
        tracing::warn!("Command attempted without a valid Spotify session");
        self.session.clean_access();
        self.alert.alert(LOGIN_AGAIN_MESSAGE);
        PlaylistError::NotAuthenticated
    }

    fn loaded_playlist_id(&self) -> Result<String, PlaylistError> {
        match self.state.playlist_object() {
            Some(playlist) => Ok(playlist.id.clone()),
            None => {
                tracing::error!("No playlist has been loaded");
                Err(PlaylistError::NoPlaylistLoaded)
            }
        }
    }

    /// Fetches audio features for `track` and appends it. The track is not
    /// appended when the fetch fails.
    pub async fn push(&mut self, mut track: Track) -> Result<(), PlaylistError> {
        let access_token = self.require_access_token()?;

        let features = self
            .client
            .audio_features_for_track(&access_token, &track.id)
            .await
            .map_err(PlaylistError::remote("fetch audio features"))
            .inspect_err(|error| tracing::error!(?error, track_id = %track.id, "Push failed"))?;

        track.features = Some(features);
        tracing::debug!(track_id = %track.id, "Appending track");
        self.commit(Mutation::Push(track));
        Ok(())
    }

    pub fn remove(&mut self, track: &Track) {
        self.commit(Mutation::Remove {
            track_id: track.id.clone(),
        });
    }

    pub fn replace(&mut self, tracks: Vec<Track>) {
        self.commit(Mutation::ReplacePlaylist(tracks));
    }

    pub fn set_playlist_object(&mut self, playlist: PlaylistObject) {
        self.commit(Mutation::SetPlaylistObject(playlist));
    }

    pub fn set_original_playlist(&mut self, tracks: Vec<Track>) {
        self.commit(Mutation::ReplaceOriginalPlaylist(tracks));
    }

    pub fn change_playlist_name(&mut self, name: impl Into<String>) {
        self.commit(Mutation::ChangePlaylistName(name.into()));
    }

    /// Loads the tracks of `playlist` with their audio features attached.
    ///
    /// Any failure invalidates the session.
    pub async fn load_playlist(&mut self, playlist: PlaylistObject) -> Result<(), PlaylistError> {
        self.commit(Mutation::SetPlaylistObject(playlist.clone()));

        match self.fetch_tracks_with_features(&playlist.id).await {
            Ok(tracks) => {
                tracing::info!(
                    playlist_id = %playlist.id,
                    tracks = tracks.len(),
                    "Loaded playlist"
                );
                self.commit(Mutation::ReplacePlaylist(tracks.clone()));
                self.commit(Mutation::ReplaceOriginalPlaylist(tracks));
                self.commit(Mutation::ChangePlaylistName(playlist.name));
                Ok(())
            }
            Err(error) => {
                tracing::error!(?error, playlist_id = %playlist.id, "Failed to load playlist");
                self.session.clean_access();
                Err(error)
            }
        }
    }

    async fn fetch_tracks_with_features(
        &self,
        playlist_id: &str,
    ) -> Result<Vec<Track>, PlaylistError> {
        let credentials = self.credentials().ok_or(PlaylistError::NotAuthenticated)?;

        let mut tracks = self
            .client
            .playlist_tracks(&credentials.access_token, &credentials.user_id, playlist_id)
            .await
            .map_err(PlaylistError::remote("fetch playlist tracks"))?;

        if tracks.is_empty() {
            return Ok(tracks);
        }

        let track_ids: Vec<String> = tracks.iter().map(|track| track.id.clone()).collect();
        let features = self
            .client
            .audio_features_for_tracks(&credentials.access_token, &track_ids)
            .await
            .map_err(PlaylistError::remote("fetch audio features"))?;
        if features.len() != tracks.len() {
            return Err(PlaylistError::Remote {
                step: "fetch audio features",
                report: color_eyre::eyre::eyre!(
                    "expected {} audio features, got {}",
                    tracks.len(),
                    features.len()
                ),
            });
        }

        for (track, features) in tracks.iter_mut().zip(features) {
            track.features = features;
        }

        Ok(tracks)
    }

    /// Appends the tracks that are in the working copy but not in the
    /// original playlist. Returns how many were sent.
    pub async fn add_tracks_to_playlist(&mut self) -> Result<usize, PlaylistError> {
        let credentials = self.require_session()?;

        let uris: Vec<String> = self
            .state
            .new_tracks()
            .into_iter()
            .map(|track| track.uri.clone())
            .collect();
        if uris.is_empty() {
            tracing::debug!("No new tracks to add");
            return Ok(0);
        }

        let playlist_id = self.loaded_playlist_id()?;
        let snapshot_id = self
            .client
            .add_tracks_to_playlist(
                &credentials.access_token,
                &credentials.user_id,
                &playlist_id,
                &uris,
            )
            .await
            .map_err(PlaylistError::remote("add tracks to playlist"))
            .inspect_err(|error| tracing::error!(?error, %playlist_id, "Adding tracks failed"))?;

        tracing::info!(%playlist_id, %snapshot_id, added = uris.len(), "Added tracks to playlist");
        self.commit(Mutation::ReplaceOriginalPlaylist(self.state.playlist().to_vec()));
        Ok(uris.len())
    }

    /// Replaces the working copy, keeping the current order as the undo snapshot.
    pub fn reorder(&mut self, tracks: Vec<Track>) {
        self.commit(Mutation::UpdatePreviousPlaylist(Some(
            self.state.playlist().to_vec(),
        )));
        self.commit(Mutation::ReplacePlaylist(tracks));
        self.commit(Mutation::SetOrderedBy(None));
    }

    pub fn order_by(&mut self, ordering: TrackOrdering) {
        let sorted = sort_tracks(self.state.playlist(), ordering);
        self.reorder(sorted);
        self.commit(Mutation::SetOrderedBy(Some(ordering)));
    }

    /// Restores the order from before the last reorder. Returns `false`, leaving
    /// the playlist untouched, when there is nothing to undo.
    pub fn undo(&mut self) -> bool {
        let Some(previous) = self.state.previous_playlist().map(<[Track]>::to_vec) else {
            tracing::debug!("Nothing to undo");
            return false;
        };

        self.commit(Mutation::ReplacePlaylist(previous));
        self.commit(Mutation::UpdatePreviousPlaylist(None));
        self.commit(Mutation::SetOrderedBy(None));
        true
    }

    /// Writes the working copy to Spotify in batches of `maximum_per_request`.
    ///
    /// The first batch replaces the remote tracks and later batches are
    /// appended. Batches are sent one after another and the first failure
    /// stops the save; already sent batches are not rolled back.
    pub async fn save_playlist(
        &mut self,
        maximum_per_request: usize,
    ) -> Result<SaveSummary, PlaylistError> {
        let credentials = self.require_session()?;

        if maximum_per_request == 0 {
            tracing::error!("Refusing to save with an empty batch size");
            return Err(PlaylistError::InvalidBatchSize);
        }
        let playlist_id = self.loaded_playlist_id()?;

        let uris: Vec<String> = self
            .state
            .playlist()
            .iter()
            .map(|track| track.uri.clone())
            .collect();
        // An empty playlist still needs one replace to clear the remote copy.
        let batches: Vec<&[String]> = if uris.is_empty() {
            vec![uris.as_slice()]
        } else {
            uris.chunks(maximum_per_request).collect()
        };

        let mut snapshot_id = None;
        for (index, batch) in batches.iter().enumerate() {
            let result = if index == 0 {
                self.client
                    .replace_playlist_tracks(
                        &credentials.access_token,
                        &credentials.user_id,
                        &playlist_id,
                        batch,
                    )
                    .await
            } else {
                self.client
                    .add_tracks_to_playlist(
                        &credentials.access_token,
                        &credentials.user_id,
                        &playlist_id,
                        batch,
                    )
                    .await
            };

            match result {
                Ok(snapshot) => {
                    tracing::debug!(batch = index + 1, size = batch.len(), "Saved batch");
                    snapshot_id = Some(snapshot);
                }
                Err(report) => {
                    let error = PlaylistError::SaveInterrupted {
                        batch: index + 1,
                        batches: batches.len(),
                        report,
                    };
                    tracing::error!(?error, %playlist_id, "Saving playlist failed");
                    return Err(error);
                }
            }
        }

        tracing::info!(%playlist_id, tracks = uris.len(), "Saved playlist");
        self.commit(Mutation::ReplaceOriginalPlaylist(self.state.playlist().to_vec()));

        Ok(SaveSummary {
            requests: batches.len(),
            tracks: uris.len(),
            snapshot_id,
        })
    }
}

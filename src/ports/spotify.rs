use color_eyre::eyre::Result;

/// Acoustic characteristics of a track, fetched separately from its metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioFeatures {
    pub id: String,
    pub danceability: f32,
    pub energy: f32,
    pub key: i32,
    pub loudness: f32,
    pub mode: i32,
    pub speechiness: f32,
    pub acousticness: f32,
    pub instrumentalness: f32,
    pub liveness: f32,
    pub valence: f32,
    pub tempo: f32,
    pub time_signature: i32,
    pub duration_ms: u64,
}

/// Decoupled representation of a Spotify track from the API.
///
/// `features` is the only field that changes after the track is fetched.
#[derive(Debug, Clone, PartialEq)]
pub struct Track {
    pub id: String,
    pub uri: String,
    pub name: String,
    pub artists: Vec<String>,
    pub duration_ms: u64,
    pub features: Option<AudioFeatures>,
}

/// Metadata of the remote playlist being edited.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaylistObject {
    pub id: String,
    pub name: String,
    pub owner_id: String,
}

/// Port trait wrapping the Spotify API capabilities used by the playlist store.
///
/// Every call receives the bearer token; implementations never hold on to it.
/// Implementations live in `spotify_rs::client` (production) or test mocks.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait SpotifyClient: Send + Sync {
    async fn audio_features_for_track(
        &self,
        access_token: &str,
        track_id: &str,
    ) -> Result<AudioFeatures>;

    /// Returns one entry per requested id, in request order.
    async fn audio_features_for_tracks(
        &self,
        access_token: &str,
        track_ids: &[String],
    ) -> Result<Vec<Option<AudioFeatures>>>;

    async fn playlist_tracks(
        &self,
        access_token: &str,
        user_id: &str,
        playlist_id: &str,
    ) -> Result<Vec<Track>>;

    /// Replaces the whole playlist content, returning the new snapshot id.
    async fn replace_playlist_tracks(
        &self,
        access_token: &str,
        user_id: &str,
        playlist_id: &str,
        uris: &[String],
    ) -> Result<String>;

    /// Appends to the end of the playlist, returning the new snapshot id.
    async fn add_tracks_to_playlist(
        &self,
        access_token: &str,
        user_id: &str,
        playlist_id: &str,
        uris: &[String],
    ) -> Result<String>;

    async fn current_user_id(&self, access_token: &str) -> Result<String>;

    async fn playlist(&self, access_token: &str, playlist_id: &str) -> Result<PlaylistObject>;

    async fn track(&self, access_token: &str, track_id: &str) -> Result<Track>;
}

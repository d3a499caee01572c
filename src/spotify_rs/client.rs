use std::time::Duration;

use color_eyre::eyre::{Result, WrapErr, eyre};
use reqwest::Method;
use serde::de::DeserializeOwned;
use url::Url;

use crate::ports::spotify::{AudioFeatures, PlaylistObject, SpotifyClient, Track};
use crate::spotify_rs::types::{
    SpotifyAudioFeatures, SpotifyAudioFeaturesResponse, SpotifyPlaylist,
    SpotifyPlaylistTracksPage, SpotifySnapshot, SpotifyTrack, SpotifyUrisRequest, SpotifyUser,
};

/// The Web API rejects id lists longer than this.
pub const MAX_IDS_PER_REQUEST: usize = 100;

/// Spotify Web API client
pub struct SpotifyWebClient {
    base_url: Url,
    timeout: Duration,
    client: reqwest::Client,
}

impl SpotifyWebClient {
    pub fn new(base_url: Url, timeout: Duration) -> Self {
        Self {
            base_url,
            timeout,
            client: reqwest::Client::new(),
        }
    }

    /// Builds an absolute endpoint url from path segments, each percent-encoded.
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let path = segments
            .iter()
            .map(|segment| urlencoding::encode(segment).into_owned())
            .collect::<Vec<_>>()
            .join("/");
        let url = format!("{}/{}", self.base_url.as_str().trim_end_matches('/'), path);
        Url::parse(&url).wrap_err_with(|| format!("Invalid Spotify endpoint: {}", url))
    }

    fn playlist_tracks_endpoint(&self, user_id: &str, playlist_id: &str) -> Result<Url> {
        self.endpoint(&["users", user_id, "playlists", playlist_id, "tracks"])
    }

    async fn get_json<T: DeserializeOwned>(&self, access_token: &str, url: Url) -> Result<T> {
        let response = self
            .client
            .get(url)
            .bearer_auth(access_token)
            .timeout(self.timeout)
            .send()
            .await?
            .error_for_status()?;

        Ok(response.json().await?)
    }

    async fn send_uris(
        &self,
        method: Method,
        access_token: &str,
        user_id: &str,
        playlist_id: &str,
        uris: &[String],
    ) -> Result<String> {
        let url = self.playlist_tracks_endpoint(user_id, playlist_id)?;
        let response = self
            .client
            .request(method, url)
            .bearer_auth(access_token)
            .timeout(self.timeout)
            .json(&SpotifyUrisRequest { uris })
            .send()
            .await?
            .error_for_status()?;

        let snapshot: SpotifySnapshot = response.json().await?;
        Ok(snapshot.snapshot_id)
    }
}

#[async_trait::async_trait]
impl SpotifyClient for SpotifyWebClient {
    async fn audio_features_for_track(
        &self,
        access_token: &str,
        track_id: &str,
    ) -> Result<AudioFeatures> {
        let url = self.endpoint(&["audio-features", track_id])?;
        let features: SpotifyAudioFeatures = self
            .get_json(access_token, url)
            .await
            .wrap_err_with(|| format!("Failed to get audio features for track {}", track_id))?;
        Ok(features.into())
    }

    async fn audio_features_for_tracks(
        &self,
        access_token: &str,
        track_ids: &[String],
    ) -> Result<Vec<Option<AudioFeatures>>> {
        let mut all_features = Vec::with_capacity(track_ids.len());

        for ids in track_ids.chunks(MAX_IDS_PER_REQUEST) {
            let mut url = self.endpoint(&["audio-features"])?;
            url.query_pairs_mut().append_pair("ids", &ids.join(","));

            let page: SpotifyAudioFeaturesResponse = self
                .get_json(access_token, url)
                .await
                .wrap_err("Failed to get audio features")?;
            if page.audio_features.len() != ids.len() {
                return Err(eyre!(
                    "Requested audio features for {} tracks, got {}",
                    ids.len(),
                    page.audio_features.len()
                ));
            }
            all_features.extend(
                page.audio_features
                    .into_iter()
                    .map(|features| features.map(AudioFeatures::from)),
            );
        }

        Ok(all_features)
    }

    async fn playlist_tracks(
        &self,
        access_token: &str,
        user_id: &str,
        playlist_id: &str,
    ) -> Result<Vec<Track>> {
        let mut all_tracks = Vec::new();
        let mut first_page = self.playlist_tracks_endpoint(user_id, playlist_id)?;
        first_page.query_pairs_mut().append_pair("limit", "100");
        let mut next_url = Some(first_page);

        while let Some(url) = next_url {
            let page: SpotifyPlaylistTracksPage = self
                .get_json(access_token, url)
                .await
                .wrap_err_with(|| format!("Failed to get tracks of playlist {}", playlist_id))?;

            for item in page.items {
                let Some(track) = item.track else { continue };
                match track.into_track() {
                    Some(track) => all_tracks.push(track),
                    None => tracing::warn!("Skipping playlist item without a track id"),
                }
            }

            next_url = page
                .next
                .map(|next| Url::parse(&next))
                .transpose()
                .wrap_err("Invalid next page url")?;
        }

        Ok(all_tracks)
    }

    async fn replace_playlist_tracks(
        &self,
        access_token: &str,
        user_id: &str,
        playlist_id: &str,
        uris: &[String],
    ) -> Result<String> {
        self.send_uris(Method::PUT, access_token, user_id, playlist_id, uris)
            .await
            .wrap_err_with(|| format!("Failed to replace tracks of playlist {}", playlist_id))
    }

    async fn add_tracks_to_playlist(
        &self,
        access_token: &str,
        user_id: &str,
        playlist_id: &str,
        uris: &[String],
    ) -> Result<String> {
        self.send_uris(Method::POST, access_token, user_id, playlist_id, uris)
            .await
            .wrap_err_with(|| format!("Failed to add tracks to playlist {}", playlist_id))
    }

    async fn current_user_id(&self, access_token: &str) -> Result<String> {
        let url = self.endpoint(&["me"])?;
        let user: SpotifyUser = self
            .get_json(access_token, url)
            .await
            .wrap_err("Failed to get current user")?;
        Ok(user.id)
    }

    async fn playlist(&self, access_token: &str, playlist_id: &str) -> Result<PlaylistObject> {
        let url = self.endpoint(&["playlists", playlist_id])?;
        let playlist: SpotifyPlaylist = self
            .get_json(access_token, url)
            .await
            .wrap_err_with(|| format!("Failed to get playlist {}", playlist_id))?;
        Ok(playlist.into())
    }

    async fn track(&self, access_token: &str, track_id: &str) -> Result<Track> {
        let url = self.endpoint(&["tracks", track_id])?;
        let track: SpotifyTrack = self
            .get_json(access_token, url)
            .await
            .wrap_err_with(|| format!("Failed to get track {}", track_id))?;
        track
            .into_track()
            .ok_or_else(|| eyre!("Track {} has no Spotify id", track_id))
    }
}

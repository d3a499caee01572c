use serde::{Deserialize, Serialize};

use crate::ports::spotify::{AudioFeatures, PlaylistObject, Track};

/// Spotify user profile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpotifyUser {
    pub id: String,
    pub display_name: Option<String>,
}

/// Spotify playlist from API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpotifyPlaylist {
    pub id: String,
    pub name: String,
    pub owner: SpotifyUser,
}

/// Spotify track from API. Local files come back without an id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpotifyTrack {
    pub id: Option<String>,
    pub uri: String,
    pub name: String,
    pub artists: Vec<SpotifyArtist>,
    pub duration_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpotifyArtist {
    pub id: Option<String>,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpotifyPlaylistTrackObject {
    pub track: Option<SpotifyTrack>,
}

/// One page of `GET /playlists/{id}/tracks`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpotifyPlaylistTracksPage {
    pub items: Vec<SpotifyPlaylistTrackObject>,
    pub next: Option<String>,
}

/// Spotify audio features from API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpotifyAudioFeatures {
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

/// Unknown ids come back as `null` entries, keeping the array aligned with the request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpotifyAudioFeaturesResponse {
    pub audio_features: Vec<Option<SpotifyAudioFeatures>>,
}

/// Body of the replace/append track requests
#[derive(Debug, Clone, Serialize)]
pub struct SpotifyUrisRequest<'a> {
    pub uris: &'a [String],
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpotifySnapshot {
    pub snapshot_id: String,
}

impl From<SpotifyAudioFeatures> for AudioFeatures {
    fn from(features: SpotifyAudioFeatures) -> Self {
        Self {
            id: features.id,
            danceability: features.danceability,
            energy: features.energy,
            key: features.key,
            loudness: features.loudness,
            mode: features.mode,
            speechiness: features.speechiness,
            acousticness: features.acousticness,
            instrumentalness: features.instrumentalness,
            liveness: features.liveness,
            valence: features.valence,
            tempo: features.tempo,
            time_signature: features.time_signature,
            duration_ms: features.duration_ms,
        }
    }
}

impl From<SpotifyPlaylist> for PlaylistObject {
    fn from(playlist: SpotifyPlaylist) -> Self {
        Self {
            id: playlist.id,
            name: playlist.name,
            owner_id: playlist.owner.id,
        }
    }
}

impl SpotifyTrack {
    /// Converts into the port representation, or `None` for tracks without an id.
    pub fn into_track(self) -> Option<Track> {
        let id = self.id?;
        Some(Track {
            id,
            uri: self.uri,
            name: self.name,
            artists: self.artists.into_iter().map(|artist| artist.name).collect(),
            duration_ms: self.duration_ms,
            features: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_audio_features_response_keeps_null_entries() {
        let json = r#"{
            "audio_features": [
                {
                    "id": "t1", "danceability": 0.5, "energy": 0.8, "key": 5,
                    "loudness": -4.2, "mode": 1, "speechiness": 0.03,
                    "acousticness": 0.1, "instrumentalness": 0.0, "liveness": 0.2,
                    "valence": 0.7, "tempo": 120.5, "time_signature": 4,
                    "duration_ms": 210000, "type": "audio_features"
                },
                null
            ]
        }"#;

        let response: SpotifyAudioFeaturesResponse = serde_json::from_str(json).unwrap();

        assert_eq!(response.audio_features.len(), 2);
        let features: AudioFeatures = response.audio_features[0].clone().unwrap().into();
        assert_eq!(features.id, "t1");
        assert_eq!(features.tempo, 120.5);
        assert!(response.audio_features[1].is_none());
    }

    #[test]
    fn test_playlist_tracks_page_with_local_track() {
        let json = r#"{
            "items": [
                {"track": {"id": "t1", "uri": "spotify:track:t1", "name": "One",
                           "artists": [{"id": "a1", "name": "Artist"}], "duration_ms": 1000}},
                {"track": {"id": null, "uri": "spotify:local:x", "name": "Local",
                           "artists": [], "duration_ms": 2000}},
                {"track": null}
            ],
            "next": null
        }"#;

        let page: SpotifyPlaylistTracksPage = serde_json::from_str(json).unwrap();
        let tracks: Vec<Track> = page
            .items
            .into_iter()
            .filter_map(|item| item.track)
            .filter_map(SpotifyTrack::into_track)
            .collect();

        assert_eq!(tracks.len(), 1);
        assert_eq!(tracks[0].uri, "spotify:track:t1");
        assert_eq!(tracks[0].artists, vec!["Artist".to_string()]);
        assert!(tracks[0].features.is_none());
    }

    #[test]
    fn test_playlist_into_object() {
        let json = r#"{"id": "pl1", "name": "Road trip",
                       "owner": {"id": "user1", "display_name": "User"}}"#;

        let playlist: SpotifyPlaylist = serde_json::from_str(json).unwrap();
        let object = PlaylistObject::from(playlist);

        assert_eq!(
            object,
            PlaylistObject {
                id: "pl1".into(),
                name: "Road trip".into(),
                owner_id: "user1".into(),
            }
        );
    }
}

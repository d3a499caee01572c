use crate::ports::spotify::{AudioFeatures, PlaylistObject, Track};

pub fn track(id: &str, duration_ms: u64) -> Track {
    Track {
        id: id.to_string(),
        uri: format!("spotify:track:{}", id),
        name: format!("Track {}", id),
        artists: vec!["Artist".to_string()],
        duration_ms,
        features: None,
    }
}

pub fn features(id: &str, tempo: f32) -> AudioFeatures {
    AudioFeatures {
        id: id.to_string(),
        danceability: 0.5,
        energy: 0.5,
        key: 0,
        loudness: -6.0,
        mode: 1,
        speechiness: 0.05,
        acousticness: 0.2,
        instrumentalness: 0.0,
        liveness: 0.1,
        valence: 0.5,
        tempo,
        time_signature: 4,
        duration_ms: 200_000,
    }
}

pub fn track_with_tempo(id: &str, tempo: f32) -> Track {
    Track {
        features: Some(features(id, tempo)),
        ..track(id, 200_000)
    }
}

pub fn playlist_object(id: &str, name: &str) -> PlaylistObject {
    PlaylistObject {
        id: id.to_string(),
        name: name.to_string(),
        owner_id: "user1".to_string(),
    }
}

//! Local working copy of a Spotify playlist: edit, reorder by audio
//! feature, undo, and save back in batches.

pub mod config;
pub mod logging;
pub mod playlist_store;
pub mod ports;
pub mod services;
pub mod spotify_rs;
#[cfg(test)]
mod test_utils;

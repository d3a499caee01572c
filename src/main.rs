use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use color_eyre::{
    Result,
    eyre::{Context, OptionExt},
};

use playlist_editor::{
    config::Config,
    logging::init_tracing,
    playlist_store::{
        PlaylistStore,
        ordering::{FeatureKey, TrackOrdering},
        state::PlaylistState,
    },
    ports::spotify::{PlaylistObject, SpotifyClient, Track},
    services::session::{InMemorySession, TerminalAlert},
    spotify_rs::client::SpotifyWebClient,
};

type Store = PlaylistStore<SpotifyWebClient, InMemorySession, TerminalAlert>;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// The config file to use
    #[arg(short, long, env = "PLAYLIST_EDITOR_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Log filter, e.g. `info` or `playlist_editor=debug`
    #[arg(long, default_value = "warn", global = true, env = "LOG_LEVEL")]
    log_level: String,

    /// Spotify access token
    #[arg(long, env = "SPOTIFY_ACCESS_TOKEN", global = true, hide_env_values = true)]
    access_token: Option<String>,

    /// Spotify user id owning the playlist (looked up from the token when omitted)
    #[arg(long, env = "SPOTIFY_USER_ID", global = true)]
    user_id: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the tracks of a playlist with their audio features
    Show {
        /// The Spotify playlist id
        playlist_id: String,
    },
    /// Append tracks to a playlist
    Add {
        /// The Spotify playlist id
        playlist_id: String,

        /// Spotify ids of the tracks to add
        #[arg(required = true)]
        track_ids: Vec<String>,
    },
    /// Remove tracks from a playlist
    Remove {
        /// The Spotify playlist id
        playlist_id: String,

        /// Spotify ids of the tracks to remove
        #[arg(required = true)]
        track_ids: Vec<String>,
    },
    /// Reorder a playlist by an audio feature
    Sort {
        /// The Spotify playlist id
        playlist_id: String,

        /// The feature to order by
        #[arg(short, long, value_enum)]
        by: FeatureKey,

        /// Highest values first
        #[arg(short, long)]
        descending: bool,

        /// Print the new order without saving it
        #[arg(long)]
        dry_run: bool,
    },
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[derive(Subcommand, Debug)]
enum ConfigCommands {
    /// Create a default config file, if it doesn't exist
    CreateDefault,
    /// Print the path to the config file
    Path,
}

/// Credentials resolved before the store takes ownership of the client.
struct Session {
    access_token: String,
    user_id: String,
}

async fn resolve_session(
    client: &SpotifyWebClient,
    access_token: Option<String>,
    user_id: Option<String>,
) -> Result<Session> {
    let access_token = access_token
        .ok_or_eyre("An access token is required (--access-token or SPOTIFY_ACCESS_TOKEN)")?;
    let user_id = match user_id {
        Some(user_id) => user_id,
        None => client
            .current_user_id(&access_token)
            .await
            .wrap_err("Failed to look up the current user")?,
    };
    tracing::debug!(%user_id, "Resolved Spotify session");

    Ok(Session {
        access_token,
        user_id,
    })
}

async fn open_playlist(
    client: SpotifyWebClient,
    session: Session,
    playlist: PlaylistObject,
) -> Result<Store> {
    let mut store = PlaylistStore::new(
        client,
        InMemorySession::new(Some(session.access_token), Some(session.user_id)),
        TerminalAlert,
    );
    store
        .load_playlist(playlist)
        .await
        .wrap_err("Failed to load playlist")?;
    Ok(store)
}

fn format_ms(duration_ms: u64) -> String {
    humantime::format_duration(Duration::from_secs(duration_ms / 1000)).to_string()
}

fn print_playlist(state: &PlaylistState) {
    println!("{}", state.playlist_name());
    if let Some(ordering) = state.ordered_by() {
        let direction = if ordering.descending { "descending" } else { "ascending" };
        println!("Ordered by {} ({})", ordering.key, direction);
    }
    if state.playlist_is_empty() {
        println!("(empty)");
        return;
    }

    for (index, track) in state.playlist().iter().enumerate() {
        let tempo = track
            .features
            .as_ref()
            .map(|features| format!("{:.0} bpm", features.tempo))
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:>3}. {} - {} [{}] {}",
            index + 1,
            track.artists.join(", "),
            track.name,
            format_ms(track.duration_ms),
            tempo
        );
    }

    println!(
        "{} tracks, {}",
        state.total_songs(),
        format_ms(state.total_duration_playlist())
    );
}

async fn save(store: &mut Store, config: &Config) -> Result<()> {
    let summary = store
        .save_playlist(config.maximum_per_request)
        .await
        .wrap_err("Failed to save playlist")?;
    tracing::info!(
        requests = summary.requests,
        snapshot_id = ?summary.snapshot_id,
        "Playlist saved"
    );
    println!(
        "Saved {} tracks to {}",
        summary.tracks,
        store.state().playlist_name()
    );
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let args = Args::parse();
    init_tracing(&args.log_level)?;

    tracing::debug!("Playlist editor starting");

    let config = {
        if let Some(config) = &args.config {
            Config::from_file(config)
        } else {
            Config::load()
        }
    }
    .wrap_err("Failed to load playlist-editor config")?;

    let client = SpotifyWebClient::new(config.api_base_url.clone(), config.request_timeout());

    match args.command {
        Commands::Show { playlist_id } => {
            let session = resolve_session(&client, args.access_token, args.user_id).await?;
            let playlist = client.playlist(&session.access_token, &playlist_id).await?;
            let store = open_playlist(client, session, playlist).await?;
            print_playlist(store.state());
        }
        Commands::Add {
            playlist_id,
            track_ids,
        } => {
            let session = resolve_session(&client, args.access_token, args.user_id).await?;
            let playlist = client.playlist(&session.access_token, &playlist_id).await?;
            let mut tracks: Vec<Track> = Vec::with_capacity(track_ids.len());
            for track_id in &track_ids {
                tracks.push(client.track(&session.access_token, track_id).await?);
            }

            let mut store = open_playlist(client, session, playlist).await?;
            for track in tracks {
                store.push(track).await.wrap_err("Failed to add track")?;
            }
            let added = store.add_tracks_to_playlist().await?;
            println!("Added {} tracks to {}", added, store.state().playlist_name());
        }
        Commands::Remove {
            playlist_id,
            track_ids,
        } => {
            let session = resolve_session(&client, args.access_token, args.user_id).await?;
            let playlist = client.playlist(&session.access_token, &playlist_id).await?;
            let mut store = open_playlist(client, session, playlist).await?;

            for track_id in &track_ids {
                let found = store
                    .state()
                    .playlist()
                    .iter()
                    .find(|track| &track.id == track_id)
                    .cloned();
                match found {
                    Some(track) => store.remove(&track),
                    None => tracing::warn!(%track_id, "Track is not in the playlist"),
                }
            }
            save(&mut store, &config).await?;
        }
        Commands::Sort {
            playlist_id,
            by,
            descending,
            dry_run,
        } => {
            let session = resolve_session(&client, args.access_token, args.user_id).await?;
            let playlist = client.playlist(&session.access_token, &playlist_id).await?;
            let mut store = open_playlist(client, session, playlist).await?;

            store.order_by(TrackOrdering {
                key: by,
                descending,
            });
            print_playlist(store.state());

            if dry_run {
                store.undo();
                println!("Dry run, playlist left unchanged");
            } else {
                save(&mut store, &config).await?;
            }
        }
        Commands::Config(config_commands) => match config_commands {
            ConfigCommands::CreateDefault => {
                tracing::debug!("Creating default config");
                let path = Config::create_default()?;
                println!("{}", path.display());
            }
            ConfigCommands::Path => match Config::config_path() {
                Some(path) => println!("{}", path.display()),
                None => println!("No default config path found"),
            },
        },
    }

    Ok(())
}

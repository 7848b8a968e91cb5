use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use tabled::Table;

use super::spotify_client;
use crate::{
    bot::MAX_INLINE_RESULTS,
    config::Config,
    error, info,
    types::TrackTableRow,
};

pub async fn tracks(config: &Config) {
    let client = match spotify_client(config).await {
        Ok(client) => client,
        Err(e) => error!("Cannot load Spotify state: {}", e),
    };
    if !client.tokens().is_authenticated().await {
        error!("Not logged in. Please run spotinline auth-url first.");
    }

    let pb = ProgressBar::new_spinner();
    pb.set_message("Fetching recent tracks...");
    pb.enable_steady_tick(Duration::from_millis(100));
    if let Ok(style) = ProgressStyle::with_template("{spinner:.blue} {msg}") {
        pb.set_style(style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"));
    }

    let result = client.get_tracks().await;
    pb.finish_and_clear();

    let mut tracks = match result {
        Ok(tracks) => tracks,
        Err(e) => error!("Cannot load tracks: {}", e),
    };
    if tracks.is_empty() {
        info!("Nothing played recently.");
        return;
    }
    tracks.truncate(MAX_INLINE_RESULTS);

    let table_rows: Vec<TrackTableRow> = tracks
        .into_iter()
        .map(|t| TrackTableRow {
            name: t.name,
            artist: t.artist,
            id: t.id,
        })
        .collect();
    let table = Table::new(table_rows);
    println!("{}", table);
}

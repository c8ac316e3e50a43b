//! HTML rendering of the pages.
//!
//! Every dynamic value goes through [`escape_html`].

use crate::{
    types::{AlbumRecord, CatalogRecord, EnrichedTrack, PlaylistRecord, TrackRecord, TrackRow},
    utils::{escape_html, format_duration},
};

fn layout(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{title}</title>\n</head>\n<body>\n{body}\n</body>\n</html>\n",
        title = escape_html(title),
        body = body
    )
}

fn error_block(error: Option<&str>) -> String {
    error
        .map(|e| format!("<p class=\"error\">{}</p>\n", escape_html(e)))
        .unwrap_or_default()
}

fn image_tag(image: Option<&str>, alt: &str) -> String {
    image
        .map(|src| {
            format!(
                "<img src=\"{}\" alt=\"{}\" width=\"300\">\n",
                escape_html(src),
                escape_html(alt)
            )
        })
        .unwrap_or_default()
}

fn track_table(rows: &[TrackRow], show_numbers: bool) -> String {
    let mut html = String::from("<table class=\"tracks\">\n");
    for (index, row) in rows.iter().enumerate() {
        let number = if show_numbers {
            row.track_number as usize
        } else {
            index + 1
        };
        html.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
            number,
            escape_html(&row.name),
            escape_html(&row.artist),
            escape_html(&row.duration)
        ));
    }
    html.push_str("</table>\n");
    html
}

pub fn index_page(error: Option<&str>) -> String {
    let body = format!(
        "<h1>Spotify Link Lookup</h1>\n{}\
         <form method=\"post\" action=\"/resolve\">\n\
         <input type=\"text\" name=\"url\" placeholder=\"Paste a track, album or playlist link\">\n\
         <button type=\"submit\">Look up</button>\n</form>\n\
         <p><a href=\"/now-playing\">Now playing</a></p>\n",
        error_block(error)
    );
    layout("Spotify Link Lookup", &body)
}

pub fn catalog_page(record: &CatalogRecord) -> String {
    match record {
        CatalogRecord::Track(track) => track_page(track),
        CatalogRecord::Album(album) => album_page(album),
        CatalogRecord::Playlist(playlist) => playlist_page(playlist),
    }
}

pub fn track_page(track: &TrackRecord) -> String {
    let body = format!(
        "<h1>{name}</h1>\n{image}<dl>\n\
         <dt>Artist</dt><dd>{artist}</dd>\n\
         <dt>Album</dt><dd>{album}</dd>\n\
         <dt>Released</dt><dd>{release}</dd>\n\
         <dt>Track</dt><dd>{number}</dd>\n\
         <dt>Duration</dt><dd>{duration}</dd>\n\
         <dt>Popularity</dt><dd>{popularity}</dd>\n\
         <dt>Explicit</dt><dd>{explicit}</dd>\n</dl>\n",
        name = escape_html(&track.track_name),
        image = image_tag(track.image.as_deref(), &track.track_name),
        artist = escape_html(&track.track_artist),
        album = escape_html(&track.track_album),
        release = escape_html(&track.track_release_date),
        number = track.track_number,
        duration = escape_html(&track.track_duration),
        popularity = track.track_popularity,
        explicit = escape_html(&track.track_explicit),
    );
    layout(&track.track_name, &body)
}

pub fn album_page(album: &AlbumRecord) -> String {
    let body = format!(
        "<h1>{name}</h1>\n{image}<dl>\n\
         <dt>Artist</dt><dd>{artist}</dd>\n\
         <dt>Released</dt><dd>{release}</dd>\n\
         <dt>Label</dt><dd>{label}</dd>\n\
         <dt>Tracks</dt><dd>{total}</dd>\n</dl>\n{tracks}",
        name = escape_html(&album.name),
        image = image_tag(album.image.as_deref(), &album.name),
        artist = escape_html(&album.artist),
        release = escape_html(&album.release_date),
        label = escape_html(&album.label),
        total = album.total_tracks,
        tracks = track_table(&album.tracks, true),
    );
    layout(&album.name, &body)
}

pub fn playlist_page(playlist: &PlaylistRecord) -> String {
    let body = format!(
        "<h1>{name}</h1>\n{image}<p>{desc}</p>\n<dl>\n\
         <dt>Owner</dt><dd>{owner}</dd>\n\
         <dt>Followers</dt><dd>{followers}</dd>\n\
         <dt>Tracks</dt><dd>{total}</dd>\n</dl>\n{tracks}",
        name = escape_html(&playlist.name),
        image = image_tag(playlist.image.as_deref(), &playlist.name),
        desc = escape_html(&playlist.desc),
        owner = escape_html(&playlist.owner),
        followers = playlist.followers,
        total = playlist.total_tracks,
        tracks = track_table(&playlist.tracks, false),
    );
    layout(&playlist.name, &body)
}

pub fn now_playing_page(track: &EnrichedTrack) -> String {
    let snapshot = &track.track;
    let state = if snapshot.is_playing { "Playing" } else { "Paused" };
    let body = format!(
        "<h1>{name}</h1>\n{image}<p>{artist} &middot; {album}</p>\n\
         <p class=\"progress\">{state}: {progress} / {duration}</p>\n\
         <h2>Lyrics</h2>\n<pre class=\"lyrics\">{lyrics}</pre>\n\
         <h2>Interpretation</h2>\n<div class=\"commentary\">{commentary}</div>\n\
         <p><a href=\"/logout\">Sign out</a></p>\n",
        name = escape_html(&snapshot.name),
        image = image_tag(snapshot.image_url.as_deref(), &snapshot.album),
        artist = escape_html(&snapshot.artist),
        album = escape_html(&snapshot.album),
        state = state,
        progress = format_duration(snapshot.progress_ms),
        duration = format_duration(snapshot.duration_ms),
        lyrics = escape_html(&track.lyrics),
        commentary = escape_html(&track.commentary),
    );
    layout("Now Playing", &body)
}

pub fn nothing_playing_page(message: &str) -> String {
    let body = format!(
        "<h1>Now Playing</h1>\n<p class=\"message\">{}</p>\n\
         <p><a href=\"/now-playing\">Refresh</a> &middot; <a href=\"/logout\">Sign out</a></p>\n",
        escape_html(message)
    );
    layout("Now Playing", &body)
}

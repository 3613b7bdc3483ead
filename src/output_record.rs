use serde::Serialize;

use crate::song::SongRecord;

/// A song as exposed to the site templates through `_data` files.
///
/// These field names are what the templates refer to; absent fields are left
/// out rather than written as null.
#[derive(Debug, PartialEq, Eq, Serialize)]
pub struct OutputRecord<'a> {
    pub title: &'a str,
    pub sort_key: &'a str,
    pub title_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_key: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alternative_titles: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lyricist: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub composer: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artist: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub album: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tempo: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<&'a str>,
}

impl<'a> OutputRecord<'a> {
    /// Borrow a song; its sort key must already be derived.
    pub fn new(song: &'a SongRecord, sort_key: &'a str) -> Self {
        OutputRecord {
            title: &song.title,
            sort_key,
            title_url: song.title_url(),
            original_key: song.original_key.as_deref(),
            alternative_titles: song.alternative_titles.as_deref(),
            lyricist: song.lyricist.as_deref(),
            composer: song.composer.as_deref(),
            artist: song.artist.as_deref(),
            album: song.album.as_deref(),
            tempo: song.tempo.as_deref(),
            year: song.year.as_deref(),
        }
    }
}

use serde::{Deserialize, Serialize};

use crate::error::TransliterationError;
use crate::sort_key;

/// Column order of a song catalog.
pub const CATALOG_HEADER: [&str; 9] = [
    "title",
    "original_key",
    "alternative_titles",
    "lyricist",
    "composer",
    "artist",
    "album",
    "tempo",
    "year",
];

/// Column order of the older catalog layout.
pub const LEGACY_HEADER: [&str; 4] = ["name", "key", "hymn_ref", "sheet_type"];

/// One row of the song catalog.
///
/// Field order matches [`CATALOG_HEADER`], which is what the csv writer emits.
/// `tempo` and `year` stay textual so a catalog is written back exactly as it
/// was read.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq, Serialize)]
pub struct SongRecord {
    pub title: String,
    pub original_key: Option<String>,
    pub alternative_titles: Option<String>,
    pub lyricist: Option<String>,
    pub composer: Option<String>,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub tempo: Option<String>,
    pub year: Option<String>,

    /// Derived from `title`, never read from or written to csv.
    #[serde(skip)]
    pub sort_key: Option<String>,
}

impl SongRecord {
    pub fn new(title: impl Into<String>) -> Self {
        SongRecord {
            title: title.into(),
            ..Default::default()
        }
    }

    /// Compute and store the sort key, returning it.
    pub fn derive_sort_key(&mut self) -> Result<&str, TransliterationError> {
        let key = sort_key::derive_sort_key(&self.title)?;
        Ok(self.sort_key.insert(key).as_str())
    }

    /// The title as used in page permalinks.
    pub fn title_url(&self) -> String {
        self.title.replace(' ', "+")
    }

    /// The title as a single file or folder name, with path separators
    /// replaced by `-`.
    pub fn file_stem(&self) -> String {
        self.title.replace(['/', '\\'], "-")
    }
}

/// A row of the legacy catalog layout.
#[derive(Debug, Deserialize, Serialize)]
pub struct LegacySong {
    pub name: String,
    pub key: Option<String>,
    pub hymn_ref: Option<String>,
    pub sheet_type: Option<String>,
}

impl From<LegacySong> for SongRecord {
    fn from(legacy: LegacySong) -> Self {
        SongRecord {
            original_key: legacy.key,
            ..SongRecord::new(legacy.name)
        }
    }
}

impl From<&SongRecord> for LegacySong {
    fn from(song: &SongRecord) -> Self {
        LegacySong {
            name: song.title.clone(),
            key: song.original_key.clone(),
            hymn_ref: None,
            sheet_type: None,
        }
    }
}

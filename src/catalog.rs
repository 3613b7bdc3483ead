//! Loading, ordering and writing song catalogs.

use std::cmp::Ordering;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use clap::ValueEnum;
use csv::{ReaderBuilder, StringRecord, Trim};
use log::{debug, info};

use crate::error::{InputFormatError, OutputWriteError, Result, TransliterationError};
use crate::output_record::OutputRecord;
use crate::song::{LegacySong, SongRecord, CATALOG_HEADER, LEGACY_HEADER};
use crate::sort_key::derive_sort_key;

/// Column layout of a catalog csv file.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Layout {
    #[default]
    Catalog,
    Legacy,
}

impl Layout {
    pub fn header(self) -> &'static [&'static str] {
        match self {
            Layout::Catalog => &CATALOG_HEADER,
            Layout::Legacy => &LEGACY_HEADER,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Csv,
    LegacyCsv,
    Yaml,
    Json,
}

impl OutputFormat {
    /// Guess the format from a file extension, falling back to csv.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("yml") || ext.eq_ignore_ascii_case("yaml") => {
                OutputFormat::Yaml
            }
            Some(ext) if ext.eq_ignore_ascii_case("json") => OutputFormat::Json,
            _ => OutputFormat::Csv,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum SortBy {
    #[default]
    Title,
    Key,
}

/// Read a catalog csv file.
///
/// An empty file is an empty catalog. Otherwise the first row must be exactly
/// the header of `layout`, and every row needs a title.
pub fn load(path: &Path, layout: Layout) -> std::result::Result<Vec<SongRecord>, InputFormatError> {
    let contents = fs::read_to_string(path).map_err(|source| InputFormatError::Unreadable {
        path: path.to_path_buf(),
        source,
    })?;
    let contents = contents.strip_prefix('\u{feff}').unwrap_or(&contents);

    if contents.trim().is_empty() {
        info!("{} is empty", path.display());
        return Ok(Vec::new());
    }

    let mut reader = ReaderBuilder::new()
        .trim(Trim::All)
        .has_headers(true)
        .from_reader(contents.as_bytes());

    let malformed = |source: csv::Error| InputFormatError::MalformedRow {
        path: path.to_path_buf(),
        source,
    };

    let headers = reader.headers().map_err(malformed)?.clone();
    check_header(path, &headers, layout)?;
    debug!("The csv header of {} is correctly read", path.display());

    let mut songs = Vec::new();
    for result in reader.records() {
        let record = result.map_err(malformed)?;
        let song = match layout {
            Layout::Catalog => record.deserialize::<SongRecord>(Some(&headers)),
            Layout::Legacy => record
                .deserialize::<LegacySong>(Some(&headers))
                .map(SongRecord::from),
        }
        .map_err(malformed)?;

        if song.title.is_empty() {
            return Err(InputFormatError::EmptyTitle {
                path: path.to_path_buf(),
                line: record.position().map_or(0, |pos| pos.line()),
            });
        }

        debug!("Added song {}", song.title);
        songs.push(song);
    }

    info!("Loaded {} songs from {}", songs.len(), path.display());
    Ok(songs)
}

fn check_header(
    path: &Path,
    headers: &StringRecord,
    layout: Layout,
) -> std::result::Result<(), InputFormatError> {
    let expected = layout.header();
    if headers.iter().eq(expected.iter().copied()) {
        return Ok(());
    }

    Err(InputFormatError::InvalidHeader {
        path: path.to_path_buf(),
        found: headers.iter().collect::<Vec<_>>().join(","),
        expected: expected.join(","),
    })
}

/// Derive the sort key of every song.
pub fn derive_sort_keys(songs: &mut [SongRecord]) -> std::result::Result<(), TransliterationError> {
    for song in songs.iter_mut() {
        song.derive_sort_key()?;
    }
    Ok(())
}

/// Stable sort of the catalog.
///
/// Songs whose sort key has not been derived compare by their title.
pub fn sort(songs: &mut [SongRecord], by: SortBy, desc: bool) {
    songs.sort_by(|a, b| {
        let ordering = match by {
            SortBy::Title => compare_titles(a, b),
            SortBy::Key => a
                .original_key
                .cmp(&b.original_key)
                .then_with(|| compare_titles(a, b)),
        };
        if desc {
            ordering.reverse()
        } else {
            ordering
        }
    });
}

fn compare_titles(a: &SongRecord, b: &SongRecord) -> Ordering {
    sort_key_of(a)
        .cmp(sort_key_of(b))
        .then_with(|| a.title.cmp(&b.title))
}

fn sort_key_of(song: &SongRecord) -> &str {
    song.sort_key.as_deref().unwrap_or(&song.title)
}

/// Write the catalog to `path` in `format`.
///
/// Csv output of an empty catalog is an empty file, yaml and json output an
/// empty sequence.
pub fn write(songs: &[SongRecord], path: &Path, format: OutputFormat) -> Result<()> {
    // Keys are derived before the output is truncated.
    let keys = match format {
        OutputFormat::Yaml | OutputFormat::Json => songs
            .iter()
            .map(|song| match &song.sort_key {
                Some(key) => Ok(key.clone()),
                None => derive_sort_key(&song.title),
            })
            .collect::<std::result::Result<Vec<_>, _>>()?,
        OutputFormat::Csv | OutputFormat::LegacyCsv => Vec::new(),
    };

    let file = File::create(path).map_err(|source| OutputWriteError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    match format {
        OutputFormat::Csv => write_csv(songs.iter(), file, path)?,
        OutputFormat::LegacyCsv => write_csv(songs.iter().map(LegacySong::from), file, path)?,
        OutputFormat::Yaml | OutputFormat::Json => {
            let records: Vec<OutputRecord> = songs
                .iter()
                .zip(&keys)
                .map(|(song, key)| OutputRecord::new(song, key))
                .collect();
            write_data_file(&records, file, path, format)?;
        }
    }

    info!("Wrote {} songs to {} as {:?}", songs.len(), path.display(), format);
    Ok(())
}

fn write_csv<S: serde::Serialize>(
    rows: impl Iterator<Item = S>,
    file: File,
    path: &Path,
) -> std::result::Result<(), OutputWriteError> {
    let csv_error = |source: csv::Error| OutputWriteError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut writer = csv::Writer::from_writer(file);
    for row in rows {
        writer.serialize(row).map_err(csv_error)?;
    }

    // Flush CSV buffer to file
    writer.flush().map_err(|source| OutputWriteError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn write_data_file(
    records: &[OutputRecord],
    file: File,
    path: &Path,
    format: OutputFormat,
) -> std::result::Result<(), OutputWriteError> {
    let io_error = |source: std::io::Error| OutputWriteError::Io {
        path: path.to_path_buf(),
        source,
    };

    let mut writer = BufWriter::new(file);
    if format == OutputFormat::Yaml {
        serde_yaml::to_writer(&mut writer, records).map_err(|source| OutputWriteError::Yaml {
            path: path.to_path_buf(),
            source,
        })?;
    } else {
        serde_json::to_writer_pretty(&mut writer, records).map_err(|source| {
            OutputWriteError::Json {
                path: path.to_path_buf(),
                source,
            }
        })?;
        writer.write_all(b"\n").map_err(io_error)?;
    }
    writer.flush().map_err(io_error)
}

//! Jekyll song pages.
//!
//! Every song gets `<title>.md` in the page directory. When sheets are found
//! in the sheet library the page shows them in a gallery, otherwise it tells
//! the reader the sheet is not available yet.

use std::fs;
use std::path::{Component, Path, PathBuf};

use log::debug;

use crate::error::OutputWriteError;
use crate::resource::{find_resources, Extensions, ResourceType};
use crate::song::SongRecord;

/// Where pages are written and where their sheets come from.
#[derive(Clone, Debug)]
pub struct PageOptions {
    pub page_dir: PathBuf,
    pub sheet_library: Option<PathBuf>,
    pub site_root: PathBuf,
}

/// Sheets of a song, searched in `<library>/<title>/` and its subfolders.
pub fn find_sheets(song: &SongRecord, library: &Path) -> Vec<PathBuf> {
    let extensions = Extensions::new(ResourceType::Sheet, None);
    find_resources(song, &library.join(song.file_stem()), &extensions)
}

/// Site link of a sheet: its path below `site_root`, rooted at `/`.
fn sheet_link(sheet: &Path, site_root: &Path) -> String {
    let sheet = without_cur_dir(sheet);
    let site_root = without_cur_dir(site_root);
    let relative = sheet.strip_prefix(&site_root).unwrap_or(&sheet);
    let parts: Vec<_> = relative
        .components()
        .filter_map(|component| match component {
            Component::Normal(part) => Some(part.to_string_lossy()),
            _ => None,
        })
        .collect();
    format!("/{}", parts.join("/"))
}

fn without_cur_dir(path: &Path) -> PathBuf {
    path.components()
        .filter(|component| !matches!(component, Component::CurDir))
        .collect()
}

/// Markdown of a song page.
pub fn render_page(song: &SongRecord, sheet_links: &[String]) -> String {
    let front_matter = format!(
        "---\nlayout: song\ntitle: {}\npermalink: /songbook/{}\n---\n\n",
        song.title,
        song.title_url()
    );

    if sheet_links.is_empty() {
        return format!("{front_matter}抱歉，暂时还未收录这首歌的谱子。\n\n");
    }

    let columns = if sheet_links.len() <= 1 { 1 } else { 2 };
    format!(
        "{front_matter}#### 歌谱\n\n\
         {{% include post-components/gallery.html\n    \
         columns = {columns}\n    \
         full_width = true\n    \
         images = \"{},\"\n\
         %}}\n\n\n",
        sheet_links.join(",")
    )
}

/// Write one page per song, returning how many were written.
pub fn write_pages(songs: &[SongRecord], options: &PageOptions) -> Result<usize, OutputWriteError> {
    let io_error = |path: &Path, source: std::io::Error| OutputWriteError::Io {
        path: path.to_path_buf(),
        source,
    };

    fs::create_dir_all(&options.page_dir).map_err(|source| io_error(&options.page_dir, source))?;

    for song in songs {
        let links: Vec<String> = match &options.sheet_library {
            Some(library) => find_sheets(song, library)
                .iter()
                .map(|sheet| sheet_link(sheet, &options.site_root))
                .collect(),
            None => Vec::new(),
        };

        let page = options.page_dir.join(format!("{}.md", song.file_stem()));
        fs::write(&page, render_page(song, &links)).map_err(|source| io_error(&page, source))?;
        debug!("Successfully wrote song page {}", song.title);
    }

    Ok(songs.len())
}

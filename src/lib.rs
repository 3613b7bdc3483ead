//! Song catalog tooling for the worship group's site.
//!
//! A catalog is a csv file of songs. It is loaded, each title gets a pinyin
//! sort key, the songs are sorted, and the result is written back as csv or as
//! a yaml/json data file for the Jekyll templates. Song pages can be generated
//! from the same catalog, and each song's sheets or recordings collected into
//! the site.

pub mod catalog;
pub mod error;
pub mod output_record;
pub mod page;
pub mod resource;
pub mod song;
pub mod sort_key;

pub use catalog::{Layout, OutputFormat, SortBy};
pub use error::{Error, Result};
pub use song::SongRecord;

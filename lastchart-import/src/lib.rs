//! lastchart-import library - catalog import from the Last.fm chart API

pub mod lastfm;
pub mod pipeline;

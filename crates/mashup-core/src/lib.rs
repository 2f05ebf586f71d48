//! mashup-core: search an artist, cut the first seconds of each hit, and merge
//! them into one MP3.

pub mod codec;
pub mod config;
pub mod decoder;
pub mod encoder;
pub mod error;
pub mod fetcher;
pub mod merger;
pub mod notifier;
pub mod packager;
pub mod pipeline;
pub mod segment;
pub mod stage;
pub mod transcoder;
pub mod trimmer;
pub mod validate;
pub mod workspace;

pub use config::Config;
pub use error::{MashupError, Result, Stage};

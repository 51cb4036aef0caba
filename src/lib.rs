#![allow(clippy::implicit_hasher)]
#![allow(unknown_lints)]

pub mod constants;
pub mod data;
pub mod dataset;
pub mod filter;
pub mod geometry;
pub mod import;
pub mod logging;
pub mod models;
pub mod render;
pub mod time;

pub use dataset::{Dataset, DatasetStore};
pub use filter::{FilterParams, TimeWindow};
pub use render::{render, RenderOutput};

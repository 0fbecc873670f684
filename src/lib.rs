//! creature-render - Library for posing and rendering creature breeds
//!
//! This library provides functionality to:
//! - Parse, generate and resolve creature pose strings
//! - Validate breed, color and output options into render requests
//! - Render every requested pose to PNG images
//! - Report the concrete values behind random choices

pub mod breed;
pub mod cli;
pub mod color;
pub mod config;
pub mod output;
pub mod pose;
pub mod preview;
pub mod render;
pub mod report;
pub mod request;
pub mod sources;
pub mod variant;

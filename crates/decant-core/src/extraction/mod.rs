//! Extraction driver shared by all container formats.

pub mod atomic;
pub mod engine;

pub use atomic::atomic_extract;
pub use engine::DirectoryRecording;
pub use engine::ExtractionEngine;

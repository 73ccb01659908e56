//! Archive format implementations.

pub mod detect;
pub mod tar_gz;
pub mod traits;
pub mod zip;

// Re-export main types for convenience
pub use detect::ArchiveType;
pub use detect::detect_format;
pub use self::tar_gz::TarGzArchive;
pub use traits::ArchiveFormat;
pub use self::zip::ZipArchive;

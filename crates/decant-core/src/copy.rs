//! Chunked transfer of a byte stream into a file.
//!
//! Payloads are moved through a bounded, call-owned [`CopyBuffer`] so an
//! entry of any size is streamed rather than loaded into memory. A buffer is
//! never shared between concurrent transfers; each extraction call allocates
//! its own and reuses it for every entry.

use std::io;
use std::io::BufWriter;
use std::io::Read;
use std::io::Write;
use std::path::Path;

use thiserror::Error;

use crate::ExtractionError;
use crate::Result;
use crate::config::DEFAULT_BUFFER_SIZE;
use crate::fs::FileSystem;

/// Reusable fixed-capacity transfer buffer.
///
/// # Examples
///
/// ```
/// use decant_core::copy::CopyBuffer;
///
/// let buffer = CopyBuffer::with_capacity(1024);
/// assert_eq!(buffer.size(), 1024);
/// ```
#[derive(Debug)]
pub struct CopyBuffer {
    buf: Box<[u8]>,
}

impl CopyBuffer {
    /// Creates a buffer of [`DEFAULT_BUFFER_SIZE`] bytes.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_BUFFER_SIZE)
    }

    /// Creates a buffer of `size` bytes. A size of zero is raised to one.
    #[must_use]
    pub fn with_capacity(size: usize) -> Self {
        Self {
            buf: vec![0u8; size.max(1)].into_boxed_slice(),
        }
    }

    /// Returns the buffer size in bytes.
    #[inline]
    #[must_use]
    pub fn size(&self) -> usize {
        self.buf.len()
    }
}

impl Default for CopyBuffer {
    fn default() -> Self {
        Self::new()
    }
}

/// Failure of a chunked transfer, split by the side that failed.
#[derive(Error, Debug)]
pub enum CopyError {
    /// Reading from the source stream failed.
    #[error("read failed: {0}")]
    Read(#[source] io::Error),

    /// Writing to the destination failed.
    #[error("write failed: {0}")]
    Write(#[source] io::Error),
}

impl CopyError {
    /// Returns the underlying I/O error.
    #[must_use]
    pub fn into_io(self) -> io::Error {
        match self {
            Self::Read(e) | Self::Write(e) => e,
        }
    }
}

impl From<CopyError> for ExtractionError {
    fn from(err: CopyError) -> Self {
        Self::Io(err.into_io())
    }
}

/// Copies everything `reader` yields into `writer` through `buffer`.
///
/// The loop ends when a read returns zero bytes. Interrupted reads are
/// retried; any other read or write error aborts the copy.
///
/// # Examples
///
/// ```
/// use decant_core::copy::CopyBuffer;
/// use decant_core::copy::copy_with_buffer;
/// use std::io::Cursor;
///
/// let mut buffer = CopyBuffer::with_capacity(4);
/// let mut input = Cursor::new(b"hello world".to_vec());
/// let mut output = Vec::new();
///
/// let copied = copy_with_buffer(&mut input, &mut output, &mut buffer).unwrap();
/// assert_eq!(copied, 11);
/// assert_eq!(output, b"hello world");
/// ```
#[inline]
pub fn copy_with_buffer<R: Read + ?Sized, W: Write + ?Sized>(
    reader: &mut R,
    writer: &mut W,
    buffer: &mut CopyBuffer,
) -> std::result::Result<u64, CopyError> {
    let mut total: u64 = 0;

    loop {
        let bytes_read = match reader.read(&mut buffer.buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(CopyError::Read(e)),
        };

        writer
            .write_all(&buffer.buf[..bytes_read])
            .map_err(CopyError::Write)?;

        total = total.saturating_add(bytes_read as u64);
    }

    Ok(total)
}

/// Creates (or truncates) `dest` and streams `reader` into it.
///
/// The file is created with default permissions. Returns the number of
/// bytes written.
pub fn transfer_to_file<R: Read + ?Sized>(
    fs: &dyn FileSystem,
    reader: &mut R,
    dest: &Path,
    buffer: &mut CopyBuffer,
) -> Result<u64> {
    let file = fs.create_file(dest)?;
    let mut writer = BufWriter::with_capacity(buffer.size(), file);
    let written = copy_with_buffer(reader, &mut writer, buffer)?;
    writer.flush()?;
    Ok(written)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::fs::OsFileSystem;
    use std::io::Cursor;
    use std::io::Error;
    use std::io::ErrorKind;
    use tempfile::TempDir;

    #[test]
    fn test_copy_buffer_sizes() {
        assert_eq!(CopyBuffer::new().size(), DEFAULT_BUFFER_SIZE);
        assert_eq!(CopyBuffer::default().size(), DEFAULT_BUFFER_SIZE);
        assert_eq!(CopyBuffer::with_capacity(0).size(), 1);
    }

    #[test]
    fn test_copy_empty_source() {
        let mut buffer = CopyBuffer::new();
        let mut input = Cursor::new(Vec::<u8>::new());
        let mut output = Vec::new();

        let copied = copy_with_buffer(&mut input, &mut output, &mut buffer).unwrap();
        assert_eq!(copied, 0);
        assert!(output.is_empty());
    }

    #[test]
    fn test_copy_one_byte_buffer() {
        let mut buffer = CopyBuffer::with_capacity(1);
        let input_data: Vec<u8> = (0..=255u8).collect();
        let mut input = Cursor::new(&input_data);
        let mut output = Vec::new();

        let copied = copy_with_buffer(&mut input, &mut output, &mut buffer).unwrap();
        assert_eq!(copied, 256);
        assert_eq!(output, input_data);
    }

    #[test]
    fn test_copy_multiple_chunks() {
        let mut buffer = CopyBuffer::with_capacity(1024);
        let input_data = vec![0x55u8; 1024 * 3 + 17];
        let mut input = Cursor::new(&input_data);
        let mut output = Vec::new();

        let copied = copy_with_buffer(&mut input, &mut output, &mut buffer).unwrap();
        assert_eq!(copied, input_data.len() as u64);
        assert_eq!(output, input_data);
    }

    #[test]
    fn test_copy_with_interrupted_reads() {
        struct InterruptedReader {
            data: Vec<u8>,
            position: usize,
            calls: usize,
        }

        impl Read for InterruptedReader {
            fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
                self.calls += 1;
                if self.calls % 2 == 1 && self.position < self.data.len() {
                    return Err(Error::new(ErrorKind::Interrupted, "interrupted"));
                }
                let remaining = &self.data[self.position..];
                let n = remaining.len().min(buf.len());
                buf[..n].copy_from_slice(&remaining[..n]);
                self.position += n;
                Ok(n)
            }
        }

        let mut reader = InterruptedReader {
            data: vec![0x42u8; 1000],
            position: 0,
            calls: 0,
        };
        let mut buffer = CopyBuffer::with_capacity(64);
        let mut output = Vec::new();

        let copied = copy_with_buffer(&mut reader, &mut output, &mut buffer).unwrap();
        assert_eq!(copied, 1000);
        assert_eq!(output, vec![0x42u8; 1000]);
    }

    #[test]
    fn test_copy_read_failure_is_read_side() {
        struct BrokenReader;

        impl Read for BrokenReader {
            fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
                Err(Error::new(ErrorKind::InvalidData, "corrupt"))
            }
        }

        let mut buffer = CopyBuffer::new();
        let mut output = Vec::new();
        let result = copy_with_buffer(&mut BrokenReader, &mut output, &mut buffer);
        assert!(matches!(result, Err(CopyError::Read(ref e)) if e.kind() == ErrorKind::InvalidData));
    }

    #[test]
    fn test_copy_write_failure_is_write_side() {
        struct FailingWriter {
            written: usize,
            fail_after: usize,
        }

        impl Write for FailingWriter {
            fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
                if self.written >= self.fail_after {
                    return Err(Error::other("write failed"));
                }
                let n = (self.fail_after - self.written).min(buf.len());
                self.written += n;
                Ok(n)
            }

            fn flush(&mut self) -> io::Result<()> {
                Ok(())
            }
        }

        let mut input = Cursor::new(vec![0x42u8; 1000]);
        let mut writer = FailingWriter {
            written: 0,
            fail_after: 500,
        };
        let mut buffer = CopyBuffer::with_capacity(128);

        let result = copy_with_buffer(&mut input, &mut writer, &mut buffer);
        assert!(matches!(result, Err(CopyError::Write(ref e)) if e.kind() == ErrorKind::Other));

        let err: ExtractionError = result.unwrap_err().into();
        assert!(matches!(err, ExtractionError::Io(_)));
    }

    #[test]
    fn test_transfer_to_file_truncates_existing() {
        let temp = TempDir::new().expect("failed to create temp dir");
        let dest = temp.path().join("out.bin");
        std::fs::write(&dest, vec![0xFFu8; 4096]).unwrap();

        let mut buffer = CopyBuffer::with_capacity(16);
        let mut input = Cursor::new(b"short".to_vec());
        let written = transfer_to_file(&OsFileSystem, &mut input, &dest, &mut buffer).unwrap();

        assert_eq!(written, 5);
        assert_eq!(std::fs::read(&dest).unwrap(), b"short");
    }

    #[test]
    fn test_transfer_to_missing_directory_fails() {
        let temp = TempDir::new().expect("failed to create temp dir");
        let dest = temp.path().join("missing").join("out.bin");

        let mut buffer = CopyBuffer::new();
        let mut input = Cursor::new(b"data".to_vec());
        let result = transfer_to_file(&OsFileSystem, &mut input, &dest, &mut buffer);
        assert!(matches!(result, Err(ExtractionError::Io(_))));
    }
}

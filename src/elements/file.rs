//! File source element.

use crate::buffer::Buffer;
use crate::element::Source;
use crate::error::{Error, Result};
use crate::metadata::Metadata;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

/// A source element that reads from a file.
///
/// Reads the file in `blocksize` chunks and produces buffers until EOF. Every
/// buffer but the last is exactly `blocksize` bytes long. Each buffer carries
/// its byte offset within the file. An empty file produces no buffers.
///
/// # Example
///
/// ```rust,no_run
/// use md5sum::element::Source;
/// use md5sum::elements::FileSrc;
///
/// let mut src = FileSrc::open("input.bin")?;
///
/// while let Some(buffer) = src.produce()? {
///     println!("Read {} bytes", buffer.len());
/// }
/// # Ok::<(), md5sum::error::Error>(())
/// ```
pub struct FileSrc {
    name: String,
    path: PathBuf,
    file: Option<File>,
    blocksize: usize,
    sequence: u64,
    bytes_read: u64,
}

impl FileSrc {
    /// Default block size (4 KB).
    pub const DEFAULT_BLOCKSIZE: usize = 4096;

    /// Create a new FileSrc that will read from the given path.
    ///
    /// The file is not opened until the first call to `produce()`.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        Self {
            name: format!("filesrc:{}", path.display()),
            path,
            file: None,
            blocksize: Self::DEFAULT_BLOCKSIZE,
            sequence: 0,
            bytes_read: 0,
        }
    }

    /// Open the file immediately and return a FileSrc.
    ///
    /// Returns an error if the file cannot be opened.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut src = Self::new(path);
        src.file = Some(File::open(&src.path)?);
        Ok(src)
    }

    /// Set a custom name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Set the number of bytes read per buffer.
    ///
    /// # Errors
    ///
    /// Returns an error if `size` is 0.
    pub fn with_blocksize(mut self, size: usize) -> Result<Self> {
        if size == 0 {
            return Err(Error::invalid_property(
                "filesrc",
                "blocksize",
                "must be greater than 0",
            ));
        }
        self.blocksize = size;
        Ok(self)
    }

    /// Get the path being read.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Get the number of bytes read per buffer.
    pub fn blocksize(&self) -> usize {
        self.blocksize
    }

    /// Get the total bytes read so far.
    pub fn bytes_read(&self) -> u64 {
        self.bytes_read
    }

    fn ensure_open(&mut self) -> Result<&mut File> {
        let file = match self.file.take() {
            Some(file) => file,
            None => File::open(&self.path)?,
        };
        Ok(self.file.insert(file))
    }
}

impl Source for FileSrc {
    fn produce(&mut self) -> Result<Option<Buffer>> {
        let blocksize = self.blocksize;
        let file = self.ensure_open()?;

        let mut data = Vec::with_capacity(blocksize);
        file.take(blocksize as u64).read_to_end(&mut data)?;

        if data.is_empty() {
            return Ok(None);
        }

        let len = data.len() as u64;
        let metadata = Metadata::with_sequence(self.sequence).with_offset(self.bytes_read);
        self.bytes_read += len;
        self.sequence += 1;

        Ok(Some(Buffer::from_bytes(data, metadata)))
    }

    fn name(&self) -> &str {
        &self.name
    }
}

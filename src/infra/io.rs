use anyhow::{Context, Result};
use bstr::ByteSlice;
use memmap2::Mmap;
use std::borrow::Cow;
use std::fs::File;
use std::path::Path;

const MMAP_THRESHOLD: u64 = 1024 * 1024; // 1 MiB

/// Raw bytes of a source file, mapped or buffered depending on size.
pub enum FileContent {
    Mapped(Mmap),
    Buffered(Vec<u8>),
}

impl FileContent {
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            FileContent::Mapped(mmap) => mmap,
            FileContent::Buffered(bytes) => bytes,
        }
    }

    /// Decode as UTF-8, replacing invalid sequences with U+FFFD.
    pub fn to_text_lossy(&self) -> Cow<'_, str> {
        self.as_bytes().to_str_lossy()
    }
}

pub fn read_file_smart<P: AsRef<Path>>(path: P) -> Result<FileContent> {
    let path = path.as_ref();
    let metadata = std::fs::metadata(path)
        .with_context(|| format!("Failed to read metadata for {}", path.display()))?;

    if metadata.len() > MMAP_THRESHOLD {
        // Use memory mapping for large files
        let file =
            File::open(path).with_context(|| format!("Failed to open file {}", path.display()))?;

        // Safety: We're only reading the file, not modifying it
        let mmap = unsafe { Mmap::map(&file) }
            .with_context(|| format!("Failed to memory-map {}", path.display()))?;

        Ok(FileContent::Mapped(mmap))
    } else {
        // Read small files into memory
        let bytes =
            std::fs::read(path).with_context(|| format!("Failed to read file {}", path.display()))?;

        Ok(FileContent::Buffered(bytes))
    }
}

/// Read `path` as text, tolerating invalid UTF-8.
pub fn read_text_lossy<P: AsRef<Path>>(path: P) -> Result<String> {
    let content = read_file_smart(path)?;
    Ok(content.to_text_lossy().into_owned())
}

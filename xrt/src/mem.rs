//! Program sources mapped straight from disk

use {
    memmap2::Mmap,
    std::{fs::File, io, ops::Deref, path::Path},
};

/// Read-only view of a source file
pub enum Source {
    Mapped(Mmap),
    /// Zero-length files cannot be mapped
    Empty,
}

impl Source {
    pub fn load(path: &Path) -> io::Result<Self> {
        let file = File::open(path)?;
        if file.metadata()?.len() == 0 {
            return Ok(Self::Empty);
        }

        // The map is private and read-only, concurrent writers to the file
        // are outside of our control
        let map = unsafe { Mmap::map(&file)? };
        log::debug!("mapped {} bytes of {}", map.len(), path.display());
        Ok(Self::Mapped(map))
    }

    pub fn text(&self) -> io::Result<&str> {
        std::str::from_utf8(self).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }
}

impl Deref for Source {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        match self {
            Source::Mapped(map) => map,
            Source::Empty => &[],
        }
    }
}

use std::{
    fs::File,
    hash::Hasher,
    io::{BufRead, BufReader},
    path::Path,
};

use metrohash::MetroHash64;

/// Content hash used to tell whether an existing file still matches the
/// contents the layout would have written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ContentFingerprint(u64);

impl ContentFingerprint {
    pub fn of(bytes: impl AsRef<[u8]>) -> Self {
        let mut hasher = MetroHash64::default();
        hasher.write(bytes.as_ref());
        ContentFingerprint(hasher.finish())
    }

    /// Streams the file through the hasher without holding it in memory.
    pub fn of_file(path: &Path) -> std::io::Result<Self> {
        let mut reader = BufReader::new(File::open(path)?);
        let mut hasher = MetroHash64::default();
        loop {
            let chunk = reader.fill_buf()?;
            if chunk.is_empty() {
                break;
            }
            hasher.write(chunk);
            let consumed = chunk.len();
            reader.consume(consumed);
        }
        Ok(ContentFingerprint(hasher.finish()))
    }
}

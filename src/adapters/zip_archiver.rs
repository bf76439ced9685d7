use crate::domain::ports::Archiver;
use crate::utils::error::Result;
use std::io::{Cursor, Write};
use zip::write::{FileOptions, ZipWriter};

/// 在記憶體中組出 ZIP 檔
pub struct ZipArchiver {
    zip: ZipWriter<Cursor<Vec<u8>>>,
    entries: usize,
}

impl ZipArchiver {
    pub fn new() -> Self {
        Self {
            zip: ZipWriter::new(Cursor::new(Vec::new())),
            entries: 0,
        }
    }
}

impl Default for ZipArchiver {
    fn default() -> Self {
        Self::new()
    }
}

impl Archiver for ZipArchiver {
    fn add_entry(&mut self, file_name: &str, data: &[u8]) -> Result<()> {
        self.zip
            .start_file::<_, ()>(file_name, FileOptions::default())?;
        self.zip.write_all(data)?;
        self.entries += 1;
        Ok(())
    }

    fn finalize(self) -> Result<Vec<u8>> {
        tracing::debug!("Finalizing ZIP archive with {} entries", self.entries);
        let cursor = self.zip.finish()?;
        Ok(cursor.into_inner())
    }
}

use std::{cell::RefCell, env, fs::File, io, path::{Path, PathBuf}, rc::Rc};

use anyhow::{Context, Result};
use hashbrown::HashMap;

pub trait FileSystem {
    type Reader: io::Read;
    type Writer: io::Write;

    fn exists(&self, path: &Path) -> bool;
    fn get_writer(&mut self, path: &Path) -> Result<Self::Writer>;
    fn get_reader(&mut self, path: &Path) -> Result<Self::Reader>;
    fn get_executable_directory(&self) -> Result<PathBuf>;
}

pub struct DefaultFileSystem;

impl FileSystem for DefaultFileSystem {
    type Reader = File;
    type Writer = File;

    fn get_writer(&mut self, path: &Path) -> Result<Self::Writer> {
        File::create(path).with_context(|| format!("could not create file {}", path.display()))
    }

    fn get_reader(&mut self, path: &Path) -> Result<Self::Reader> {
        File::open(path).with_context(|| format!("could not open file {}", path.display()))
    }

    fn get_executable_directory(&self) -> Result<PathBuf> {
        let executable_path = env::current_exe()?;

        executable_path
            .parent()
            .map(Path::to_path_buf)
            .ok_or_else(|| anyhow::anyhow!("executable has no parent directory: {:?}", executable_path))
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }
}

impl DefaultFileSystem {
    pub fn new() -> Self {
        Self
    }
}

/// In-memory stand-in used by tests. Writers to the same path share one buffer.
pub struct MemoryFileSystem {
    map: HashMap<PathBuf, MemoryFileSystemEntry>,
    read_only: bool,
}

impl FileSystem for MemoryFileSystem {
    type Reader = MemoryFileSystemEntry;
    type Writer = MemoryFileSystemEntry;

    fn get_writer(&mut self, path: &Path) -> Result<Self::Writer> {
        if self.read_only {
            anyhow::bail!("read-only file system: {:?}", path);
        }

        let entry = MemoryFileSystemEntry::new();
        self.map.insert(path.to_path_buf(), entry.clone());

        Ok(entry)
    }

    fn get_reader(&mut self, path: &Path) -> Result<Self::Reader> {
        self.map.get(path)
            .map(MemoryFileSystemEntry::rewind)
            .ok_or_else(|| anyhow::anyhow!("File not found: {:?}", path))
    }

    fn get_executable_directory(&self) -> Result<PathBuf> {
        Ok(std::env::temp_dir())
    }

    fn exists(&self, path: &Path) -> bool {
        self.map.contains_key(path)
    }
}

impl MemoryFileSystem {
    pub fn new() -> Self {
        Self {
            map: HashMap::new(),
            read_only: false,
        }
    }

    pub fn read_only() -> Self {
        Self {
            map: HashMap::new(),
            read_only: true,
        }
    }

    pub fn read_to_string(&self, path: &Path) -> Option<String> {
        self.map
            .get(path)
            .map(|entry| String::from_utf8_lossy(&entry.data.borrow()).into_owned())
    }
}

pub struct MemoryFileSystemEntry {
    data: Rc<RefCell<Vec<u8>>>,
    position: usize,
}

impl Clone for MemoryFileSystemEntry {
    fn clone(&self) -> Self {
        Self {
            data: self.data.clone(),
            position: self.position,
        }
    }
}

impl io::Read for MemoryFileSystemEntry {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let data = self.data.borrow();
        let available = data.len().saturating_sub(self.position);
        let bytes_to_read = available.min(buf.len());

        if bytes_to_read == 0 {
            return Ok(0);
        }

        buf[..bytes_to_read].copy_from_slice(&data[self.position..self.position + bytes_to_read]);
        self.position += bytes_to_read;

        Ok(bytes_to_read)
    }
}

impl io::Write for MemoryFileSystemEntry {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut data = self.data.borrow_mut();
        data.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl MemoryFileSystemEntry {
    pub fn new() -> Self {
        Self {
            data: Rc::new(RefCell::new(Vec::new())),
            position: 0
        }
    }

    fn rewind(&self) -> Self {
        Self {
            data: self.data.clone(),
            position: 0,
        }
    }
}

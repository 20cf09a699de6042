//! Tar packing of local files for upload into containers
//!
//! [`ArchiveBuilder`] walks a file or directory and emits [`ArchiveEntry`]
//! records in pre-order, rooted at the source's base name. Siblings are
//! visited in file-name order so the same tree always packs the same way.
//!
//! [`ArchiveBuilder::into_stream`] packs on a blocking thread and hands the
//! tar over in chunks through a bounded channel, so memory use does not grow
//! with the size of the source.

use bytes::{Bytes, BytesMut};
use futures::Stream;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;
use tar::{EntryType, Header};
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;
use walkdir::WalkDir;

/// Size of the chunks handed to the consumer
const CHUNK_SIZE: usize = 64 * 1024;

/// Chunks buffered ahead of the consumer
const STREAM_DEPTH: usize = 8;

/// Errors raised while packing an archive
#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("Source path not found: {}", .0.display())]
    SourceNotFound(PathBuf),

    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to walk source tree: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("Failed to write archive: {0}")]
    Write(#[from] io::Error),
}

/// Kind of an archive entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Directory,
}

/// One record of the archive
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
    /// Path inside the archive, `/`-separated, starting with the root name
    pub archive_path: String,
    pub kind: EntryKind,
    /// Permission bits
    pub mode: u32,
    /// Content length; zero for directories
    pub size: u64,
    /// Modification time in seconds since the epoch
    pub mtime: u64,
    /// Where the content is read from
    pub source: PathBuf,
}

/// Packs a local file or directory tree
#[derive(Debug, Clone)]
pub struct ArchiveBuilder {
    source: PathBuf,
    root_name: String,
}

impl ArchiveBuilder {
    /// Prepare to pack `source`
    ///
    /// Fails with [`ArchiveError::SourceNotFound`] when the path (or the
    /// target of a symlink) does not exist.
    pub fn new(source: impl AsRef<Path>) -> Result<Self, ArchiveError> {
        let source = source.as_ref().to_path_buf();
        if !source.exists() {
            return Err(ArchiveError::SourceNotFound(source));
        }

        let root_name = match source.file_name() {
            Some(name) => name.to_string_lossy().into_owned(),
            // "." and "/" have no file name of their own
            None => fs::canonicalize(&source)
                .ok()
                .and_then(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
                .unwrap_or_else(|| "root".to_string()),
        };

        Ok(Self { source, root_name })
    }

    /// The path being packed
    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Name of the top-level archive entry
    pub fn root_name(&self) -> &str {
        &self.root_name
    }

    /// Whether the source is a directory
    pub fn is_directory(&self) -> bool {
        self.source.is_dir()
    }

    /// Entries in pre-order
    ///
    /// Symlinks are followed. Entries that are neither files nor
    /// directories (sockets, fifos) are skipped.
    pub fn entries(&self) -> impl Iterator<Item = Result<ArchiveEntry, ArchiveError>> + '_ {
        WalkDir::new(&self.source)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter()
            .filter_map(move |item| match item {
                Ok(entry) => self.to_entry(&entry).transpose(),
                Err(e) => Some(Err(ArchiveError::Walk(e))),
            })
    }

    fn to_entry(&self, entry: &walkdir::DirEntry) -> Result<Option<ArchiveEntry>, ArchiveError> {
        let file_type = entry.file_type();
        let kind = if file_type.is_dir() {
            EntryKind::Directory
        } else if file_type.is_file() {
            EntryKind::File
        } else {
            debug!(path = %entry.path().display(), "Skipping special file");
            return Ok(None);
        };

        let metadata = entry.metadata().map_err(|e| ArchiveError::Read {
            path: entry.path().to_path_buf(),
            source: e.into(),
        })?;

        let mut archive_path = self.root_name.clone();
        if let Ok(relative) = entry.path().strip_prefix(&self.source) {
            for component in relative.components() {
                archive_path.push('/');
                archive_path.push_str(&component.as_os_str().to_string_lossy());
            }
        }

        let mtime = metadata
            .modified()
            .ok()
            .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
            .map(|d| d.as_secs())
            .unwrap_or(0);

        Ok(Some(ArchiveEntry {
            archive_path,
            kind,
            mode: permission_bits(&metadata, kind),
            size: if kind == EntryKind::File { metadata.len() } else { 0 },
            mtime,
            source: entry.path().to_path_buf(),
        }))
    }

    /// Encode the archive into `writer`, returning the writer
    pub fn write_to<W: Write>(&self, writer: W) -> Result<W, ArchiveError> {
        let mut builder = tar::Builder::new(writer);

        for entry in self.entries() {
            let entry = entry?;
            let mut header = Header::new_gnu();
            header.set_mode(entry.mode);
            header.set_mtime(entry.mtime);
            header.set_size(entry.size);

            match entry.kind {
                EntryKind::Directory => {
                    header.set_entry_type(EntryType::Directory);
                    builder.append_data(&mut header, &entry.archive_path, io::empty())?;
                }
                EntryKind::File => {
                    header.set_entry_type(EntryType::Regular);
                    let file = File::open(&entry.source).map_err(|e| ArchiveError::Read {
                        path: entry.source.clone(),
                        source: e,
                    })?;
                    builder.append_data(&mut header, &entry.archive_path, file)?;
                }
            }
        }

        Ok(builder.into_inner()?)
    }

    /// Pack on a blocking thread, yielding the tar as a stream of chunks
    ///
    /// Packing waits while the consumer lags and stops when the stream is
    /// dropped. The handle resolves to the number of bytes produced once
    /// packing has ended; an error there means the stream was cut short.
    pub fn into_stream(
        self,
    ) -> (
        impl Stream<Item = Bytes> + Send + 'static,
        JoinHandle<Result<u64, ArchiveError>>,
    ) {
        let (tx, rx) = mpsc::channel(STREAM_DEPTH);
        let packing = tokio::task::spawn_blocking(move || -> Result<u64, ArchiveError> {
            let mut writer = self.write_to(ChunkWriter::new(tx))?;
            writer.flush()?;
            debug!(bytes = writer.total, root = %self.root_name, "Packed archive");
            Ok(writer.total)
        });

        let chunks = futures::stream::unfold(rx, |mut rx| async move {
            rx.recv().await.map(|chunk| (chunk, rx))
        });
        (chunks, packing)
    }
}

/// `Write` adapter that cuts its input into chunks for a bounded channel
///
/// Must only be used off the async runtime: sends block while the channel
/// is full.
struct ChunkWriter {
    tx: mpsc::Sender<Bytes>,
    pending: BytesMut,
    total: u64,
}

impl ChunkWriter {
    fn new(tx: mpsc::Sender<Bytes>) -> Self {
        Self {
            tx,
            pending: BytesMut::with_capacity(CHUNK_SIZE),
            total: 0,
        }
    }

    fn send_pending(&mut self) -> io::Result<()> {
        let chunk = self.pending.split().freeze();
        self.total += chunk.len() as u64;
        self.tx.blocking_send(chunk).map_err(|_| {
            io::Error::new(io::ErrorKind::BrokenPipe, "archive consumer went away")
        })
    }
}

impl Write for ChunkWriter {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        self.pending.extend_from_slice(data);
        if self.pending.len() >= CHUNK_SIZE {
            self.send_pending()?;
        }
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        if self.pending.is_empty() {
            Ok(())
        } else {
            self.send_pending()
        }
    }
}

#[cfg(unix)]
fn permission_bits(metadata: &fs::Metadata, _kind: EntryKind) -> u32 {
    use std::os::unix::fs::PermissionsExt;
    metadata.permissions().mode() & 0o7777
}

#[cfg(not(unix))]
fn permission_bits(metadata: &fs::Metadata, kind: EntryKind) -> u32 {
    match kind {
        EntryKind::Directory => 0o755,
        EntryKind::File if metadata.permissions().readonly() => 0o444,
        EntryKind::File => 0o644,
    }
}

/// A tar holding a single in-memory file
pub fn single_file_archive(name: &str, contents: &[u8]) -> Result<Vec<u8>, ArchiveError> {
    let mut builder = tar::Builder::new(Vec::new());
    let mut header = Header::new_gnu();
    header.set_entry_type(EntryType::Regular);
    header.set_mode(0o644);
    header.set_size(contents.len() as u64);
    builder.append_data(&mut header, name, contents)?;
    Ok(builder.into_inner()?)
}

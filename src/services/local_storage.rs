use std::{
    fs::Metadata,
    io,
    path::{Path, PathBuf},
};

use async_trait::async_trait;
use tokio::{
    fs::{self, File, OpenOptions},
    io::{AsyncRead, AsyncReadExt, AsyncWriteExt},
};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::{
    application::{
        error::ApplicationError,
        services::{FileReader, StorageService},
    },
    domain::models::{file::StoredFile, file_name::FileName},
    services::error::StorageError,
};

const TEMP_PREFIX: &str = ".upload-";
const TEMP_SUFFIX: &str = ".tmp";
const COPY_BUFFER_SIZE: usize = 64 * 1024;

/// Stores uploads as plain files in one flat directory.
///
/// Uploads are streamed into a hidden temporary file next to their final
/// location and published with a hard link, which fails if the target already
/// exists. Readers never observe a partially written file and a name can only
/// be claimed once.
pub struct LocalStorageService {
    root: PathBuf,
    max_upload_bytes: u64,
}

impl LocalStorageService {
    /// Creates the storage directory if needed and removes temporary files
    /// left behind by a previous process.
    pub async fn new(root: impl Into<PathBuf>, max_upload_bytes: u64) -> Result<Self, StorageError> {
        let root = root.into();
        fs::create_dir_all(&root).await?;

        let service = Self {
            root,
            max_upload_bytes,
        };

        let swept = service.sweep_stale_uploads().await?;
        if swept > 0 {
            info!(
                "Removed {} stale temporary upload(s) from {}",
                swept,
                service.root.display()
            );
        }

        Ok(service)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, name: &FileName) -> PathBuf {
        self.root.join(name.as_str())
    }

    async fn sweep_stale_uploads(&self) -> Result<usize, StorageError> {
        let mut entries = fs::read_dir(&self.root).await?;
        let mut removed = 0;

        while let Some(entry) = entries.next_entry().await? {
            let is_temp = entry.file_name().to_str().is_some_and(is_temp_name);
            if !is_temp {
                continue;
            }
            match fs::remove_file(entry.path()).await {
                Ok(()) => removed += 1,
                Err(e) => warn!("Could not remove stale upload {}: {}", entry.path().display(), e),
            }
        }

        Ok(removed)
    }

    async fn store_file(
        &self,
        name: &FileName,
        content: &mut (dyn AsyncRead + Send + Unpin),
    ) -> Result<StoredFile, StorageError> {
        let target = self.path_for(name);

        // Fail before reading the body; the link below is the authoritative check.
        if fs::try_exists(&target).await? {
            return Err(StorageError::AlreadyExists(name.to_string()));
        }

        let mut temp = TempUpload::create(&self.root).await?;
        let size = temp.fill(content, self.max_upload_bytes).await?;

        temp.publish(&target).await.map_err(|e| match e.kind() {
            io::ErrorKind::AlreadyExists => StorageError::AlreadyExists(name.to_string()),
            _ => StorageError::Io(e),
        })?;

        let metadata = fs::metadata(&target).await?;
        debug!("Published {} ({} bytes)", target.display(), size);

        Ok(describe(name.clone(), &metadata)?)
    }

    async fn open_file(&self, name: &FileName) -> Result<(StoredFile, FileReader), StorageError> {
        let file = File::open(self.path_for(name))
            .await
            .map_err(|e| not_found_or_io(e, name))?;

        let metadata = file.metadata().await?;
        if !metadata.is_file() {
            return Err(StorageError::NotFound(name.to_string()));
        }

        Ok((describe(name.clone(), &metadata)?, Box::new(file)))
    }

    async fn file_metadata(&self, name: &FileName) -> Result<StoredFile, StorageError> {
        let metadata = fs::metadata(self.path_for(name))
            .await
            .map_err(|e| not_found_or_io(e, name))?;

        if !metadata.is_file() {
            return Err(StorageError::NotFound(name.to_string()));
        }

        Ok(describe(name.clone(), &metadata)?)
    }

    async fn list_files(&self) -> Result<Vec<StoredFile>, StorageError> {
        let mut entries = fs::read_dir(&self.root).await?;
        let mut files = Vec::new();

        while let Some(entry) = entries.next_entry().await? {
            // Temporary uploads and anything else that could not have been
            // uploaded under its own name are skipped.
            let Some(name) = entry
                .file_name()
                .to_str()
                .and_then(|raw| FileName::parse(raw).ok())
            else {
                continue;
            };

            let metadata = match fs::metadata(entry.path()).await {
                Ok(metadata) => metadata,
                Err(e) if e.kind() == io::ErrorKind::NotFound => continue,
                Err(e) => return Err(e.into()),
            };
            if !metadata.is_file() {
                continue;
            }

            files.push(describe(name, &metadata)?);
        }

        files.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(files)
    }
}

#[async_trait]
impl StorageService for LocalStorageService {
    async fn store(
        &self,
        name: &FileName,
        content: &mut (dyn AsyncRead + Send + Unpin),
    ) -> Result<StoredFile, ApplicationError> {
        Ok(self.store_file(name, content).await?)
    }

    async fn open(&self, name: &FileName) -> Result<(StoredFile, FileReader), ApplicationError> {
        Ok(self.open_file(name).await?)
    }

    async fn get_metadata(&self, name: &FileName) -> Result<StoredFile, ApplicationError> {
        Ok(self.file_metadata(name).await?)
    }

    async fn list(&self) -> Result<Vec<StoredFile>, ApplicationError> {
        Ok(self.list_files().await?)
    }
}

/// A hidden file receiving an upload. Dropping it removes the temporary name,
/// so a failed, rejected or cancelled upload leaves nothing behind and a
/// published one keeps only its final link.
struct TempUpload {
    path: PathBuf,
    file: Option<File>,
}

impl TempUpload {
    async fn create(dir: &Path) -> io::Result<Self> {
        let path = dir.join(format!("{}{}{}", TEMP_PREFIX, Uuid::new_v4(), TEMP_SUFFIX));
        let file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await?;

        Ok(Self {
            path,
            file: Some(file),
        })
    }

    async fn fill(
        &mut self,
        content: &mut (dyn AsyncRead + Send + Unpin),
        limit: u64,
    ) -> Result<u64, StorageError> {
        let file = self
            .file
            .as_mut()
            .ok_or_else(|| io::Error::other("temporary upload already closed"))?;

        let mut buffer = vec![0u8; COPY_BUFFER_SIZE];
        let mut written: u64 = 0;

        loop {
            let read = content
                .read(&mut buffer)
                .await
                .map_err(StorageError::Interrupted)?;
            if read == 0 {
                break;
            }

            written += read as u64;
            if written > limit {
                return Err(StorageError::TooLarge { limit });
            }

            file.write_all(&buffer[..read]).await?;
        }

        file.flush().await?;
        file.sync_all().await?;
        Ok(written)
    }

    async fn publish(mut self, target: &Path) -> io::Result<()> {
        drop(self.file.take());
        fs::hard_link(&self.path, target).await
    }
}

impl Drop for TempUpload {
    fn drop(&mut self) {
        drop(self.file.take());
        // Drop cannot await; a single unlink is run inline on the worker.
        if let Err(e) = std::fs::remove_file(&self.path) {
            if e.kind() != io::ErrorKind::NotFound {
                warn!("Could not remove temporary upload {}: {}", self.path.display(), e);
            }
        }
    }
}

fn is_temp_name(name: &str) -> bool {
    name.starts_with(TEMP_PREFIX) && name.ends_with(TEMP_SUFFIX)
}

fn describe(name: FileName, metadata: &Metadata) -> io::Result<StoredFile> {
    Ok(StoredFile::new(name, metadata.len(), metadata.modified()?))
}

fn not_found_or_io(error: io::Error, name: &FileName) -> StorageError {
    match error.kind() {
        io::ErrorKind::NotFound => StorageError::NotFound(name.to_string()),
        _ => StorageError::Io(error),
    }
}

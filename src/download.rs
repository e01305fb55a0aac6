//! File download plumbing for exports.
//!
//! Exports only need a [`DownloadSink`]. Hosts that work the way a browser
//! does (a blob is registered under an object URL, a link pointing at it
//! is clicked, the URL is revoked) implement [`DownloadHost`] and are
//! wrapped in an [`ObjectUrlDownloader`], which guarantees the URL is
//! revoked once the click returns, whether it succeeded or not.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info};

use crate::error::{Error, Result};

/// Anything that can save a text document under a file name.
pub trait DownloadSink {
    fn download(&mut self, content: &str, filename: &str, mime_type: &str) -> Result<()>;
}

/// In-memory file contents with a MIME type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blob {
    pub content: Vec<u8>,
    pub mime_type: String,
}

impl Blob {
    pub fn new(content: impl Into<Vec<u8>>, mime_type: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            mime_type: mime_type.into(),
        }
    }
}

/// An anchor pointing at an object URL, with the name to save under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DownloadLink<'a> {
    pub href: &'a str,
    pub filename: &'a str,
}

/// Host side of the object-URL download protocol.
pub trait DownloadHost {
    /// Register `blob` and return a URL that refers to it.
    fn create_object_url(&mut self, blob: Blob) -> Result<String>;

    /// Start saving whatever `link.href` refers to.
    fn click(&mut self, link: &DownloadLink<'_>) -> Result<()>;

    /// Release a URL returned by `create_object_url`.
    fn revoke_object_url(&mut self, url: &str);
}

/// An object URL that is revoked when dropped.
struct ObjectUrl<'h, H: DownloadHost> {
    host: &'h mut H,
    url: String,
}

impl<'h, H: DownloadHost> ObjectUrl<'h, H> {
    fn create(host: &'h mut H, blob: Blob) -> Result<Self> {
        let url = host.create_object_url(blob)?;
        Ok(Self { host, url })
    }

    fn click(&mut self, filename: &str) -> Result<()> {
        let link = DownloadLink {
            href: &self.url,
            filename,
        };
        self.host.click(&link)
    }
}

impl<H: DownloadHost> Drop for ObjectUrl<'_, H> {
    fn drop(&mut self) {
        debug!("download: revoking {}", self.url);
        self.host.revoke_object_url(&self.url);
    }
}

/// Adapts a [`DownloadHost`] into a [`DownloadSink`].
#[derive(Debug)]
pub struct ObjectUrlDownloader<H> {
    host: H,
}

impl<H: DownloadHost> ObjectUrlDownloader<H> {
    pub fn new(host: H) -> Self {
        Self { host }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn into_host(self) -> H {
        self.host
    }
}

impl<H: DownloadHost> DownloadSink for ObjectUrlDownloader<H> {
    fn download(&mut self, content: &str, filename: &str, mime_type: &str) -> Result<()> {
        let mut object_url = ObjectUrl::create(&mut self.host, Blob::new(content, mime_type))?;
        object_url.click(filename)
    }
}

/// Saves downloads into a directory on the local filesystem.
#[derive(Debug)]
pub struct FileSystemHost {
    output_dir: PathBuf,
    blobs: HashMap<String, Blob>,
    next_id: u64,
    saved: Vec<PathBuf>,
}

impl FileSystemHost {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            blobs: HashMap::new(),
            next_id: 0,
            saved: Vec::new(),
        }
    }

    /// Files written so far, in order.
    pub fn saved_files(&self) -> &[PathBuf] {
        &self.saved
    }

    /// Object URLs created and not yet revoked.
    pub fn live_urls(&self) -> usize {
        self.blobs.len()
    }
}

impl DownloadHost for FileSystemHost {
    fn create_object_url(&mut self, blob: Blob) -> Result<String> {
        self.next_id += 1;
        let url = format!("blob:revenue-dashboard/{}", self.next_id);
        self.blobs.insert(url.clone(), blob);
        Ok(url)
    }

    fn click(&mut self, link: &DownloadLink<'_>) -> Result<()> {
        let blob = self
            .blobs
            .get(link.href)
            .ok_or_else(|| Error::Download(format!("unknown object URL {}", link.href)))?;

        // Only the final path component is honoured.
        let name = Path::new(link.filename)
            .file_name()
            .ok_or_else(|| Error::Download(format!("invalid file name '{}'", link.filename)))?;

        fs::create_dir_all(&self.output_dir)?;
        let path = self.output_dir.join(name);
        fs::write(&path, &blob.content)?;

        info!("download: saved {} ({} bytes)", path.display(), blob.content.len());
        self.saved.push(path);
        Ok(())
    }

    fn revoke_object_url(&mut self, url: &str) {
        self.blobs.remove(url);
    }
}

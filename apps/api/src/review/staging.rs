//! On-disk staging of uploaded resumes.
//!
//! Each accepted upload is written to the upload directory, verified, and copied
//! into the knowledge directory. `StagedUpload` owns both files and removes them
//! when the review ends, whether it succeeded, failed, or was dropped mid-flight.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use tracing::{debug, warn};

const STABILITY_POLL_INTERVAL: Duration = Duration::from_millis(50);
const STABILITY_MAX_POLLS: u32 = 40;

#[derive(Debug)]
pub struct StagedUpload {
    upload_path: PathBuf,
    knowledge_path: PathBuf,
    removed: bool,
}

impl StagedUpload {
    /// Writes `bytes` as `file_name` into `upload_dir`, waits until the write is
    /// visible, then copies it into `knowledge_dir`.
    pub async fn stage(
        upload_dir: &Path,
        knowledge_dir: &Path,
        file_name: &str,
        bytes: &[u8],
    ) -> Result<Self> {
        tokio::fs::create_dir_all(upload_dir)
            .await
            .with_context(|| format!("creating upload dir {}", upload_dir.display()))?;
        tokio::fs::create_dir_all(knowledge_dir)
            .await
            .with_context(|| format!("creating knowledge dir {}", knowledge_dir.display()))?;

        // Own the paths before touching disk so a failure below still cleans up.
        let staged = StagedUpload {
            upload_path: upload_dir.join(file_name),
            knowledge_path: knowledge_dir.join(file_name),
            removed: false,
        };

        tokio::fs::write(&staged.upload_path, bytes)
            .await
            .with_context(|| format!("writing {}", staged.upload_path.display()))?;
        wait_until_stable(&staged.upload_path, bytes.len() as u64).await?;

        tokio::fs::copy(&staged.upload_path, &staged.knowledge_path)
            .await
            .with_context(|| format!("copying into {}", staged.knowledge_path.display()))?;

        debug!(
            "Staged {} ({} bytes) and knowledge copy {}",
            staged.upload_path.display(),
            bytes.len(),
            staged.knowledge_path.display()
        );
        Ok(staged)
    }

    pub fn upload_path(&self) -> &Path {
        &self.upload_path
    }

    pub fn knowledge_path(&self) -> &Path {
        &self.knowledge_path
    }

    /// Deletes both files. Failures are logged, never returned.
    pub async fn remove(mut self) {
        for path in [&self.upload_path, &self.knowledge_path] {
            if let Err(e) = tokio::fs::remove_file(path).await {
                if e.kind() != ErrorKind::NotFound {
                    warn!("Failed to remove staged file {}: {e}", path.display());
                }
            }
        }
        self.removed = true;
    }
}

impl Drop for StagedUpload {
    fn drop(&mut self) {
        if self.removed {
            return;
        }
        for path in [&self.upload_path, &self.knowledge_path] {
            if let Err(e) = std::fs::remove_file(path) {
                if e.kind() != ErrorKind::NotFound {
                    warn!("Failed to remove staged file {}: {e}", path.display());
                }
            }
        }
    }
}

/// Polls until `path` exists with `expected_len` bytes on two consecutive reads.
async fn wait_until_stable(path: &Path, expected_len: u64) -> Result<()> {
    let mut last_len: Option<u64> = None;

    for _ in 0..STABILITY_MAX_POLLS {
        match tokio::fs::metadata(path).await {
            Ok(meta) => {
                let len = meta.len();
                if len == expected_len && last_len == Some(len) {
                    return Ok(());
                }
                last_len = Some(len);
            }
            Err(e) if e.kind() == ErrorKind::NotFound => last_len = None,
            Err(e) => {
                return Err(e).with_context(|| format!("inspecting {}", path.display()))
            }
        }
        tokio::time::sleep(STABILITY_POLL_INTERVAL).await;
    }

    bail!(
        "{} did not reach a stable size of {expected_len} bytes",
        path.display()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Dirs {
        _root: tempfile::TempDir,
        uploads: PathBuf,
        knowledge: PathBuf,
    }

    fn dirs() -> Dirs {
        let root = tempfile::tempdir().unwrap();
        let uploads = root.path().join("uploads");
        let knowledge = root.path().join("knowledge");
        Dirs {
            _root: root,
            uploads,
            knowledge,
        }
    }

    #[tokio::test]
    async fn test_stage_writes_both_copies() {
        let d = dirs();
        let staged = StagedUpload::stage(&d.uploads, &d.knowledge, "cv_1.pdf", b"%PDF-1.4")
            .await
            .unwrap();

        assert_eq!(std::fs::read(staged.upload_path()).unwrap(), b"%PDF-1.4");
        assert_eq!(std::fs::read(staged.knowledge_path()).unwrap(), b"%PDF-1.4");
        staged.remove().await;
    }

    #[tokio::test]
    async fn test_remove_deletes_both_copies() {
        let d = dirs();
        let staged = StagedUpload::stage(&d.uploads, &d.knowledge, "cv_2.pdf", b"%PDF")
            .await
            .unwrap();
        let (upload, knowledge) = (
            staged.upload_path().to_path_buf(),
            staged.knowledge_path().to_path_buf(),
        );

        staged.remove().await;
        assert!(!upload.exists());
        assert!(!knowledge.exists());
    }

    #[tokio::test]
    async fn test_drop_deletes_both_copies() {
        let d = dirs();
        let staged = StagedUpload::stage(&d.uploads, &d.knowledge, "cv_3.pdf", b"%PDF")
            .await
            .unwrap();
        let upload = staged.upload_path().to_path_buf();
        let knowledge = staged.knowledge_path().to_path_buf();

        drop(staged);
        assert!(!upload.exists());
        assert!(!knowledge.exists());
    }

    #[tokio::test]
    async fn test_remove_tolerates_already_deleted_files() {
        let d = dirs();
        let staged = StagedUpload::stage(&d.uploads, &d.knowledge, "cv_4.pdf", b"%PDF")
            .await
            .unwrap();
        std::fs::remove_file(staged.upload_path()).unwrap();
        staged.remove().await;
    }

    #[tokio::test]
    async fn test_wait_until_stable_times_out_on_size_mismatch() {
        let d = dirs();
        std::fs::create_dir_all(&d.uploads).unwrap();
        let path = d.uploads.join("short.pdf");
        std::fs::write(&path, b"abc").unwrap();

        tokio::time::pause();
        let err = wait_until_stable(&path, 10).await.unwrap_err();
        assert!(err.to_string().contains("stable size"));
    }
}

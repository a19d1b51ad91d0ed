use std::path::{Path, PathBuf};

use skillbench_workbench::DownloadPayload;
use snafu::{ResultExt, Snafu};

#[derive(Debug, Snafu)]
pub enum DownloadError {
    #[snafu(display("failed to create download directory on `{stage}`: {source}"))]
    CreateDir {
        stage: &'static str,
        source: std::io::Error,
    },
    #[snafu(display("failed to write download on `{stage}`: {source}"))]
    WriteFile {
        stage: &'static str,
        source: std::io::Error,
    },
}

/// Picks a free path for `file_name` inside `directory`, appending ` (n)` on clashes.
pub fn download_destination(directory: &Path, file_name: &str) -> PathBuf {
    let candidate = directory.join(file_name);
    if !candidate.exists() {
        return candidate;
    }

    let path = Path::new(file_name);
    let stem = path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or(file_name);
    let extension = path.extension().and_then(|extension| extension.to_str());

    (1..)
        .map(|index| match extension {
            Some(extension) => directory.join(format!("{stem} ({index}).{extension}")),
            None => directory.join(format!("{stem} ({index})")),
        })
        .find(|candidate| !candidate.exists())
        .unwrap_or(candidate)
}

/// Writes the payload into the user's download directory.
pub fn write_download(payload: &DownloadPayload) -> Result<PathBuf, DownloadError> {
    let directory = dirs::download_dir().unwrap_or_else(std::env::temp_dir);
    write_download_to(&directory, payload)
}

fn write_download_to(directory: &Path, payload: &DownloadPayload) -> Result<PathBuf, DownloadError> {
    std::fs::create_dir_all(directory).context(CreateDirSnafu {
        stage: "create-download-dir",
    })?;

    let destination = download_destination(directory, &payload.file_name);
    std::fs::write(&destination, &payload.bytes).context(WriteFileSnafu {
        stage: "write-download",
    })?;

    tracing::info!("downloaded {} to {}", payload.file_name, destination.display());
    Ok(destination)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(name: &str) -> PathBuf {
        let directory = std::env::temp_dir().join(format!(
            "skillbench-download-{name}-{}",
            std::process::id()
        ));
        let _ = std::fs::remove_dir_all(&directory);
        directory
    }

    #[test]
    fn clashing_names_get_a_numbered_suffix() {
        let directory = scratch_dir("clash");
        let payload = DownloadPayload {
            file_name: "report.md".to_string(),
            bytes: b"# Report".to_vec(),
        };

        let first = write_download_to(&directory, &payload).unwrap();
        let second = write_download_to(&directory, &payload).unwrap();

        assert_eq!(first, directory.join("report.md"));
        assert_eq!(second, directory.join("report (1).md"));
        assert_eq!(std::fs::read(&second).unwrap(), b"# Report");

        std::fs::remove_dir_all(&directory).unwrap();
    }

    #[test]
    fn names_without_extension_are_suffixed_too() {
        let directory = scratch_dir("plain");
        std::fs::create_dir_all(&directory).unwrap();
        std::fs::write(directory.join("Makefile"), b"").unwrap();

        assert_eq!(
            download_destination(&directory, "Makefile"),
            directory.join("Makefile (1)")
        );

        std::fs::remove_dir_all(&directory).unwrap();
    }
}

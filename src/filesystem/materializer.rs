use std::{
    fs::{self, OpenOptions},
    io::Write,
    path::{Path, PathBuf},
};

use snafu::{ResultExt, Snafu, ensure};
use tracing::{debug, info, warn};

use crate::{
    ext::ResolvedPathExt,
    filesystem::{
        ContentFingerprint, Entries, EntryOutcome, MaterializationReport, TreeDescriptor, TreeNode,
    },
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MaterializeMode {
    #[default]
    Write,
    /// Walk and check existence, but never touch the filesystem.
    DryRun,
}

/// Realizes a [`TreeDescriptor`] on disk below a base directory.
///
/// Traversal is depth-first and sequential. Paths that already exist are left
/// untouched; existence is checked fresh at every step. A failure aborts the
/// walk and leaves whatever was created so far in place.
#[derive(Debug, Clone, Default)]
pub struct Materializer {
    mode: MaterializeMode,
}

impl Materializer {
    pub fn new(mode: MaterializeMode) -> Self {
        Self { mode }
    }

    pub fn materialize(
        &self,
        base_path: &Path,
        descriptor: &TreeDescriptor,
    ) -> Result<MaterializationReport, MaterializeError> {
        debug!(
            "Materializing {} top-level entries under {} ({:?})",
            descriptor.entries().len(),
            base_path.resolved_display(),
            self.mode
        );
        let mut report = MaterializationReport::default();
        self.materialize_entries(base_path, descriptor.entries(), &mut report)?;
        Ok(report)
    }

    fn materialize_entries(
        &self,
        base_path: &Path,
        entries: &Entries,
        report: &mut MaterializationReport,
    ) -> Result<(), MaterializeError> {
        for (name, node) in entries {
            let target = base_path.join(name);
            match node {
                TreeNode::Directory { children } => {
                    self.ensure_directory(&target, report)?;
                    self.materialize_entries(&target, children, report)?;
                }
                TreeNode::File { contents } => {
                    self.ensure_file(&target, contents, report)?;
                }
            }
        }
        Ok(())
    }

    fn ensure_directory(
        &self,
        target: &Path,
        report: &mut MaterializationReport,
    ) -> Result<(), MaterializeError> {
        if exists(target)? {
            ensure!(
                target.is_dir(),
                NotADirectorySnafu {
                    path: target.to_path_buf()
                }
            );
            debug!("Directory already exists: {}", target.display());
            report.push(target, EntryOutcome::ExistingDirectory);
            return Ok(());
        }

        let outcome = match self.mode {
            MaterializeMode::Write => {
                fs::create_dir_all(target).context(CreateDirectorySnafu {
                    path: target.to_path_buf(),
                })?;
                EntryOutcome::CreatedDirectory
            }
            MaterializeMode::DryRun => EntryOutcome::PlannedDirectory,
        };
        self.announce(target, outcome, report);
        Ok(())
    }

    fn ensure_file(
        &self,
        target: &Path,
        contents: &str,
        report: &mut MaterializationReport,
    ) -> Result<(), MaterializeError> {
        if exists(target)? {
            let matches_template = matches_template(target, contents);
            if matches_template {
                debug!("File already exists: {}", target.display());
            } else {
                warn!(
                    "Leaving {} untouched, it differs from the layout",
                    target.resolved_display()
                );
            }
            report.push(target, EntryOutcome::ExistingFile { matches_template });
            return Ok(());
        }

        let outcome = match self.mode {
            MaterializeMode::Write => {
                write_new_file(target, contents).context(WriteFileSnafu {
                    path: target.to_path_buf(),
                })?;
                EntryOutcome::CreatedFile
            }
            MaterializeMode::DryRun => EntryOutcome::PlannedFile,
        };
        self.announce(target, outcome, report);
        Ok(())
    }

    fn announce(&self, target: &Path, outcome: EntryOutcome, report: &mut MaterializationReport) {
        info!("{}: {}", outcome, target.resolved_display());
        report.push(target, outcome);
    }
}

fn exists(path: &Path) -> Result<bool, MaterializeError> {
    path.try_exists().context(InspectSnafu {
        path: path.to_path_buf(),
    })
}

/// Best effort: anything that cannot be read counts as differing.
fn matches_template(target: &Path, contents: &str) -> bool {
    let metadata = match fs::metadata(target) {
        Ok(metadata) => metadata,
        Err(error) => {
            debug!("Could not stat {}: {}", target.display(), error);
            return false;
        }
    };
    if !metadata.is_file() || metadata.len() != contents.len() as u64 {
        return false;
    }

    match ContentFingerprint::of_file(target) {
        Ok(fingerprint) => fingerprint == ContentFingerprint::of(contents),
        Err(error) => {
            warn!(
                "Could not read {} to compare it with the layout: {}",
                target.resolved_display(),
                error
            );
            false
        }
    }
}

/// Refuses to open a file that appeared after the existence check, so
/// existing contents are never truncated.
fn write_new_file(path: &Path, contents: &str) -> std::io::Result<()> {
    let mut file = OpenOptions::new().write(true).create_new(true).open(path)?;
    file.write_all(contents.as_bytes())?;
    file.flush()
}

#[derive(Debug, Snafu)]
pub enum MaterializeError {
    #[snafu(display("Failed to create directory {}", path.display()))]
    CreateDirectoryError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[snafu(display("Failed to write file {}", path.display()))]
    WriteFileError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[snafu(display("Failed to inspect {}", path.display()))]
    InspectError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[snafu(display("{} exists but is not a directory", path.display()))]
    NotADirectoryError { path: PathBuf },
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn descriptor() -> TreeDescriptor {
        let service = TreeNode::directory()
            .with("default.json", TreeNode::empty_file())
            .unwrap()
            .with("Dockerfile", TreeNode::file("FROM node:16\n"))
            .unwrap()
            .with(
                "src",
                TreeNode::directory()
                    .with("app.js", TreeNode::file("console.log('up');"))
                    .unwrap()
                    .with("tests", TreeNode::directory())
                    .unwrap(),
            )
            .unwrap();

        let mut descriptor = TreeDescriptor::new();
        descriptor.try_insert("svc", service).unwrap();
        descriptor
    }

    fn read(path: impl AsRef<Path>) -> String {
        fs::read_to_string(path).expect("Failed to read materialized file")
    }

    #[test]
    fn creates_every_directory_and_file() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root = temp_dir.path();

        let report = Materializer::default()
            .materialize(root, &descriptor())
            .unwrap();

        assert!(root.join("svc/src/tests").is_dir());
        assert_eq!(read(root.join("svc/src/app.js")), "console.log('up');");
        assert_eq!(read(root.join("svc/Dockerfile")), "FROM node:16\n");
        assert_eq!(read(root.join("svc/default.json")), "");
        assert_eq!(report.created().count(), 6);
        assert_eq!(report.existing().count(), 0);
    }

    #[test]
    fn report_follows_depth_first_order() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root = temp_dir.path();

        let report = Materializer::default()
            .materialize(root, &descriptor())
            .unwrap();

        let paths = report
            .entries()
            .iter()
            .map(|entry| entry.path.strip_prefix(root).unwrap().to_path_buf())
            .collect::<Vec<_>>();
        assert_eq!(
            paths,
            vec![
                PathBuf::from("svc"),
                PathBuf::from("svc/default.json"),
                PathBuf::from("svc/Dockerfile"),
                PathBuf::from("svc/src"),
                PathBuf::from("svc/src/app.js"),
                PathBuf::from("svc/src/tests"),
            ]
        );
    }

    #[test]
    fn second_run_creates_nothing() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root = temp_dir.path();
        let materializer = Materializer::default();

        materializer.materialize(root, &descriptor()).unwrap();
        let second = materializer.materialize(root, &descriptor()).unwrap();

        assert!(second.is_noop());
        assert_eq!(second.existing().count(), 6);
        assert_eq!(second.divergent().count(), 0);
    }

    #[test]
    fn existing_files_are_never_overwritten() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root = temp_dir.path();
        fs::create_dir_all(root.join("svc")).unwrap();
        fs::write(root.join("svc/Dockerfile"), "FROM rust:latest\n").unwrap();

        let report = Materializer::default()
            .materialize(root, &descriptor())
            .unwrap();

        assert_eq!(read(root.join("svc/Dockerfile")), "FROM rust:latest\n");
        let divergent = report.divergent().collect::<Vec<_>>();
        assert_eq!(divergent.len(), 1);
        assert_eq!(divergent[0].path, root.join("svc/Dockerfile"));
        // the rest of the tree is still filled in
        assert!(root.join("svc/src/app.js").is_file());
    }

    #[test]
    fn directory_in_place_of_a_file_is_left_alone() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root = temp_dir.path();
        fs::create_dir_all(root.join("svc/Dockerfile")).unwrap();

        let report = Materializer::default()
            .materialize(root, &descriptor())
            .unwrap();

        assert!(root.join("svc/Dockerfile").is_dir());
        assert_eq!(report.divergent().count(), 1);
    }

    #[test]
    fn file_in_place_of_a_directory_is_an_error() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root = temp_dir.path();
        fs::write(root.join("svc"), "not a directory").unwrap();

        let result = Materializer::default().materialize(root, &descriptor());

        assert!(matches!(
            result,
            Err(MaterializeError::NotADirectoryError { path }) if path == root.join("svc")
        ));
        assert_eq!(read(root.join("svc")), "not a directory");
    }

    #[test]
    fn dry_run_writes_nothing() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root = temp_dir.path();

        let report = Materializer::new(MaterializeMode::DryRun)
            .materialize(root, &descriptor())
            .unwrap();

        assert_eq!(report.planned().count(), 6);
        assert_eq!(report.created().count(), 0);
        assert!(!root.join("svc").exists());
    }

    #[test]
    fn empty_descriptor_is_a_noop() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");

        let report = Materializer::default()
            .materialize(temp_dir.path(), &TreeDescriptor::new())
            .unwrap();

        assert!(report.entries().is_empty());
        assert_eq!(fs::read_dir(temp_dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn failure_midway_keeps_earlier_entries() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root = temp_dir.path();
        fs::create_dir(root.join("svc")).unwrap();
        fs::write(root.join("svc/src"), "in the way").unwrap();

        let result = Materializer::default().materialize(root, &descriptor());

        assert!(matches!(
            result,
            Err(MaterializeError::NotADirectoryError { path }) if path == root.join("svc/src")
        ));
        assert_eq!(read(root.join("svc/default.json")), "");
        assert_eq!(read(root.join("svc/Dockerfile")), "FROM node:16\n");
        assert_eq!(read(root.join("svc/src")), "in the way");
    }

    #[cfg(unix)]
    #[test]
    fn write_failure_stops_the_walk_with_its_path() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root = temp_dir.path();
        fs::create_dir(root.join("svc")).unwrap();
        // dangling: reported as absent, but create_new refuses to follow it
        std::os::unix::fs::symlink(root.join("svc/elsewhere"), root.join("svc/Dockerfile"))
            .unwrap();

        let result = Materializer::default().materialize(root, &descriptor());

        assert!(matches!(
            result,
            Err(MaterializeError::WriteFileError { path, .. })
                if path == root.join("svc/Dockerfile")
        ));
        assert!(root.join("svc/default.json").is_file());
        assert!(!root.join("svc/elsewhere").exists());
        assert!(!root.join("svc/src").exists());
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn unreadable_existing_file_counts_as_differing() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root = temp_dir.path();
        fs::create_dir(root.join("svc")).unwrap();
        // a zero-length regular file whose reads fail with EIO
        std::os::unix::fs::symlink("/proc/self/mem", root.join("svc/default.json")).unwrap();

        let report = Materializer::default()
            .materialize(root, &descriptor())
            .unwrap();

        let divergent = report.divergent().collect::<Vec<_>>();
        assert_eq!(divergent.len(), 1);
        assert_eq!(divergent[0].path, root.join("svc/default.json"));
        assert!(root.join("svc/Dockerfile").is_file());
        assert!(root.join("svc/src/app.js").is_file());
    }
}

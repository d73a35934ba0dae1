use std::{
    fmt,
    path::{Path, PathBuf},
};

use derive_more::Display;

/// What the materializer did (or would do) at a single path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum EntryOutcome {
    #[display("Created directory")]
    CreatedDirectory,
    #[display("Created file")]
    CreatedFile,
    #[display("Would create directory")]
    PlannedDirectory,
    #[display("Would create file")]
    PlannedFile,
    #[display("Existing directory")]
    ExistingDirectory,
    #[display("Existing file")]
    ExistingFile { matches_template: bool },
}

impl EntryOutcome {
    pub fn is_creation(&self) -> bool {
        matches!(
            self,
            EntryOutcome::CreatedDirectory | EntryOutcome::CreatedFile
        )
    }

    pub fn is_planned(&self) -> bool {
        matches!(
            self,
            EntryOutcome::PlannedDirectory | EntryOutcome::PlannedFile
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportEntry {
    pub path: PathBuf,
    pub outcome: EntryOutcome,
}

/// Every path visited by one materialization, in traversal order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MaterializationReport {
    entries: Vec<ReportEntry>,
}

impl MaterializationReport {
    pub fn push(&mut self, path: &Path, outcome: EntryOutcome) {
        self.entries.push(ReportEntry {
            path: path.to_path_buf(),
            outcome,
        });
    }

    pub fn entries(&self) -> &[ReportEntry] {
        &self.entries
    }

    pub fn created(&self) -> impl Iterator<Item = &ReportEntry> {
        self.entries.iter().filter(|e| e.outcome.is_creation())
    }

    pub fn planned(&self) -> impl Iterator<Item = &ReportEntry> {
        self.entries.iter().filter(|e| e.outcome.is_planned())
    }

    pub fn existing(&self) -> impl Iterator<Item = &ReportEntry> {
        self.entries.iter().filter(|e| {
            matches!(
                e.outcome,
                EntryOutcome::ExistingDirectory | EntryOutcome::ExistingFile { .. }
            )
        })
    }

    /// Existing files whose contents differ from the layout.
    pub fn divergent(&self) -> impl Iterator<Item = &ReportEntry> {
        self.entries.iter().filter(|e| {
            matches!(
                e.outcome,
                EntryOutcome::ExistingFile {
                    matches_template: false
                }
            )
        })
    }

    /// True when nothing was (or would be) created.
    pub fn is_noop(&self) -> bool {
        self.created().next().is_none() && self.planned().next().is_none()
    }
}

impl fmt::Display for MaterializationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let planned = self.planned().count();
        if planned > 0 {
            write!(f, "{} entries would be created", planned)?;
        } else {
            write!(f, "{} entries created", self.created().count())?;
        }
        write!(f, ", {} already present", self.existing().count())?;

        let divergent = self.divergent().count();
        if divergent > 0 {
            write!(f, " ({} differ from the layout)", divergent)?;
        }
        Ok(())
    }
}

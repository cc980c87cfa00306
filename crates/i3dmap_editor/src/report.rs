//! Per-pair report entries and their summary

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Where in a vehicle document a reference was found
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Site {
    pub element: String,
    pub attribute: String,
    pub line: u32,
}

impl fmt::Display for Site {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}> @{} (line {})", self.element, self.attribute, self.line)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind"))]
pub enum ReportEntry {
    Renamed {
        old_name: String,
        new_name: String,
        address: String,
    },
    ReferenceRewritten {
        site: Site,
        old_value: String,
        new_value: String,
    },
    /// Decodes, but no node lives at that address
    UnresolvedReference { site: Site, value: String },
    /// Looks positional but cannot be decoded
    InvalidAddress {
        site: Site,
        value: String,
        reason: String,
    },
}

impl ReportEntry {
    /// Whether the entry describes something left for manual fixing
    pub fn is_anomaly(&self) -> bool {
        matches!(
            self,
            Self::UnresolvedReference { .. } | Self::InvalidAddress { .. }
        )
    }

    pub fn site(&self) -> Option<&Site> {
        match self {
            Self::Renamed { .. } => None,
            Self::ReferenceRewritten { site, .. }
            | Self::UnresolvedReference { site, .. }
            | Self::InvalidAddress { site, .. } => Some(site),
        }
    }
}

impl fmt::Display for ReportEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Renamed {
                old_name,
                new_name,
                address,
            } => write!(f, "Renamed '{old_name}' -> '{new_name}' at {address}"),
            Self::ReferenceRewritten {
                site,
                old_value,
                new_value,
            } => write!(f, "Rewrote {site}: {old_value} -> {new_value}"),
            Self::UnresolvedReference { site, value } => write!(
                f,
                "Unresolved reference {site}: no node at {value}, left unchanged"
            ),
            Self::InvalidAddress {
                site,
                value,
                reason,
            } => write!(
                f,
                "Invalid address {site}: '{value}' ({reason}), left unchanged"
            ),
        }
    }
}

/// Counts over a sequence of report entries
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ReportSummary {
    pub renamed: usize,
    pub rewritten: usize,
    pub unresolved: usize,
    pub invalid: usize,
}

impl ReportSummary {
    pub fn from_entries<'a, I: IntoIterator<Item = &'a ReportEntry>>(entries: I) -> Self {
        let mut summary = Self::default();
        for entry in entries {
            match entry {
                ReportEntry::Renamed { .. } => summary.renamed += 1,
                ReportEntry::ReferenceRewritten { .. } => summary.rewritten += 1,
                ReportEntry::UnresolvedReference { .. } => summary.unresolved += 1,
                ReportEntry::InvalidAddress { .. } => summary.invalid += 1,
            }
        }
        summary
    }

    pub fn anomalies(&self) -> usize {
        self.unresolved + self.invalid
    }

    pub fn merge(&mut self, other: &Self) {
        self.renamed += other.renamed;
        self.rewritten += other.rewritten;
        self.unresolved += other.unresolved;
        self.invalid += other.invalid;
    }

    /// Log lines describing the counts
    pub fn lines(&self) -> Vec<String> {
        let mut lines = Vec::new();
        if self.renamed > 0 {
            lines.push(format!(
                "{} duplicate node name(s) were renamed",
                self.renamed
            ));
        }
        lines.push(format!(
            "Replaced {} numeric node reference(s) with i3dMapping IDs",
            self.rewritten
        ));
        if self.unresolved > 0 {
            lines.push(format!(
                "{} reference(s) point at no node and were left unchanged",
                self.unresolved
            ));
        }
        if self.invalid > 0 {
            lines.push(format!(
                "{} reference(s) could not be decoded and were left unchanged",
                self.invalid
            ));
        }
        lines
    }
}

#![forbid(unsafe_code)]

//! Structured invariant diagnostics for layout snapshots.
//!
//! [`LayoutSnapshot::invariant_report`] inspects a snapshot without changing
//! it and lists every violation with a stable code. Every error-level issue
//! is repaired by compaction.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::compact::compact;
use crate::grid::is_covered;
use crate::model::{
    FULL_WIDTH_SPAN, GRID_COLUMNS, LayoutDefaults, LayoutSnapshot, MIN_SLOTS, ModuleKey,
};

/// Severity for one invariant finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutInvariantSeverity {
    Error,
    Warning,
}

/// Stable code for invariant findings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutInvariantCode {
    TooShort,
    OddLength,
    DuplicateModule,
    StaleSpan,
    UnsupportedSpanValue,
    SpanOnRightColumn,
    CoveredSlotOccupied,
    TrailingEmptyRow,
}

/// One actionable invariant finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutInvariantIssue {
    pub code: LayoutInvariantCode,
    pub severity: LayoutInvariantSeverity,
    pub index: Option<usize>,
    pub module: Option<ModuleKey>,
    pub message: String,
}

/// Structured invariant report over a layout snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutInvariantReport {
    pub snapshot_hash: u64,
    pub issues: Vec<LayoutInvariantIssue>,
}

impl LayoutInvariantReport {
    /// Return true if any error-level finding exists.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.issues
            .iter()
            .any(|issue| issue.severity == LayoutInvariantSeverity::Error)
    }

    /// Codes of all findings, sorted and deduplicated.
    #[must_use]
    pub fn codes(&self) -> Vec<LayoutInvariantCode> {
        let codes: BTreeSet<_> = self.issues.iter().map(|issue| issue.code).collect();
        codes.into_iter().collect()
    }
}

/// Strict validation failure carrying the full report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutValidationError {
    pub report: LayoutInvariantReport,
}

impl fmt::Display for LayoutValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let errors: Vec<_> = self
            .report
            .issues
            .iter()
            .filter(|issue| issue.severity == LayoutInvariantSeverity::Error)
            .collect();
        match errors.first() {
            Some(first) => write!(
                f,
                "layout has {} invariant violation(s), first: {} (hash={:#x})",
                errors.len(),
                first.message,
                self.report.snapshot_hash
            ),
            None => write!(f, "layout has no invariant violations"),
        }
    }
}

impl std::error::Error for LayoutValidationError {}

impl LayoutSnapshot {
    /// Inspect invariants and emit a structured diagnostics report.
    #[must_use]
    pub fn invariant_report(&self) -> LayoutInvariantReport {
        build_invariant_report(self)
    }

    /// Fail with the report if any error-level invariant is violated.
    pub fn validate(&self) -> Result<(), LayoutValidationError> {
        let report = self.invariant_report();
        if report.has_errors() {
            return Err(LayoutValidationError { report });
        }
        Ok(())
    }

    /// True when compaction would leave this snapshot unchanged.
    #[must_use]
    pub fn is_canonical(&self) -> bool {
        // The defaults only matter for an empty layout, which is never canonical.
        compact(&self.layout, &self.spans, &LayoutDefaults::default()) == *self
    }

    /// Deterministic FNV-1a hash over layout and spans for diagnostics.
    #[must_use]
    pub fn state_hash(&self) -> u64 {
        snapshot_state_hash(self)
    }
}

fn snapshot_state_hash(snapshot: &LayoutSnapshot) -> u64 {
    const OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0000_0001_0000_01b3;

    fn mix_bytes(hash: &mut u64, bytes: &[u8]) {
        for byte in bytes {
            *hash ^= u64::from(*byte);
            *hash = hash.wrapping_mul(PRIME);
        }
    }

    fn mix_str(hash: &mut u64, value: &str) {
        mix_bytes(hash, &(value.len() as u64).to_le_bytes());
        mix_bytes(hash, value.as_bytes());
    }

    let mut hash = OFFSET_BASIS;
    mix_bytes(&mut hash, &(snapshot.layout.len() as u64).to_le_bytes());
    for slot in &snapshot.layout {
        match slot {
            Some(key) => {
                mix_bytes(&mut hash, &[1]);
                mix_str(&mut hash, key.as_str());
            }
            None => mix_bytes(&mut hash, &[0]),
        }
    }
    mix_bytes(&mut hash, &(snapshot.spans.len() as u64).to_le_bytes());
    for (key, span) in &snapshot.spans {
        mix_str(&mut hash, key.as_str());
        mix_bytes(&mut hash, &[*span]);
    }
    hash
}

fn push_issue(
    issues: &mut Vec<LayoutInvariantIssue>,
    code: LayoutInvariantCode,
    severity: LayoutInvariantSeverity,
    index: Option<usize>,
    module: Option<&ModuleKey>,
    message: String,
) {
    issues.push(LayoutInvariantIssue {
        code,
        severity,
        index,
        module: module.cloned(),
        message,
    });
}

fn build_invariant_report(snapshot: &LayoutSnapshot) -> LayoutInvariantReport {
    use LayoutInvariantCode as Code;
    use LayoutInvariantSeverity::{Error, Warning};

    let layout = &snapshot.layout;
    let spans = &snapshot.spans;
    let mut issues = Vec::new();

    if layout.len() < MIN_SLOTS {
        push_issue(
            &mut issues,
            Code::TooShort,
            Error,
            None,
            None,
            format!("layout has {} slots (minimum {MIN_SLOTS})", layout.len()),
        );
    }
    if layout.len() % GRID_COLUMNS != 0 {
        push_issue(
            &mut issues,
            Code::OddLength,
            Error,
            None,
            None,
            format!("layout length {} is not a whole number of rows", layout.len()),
        );
    }

    let mut seen = BTreeSet::new();
    for (index, slot) in layout.iter().enumerate() {
        let Some(key) = slot else { continue };
        if !seen.insert(key) {
            push_issue(
                &mut issues,
                Code::DuplicateModule,
                Error,
                Some(index),
                Some(key),
                format!("module {key} appears again at slot {index}"),
            );
        }
        if is_covered(layout, spans, index) {
            push_issue(
                &mut issues,
                Code::CoveredSlotOccupied,
                Error,
                Some(index),
                Some(key),
                format!("module {key} sits in covered slot {index}"),
            );
        }
    }

    for (key, span) in spans {
        if *span != FULL_WIDTH_SPAN {
            push_issue(
                &mut issues,
                Code::UnsupportedSpanValue,
                Error,
                None,
                Some(key),
                format!("module {key} has unsupported span {span}"),
            );
            continue;
        }
        match snapshot.position_of(key.as_str()) {
            None => push_issue(
                &mut issues,
                Code::StaleSpan,
                Error,
                None,
                Some(key),
                format!("span entry for absent module {key}"),
            ),
            Some(index) if index % GRID_COLUMNS != 0 => push_issue(
                &mut issues,
                Code::SpanOnRightColumn,
                Error,
                Some(index),
                Some(key),
                format!("full-width module {key} sits in right cell {index}"),
            ),
            Some(_) => {}
        }
    }

    if layout.len() > MIN_SLOTS
        && layout.len() % GRID_COLUMNS == 0
        && layout[layout.len() - GRID_COLUMNS..]
            .iter()
            .all(Option::is_none)
    {
        push_issue(
            &mut issues,
            Code::TrailingEmptyRow,
            Warning,
            Some(layout.len() - GRID_COLUMNS),
            None,
            "trailing empty row".to_owned(),
        );
    }

    LayoutInvariantReport {
        snapshot_hash: snapshot_state_hash(snapshot),
        issues,
    }
}

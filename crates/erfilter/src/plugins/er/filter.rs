//! Entity filtering for ER diagram text
//!
//! The filter removes excluded entities, the relationship lines touching
//! them and, when pruning orphans, every entity block left without a
//! relationship. Surviving lines are emitted untouched and in order.
//!
//! Processing runs in up to three passes over the lines:
//!
//! 1. drop excluded blocks and relationships naming an excluded entity
//! 2. collect every entity still named by a relationship
//! 3. drop blocks of entities not collected in pass 2
//!
//! Passes 1 and 3 share one scan, parameterized by a retention policy.

use std::collections::HashSet;
use tracing::{debug, info, span, trace, Level};

use super::line::{BlockScanner, LineKind};
use crate::core::{ExclusionSet, FilterMode};

/// Decides which relationships and entity blocks a pass keeps
trait RetentionPolicy {
    fn keeps_relationship(&self, first: Option<&str>, second: Option<&str>) -> bool;

    fn skips_entity(&self, entity: &str) -> bool;
}

/// Pass 1: drop anything naming an excluded entity
struct Exclusions<'s>(&'s ExclusionSet);

impl RetentionPolicy for Exclusions<'_> {
    fn keeps_relationship(&self, first: Option<&str>, second: Option<&str>) -> bool {
        !self.0.contains(first) && !self.0.contains(second)
    }

    fn skips_entity(&self, entity: &str) -> bool {
        self.0.contains(Some(entity))
    }
}

/// Pass 3: relationships already survived, drop unreferenced blocks
struct Referenced<'a>(HashSet<&'a str>);

impl RetentionPolicy for Referenced<'_> {
    fn keeps_relationship(&self, _first: Option<&str>, _second: Option<&str>) -> bool {
        true
    }

    fn skips_entity(&self, entity: &str) -> bool {
        !self.0.contains(entity)
    }
}

/// What one scan kept and dropped
struct PassOutput<'a> {
    kept: Vec<&'a str>,
    dropped_blocks: Vec<&'a str>,
    dropped_relationships: usize,
}

/// Scan lines with fresh block state, keeping what `policy` allows
fn retain_lines<'a, P: RetentionPolicy>(lines: &[&'a str], policy: &P) -> PassOutput<'a> {
    let mut scanner = BlockScanner::new();
    let mut out = PassOutput {
        kept: Vec::with_capacity(lines.len()),
        dropped_blocks: Vec::new(),
        dropped_relationships: 0,
    };

    for (index, &line) in lines.iter().enumerate() {
        let keep = match LineKind::classify(line) {
            LineKind::Header => true,
            LineKind::Relationship { first, second } => {
                let keep = policy.keeps_relationship(first, second);
                if !keep {
                    out.dropped_relationships += 1;
                }
                keep
            }
            LineKind::BlockStart { entity } => {
                let keep = scanner.open(entity, policy.skips_entity(entity));
                if !keep {
                    out.dropped_blocks.push(entity);
                }
                keep
            }
            LineKind::BlockEnd => scanner.close(),
            LineKind::Other => scanner.keeps_other(),
        };

        trace!(line = index, keep, entity = scanner.current(), "Scanned line");
        if keep {
            out.kept.push(line);
        }
    }

    out
}

/// Every entity named by a relationship line
fn referenced_entities<'a>(lines: &[&'a str]) -> HashSet<&'a str> {
    lines
        .iter()
        .filter_map(|&line| match LineKind::classify(line) {
            LineKind::Relationship { first, second } => Some([first, second]),
            _ => None,
        })
        .flatten()
        .flatten()
        .collect()
}

/// Counts gathered while filtering, for logging and reporting
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterStats {
    pub input_lines: usize,
    pub output_lines: usize,
    pub relationships_removed: usize,
    /// Entities whose blocks were removed because they were excluded
    pub excluded_entities: Vec<String>,
    /// Entities whose blocks were removed for lack of relationships
    pub orphaned_entities: Vec<String>,
}

impl FilterStats {
    pub fn lines_removed(&self) -> usize {
        self.input_lines - self.output_lines
    }
}

/// Filtered diagram text with the stats of the run that produced it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filtered {
    pub text: String,
    pub stats: FilterStats,
}

/// Removes entities from ER diagram text
///
/// Holds only the mode; every call starts from fresh scan state, so one
/// filter can be shared across threads.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DiagramFilter {
    mode: FilterMode,
}

impl DiagramFilter {
    pub fn new(mode: FilterMode) -> Self {
        Self { mode }
    }

    /// Filter that removes excluded entities and their relationships only
    pub fn exclusion_only() -> Self {
        Self::new(FilterMode::ExclusionOnly)
    }

    /// Filter that also removes entities left without relationships
    pub fn prune_orphans() -> Self {
        Self::new(FilterMode::PruneOrphans)
    }

    pub fn mode(&self) -> FilterMode {
        self.mode
    }

    /// Filter `text`, returning only the resulting diagram text
    pub fn filter(&self, text: &str, excluded: &ExclusionSet) -> String {
        self.filter_with_stats(text, excluded).text
    }

    /// Filter `text` and report what was removed
    ///
    /// An empty exclusion set returns `text` unchanged without scanning.
    pub fn filter_with_stats(&self, text: &str, excluded: &ExclusionSet) -> Filtered {
        let filter_span = span!(
            Level::DEBUG,
            "filter_diagram",
            mode = %self.mode,
            excluded = excluded.len(),
            input_len = text.len()
        );
        let _enter = filter_span.enter();

        if excluded.is_empty() {
            debug!("Empty exclusion set, diagram unchanged");
            let line_count = text.split('\n').count();
            return Filtered {
                text: text.to_string(),
                stats: FilterStats {
                    input_lines: line_count,
                    output_lines: line_count,
                    ..FilterStats::default()
                },
            };
        }

        let lines: Vec<&str> = text.trim().split('\n').collect();

        let exclusion_span = span!(Level::DEBUG, "exclusion_pass");
        let exclusion_enter = exclusion_span.enter();
        let first = retain_lines(&lines, &Exclusions(excluded));
        debug!(
            kept = first.kept.len(),
            relationships_removed = first.dropped_relationships,
            blocks_removed = first.dropped_blocks.len(),
            "Exclusion pass completed"
        );
        drop(exclusion_enter);

        let mut stats = FilterStats {
            input_lines: lines.len(),
            relationships_removed: first.dropped_relationships,
            excluded_entities: first.dropped_blocks.iter().map(|s| s.to_string()).collect(),
            ..FilterStats::default()
        };

        let kept = if self.mode.prunes_orphans() {
            let orphan_span = span!(Level::DEBUG, "orphan_pass");
            let _orphan_enter = orphan_span.enter();

            let referenced = referenced_entities(&first.kept);
            debug!(referenced = referenced.len(), "Collected related entities");

            let pruned = retain_lines(&first.kept, &Referenced(referenced));
            debug!(
                kept = pruned.kept.len(),
                orphans = pruned.dropped_blocks.len(),
                "Orphan pass completed"
            );
            stats.orphaned_entities = pruned.dropped_blocks.iter().map(|s| s.to_string()).collect();
            pruned.kept
        } else {
            first.kept
        };

        stats.output_lines = kept.len();
        info!(
            lines_removed = stats.lines_removed(),
            relationships_removed = stats.relationships_removed,
            "Diagram filtered"
        );

        Filtered {
            text: kept.join("\n"),
            stats,
        }
    }
}

/// Remove excluded entities and the relationships naming them
///
/// ```rust
/// use erfilter::{filter_exclusions, ExclusionSet};
///
/// let text = "erDiagram\nA {\n  int id\n}\nB {\n  int id\n}\nA ||--o{ B : has";
/// let out = filter_exclusions(text, &ExclusionSet::from_csv("B"));
/// assert_eq!(out, "erDiagram\nA {\n  int id\n}");
/// ```
pub fn filter_exclusions(text: &str, excluded: &ExclusionSet) -> String {
    DiagramFilter::exclusion_only().filter(text, excluded)
}

/// Remove excluded entities, then every entity left without relationships
///
/// ```rust
/// use erfilter::{filter_with_orphans, ExclusionSet};
///
/// let text = "erDiagram\nA {\n  int id\n}\nB {\n  int id\n}\nA ||--o{ B : has";
/// let out = filter_with_orphans(text, &ExclusionSet::from_csv("B"));
/// assert_eq!(out, "erDiagram");
/// ```
pub fn filter_with_orphans(text: &str, excluded: &ExclusionSet) -> String {
    DiagramFilter::prune_orphans().filter(text, excluded)
}

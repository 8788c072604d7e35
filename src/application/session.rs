//! Step-through session: a tree, its visual state and a script cursor.

use tracing::{debug, info, instrument};

use crate::application::script::{Operation, Script};
use crate::application::view::TreeView;
use crate::application::ApplicationResult;
use crate::domain::{Highlights, RangeTree, Sum};

/// Outcome of one executed step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepReport {
    /// Position of the step in the script
    pub index: usize,
    pub label: String,
    /// Sum returned by a query step
    pub result: Option<Sum>,
}

/// Owns the tree and the tags currently shown for it.
///
/// One operation runs at a time; tags from a traversal overwrite the tags of
/// the nodes it visited and leave every other node as it was.
#[derive(Debug, Clone)]
pub struct Session {
    tree: RangeTree,
    highlights: Highlights,
    script: Script,
    cursor: usize,
    last_result: Option<Sum>,
    strict_bounds: bool,
}

impl Session {
    pub fn new(values: &[i64], script: Script) -> ApplicationResult<Self> {
        let tree = RangeTree::build(values)?;
        Ok(Self {
            tree,
            highlights: Highlights::new(),
            script,
            cursor: 0,
            last_result: None,
            strict_bounds: false,
        })
    }

    /// Reject point updates outside the array instead of ignoring them.
    pub fn with_strict_bounds(mut self, strict: bool) -> Self {
        self.strict_bounds = strict;
        self
    }

    pub fn tree(&self) -> &RangeTree {
        &self.tree
    }

    pub fn highlights(&self) -> &Highlights {
        &self.highlights
    }

    pub fn script(&self) -> &Script {
        &self.script
    }

    /// Index of the next step to run.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn last_result(&self) -> Option<Sum> {
        self.last_result
    }

    pub fn is_finished(&self) -> bool {
        self.cursor >= self.script.len()
    }

    pub fn reset_visuals(&mut self) {
        self.highlights.clear();
    }

    /// Runs one operation against the tree, keeping earlier tags of unvisited nodes.
    ///
    /// Returns the sum for queries.
    #[instrument(level = "debug", skip(self))]
    pub fn execute(&mut self, operation: &Operation) -> ApplicationResult<Option<Sum>> {
        if let Operation::Reset = operation {
            self.reset_visuals();
            return Ok(None);
        }
        let (result, highlights) = self.apply(operation)?;
        self.highlights.overlay(highlights);
        Ok(result)
    }

    /// Runs the operation on the tree and returns its tags without showing them.
    ///
    /// A failed operation leaves both the tree and the current tags as they were.
    fn apply(&mut self, operation: &Operation) -> ApplicationResult<(Option<Sum>, Highlights)> {
        let outcome = match *operation {
            Operation::Reset => (None, Highlights::new()),
            Operation::Query { l, r } => {
                let (sum, highlights) = self.tree.query(l, r).into_parts();
                (Some(sum), highlights)
            }
            Operation::Update { index, value } => {
                let traced = if self.strict_bounds {
                    self.tree.try_update(index, value)?
                } else {
                    self.tree.update(index, value)
                };
                if !traced.output {
                    debug!(index, len = self.tree.len(), "update outside array ignored");
                }
                (None, traced.highlights)
            }
            Operation::UpdateRange { l, r, delta } => {
                (None, self.tree.update_range(l, r, delta)?.highlights)
            }
        };
        Ok(outcome)
    }

    /// Runs the step under the cursor on a freshly reset view.
    ///
    /// Returns `None` once the script is exhausted.
    #[instrument(level = "debug", skip(self), fields(cursor = self.cursor))]
    pub fn step(&mut self) -> ApplicationResult<Option<StepReport>> {
        let Some(step) = self.script.get(self.cursor).cloned() else {
            return Ok(None);
        };
        let (result, highlights) = self.apply(&step.operation)?;
        self.reset_visuals();
        self.highlights.overlay(highlights);
        self.last_result = result;

        let report = StepReport {
            index: self.cursor,
            label: step.label(),
            result,
        };
        info!(index = report.index, label = %report.label, ?result, "step executed");
        self.cursor += 1;
        Ok(Some(report))
    }

    /// Runs every remaining step.
    pub fn run_all(&mut self) -> ApplicationResult<Vec<StepReport>> {
        let mut reports = Vec::new();
        while let Some(report) = self.step()? {
            reports.push(report);
        }
        Ok(reports)
    }

    pub fn snapshot(&self) -> TreeView {
        TreeView::capture(&self.tree, &self.highlights)
    }
}

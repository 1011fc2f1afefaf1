//! Replacer orchestration over a FIFO worklist.
//!
//! A pass seeds the worklist with one item holding every control in the
//! document, then drains it in order. For each item the registered
//! replacers run replacer-major: the first replacer visits all of the
//! item's controls, then the next replacer, in registration order.
//! Follow-up work (per-item scopes from repeating sections, record scopes
//! from rich text controls) goes to the back of the queue, so expansions
//! resolve breadth-first instead of recursively.

mod config;

pub use config::{EngineConfig, OutputConfig, ResolutionConfig};

use std::collections::VecDeque;

use crate::document::{DocumentTree, NodeId};
use crate::error::{EngineError, Result};
use crate::replacers::{
    ConditionalDropdownReplacer, ConditionalRemoveReplacer, Outcome, PictureReplacer, Replacer,
    RepeatingReplacer, SingularDropdownReplacer, VariableReplacer, WorkItem,
};
use crate::variables::VariableSource;

struct Registration {
    replacer: Box<dyn Replacer>,
    enabled: bool,
    first_order_only: bool,
}

/// Counters describing what a templating pass did.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PassReport {
    /// Worklist items drained, the seed item included.
    pub work_items: usize,
    /// Controls visited by a matching replacer.
    pub processed: usize,
    /// Controls whose text was rewritten.
    pub text_set: usize,
    /// Control subtrees removed outright (failed guards, missing or empty
    /// repeating data). A repeating expansion removes its original too, but
    /// that shows up under `clones` instead.
    pub removed: usize,
    /// Subtree copies created by repeating sections.
    pub clones: usize,
    /// Picture controls that received image bytes.
    pub embedded: usize,
    /// Control wrappers stripped by the post-pass.
    pub unwrapped: usize,
}

/// Runs replacers over a document tree.
pub struct Engine {
    registrations: Vec<Registration>,
    config: EngineConfig,
    queue: VecDeque<WorkItem>,
}

impl Engine {
    /// An engine with the standard replacer set registered.
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    /// The standard replacer set under explicit settings.
    ///
    /// Repeating sections run first so their copies exist before any other
    /// replacer looks at the document; the `repeatingitem` and
    /// `repeatingconditional` prefixes are aliases resolving per-item fields
    /// inside those copies.
    pub fn with_config(config: EngineConfig) -> Self {
        let mut engine = Self::empty_with_config(config);
        engine.register(Box::new(RepeatingReplacer));
        engine.register(Box::new(ConditionalRemoveReplacer::new()));
        engine.register(Box::new(ConditionalDropdownReplacer));
        engine.register(Box::new(SingularDropdownReplacer));
        engine.register(Box::new(VariableReplacer::new()));
        engine.register(Box::new(VariableReplacer::with_prefix("repeatingitem")));
        engine.register(Box::new(ConditionalRemoveReplacer::with_prefix(
            "repeatingconditional",
        )));
        engine.register(Box::new(PictureReplacer));
        engine
    }

    /// An engine with no replacers at all.
    pub fn empty() -> Self {
        Self::empty_with_config(EngineConfig::default())
    }

    pub fn empty_with_config(config: EngineConfig) -> Self {
        Self {
            registrations: Vec::new(),
            config,
            queue: VecDeque::new(),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn register(&mut self, replacer: Box<dyn Replacer>) {
        self.register_scoped(replacer, false);
    }

    /// Registers a replacer that only ever touches first-order controls,
    /// leaving controls nested inside other controls to deferred work.
    pub fn register_scoped(&mut self, replacer: Box<dyn Replacer>, first_order_only: bool) {
        self.registrations.push(Registration {
            replacer,
            enabled: true,
            first_order_only,
        });
    }

    /// Enables or disables every replacer registered under `prefix`.
    /// Returns false when nothing matches.
    pub fn set_enabled(&mut self, prefix: &str, enabled: bool) -> bool {
        let mut found = false;
        for registration in &mut self.registrations {
            if registration.replacer.prefix().eq_ignore_ascii_case(prefix) {
                registration.enabled = enabled;
                found = true;
            }
        }
        found
    }

    /// Builds the root variable source for this engine's strictness setting.
    pub fn source_from_json(&self, json: &str) -> Result<VariableSource> {
        let source = VariableSource::from_json(json)?;
        Ok(if self.config.resolution.strict_variables {
            source
        } else {
            source.lenient()
        })
    }

    /// Runs one full templating pass.
    ///
    /// Seeds the worklist with every control in the tree, drains it to
    /// exhaustion, then strips the control wrappers unless the output
    /// settings keep them. The first replacer error aborts the pass; work
    /// already applied to the tree stays applied.
    pub fn run(&mut self, tree: &mut DocumentTree, source: VariableSource) -> Result<PassReport> {
        let mut report = PassReport::default();
        self.queue.clear();
        self.queue.push_back(WorkItem::new(tree.controls(), source));

        let drained = self.drain(tree, &mut report);
        // never leave stale work behind, aborted or not
        self.queue.clear();
        drained?;

        if !self.config.output.keep_controls {
            report.unwrapped = tree.unwrap_all_controls();
        }
        tracing::debug!(
            "pass complete: {} work items, {} controls processed",
            report.work_items,
            report.processed
        );
        Ok(report)
    }

    fn drain(&mut self, tree: &mut DocumentTree, report: &mut PassReport) -> Result<()> {
        let limit = self.config.resolution.max_depth;
        while let Some(item) = self.queue.pop_front() {
            if limit > 0 && item.depth > limit {
                return Err(EngineError::DepthExceeded { limit });
            }
            report.work_items += 1;

            for index in 0..self.registrations.len() {
                if !self.registrations[index].enabled {
                    continue;
                }
                for &control in &item.controls {
                    // earlier replacers may have detached this control
                    if !tree.is_attached(control) {
                        continue;
                    }
                    if self.registrations[index].first_order_only
                        && !tree.is_first_order(control)
                    {
                        continue;
                    }
                    let Some(tag) = self.registrations[index].replacer.matches(tree, control)
                    else {
                        continue;
                    };
                    let outcome = self.registrations[index]
                        .replacer
                        .process(tree, control, &tag, &item.source)?;
                    report.processed += 1;
                    self.apply(tree, control, outcome, item.depth, report);
                }
            }
        }
        Ok(())
    }

    fn apply(
        &mut self,
        tree: &mut DocumentTree,
        control: NodeId,
        outcome: Outcome,
        depth: u32,
        report: &mut PassReport,
    ) {
        if let Some(text) = outcome.rendered {
            tree.set_control_text(control, &text);
            report.text_set += 1;
        }
        if outcome.removed {
            report.removed += 1;
        }
        if outcome.embedded {
            report.embedded += 1;
        }
        report.clones += outcome.clones;
        for mut work in outcome.work {
            work.depth = depth + 1;
            self.queue.push_back(work);
        }
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests;

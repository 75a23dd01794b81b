//! Undo/Redo command stack.
//!
//! History is kept as **full timeline snapshots**: before any change the
//! whole keyframe list is captured, and undo swaps it back in. Redo works the
//! same way in the other direction.
//!
//! Drag gestures are batched: `begin_batch` captures one snapshot, every
//! mutation until the matching `end_batch` is applied live without touching
//! the stacks, and closing the outermost batch pushes that single snapshot if
//! anything changed.

use std::collections::VecDeque;

use cb_core::Timeline;
use cb_core::model::Keyframe;

use crate::mutation::Mutation;

/// A timeline state to return to, plus what produced it.
#[derive(Debug, Clone)]
struct Snapshot {
    keyframes: Vec<Keyframe>,
    description: String,
}

/// Manages undo/redo stacks with batch grouping for drag gestures.
#[derive(Debug)]
pub struct CommandStack {
    undo_stack: VecDeque<Snapshot>,
    redo_stack: VecDeque<Snapshot>,
    /// Maximum depth of each stack.
    max_depth: usize,
    /// Batch nesting depth (0 = not batching).
    batch_depth: usize,
    /// Keyframes captured when the outermost batch opened.
    batch_snapshot: Option<Vec<Keyframe>>,
    /// Whether any mutation changed the timeline during the current batch.
    batch_dirty: bool,
    batch_description: &'static str,
}

impl CommandStack {
    pub fn new(max_depth: usize) -> Self {
        Self {
            undo_stack: VecDeque::with_capacity(max_depth),
            redo_stack: VecDeque::new(),
            max_depth: max_depth.max(1),
            batch_depth: 0,
            batch_snapshot: None,
            batch_dirty: false,
            batch_description: "Move",
        }
    }

    /// Start a batch group. Nested calls only bump the depth.
    pub fn begin_batch(&mut self, timeline: &Timeline) {
        if self.batch_depth == 0 {
            self.batch_snapshot = Some(timeline.keyframes().to_vec());
            self.batch_dirty = false;
            self.batch_description = "Move";
            log::trace!("batch opened");
        }
        self.batch_depth += 1;
    }

    /// End a batch group. Returns `true` when closing it pushed an undo entry.
    pub fn end_batch(&mut self, timeline: &Timeline) -> bool {
        if self.batch_depth == 0 {
            return false;
        }
        self.batch_depth -= 1;
        if self.batch_depth > 0 {
            return false;
        }

        let before = self.batch_snapshot.take();
        let dirty = std::mem::take(&mut self.batch_dirty);
        match before {
            Some(keyframes) if dirty && keyframes.as_slice() != timeline.keyframes() => {
                log::debug!("batch closed: one undo entry ({})", self.batch_description);
                self.push_undo(Snapshot {
                    keyframes,
                    description: self.batch_description.to_string(),
                });
                true
            }
            _ => false,
        }
    }

    /// Close every open batch level at once.
    pub fn flush_batch(&mut self, timeline: &Timeline) -> bool {
        if self.batch_depth == 0 {
            return false;
        }
        self.batch_depth = 1;
        self.end_batch(timeline)
    }

    pub fn in_batch(&self) -> bool {
        self.batch_depth > 0
    }

    /// Apply a mutation and record it. Returns whether the timeline changed.
    pub fn execute(&mut self, timeline: &mut Timeline, mutation: Mutation) -> bool {
        let description = mutation.description();
        self.record(timeline, description, |t| mutation.apply(t))
    }

    /// Run an arbitrary timeline edit under history. `edit` reports whether
    /// it changed anything; unchanged edits leave both stacks alone.
    pub fn record(
        &mut self,
        timeline: &mut Timeline,
        description: &'static str,
        edit: impl FnOnce(&mut Timeline) -> bool,
    ) -> bool {
        if self.batch_depth > 0 {
            let changed = edit(timeline);
            if changed && !self.batch_dirty {
                self.batch_description = description;
            }
            self.batch_dirty |= changed;
            return changed;
        }

        let before = timeline.keyframes().to_vec();
        if !edit(timeline) {
            return false;
        }
        log::debug!("{description}");
        self.push_undo(Snapshot {
            keyframes: before,
            description: description.to_string(),
        });
        true
    }

    /// Undo the last entry. An open batch is closed first so the gesture in
    /// progress becomes the entry that gets undone.
    pub fn undo(&mut self, timeline: &mut Timeline) -> Option<String> {
        self.flush_batch(timeline);
        let snapshot = self.undo_stack.pop_back()?;
        let description = snapshot.description.clone();
        let current = Snapshot {
            keyframes: timeline.keyframes().to_vec(),
            description: snapshot.description,
        };
        timeline.restore(snapshot.keyframes);
        push_capped(&mut self.redo_stack, current, self.max_depth);
        log::debug!("undo: {description}");
        Some(description)
    }

    /// Redo the last undone entry.
    pub fn redo(&mut self, timeline: &mut Timeline) -> Option<String> {
        self.flush_batch(timeline);
        let snapshot = self.redo_stack.pop_back()?;
        let description = snapshot.description.clone();
        let current = Snapshot {
            keyframes: timeline.keyframes().to_vec(),
            description: snapshot.description,
        };
        timeline.restore(snapshot.keyframes);
        push_capped(&mut self.undo_stack, current, self.max_depth);
        log::debug!("redo: {description}");
        Some(description)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_len(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_len(&self) -> usize {
        self.redo_stack.len()
    }

    /// Forget all history, including any open batch.
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
        self.batch_depth = 0;
        self.batch_snapshot = None;
        self.batch_dirty = false;
    }

    fn push_undo(&mut self, snapshot: Snapshot) {
        push_capped(&mut self.undo_stack, snapshot, self.max_depth);
        // New action invalidates the redo chain.
        self.redo_stack.clear();
    }
}

fn push_capped(stack: &mut VecDeque<Snapshot>, snapshot: Snapshot, max_depth: usize) {
    stack.push_back(snapshot);
    while stack.len() > max_depth {
        stack.pop_front();
    }
}

// Copyright 2026 the Zoomtype Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Arena storage and the structural operations of the box tree.

use alloc::string::String;
use alloc::vec::Vec;

use zoomtype_limits::Limits;
use zoomtype_palette::{Palette, StyleClass, TemplateId};

use crate::damage::Damage;
use crate::geometry::BoxGeometry;
use crate::types::{BoxId, ChildSlot, HolderPath, SetDimensions, WeightError};

pub(crate) struct Node {
    pub(crate) template: TemplateId,
    pub(crate) message: Vec<char>,
    pub(crate) ordinal: u32,
    pub(crate) style: Option<StyleClass>,
    pub(crate) weight: f64,
    pub(crate) total_weight: f64,
    pub(crate) geometry: BoxGeometry,
    pub(crate) children: Option<Vec<ChildSlot>>,
    pub(crate) spawned: bool,
    pub(crate) pending_weights: bool,
    pub(crate) trimmed: Option<(BoxId, u32)>,
    pub(crate) rendered: bool,
    pub(crate) geometry_dirty: bool,
}

struct Slot {
    generation: u32,
    node: Option<Node>,
}

/// The live box tree of one session.
///
/// Boxes are stored in a slab addressed by generational [`BoxId`] handles.
/// The tree itself has no notion of "the root"; the session owns the
/// current root id and passes it into queries, which keeps trimmed-off
/// parents alive in the arena without any forward reference to them.
///
/// See the crate docs for the expansion and damage protocols.
#[derive(Default)]
pub struct Tree {
    slots: Vec<Slot>,
    free: Vec<u32>,
    expansion_queue: Vec<BoxId>,
    pub(crate) erased: Vec<BoxId>,
}

impl core::fmt::Debug for Tree {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tree")
            .field("live", &(self.slots.len() - self.free.len()))
            .field("capacity", &self.slots.len())
            .field("pending_expansions", &self.expansion_queue.len())
            .finish()
    }
}

impl Tree {
    /// Creates an empty tree.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates the session root box for the palette's root template.
    ///
    /// The root starts dimension-undefined and unexpanded; place it with
    /// [`Tree::set_dimensions`] and expand it like any other box.
    pub fn spawn_root(&mut self, palette: &Palette) -> BoxId {
        self.alloc(Node {
            template: palette.root(),
            message: Vec::new(),
            ordinal: 0,
            style: None,
            weight: 1.0,
            total_weight: 0.0,
            geometry: BoxGeometry::default(),
            children: None,
            spawned: false,
            pending_weights: false,
            trimmed: None,
            rendered: false,
            geometry_dirty: false,
        })
    }

    fn alloc(&mut self, node: Node) -> BoxId {
        if let Some(idx) = self.free.pop() {
            let slot = &mut self.slots[idx as usize];
            slot.generation += 1;
            slot.node = Some(node);
            BoxId::new(idx, slot.generation)
        } else {
            let idx = self.slots.len() as u32;
            self.slots.push(Slot {
                generation: 1,
                node: Some(node),
            });
            BoxId::new(idx, 1)
        }
    }

    fn release(&mut self, id: BoxId) {
        let slot = &mut self.slots[id.idx()];
        if slot.generation == id.1 && slot.node.is_some() {
            slot.node = None;
            self.free.push(id.0);
        }
    }

    /// Whether `id` still refers to a live box.
    #[must_use]
    pub fn is_alive(&self, id: BoxId) -> bool {
        self.slots
            .get(id.idx())
            .is_some_and(|slot| slot.generation == id.1 && slot.node.is_some())
    }

    pub(crate) fn node(&self, id: BoxId) -> &Node {
        let slot = &self.slots[id.idx()];
        assert!(slot.generation == id.1, "stale box id");
        slot.node.as_ref().expect("freed box id")
    }

    pub(crate) fn node_mut(&mut self, id: BoxId) -> &mut Node {
        let slot = &mut self.slots[id.idx()];
        assert!(slot.generation == id.1, "stale box id");
        slot.node.as_mut().expect("freed box id")
    }

    /// The template this box instantiates.
    #[must_use]
    pub fn template(&self, id: BoxId) -> TemplateId {
        self.node(id).template
    }

    /// The message accumulated from the session root to this box.
    #[must_use]
    pub fn message(&self, id: BoxId) -> &[char] {
        &self.node(id).message
    }

    /// The message as text.
    #[must_use]
    pub fn message_string(&self, id: BoxId) -> String {
        self.node(id).message.iter().collect()
    }

    /// The resolved style class, or `None` for the session root.
    #[must_use]
    pub fn style(&self, id: BoxId) -> Option<StyleClass> {
        self.node(id).style
    }

    /// This box's own weight.
    #[must_use]
    pub fn weight(&self, id: BoxId) -> f64 {
        self.node(id).weight
    }

    /// The sum of this box's child weights, as of the last completed spawn.
    #[must_use]
    pub fn total_weight(&self, id: BoxId) -> f64 {
        self.node(id).total_weight
    }

    /// Current geometry.
    #[must_use]
    pub fn geometry(&self, id: BoxId) -> BoxGeometry {
        self.node(id).geometry
    }

    /// The child array, or `None` if children were never instantiated.
    #[must_use]
    pub fn children(&self, id: BoxId) -> Option<&[ChildSlot]> {
        self.node(id).children.as_deref()
    }

    /// Whether this box has completed a spawn and participates in queries.
    #[must_use]
    pub fn is_spawned(&self, id: BoxId) -> bool {
        self.node(id).spawned
    }

    /// Whether this box is mid-expansion, waiting on prediction weights.
    #[must_use]
    pub fn is_pending_weights(&self, id: BoxId) -> bool {
        self.node(id).pending_weights
    }

    /// The trimmed-parent back-reference, set only while this box is a
    /// detached root.
    #[must_use]
    pub fn trimmed_parent(&self, id: BoxId) -> Option<(BoxId, u32)> {
        self.node(id).trimmed
    }

    /// Whether this box is a named-group placeholder, which expands its
    /// fixed members without consulting a predictor.
    #[must_use]
    pub fn is_pure_group(&self, id: BoxId) -> bool {
        matches!(self.node(id).style, Some(StyleClass::Named(_)))
    }

    /// Applies a partial dimension update, normalizing the derived edges.
    pub fn set_dimensions(&mut self, id: BoxId, update: SetDimensions) {
        let node = self.node_mut(id);
        node.geometry.apply(update);
        node.geometry_dirty = true;
    }

    /// Instantiates one child box per template child.
    ///
    /// Idempotent: returns `false` and changes nothing when children
    /// already exist. Symbol boxes (and the root) expand to the full
    /// palette again; named groups expand to their members. Group children
    /// materialize their own structure eagerly so that weight assignments
    /// can always reach a leaf.
    pub fn instantiate_children(&mut self, palette: &Palette, id: BoxId) -> bool {
        if self.node(id).children.is_some() {
            return false;
        }
        let child_templates = self.expansion_templates(palette, id);
        let message = self.node(id).message.clone();
        let ordinal = self.node(id).ordinal;
        let slots: Vec<ChildSlot> = child_templates
            .iter()
            .enumerate()
            .map(|(index, &template)| {
                ChildSlot::Occupied(self.create_box(palette, template, &message, ordinal, index))
            })
            .collect();
        self.node_mut(id).children = Some(slots);
        true
    }

    /// The templates this box's children instantiate.
    fn expansion_templates(&self, palette: &Palette, id: BoxId) -> Vec<TemplateId> {
        let template = palette.template(self.node(id).template);
        let source = if template.children().is_empty() {
            // A symbol continues with the whole palette; the tree is
            // infinitely deep through template sharing.
            palette.template(palette.root())
        } else {
            template
        };
        source.children().to_vec()
    }

    fn create_box(
        &mut self,
        palette: &Palette,
        template_id: TemplateId,
        parent_message: &[char],
        parent_ordinal: u32,
        index: usize,
    ) -> BoxId {
        let template = palette.template(template_id);
        let mut message = parent_message.to_vec();
        let ordinal = match template.symbol() {
            Some(symbol) => {
                message.push(symbol);
                parent_ordinal + 1
            }
            None => parent_ordinal,
        };
        let style = match template.style_class() {
            Some(name) => StyleClass::Named(name),
            None => StyleClass::sequence(ordinal, index),
        };
        let weight = if template.is_group() {
            Self::template_default_weight(palette, template_id)
        } else {
            template.default_weight()
        };
        let id = self.alloc(Node {
            template: template_id,
            message,
            ordinal,
            style: Some(style),
            weight,
            total_weight: 0.0,
            geometry: BoxGeometry::default(),
            children: None,
            spawned: false,
            pending_weights: false,
            trimmed: None,
            rendered: false,
            geometry_dirty: false,
        });
        // Named groups carry their members with them; a group box is pure
        // structure and never waits on a predictor.
        if palette.template(template_id).is_group() {
            let message = self.node(id).message.clone();
            let ordinal = self.node(id).ordinal;
            let slots: Vec<ChildSlot> = palette
                .template(template_id)
                .children()
                .to_vec()
                .into_iter()
                .enumerate()
                .map(|(child_index, child_template)| {
                    ChildSlot::Occupied(self.create_box(
                        palette,
                        child_template,
                        &message,
                        ordinal,
                        child_index,
                    ))
                })
                .collect();
            self.node_mut(id).children = Some(slots);
        }
        id
    }

    /// The default weight of a template subtree: 1 per leaf.
    pub(crate) fn template_default_weight(palette: &Palette, id: TemplateId) -> f64 {
        let template = palette.template(id);
        if template.is_group() {
            template
                .children()
                .iter()
                .map(|&child| Self::template_default_weight(palette, child))
                .sum()
        } else {
            template.default_weight()
        }
    }

    /// Marks a box as needing prediction weights before it can finish
    /// spawning, and queues it for the session to resolve.
    pub fn request_expansion(&mut self, id: BoxId) {
        let node = self.node_mut(id);
        if node.pending_weights {
            return;
        }
        node.pending_weights = true;
        self.expansion_queue.push(id);
    }

    /// Drains the boxes queued for asynchronous weight resolution.
    pub fn take_expansion_requests(&mut self) -> Vec<BoxId> {
        core::mem::take(&mut self.expansion_queue)
    }

    /// Assigns a prediction weight to the leaf for `code_point` among this
    /// box's descendants.
    ///
    /// The assignment takes effect when [`Tree::complete_spawn`] recomputes
    /// the group sums.
    ///
    /// ## Errors
    ///
    /// - [`WeightError`] if the palette has no path for `code_point`. This
    ///   aborts the update; it is a wiring mistake, not a prediction miss.
    pub fn set_child_weight(
        &mut self,
        palette: &Palette,
        parent: BoxId,
        code_point: char,
        weight: f64,
    ) -> Result<(), WeightError> {
        let Some(path) = palette.path(code_point) else {
            return Err(WeightError {
                code_point,
                message: self.message_string(parent),
            });
        };
        let mut current = parent;
        for &index in path {
            let Some(slots) = self.node(current).children.as_ref() else {
                // Children not materialized; nothing to weight yet.
                return Ok(());
            };
            let Some(slot) = slots.get(index as usize).copied() else {
                return Ok(());
            };
            let Some(child) = slot.occupant() else {
                return Ok(());
            };
            current = child;
        }
        self.node_mut(current).weight = weight;
        Ok(())
    }

    /// The descendant leaf box for `code_point`, reached from `parent`
    /// through materialized children.
    ///
    /// Returns `None` when the code point is off-palette or the chain is
    /// not materialized (a discarded group, say).
    #[must_use]
    pub fn child_for_code_point(
        &self,
        palette: &Palette,
        parent: BoxId,
        code_point: char,
    ) -> Option<BoxId> {
        let path = palette.path(code_point)?;
        let mut current = parent;
        for &index in path {
            current = self
                .node(current)
                .children
                .as_ref()?
                .get(index as usize)?
                .occupant()?;
        }
        Some(current)
    }

    /// Completes a spawn: recomputes every group weight in this box's
    /// subtree as the sum of its children, refreshes the total, and makes
    /// the box visible to queries.
    pub fn complete_spawn(&mut self, palette: &Palette, id: BoxId) {
        self.refresh_weights(palette, id);
        let node = self.node_mut(id);
        node.spawned = true;
        node.pending_weights = false;
    }

    /// Recomputes subtree weights bottom-up; returns this box's weight.
    fn refresh_weights(&mut self, palette: &Palette, id: BoxId) -> f64 {
        if let Some(slots) = self.node(id).children.clone() {
            let template = self.node(id).template;
            let mut total = 0.0;
            for (index, slot) in slots.iter().enumerate() {
                total += match slot.occupant() {
                    Some(child) => self.refresh_weights(palette, child),
                    None => self.slot_default_weight(palette, template, index),
                };
            }
            let node = self.node_mut(id);
            node.total_weight = total;
            if palette.template(node.template).is_group() && node.style.is_some() {
                node.weight = total;
            }
        }
        self.node(id).weight
    }

    /// Default weight for a stand-in slot, from the template it mirrors.
    pub(crate) fn slot_default_weight(
        &self,
        palette: &Palette,
        parent_template: TemplateId,
        index: usize,
    ) -> f64 {
        let template = palette.template(parent_template);
        let source = if template.children().is_empty() {
            palette.template(palette.root())
        } else {
            template
        };
        source
            .children()
            .get(index)
            .map_or(1.0, |&child| Self::template_default_weight(palette, child))
    }

    /// Completes a pure-group spawn synchronously: instantiation (if still
    /// needed) plus weight refresh, with no predictor involvement.
    pub fn spawn_group(&mut self, palette: &Palette, id: BoxId) {
        self.instantiate_children(palette, id);
        self.complete_spawn(palette, id);
    }

    /// The weight of the child at `index`, as used for arrangement.
    pub(crate) fn child_weight_at(&self, palette: &Palette, id: BoxId, index: usize) -> f64 {
        let template = self.node(id).template;
        match self.node(id).children.as_ref().and_then(|slots| {
            slots.get(index).copied().and_then(ChildSlot::occupant)
        }) {
            Some(child) => self.node(child).weight,
            None => self.slot_default_weight(palette, template, index),
        }
    }

    /// Returns the deepest spawned box holding the point `(x, y)`, with y
    /// positive upward, preferring later children.
    ///
    /// When `path` is supplied it is filled root-to-leaf with the child
    /// index chosen at each level and terminated with `-1`. Returns `None`
    /// if this box does not hold the point (including when it is
    /// dimension-undefined or mid-expansion).
    pub fn holder(
        &self,
        id: BoxId,
        x: f64,
        y: f64,
        path: Option<&mut HolderPath>,
    ) -> Option<BoxId> {
        let mut scratch = HolderPath::new();
        let buffer = match path {
            Some(path) => path,
            None => &mut scratch,
        };
        buffer.clear();
        self.holder_inner(id, x, y, buffer)
    }

    fn holder_inner(&self, id: BoxId, x: f64, y: f64, path: &mut HolderPath) -> Option<BoxId> {
        let node = self.node(id);
        if !node.spawned {
            return None;
        }
        if node.geometry.holds(x, y) != Some(true) {
            // This box doesn't hold the point, so neither do its children.
            return None;
        }
        if let Some(slots) = node.children.as_ref() {
            for (index, slot) in slots.iter().enumerate().rev() {
                let Some(child) = slot.occupant() else {
                    continue;
                };
                let Some(found) = self.holder_inner(child, x, y, path) else {
                    continue;
                };
                path.insert(0, index as i32);
                return Some(found);
            }
        }
        // This box holds the point and none of its children do.
        path.push(-1);
        Some(id)
    }

    /// Tri-state containment for one box; `None` when dimensions are
    /// undefined or the box has not finished spawning.
    #[must_use]
    pub fn holds(&self, id: BoxId, x: f64, y: f64) -> Option<bool> {
        let node = self.node(id);
        if !node.spawned {
            return None;
        }
        node.geometry.holds(x, y)
    }

    /// Detaches rendering state from this box and discards its subtree,
    /// returning the box itself to the unexpanded, unplaced state.
    ///
    /// Erasures are reported through the next [`Tree::commit`].
    pub fn erase(&mut self, id: BoxId) {
        let mut erased = Vec::new();
        self.erase_rendering(id, &mut erased);
        self.erased.append(&mut erased);
        self.free_children(id);
        let node = self.node_mut(id);
        node.children = None;
        node.spawned = false;
        node.pending_weights = false;
        node.geometry.clear();
        node.geometry_dirty = false;
    }

    /// Clears `rendered` flags over the subtree, recording each box that
    /// actually was rendered.
    pub(crate) fn erase_rendering(&mut self, id: BoxId, erased: &mut Vec<BoxId>) {
        if self.node(id).rendered {
            self.node_mut(id).rendered = false;
            erased.push(id);
        }
        if let Some(slots) = self.node(id).children.clone() {
            for slot in slots {
                if let Some(child) = slot.occupant() {
                    self.erase_rendering(child, erased);
                }
            }
        }
    }

    /// Frees every descendant, leaving `id` itself alive.
    pub(crate) fn free_children(&mut self, id: BoxId) {
        let Some(slots) = self.node_mut(id).children.take() else {
            return;
        };
        for slot in slots {
            if let Some(child) = slot.occupant() {
                self.free_subtree(child);
            }
        }
    }

    pub(crate) fn free_subtree(&mut self, id: BoxId) {
        self.free_children(id);
        self.release(id);
    }

    /// Batches the tick's rendering changes: newly drawn or moved boxes in
    /// draw order, plus everything that left the visible set.
    pub fn commit(&mut self, root: BoxId, limits: &Limits) -> Damage {
        let mut damage = Damage {
            drawn: Vec::new(),
            erased: core::mem::take(&mut self.erased),
        };
        let mut erased = Vec::new();
        self.commit_visit(root, limits, &mut damage.drawn, &mut erased);
        damage.erased.append(&mut erased);
        damage
    }

    fn commit_visit(
        &mut self,
        id: BoxId,
        limits: &Limits,
        drawn: &mut Vec<BoxId>,
        erased: &mut Vec<BoxId>,
    ) {
        let visible = {
            let geometry = &self.node(id).geometry;
            geometry.is_renderable()
                && geometry.bottom().is_some_and(|bottom| bottom > limits.top())
                && geometry.top().is_some_and(|top| top < limits.bottom())
        };
        if !visible {
            self.erase_rendering(id, erased);
            return;
        }
        let node = self.node_mut(id);
        if node.geometry_dirty {
            node.geometry_dirty = false;
            node.rendered = true;
            drawn.push(id);
        }
        if let Some(slots) = self.node(id).children.clone() {
            for slot in slots {
                if let Some(child) = slot.occupant() {
                    self.commit_visit(child, limits, drawn, erased);
                }
            }
        }
    }
}

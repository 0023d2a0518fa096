// Copyright 2026 the Zoomtype Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The session controller: owns the tree, drives the tick cycle.

use std::collections::HashMap;
use std::fmt;

use zoomtype_box_tree::{Arrange, BoxId, SetDimensions, Tree, WeightError};
use zoomtype_limits::{GradientError, Limits};
use zoomtype_palette::Palette;
use zoomtype_predict::{PredictRequest, Predictor, PredictorContext, WeightAssignment};

use crate::plan::{self, MoveRecord};
use crate::pointer::PointerState;
use crate::render::{RenderBox, Renderer, colour_for};

/// Where the controller stands in its lifecycle.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ControllerState {
    /// No active root; ticks do nothing.
    Idle,
    /// A root is set and ticks navigate.
    Active,
    /// Diagnostic hold: targets are still selected, moves are reported but
    /// never applied.
    Frozen,
}

/// How to place a fresh session root.
///
/// Whichever coordinate is given, the other is solved from the gradient;
/// the root is always vertically centred.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum RootPlacement {
    /// Place the root's left edge here and solve the height.
    AtLeft(f64),
    /// Give the root this height and solve the left edge.
    WithHeight(f64),
}

/// Fatal controller errors.
///
/// Both variants are configuration or wiring mistakes; the tick that hits
/// one aborts so the problem surfaces instead of degrading silently.
#[derive(Clone, Debug, PartialEq)]
pub enum ControlError {
    /// A solve was attempted with no gradient table configured.
    Gradient(GradientError),
    /// A predictor assigned a weight to a code point outside the palette.
    Weight(WeightError),
}

impl fmt::Display for ControlError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Gradient(error) => error.fmt(f),
            Self::Weight(error) => error.fmt(f),
        }
    }
}

impl std::error::Error for ControlError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Gradient(error) => Some(error),
            Self::Weight(error) => Some(error),
        }
    }
}

impl From<GradientError> for ControlError {
    fn from(error: GradientError) -> Self {
        Self::Gradient(error)
    }
}

impl From<WeightError> for ControlError {
    fn from(error: WeightError) -> Self {
        Self::Weight(error)
    }
}

/// What one tick did.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct TickOutcome {
    /// Whether the pointer was driving navigation this tick.
    pub going: bool,
    /// Whether a move was applied to the tree.
    pub moved: bool,
    /// Whether the session root was trimmed or promoted.
    pub root_changed: bool,
}

/// Diagnostic callback invoked with each newly targeted move while frozen.
pub type FrozenReport = Box<dyn FnMut(&MoveRecord)>;

/// A prediction that has resolved and waits for the next tick to apply.
struct StagedExpansion {
    id: BoxId,
    assignments: Vec<WeightAssignment>,
}

/// The pointer-driven navigation controller of one session.
///
/// The controller owns the palette, limits, box tree and predictor; the
/// host owns the fixed-interval timer and the renderer, and calls
/// [`Controller::tick`] once per cycle with the current pointer snapshot.
///
/// One tick runs, in order: apply previously resolved prediction weights,
/// control (target selection, move solve, application), resolve newly
/// queued expansions, hand geometry changes to the renderer, evaluate
/// trimming and promotion. Prediction results always land at the start of
/// the tick after they resolve, never mid-cycle.
pub struct Controller {
    palette: Palette,
    limits: Limits,
    tree: Tree,
    root: Option<BoxId>,
    predictor: Box<dyn Predictor>,
    contexts: HashMap<BoxId, PredictorContext>,
    staged: Vec<StagedExpansion>,
    frozen: Option<FrozenReport>,
    frozen_target: Option<BoxId>,
}

impl fmt::Debug for Controller {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Controller")
            .field("state", &self.state())
            .field("root", &self.root)
            .field("staged", &self.staged.len())
            .finish_non_exhaustive()
    }
}

impl Controller {
    /// A controller over the given palette, limits, and predictor.
    #[must_use]
    pub fn new(palette: Palette, limits: Limits, predictor: Box<dyn Predictor>) -> Self {
        Self {
            palette,
            limits,
            tree: Tree::new(),
            root: None,
            predictor,
            contexts: HashMap::new(),
            staged: Vec::new(),
            frozen: None,
            frozen_target: None,
        }
    }

    /// The lifecycle state, derived from the root and freeze settings.
    #[must_use]
    pub fn state(&self) -> ControllerState {
        if self.root.is_none() {
            ControllerState::Idle
        } else if self.frozen.is_some() {
            ControllerState::Frozen
        } else {
            ControllerState::Active
        }
    }

    /// The current session root, if any.
    #[must_use]
    pub fn root(&self) -> Option<BoxId> {
        self.root
    }

    /// The session's palette.
    #[must_use]
    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// The session's geometric context.
    #[must_use]
    pub fn limits(&self) -> &Limits {
        &self.limits
    }

    /// Mutable access to the geometric context, for resizes and tunables.
    pub fn limits_mut(&mut self) -> &mut Limits {
        &mut self.limits
    }

    /// The live box tree, for inspection.
    #[must_use]
    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    /// Swaps the predictor for subsequent expansions.
    pub fn set_predictor(&mut self, predictor: Box<dyn Predictor>) {
        self.predictor = predictor;
    }

    /// Spawns a fresh root box, discarding any previous tree.
    ///
    /// When restarting over a live renderer, call [`Controller::reset`]
    /// first so the old boxes are erased.
    ///
    /// ## Errors
    ///
    /// - [`ControlError::Gradient`] if no gradient table is configured.
    pub fn start(&mut self, placement: RootPlacement) -> Result<BoxId, ControlError> {
        let (left, height) = match placement {
            RootPlacement::AtLeft(left) => (left, self.limits.solve_height(left)?),
            RootPlacement::WithHeight(height) => (self.limits.solve_left(height)?, height),
        };

        self.tree = Tree::new();
        self.contexts.clear();
        self.staged.clear();
        self.frozen_target = None;

        let root = self.tree.spawn_root(&self.palette);
        self.tree.set_dimensions(
            root,
            SetDimensions {
                left: Some(left),
                width: Some(self.limits.width() - left),
                middle: Some(0.0),
                height: Some(height),
            },
        );
        self.tree.instantiate_children(&self.palette, root);
        self.tree.request_expansion(root);
        // Resolve the root's weights now; they apply on the first tick.
        self.resolve_expansions();
        self.root = Some(root);
        Ok(root)
    }

    /// Clears the session back to idle, erasing everything the renderer
    /// still shows.
    pub fn reset(&mut self, renderer: &mut dyn Renderer) {
        if let Some(root) = self.root.take() {
            self.tree.erase(root);
            let damage = self.tree.commit(root, &self.limits);
            for id in damage.erased {
                renderer.erase(id);
            }
        }
        self.tree = Tree::new();
        self.contexts.clear();
        self.staged.clear();
        self.frozen_target = None;
    }

    /// Enters the diagnostic hold: moves are computed and reported through
    /// `report`, but never applied.
    pub fn freeze(&mut self, report: FrozenReport) {
        if self.frozen.is_none() {
            self.frozen_target = None;
        }
        self.frozen = Some(report);
    }

    /// Leaves the diagnostic hold.
    pub fn unfreeze(&mut self) {
        self.frozen = None;
    }

    /// The message of the deepest box currently across the origin.
    #[must_use]
    pub fn message(&self) -> Option<String> {
        let root = self.root?;
        let holder = self.tree.holder(root, 0.0, 0.0, None)?;
        Some(self.tree.message_string(holder))
    }

    /// Runs one control cycle. See the type docs for the phase order.
    ///
    /// ## Errors
    ///
    /// - [`ControlError::Gradient`] if no gradient table is configured.
    /// - [`ControlError::Weight`] if a resolved prediction named a code
    ///   point outside the palette.
    pub fn tick(
        &mut self,
        pointer: &PointerState,
        renderer: &mut dyn Renderer,
    ) -> Result<TickOutcome, ControlError> {
        let Some(root) = self.root else {
            return Ok(TickOutcome::default());
        };

        self.apply_staged()?;

        let mut moved = false;
        if pointer.going() {
            if self.frozen.is_some() {
                self.control_frozen(root, pointer)?;
            } else {
                moved = self.control(root, pointer)?;
            }
        }

        self.resolve_expansions();

        let damage = self.tree.commit(root, &self.limits);
        for id in &damage.erased {
            self.contexts.remove(id);
            renderer.erase(*id);
        }
        for &id in &damage.drawn {
            if let Some(render_box) = self.render_box(id) {
                renderer.draw(&render_box);
            }
        }

        let mut root_changed = false;
        if let Some(parent) = self.tree.parent_root(&self.palette, root, &self.limits)? {
            #[cfg(feature = "tracing")]
            tracing::debug!(target: "zoomtype", ?parent, "promoted trimmed parent to root");
            self.root = Some(parent);
            root_changed = true;
        } else if let Some(child) = self.tree.child_root(root, &self.limits) {
            #[cfg(feature = "tracing")]
            tracing::debug!(target: "zoomtype", ?child, "trimmed root to child");
            self.root = Some(child);
            root_changed = true;
        }

        Ok(TickOutcome {
            going: pointer.going(),
            moved,
            root_changed,
        })
    }

    /// Active-state control: select, solve, apply.
    fn control(&mut self, root: BoxId, pointer: &PointerState) -> Result<bool, ControlError> {
        let (target, path) = plan::select_target(&self.tree, root, &self.limits, pointer)?;
        let Some(record) = plan::plan_move(&self.tree, &self.limits, target, path, pointer)? else {
            return Ok(false);
        };
        let applied = self.tree.apply_move(
            &self.palette,
            root,
            record.move_x(),
            record.move_y(),
            &record.path,
            &self.limits,
        )?;
        #[cfg(feature = "tracing")]
        if !applied {
            tracing::debug!(
                target: "zoomtype",
                left = record.left_after,
                "move rejected at the solver boundary"
            );
        }
        Ok(applied)
    }

    /// Frozen-state control: select under the pointer, report on change.
    fn control_frozen(&mut self, root: BoxId, pointer: &PointerState) -> Result<(), ControlError> {
        let Some((target, path)) = plan::select_frozen_target(&self.tree, root, pointer) else {
            return Ok(());
        };
        if self.frozen_target == Some(target) {
            // Same target as the last report; stay quiet.
            return Ok(());
        }
        self.frozen_target = Some(target);
        if let Some(record) = plan::plan_move(&self.tree, &self.limits, target, path, pointer)? {
            if let Some(report) = self.frozen.as_mut() {
                report(&record);
            }
        }
        Ok(())
    }

    /// Applies the weight resolutions staged by the previous tick.
    fn apply_staged(&mut self) -> Result<(), ControlError> {
        for staged in std::mem::take(&mut self.staged) {
            // The box may have been erased (or freed) since its request
            // resolved; applying would resurrect it, so skip.
            if !self.tree.is_alive(staged.id) || !self.tree.is_pending_weights(staged.id) {
                continue;
            }
            for assignment in &staged.assignments {
                self.tree.set_child_weight(
                    &self.palette,
                    staged.id,
                    assignment.code_point,
                    assignment.weight,
                )?;
                if let Some(context) = assignment.context {
                    if let Some(child) = self.tree.child_for_code_point(
                        &self.palette,
                        staged.id,
                        assignment.code_point,
                    ) {
                        self.contexts.insert(child, context);
                    }
                }
            }
            self.tree.complete_spawn(&self.palette, staged.id);
            // Lay the fresh children out straight away; deeper levels queue
            // their own expansions from inside the arrangement.
            self.tree
                .arrange_children(&self.palette, staged.id, &self.limits, Arrange::All)?;
        }
        Ok(())
    }

    /// Resolves queued expansions against the predictor, staging results
    /// for the next tick.
    fn resolve_expansions(&mut self) {
        for id in self.tree.take_expansion_requests() {
            if !self.tree.is_alive(id) || !self.tree.is_pending_weights(id) {
                continue;
            }
            self.tree.instantiate_children(&self.palette, id);

            let message = self.tree.message(id).to_vec();
            let text = self.tree.message_string(id);
            let context = self.contexts.get(&id).copied();
            let mut assignments = Vec::new();
            let outcome = self.predictor.predict(
                PredictRequest {
                    message: &message,
                    text: &text,
                    code_points: self.palette.code_points(),
                    context,
                },
                &mut |assignment| assignments.push(assignment),
            );
            if let Err(_error) = outcome {
                #[cfg(feature = "tracing")]
                tracing::warn!(target: "zoomtype", %_error, "predictor failed; using uniform weights");
                // Uniform fallback: no assignments, the defaults of 1 stand.
                assignments.clear();
            }
            self.staged.push(StagedExpansion { id, assignments });
        }
    }

    fn render_box(&self, id: BoxId) -> Option<RenderBox> {
        let geometry = self.tree.geometry(id);
        let (Some(left), Some(width), Some(middle), Some(height)) = (
            geometry.left,
            geometry.width,
            geometry.middle,
            geometry.height,
        ) else {
            return None;
        };
        let style_class = self.tree.style(id);
        let template = self.palette.template(self.tree.template(id));
        Some(RenderBox {
            id,
            left,
            width,
            middle,
            height,
            style_class,
            colour: colour_for(style_class),
            text: template.display_text(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;
    use zoomtype_limits::GradientRatio;
    use zoomtype_predict::{FrequencyPredictor, PredictError, UniformPredictor};

    #[derive(Default)]
    struct TestRenderer {
        drawn: Vec<RenderBox>,
        erased: Vec<BoxId>,
    }

    impl Renderer for TestRenderer {
        fn draw(&mut self, render_box: &RenderBox) {
            self.drawn.push(render_box.clone());
        }

        fn erase(&mut self, id: BoxId) {
            self.erased.push(id);
        }
    }

    struct FailingPredictor;

    impl Predictor for FailingPredictor {
        fn predict(
            &mut self,
            _request: PredictRequest<'_>,
            _emit: &mut dyn FnMut(WeightAssignment),
        ) -> Result<(), PredictError> {
            Err(PredictError::new("backend offline"))
        }
    }

    struct OffPalettePredictor;

    impl Predictor for OffPalettePredictor {
        fn predict(
            &mut self,
            _request: PredictRequest<'_>,
            emit: &mut dyn FnMut(WeightAssignment),
        ) -> Result<(), PredictError> {
            emit(WeightAssignment::new('\u{3b1}', 2.0));
            Ok(())
        }
    }

    fn limits() -> Limits {
        let mut limits = Limits::new(100.0, 200.0);
        limits.set_ratios(vec![
            GradientRatio {
                offset: 0.9,
                height: 0.01,
            },
            GradientRatio {
                offset: -1.0,
                height: 1.0,
            },
        ]);
        limits
    }

    fn controller_with(predictor: Box<dyn Predictor>) -> Controller {
        Controller::new(Palette::latin(), limits(), predictor)
    }

    fn pointer_at(x: f64, y: f64) -> PointerState {
        let mut pointer = PointerState::new();
        pointer.set_raw(x, y);
        pointer
    }

    /// Start and run a few idle ticks so expansions settle.
    fn warmed_up(predictor: Box<dyn Predictor>) -> (Controller, TestRenderer, BoxId) {
        let mut controller = controller_with(predictor);
        let root = controller.start(RootPlacement::AtLeft(0.0)).unwrap();
        let mut renderer = TestRenderer::default();
        for _ in 0..3 {
            controller.tick(&PointerState::new(), &mut renderer).unwrap();
        }
        (controller, renderer, root)
    }

    #[test]
    fn starting_places_the_root_on_the_gradient() {
        let mut controller = controller_with(Box::new(UniformPredictor));
        assert_eq!(controller.state(), ControllerState::Idle);

        let root = controller.start(RootPlacement::AtLeft(0.0)).unwrap();
        assert_eq!(controller.state(), ControllerState::Active);
        let geometry = controller.tree().geometry(root);
        assert_eq!(geometry.left, Some(0.0));
        assert_eq!(geometry.middle, Some(0.0));
        let expected = controller.limits().solve_height(0.0).unwrap();
        assert_eq!(geometry.height, Some(expected));

        // The height-first placement solves the other way round.
        let root = controller.start(RootPlacement::WithHeight(100.0)).unwrap();
        let geometry = controller.tree().geometry(root);
        assert_eq!(geometry.height, Some(100.0));
        let expected = controller.limits().solve_left(100.0).unwrap();
        assert_eq!(geometry.left, Some(expected));
    }

    #[test]
    fn starting_without_a_gradient_fails() {
        let mut controller = Controller::new(
            Palette::latin(),
            Limits::new(100.0, 200.0),
            Box::new(UniformPredictor),
        );
        assert!(matches!(
            controller.start(RootPlacement::AtLeft(0.0)),
            Err(ControlError::Gradient(_))
        ));
    }

    #[test]
    fn the_first_tick_completes_the_root_spawn() {
        let mut controller = controller_with(Box::new(UniformPredictor));
        let root = controller.start(RootPlacement::AtLeft(0.0)).unwrap();
        assert!(!controller.tree().is_spawned(root));

        let mut renderer = TestRenderer::default();
        let outcome = controller.tick(&PointerState::new(), &mut renderer).unwrap();
        assert!(!outcome.going);
        assert!(controller.tree().is_spawned(root));
        // Uniform weights: 26 lowercase plus the group sums.
        assert_eq!(controller.tree().total_weight(root), 76.0);
        // The root reached the renderer.
        assert!(renderer.drawn.iter().any(|drawn| drawn.id == root));
    }

    #[test]
    fn a_resting_pointer_produces_no_move() {
        let (mut controller, mut renderer, root) = warmed_up(Box::new(UniformPredictor));
        let before = controller.tree().geometry(root);
        let outcome = controller.tick(&PointerState::new(), &mut renderer).unwrap();
        assert!(!outcome.moved);
        assert_eq!(controller.tree().geometry(root), before);
    }

    #[test]
    fn deflection_zooms_monotonically() {
        let (mut controller, mut renderer, root) = warmed_up(Box::new(UniformPredictor));
        let before = controller.tree().geometry(root);

        let outcome = controller.tick(&pointer_at(50.0, 0.0), &mut renderer).unwrap();
        assert!(outcome.going);
        assert!(outcome.moved);

        let after = controller.tree().geometry(root);
        // The tree flows left and grows as the pointer pushes in.
        assert!(after.left.unwrap() < before.left.unwrap());
        assert!(after.height.unwrap() > before.height.unwrap());
    }

    #[test]
    fn the_frequency_predictor_shapes_first_level_weights() {
        let mut controller = controller_with(Box::new(FrequencyPredictor::default()));
        let root = controller.start(RootPlacement::AtLeft(0.0)).unwrap();
        let mut renderer = TestRenderer::default();
        controller.tick(&PointerState::new(), &mut renderer).unwrap();

        // Start of input: capitals weigh 5, so their group sums to 130.
        let capital_a = controller
            .tree()
            .child_for_code_point(controller.palette(), root, 'A')
            .unwrap();
        assert_eq!(controller.tree().weight(capital_a), 5.0);
        assert_eq!(controller.tree().total_weight(root), 26.0 + 130.0 + 24.0);
    }

    #[test]
    fn a_failing_predictor_falls_back_to_uniform_weights() {
        let mut controller = controller_with(Box::new(FailingPredictor));
        let root = controller.start(RootPlacement::AtLeft(0.0)).unwrap();
        let mut renderer = TestRenderer::default();
        controller.tick(&PointerState::new(), &mut renderer).unwrap();

        assert!(controller.tree().is_spawned(root));
        assert_eq!(controller.tree().total_weight(root), 76.0);
    }

    #[test]
    fn an_off_palette_weight_aborts_the_tick() {
        let mut controller = controller_with(Box::new(OffPalettePredictor));
        controller.start(RootPlacement::AtLeft(0.0)).unwrap();
        let mut renderer = TestRenderer::default();
        let error = controller
            .tick(&PointerState::new(), &mut renderer)
            .unwrap_err();
        match error {
            ControlError::Weight(weight) => {
                assert_eq!(weight.code_point, '\u{3b1}');
                assert_eq!(weight.message, "");
            }
            other => panic!("expected a weight error, got {other:?}"),
        }
    }

    #[test]
    fn freezing_reports_once_per_target_and_applies_nothing() {
        let (mut controller, mut renderer, root) = warmed_up(Box::new(UniformPredictor));
        let reports = Rc::new(Cell::new(0_usize));
        let seen = reports.clone();
        controller.freeze(Box::new(move |_record| {
            seen.set(seen.get() + 1);
        }));
        assert_eq!(controller.state(), ControllerState::Frozen);

        let before = controller.tree().geometry(root);
        let pointer = pointer_at(30.0, 10.0);
        controller.tick(&pointer, &mut renderer).unwrap();
        assert_eq!(reports.get(), 1);
        assert_eq!(controller.tree().geometry(root), before);

        // Same target again: the report is suppressed.
        controller.tick(&pointer, &mut renderer).unwrap();
        assert_eq!(reports.get(), 1);

        controller.unfreeze();
        assert_eq!(controller.state(), ControllerState::Active);
        let outcome = controller.tick(&pointer, &mut renderer).unwrap();
        assert!(outcome.moved);
    }

    #[test]
    fn the_message_tracks_the_origin_holder() {
        let (controller, _, _) = warmed_up(Box::new(UniformPredictor));
        assert_eq!(controller.message(), Some(String::new()));
    }

    #[test]
    fn reset_erases_and_returns_to_idle() {
        let (mut controller, mut renderer, root) = warmed_up(Box::new(UniformPredictor));
        renderer.erased.clear();
        controller.reset(&mut renderer);
        assert_eq!(controller.state(), ControllerState::Idle);
        assert_eq!(controller.root(), None);
        assert!(renderer.erased.contains(&root));

        // Ticking while idle is a quiet no-op.
        let outcome = controller.tick(&pointer_at(50.0, 0.0), &mut renderer).unwrap();
        assert_eq!(outcome, TickOutcome::default());
    }

    #[test]
    fn sustained_deflection_eventually_trims_the_root() {
        let (mut controller, mut renderer, root) = warmed_up(Box::new(UniformPredictor));
        let pointer = pointer_at(80.0, 0.0);
        let mut trimmed = false;
        for _ in 0..600 {
            let outcome = controller.tick(&pointer, &mut renderer).unwrap();
            if outcome.root_changed {
                trimmed = true;
                break;
            }
        }
        assert!(trimmed, "the root never trimmed under sustained deflection");
        let new_root = controller.root().unwrap();
        assert_ne!(new_root, root);
        // The new root remembers its parent for later promotion.
        assert!(controller.tree().trimmed_parent(new_root).is_some());
        // And the message now starts with the promoted child's symbol.
        assert!(!controller.tree().message(new_root).is_empty() || {
            // The promoted child may be a group, which adds no symbol.
            controller.tree().is_pure_group(new_root)
        });
    }
}

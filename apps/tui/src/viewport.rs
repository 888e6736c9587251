//! Pan and zoom over the logical tree layout.
//!
//! The layout is computed once in logical coordinates; the controller owns
//! the only mutable view state and maps it to the screen with a single
//! `translate(offset) · scale(scale)` transform.

use crate::error::ConfigError;
use kurbo::{Affine, Point, Rect, Size, Vec2};

/// Zoom bounds and the fixed per-event step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomLimits {
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

impl Default for ZoomLimits {
    fn default() -> Self {
        Self {
            min: 0.3,
            max: 2.0,
            step: 0.1,
        }
    }
}

impl ZoomLimits {
    pub fn validate(self) -> Result<Self, ConfigError> {
        if !(self.min.is_finite() && self.max.is_finite() && self.step.is_finite()) {
            return Err(ConfigError::NonFiniteZoom {
                min: self.min,
                max: self.max,
                step: self.step,
            });
        }
        if self.min <= 0.0 || self.max <= 0.0 {
            return Err(ConfigError::NonPositiveZoom {
                min: self.min,
                max: self.max,
            });
        }
        if self.min > self.max {
            return Err(ConfigError::InvertedZoom {
                min: self.min,
                max: self.max,
            });
        }
        if self.step <= 0.0 {
            return Err(ConfigError::NonPositiveStep(self.step));
        }
        Ok(self)
    }

    fn clamp(self, scale: f64) -> f64 {
        // Snap away accumulated step error so the bounds are reached exactly.
        let snapped = (scale * 1e6).round() / 1e6;
        snapped.clamp(self.min, self.max)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportState {
    pub scale: f64,
    pub offset: Vec2,
}

impl ViewportState {
    pub const IDENTITY: Self = Self {
        scale: 1.0,
        offset: Vec2::ZERO,
    };
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragState {
    Idle,
    /// Press position minus the offset at press time.
    Dragging { anchor: Vec2 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Affordance {
    Grab,
    Grabbing,
}

impl Affordance {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Grab => "grab",
            Self::Grabbing => "grabbing",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoomDirection {
    In,
    Out,
}

#[derive(Debug, Clone)]
pub struct ViewportController {
    state: ViewportState,
    limits: ZoomLimits,
    drag: DragState,
}

impl ViewportController {
    pub fn new(limits: ZoomLimits) -> Self {
        Self {
            state: ViewportState {
                scale: limits.clamp(1.0),
                offset: Vec2::ZERO,
            },
            limits,
            drag: DragState::Idle,
        }
    }

    pub const fn state(&self) -> ViewportState {
        self.state
    }

    pub const fn scale(&self) -> f64 {
        self.state.scale
    }

    pub const fn offset(&self) -> Vec2 {
        self.state.offset
    }

    pub const fn limits(&self) -> ZoomLimits {
        self.limits
    }

    pub const fn is_dragging(&self) -> bool {
        matches!(self.drag, DragState::Dragging { .. })
    }

    pub const fn affordance(&self) -> Affordance {
        if self.is_dragging() {
            Affordance::Grabbing
        } else {
            Affordance::Grab
        }
    }

    pub fn transform(&self) -> Affine {
        Affine::translate(self.state.offset) * Affine::scale(self.state.scale)
    }

    pub fn logical_to_screen(&self, point: Point) -> Point {
        self.transform() * point
    }

    pub fn screen_to_logical(&self, point: Point) -> Point {
        self.transform().inverse() * point
    }

    pub fn logical_rect_to_screen(&self, rect: Rect) -> Rect {
        Rect::from_points(
            self.logical_to_screen(Point::new(rect.x0, rect.y0)),
            self.logical_to_screen(Point::new(rect.x1, rect.y1)),
        )
    }

    pub fn can_zoom_in(&self) -> bool {
        self.state.scale < self.limits.max
    }

    pub fn can_zoom_out(&self) -> bool {
        self.state.scale > self.limits.min
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn zoom_percent(&self) -> u32 {
        (self.state.scale * 100.0).round() as u32
    }

    /// Wheel or pinch step anchored at `pointer` (screen space).
    ///
    /// Ignored while dragging. Returns whether the state changed.
    pub fn wheel(&mut self, pointer: Point, direction: ZoomDirection) -> bool {
        if self.is_dragging() {
            return false;
        }
        let old_scale = self.state.scale;
        let new_scale = self.stepped(direction);
        if (new_scale - old_scale).abs() < f64::EPSILON {
            return false;
        }

        let p = pointer.to_vec2();
        self.state.offset = p - (p - self.state.offset) * (new_scale / old_scale);
        self.state.scale = new_scale;
        true
    }

    /// Discrete zoom step; the offset is left untouched.
    pub fn zoom_in(&mut self) -> bool {
        self.step_without_anchor(ZoomDirection::In)
    }

    pub fn zoom_out(&mut self) -> bool {
        self.step_without_anchor(ZoomDirection::Out)
    }

    pub fn reset(&mut self) {
        self.state = ViewportState::IDENTITY;
        self.state.scale = self.limits.clamp(1.0);
        self.drag = DragState::Idle;
    }

    pub fn press(&mut self, pointer: Point) {
        self.drag = DragState::Dragging {
            anchor: pointer.to_vec2() - self.state.offset,
        };
    }

    pub fn drag_to(&mut self, pointer: Point) -> bool {
        let DragState::Dragging { anchor } = self.drag else {
            return false;
        };
        let offset = pointer.to_vec2() - anchor;
        if offset == self.state.offset {
            return false;
        }
        self.state.offset = offset;
        true
    }

    /// Primary button released. Returns whether a drag was active.
    pub fn release(&mut self) -> bool {
        self.end_drag()
    }

    /// Pointer left the canvas bounds.
    pub fn leave(&mut self) -> bool {
        self.end_drag()
    }

    /// Pointer lost without a release event (focus loss, terminal resize).
    pub fn cancel(&mut self) -> bool {
        self.end_drag()
    }

    pub fn pan_by(&mut self, delta: Vec2) {
        self.state.offset += delta;
    }

    /// Moves the offset so `logical` lands at the center of a `view` sized canvas.
    pub fn center_on(&mut self, logical: Point, view: Size) {
        let view_center = Vec2::new(view.width / 2.0, view.height / 2.0);
        self.state.offset = view_center - logical.to_vec2() * self.state.scale;
    }

    /// Centers `content` horizontally, and vertically when it fits; tall content is top aligned.
    pub fn center_content(&mut self, content: Size, view: Size) {
        let scaled = content * self.state.scale;
        self.state.offset = Vec2::new(
            (view.width - scaled.width) / 2.0,
            ((view.height - scaled.height) / 2.0).max(0.0),
        );
    }

    fn stepped(&self, direction: ZoomDirection) -> f64 {
        let delta = match direction {
            ZoomDirection::In => self.limits.step,
            ZoomDirection::Out => -self.limits.step,
        };
        self.limits.clamp(self.state.scale + delta)
    }

    fn step_without_anchor(&mut self, direction: ZoomDirection) -> bool {
        let new_scale = self.stepped(direction);
        if (new_scale - self.state.scale).abs() < f64::EPSILON {
            return false;
        }
        self.state.scale = new_scale;
        true
    }

    fn end_drag(&mut self) -> bool {
        let was_dragging = self.is_dragging();
        self.drag = DragState::Idle;
        was_dragging
    }
}

impl Default for ViewportController {
    fn default() -> Self {
        Self::new(ZoomLimits::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const TOLERANCE: f64 = 1e-9;

    fn close(a: Point, b: Point) -> bool {
        (a.x - b.x).abs() < TOLERANCE && (a.y - b.y).abs() < TOLERANCE
    }

    #[test]
    fn non_finite_limits_are_rejected() {
        for limits in [
            ZoomLimits { min: f64::NAN, ..ZoomLimits::default() },
            ZoomLimits { max: f64::NAN, ..ZoomLimits::default() },
            ZoomLimits { step: f64::NAN, ..ZoomLimits::default() },
            ZoomLimits { max: f64::INFINITY, ..ZoomLimits::default() },
        ] {
            assert!(
                matches!(limits.validate(), Err(ConfigError::NonFiniteZoom { .. })),
                "{limits:?} should be rejected"
            );
        }
        assert_eq!(ZoomLimits::default().validate(), Ok(ZoomLimits::default()));
    }

    #[test]
    fn starts_at_identity() {
        let vp = ViewportController::default();
        assert_eq!(vp.state(), ViewportState::IDENTITY);
        assert_eq!(vp.affordance(), Affordance::Grab);
        assert_eq!(vp.zoom_percent(), 100);
    }

    #[test]
    fn discrete_zoom_clamps_at_bounds() {
        let mut vp = ViewportController::default();
        for _ in 0..30 {
            vp.zoom_in();
        }
        assert!((vp.scale() - 2.0).abs() < TOLERANCE);
        assert!(!vp.can_zoom_in());
        assert!(!vp.zoom_in());

        for _ in 0..30 {
            vp.zoom_out();
        }
        assert!((vp.scale() - 0.3).abs() < TOLERANCE);
        assert!(!vp.can_zoom_out());
        assert_eq!(vp.offset(), Vec2::ZERO);
    }

    #[test]
    fn wheel_zoom_keeps_point_under_pointer() {
        let mut vp = ViewportController::default();
        vp.pan_by(Vec2::new(12.0, -4.0));
        let pointer = Point::new(40.0, 18.0);
        let before = vp.screen_to_logical(pointer);

        assert!(vp.wheel(pointer, ZoomDirection::In));
        assert!(close(vp.screen_to_logical(pointer), before));

        assert!(vp.wheel(pointer, ZoomDirection::Out));
        assert!(vp.wheel(pointer, ZoomDirection::Out));
        assert!(close(vp.screen_to_logical(pointer), before));
    }

    #[test]
    fn drag_moves_offset_relative_to_press() {
        let mut vp = ViewportController::default();
        vp.pan_by(Vec2::new(5.0, 5.0));
        vp.press(Point::new(10.0, 10.0));
        assert_eq!(vp.affordance(), Affordance::Grabbing);

        assert!(vp.drag_to(Point::new(13.0, 8.0)));
        assert_eq!(vp.offset(), Vec2::new(8.0, 3.0));

        assert!(vp.release());
        assert_eq!(vp.affordance(), Affordance::Grab);
        assert!(!vp.drag_to(Point::new(50.0, 50.0)));
        assert_eq!(vp.offset(), Vec2::new(8.0, 3.0));
    }

    #[test]
    fn every_exit_path_releases_the_drag() {
        let mut vp = ViewportController::default();
        vp.press(Point::ORIGIN);
        assert!(vp.leave());
        assert!(!vp.is_dragging());

        vp.press(Point::ORIGIN);
        assert!(vp.cancel());
        assert!(!vp.is_dragging());
        assert!(!vp.release());
    }

    #[test]
    fn wheel_is_ignored_while_dragging() {
        let mut vp = ViewportController::default();
        vp.press(Point::new(1.0, 1.0));
        assert!(!vp.wheel(Point::new(1.0, 1.0), ZoomDirection::In));
        assert!((vp.scale() - 1.0).abs() < TOLERANCE);
    }

    #[test]
    fn reset_returns_to_identity_and_idle() {
        let mut vp = ViewportController::default();
        vp.wheel(Point::new(30.0, 30.0), ZoomDirection::In);
        vp.press(Point::new(2.0, 2.0));
        vp.drag_to(Point::new(9.0, 1.0));
        vp.reset();
        assert_eq!(vp.state(), ViewportState::IDENTITY);
        assert!(!vp.is_dragging());
    }

    #[test]
    fn center_on_puts_logical_point_mid_view() {
        let mut vp = ViewportController::default();
        vp.zoom_in();
        let view = Size::new(80.0, 24.0);
        vp.center_on(Point::new(100.0, 50.0), view);
        assert!(close(
            vp.logical_to_screen(Point::new(100.0, 50.0)),
            Point::new(40.0, 12.0)
        ));
    }

    #[test]
    fn center_content_top_aligns_tall_content() {
        let mut vp = ViewportController::default();
        vp.center_content(Size::new(40.0, 100.0), Size::new(80.0, 24.0));
        assert_eq!(vp.offset(), Vec2::new(20.0, 0.0));
    }

    #[derive(Debug, Clone)]
    enum Op {
        Wheel(f64, f64, bool),
        ZoomIn,
        ZoomOut,
        Press(f64, f64),
        Drag(f64, f64),
        Release,
        Leave,
        Reset,
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            (0.0..200.0, 0.0..60.0, any::<bool>()).prop_map(|(x, y, i)| Op::Wheel(x, y, i)),
            Just(Op::ZoomIn),
            Just(Op::ZoomOut),
            (0.0..200.0, 0.0..60.0).prop_map(|(x, y)| Op::Press(x, y)),
            (0.0..200.0, 0.0..60.0).prop_map(|(x, y)| Op::Drag(x, y)),
            Just(Op::Release),
            Just(Op::Leave),
            Just(Op::Reset),
        ]
    }

    proptest! {
        #[test]
        fn scale_never_leaves_bounds(ops in proptest::collection::vec(op(), 0..64)) {
            let mut vp = ViewportController::default();
            let limits = vp.limits();
            for op in ops {
                match op {
                    Op::Wheel(x, y, zoom_in) => {
                        let dir = if zoom_in { ZoomDirection::In } else { ZoomDirection::Out };
                        vp.wheel(Point::new(x, y), dir);
                    }
                    Op::ZoomIn => { vp.zoom_in(); }
                    Op::ZoomOut => { vp.zoom_out(); }
                    Op::Press(x, y) => vp.press(Point::new(x, y)),
                    Op::Drag(x, y) => { vp.drag_to(Point::new(x, y)); }
                    Op::Release => { vp.release(); }
                    Op::Leave => { vp.leave(); }
                    Op::Reset => vp.reset(),
                }
                prop_assert!(vp.scale() >= limits.min && vp.scale() <= limits.max);
            }
            vp.reset();
            prop_assert_eq!(vp.state(), ViewportState::IDENTITY);
        }

        #[test]
        fn anchored_zoom_preserves_content_under_pointer(
            x in 0.0..200.0f64,
            y in 0.0..60.0f64,
            pan_x in -100.0..100.0f64,
            pan_y in -100.0..100.0f64,
            steps in proptest::collection::vec(any::<bool>(), 1..20),
        ) {
            let mut vp = ViewportController::default();
            vp.pan_by(Vec2::new(pan_x, pan_y));
            let pointer = Point::new(x, y);
            let before = vp.screen_to_logical(pointer);
            for zoom_in in steps {
                let dir = if zoom_in { ZoomDirection::In } else { ZoomDirection::Out };
                vp.wheel(pointer, dir);
            }
            let after = vp.screen_to_logical(pointer);
            prop_assert!((after.x - before.x).abs() < 1e-6);
            prop_assert!((after.y - before.y).abs() < 1e-6);
        }
    }
}

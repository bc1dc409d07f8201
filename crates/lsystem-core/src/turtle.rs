//! The turtle: position, orientation, drawing attributes, and their save/restore stack.

use crate::{
    diagnostics::{Diagnostic, DiagnosticSink},
    vector::{BoundingBox, CardinalAxis, Frame3, Vec3},
};

/// Either an index into a generator-defined color table, or an explicit RGB triple.
/// Both forms are valid results of the `'` color action.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Color {
    Index(i64),
    Rgb(Vec3),
}

/// Tropism bends the turtle's heading toward (or away from) a fixed vector each time it
/// moves, simulating phototropism/gravitropism. Disabled by default.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TropismState {
    pub vector: Vec3,
    pub susceptibility: f64,
    pub enabled: bool,
}

impl Default for TropismState {
    fn default() -> Self {
        Self { vector: Vec3::new(0.0, 0.0, -1.0), susceptibility: 0.2, enabled: false }
    }
}

/// A `+`/`-`/`&`/`^`/`\`/`/` turn direction, used by the no-argument forms of the turn
/// actions which rotate by the default angle rather than an explicit one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Positive,
    Negative,
}

/// The full turtle state: everything `[` saves and `]` restores.
#[derive(Debug, Clone, PartialEq)]
pub struct TurtleState {
    pub frame: Frame3,
    pub position: Vec3,
    pub tropism: TropismState,
    pub width: f64,
    pub color: Color,
    pub color_back: Color,
    pub texture: i64,
    pub default_distance: f64,
    pub default_turn_radians: f64,
}

/// Configuration that stays fixed for a run (not saved/restored by `[`/`]`), mirroring the
/// run's `width_scale`/`gravity` fields set once at construction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TurtleConfig {
    pub width_scale: f64,
    pub gravity: Vec3,
}

impl TurtleState {
    /// The turtle's starting state: heading `+Y`, left `-X`, up `+Z`,
    /// positioned at the origin, width and color zeroed, tropism disabled.
    #[must_use]
    pub fn initial(width_scale: f64, default_turn_degrees: f64, default_distance: f64) -> Self {
        Self {
            frame: Frame3::new(
                Vec3::new(0.0, 1.0, 0.0),
                Vec3::new(-1.0, 0.0, 0.0),
                Vec3::new(0.0, 0.0, 1.0),
            ),
            position: Vec3::ZERO,
            tropism: TropismState::default(),
            width: width_scale,
            color: Color::Index(0),
            color_back: Color::Index(0),
            texture: 0,
            default_distance,
            default_turn_radians: default_turn_degrees.to_radians(),
        }
    }

    #[must_use]
    pub fn heading(&self) -> Vec3 {
        self.frame.h
    }

    pub fn turn(&mut self, angle_radians: f64) {
        self.frame = self.frame.rotate_cardinal(CardinalAxis::Z, angle_radians);
    }

    pub fn turn_default(&mut self, direction: Direction) {
        self.turn(signed_angle(self.default_turn_radians, direction));
    }

    pub fn pitch(&mut self, angle_radians: f64) {
        self.frame = self.frame.rotate_cardinal(CardinalAxis::Y, angle_radians);
    }

    pub fn pitch_default(&mut self, direction: Direction) {
        self.pitch(signed_angle(self.default_turn_radians, direction));
    }

    pub fn roll(&mut self, angle_radians: f64) {
        self.frame = self.frame.rotate_cardinal(CardinalAxis::X, angle_radians);
    }

    pub fn roll_default(&mut self, direction: Direction) {
        self.roll(signed_angle(self.default_turn_radians, direction));
    }

    pub fn reverse(&mut self) {
        self.frame = self.frame.reversed();
    }

    /// Rolls so the left vector is perpendicular to the antigravity vector (`$`, page 57 of
    /// published tables of turtle commands). A no-op when heading is too close to parallel with gravity, since
    /// the cross product that defines the new left vector would be degenerate — a straight
    /// fixed numeric tolerance, not a judgment call made here.
    pub fn roll_horizontal(&mut self, gravity: Vec3) {
        const TOLERANCE: f64 = 1e-4;
        let heading = self.heading();
        let mut left = gravity.cross(heading);
        let magnitude = left.length();
        if magnitude < TOLERANCE {
            return;
        }
        left = left.scale(1.0 / magnitude);
        let up = heading.cross(left);
        self.frame = Frame3::new(heading, left, up);
    }

    /// Moves `distance` along the heading, extends `bbox`, and applies tropism if enabled.
    pub fn move_forward(&mut self, distance: f64, bbox: &mut BoundingBox) {
        self.position = self.position + self.heading().scale(distance);
        bbox.extend(self.position);

        if self.tropism.enabled && self.tropism.susceptibility != 0.0 {
            let axis = self.heading().cross(self.tropism.vector);
            self.frame = self.frame.rotate_about(axis, self.tropism.susceptibility);
        }
    }
}

fn signed_angle(magnitude: f64, direction: Direction) -> f64 {
    match direction {
        Direction::Positive => magnitude,
        Direction::Negative => -magnitude,
    }
}

/// The `[`/`]` save/restore stack, with a configurable depth limit (see `DESIGN.md` for
/// why this is a constructor parameter rather than a fixed constant).
#[derive(Debug, Clone)]
pub struct TurtleStack {
    frames: Vec<TurtleState>,
    max_depth: usize,
}

impl TurtleStack {
    #[must_use]
    pub fn new(max_depth: usize) -> Self {
        Self { frames: Vec::new(), max_depth }
    }

    /// Pushes a copy of `state`. Reports [`Diagnostic::TurtleStackOverflow`] and drops the
    /// push silently past `max_depth` rather than panicking.
    pub fn push(&mut self, state: &TurtleState, sink: &mut dyn DiagnosticSink) {
        if self.frames.len() >= self.max_depth {
            sink.report(Diagnostic::TurtleStackOverflow { depth: self.max_depth });
            return;
        }
        self.frames.push(state.clone());
    }

    /// Pops and returns the most recently pushed state. Reports
    /// [`Diagnostic::TurtleStackUnderflow`] and returns `None` if the stack is empty.
    pub fn pop(&mut self, sink: &mut dyn DiagnosticSink) -> Option<TurtleState> {
        match self.frames.pop() {
            Some(state) => Some(state),
            None => {
                sink.report(Diagnostic::TurtleStackUnderflow);
                None
            }
        }
    }

    #[must_use]
    pub fn depth(&self) -> usize {
        self.frames.len()
    }
}

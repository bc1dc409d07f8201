//! The output sink the turtle interpreter drives: one call per drawing event.
//!
//! The concrete output format is left up to the embedder; `lsystem-cli` supplies
//! two implementations (a generic text dump and a Radiance-like scene format). This trait is
//! the seam between them and the engine — minus the line-width/color/texture "only emit
//! on change" memoization, which the interpreter
//! keeps in function-local `static`s. Here that memoization is the generator implementation's
//! own problem (each call always carries the current state), since hidden global statics
//! would make two interpreter runs in the same process interfere with each other.

use crate::{module::Module, polygon::Polygon, turtle::TurtleState, value::Value, vector::Vec3};

/// Receives one call per turtle action that has a visible effect.
pub trait Generator {
    /// Emitted once, before the first module of a run is interpreted.
    fn prelude(&mut self) {}

    /// Emitted once, after the last module of a run has been interpreted.
    fn postscript(&mut self) {}

    /// Emitted once, before the first `line_to` after a `move_to`-only or idle stretch.
    fn start_graphics(&mut self) {}

    /// Emitted when drawing mode ends (an explicit non-draw action, or a width/color/texture
    /// change that the generator chooses to treat as a graphics-state boundary).
    fn flush_graphics(&mut self) {}

    /// A non-drawing move: the turtle changed position but no edge should render.
    fn move_to(&mut self, state: &TurtleState);

    /// A drawing move: render an edge from `from` to `state.position`.
    fn line_to(&mut self, from: Vec3, state: &TurtleState);

    fn set_width(&mut self, state: &TurtleState);
    fn set_color(&mut self, state: &TurtleState);
    fn set_back_color(&mut self, state: &TurtleState);
    fn set_texture(&mut self, state: &TurtleState);

    /// A closed polygon, with the turtle's current attributes applied to its faces.
    fn polygon(&mut self, polygon: &Polygon, state: &TurtleState);

    /// A `~` object-instance reference: the module gives the object's name (conventionally
    /// with a leading sigil the generator strips) and its instantiated arguments.
    fn draw_object(&mut self, module: &Module, args: &[Value], state: &TurtleState, contact_point: Vec3);

    /// A free-text header comment a run may want to stamp at the top of its output.
    fn set_header(&mut self, _header: &str) {}

    /// Names the run (conventionally the input file's base name), for back-ends that embed
    /// it in their output.
    fn set_name(&mut self, _name: &str) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct RecordingGenerator {
        calls: Vec<&'static str>,
    }

    impl Generator for RecordingGenerator {
        fn start_graphics(&mut self) {
            self.calls.push("start");
        }
        fn flush_graphics(&mut self) {
            self.calls.push("flush");
        }
        fn move_to(&mut self, _state: &TurtleState) {
            self.calls.push("move");
        }
        fn line_to(&mut self, _from: Vec3, _state: &TurtleState) {
            self.calls.push("line");
        }
        fn set_width(&mut self, _state: &TurtleState) {
            self.calls.push("width");
        }
        fn set_color(&mut self, _state: &TurtleState) {
            self.calls.push("color");
        }
        fn set_back_color(&mut self, _state: &TurtleState) {
            self.calls.push("back_color");
        }
        fn set_texture(&mut self, _state: &TurtleState) {
            self.calls.push("texture");
        }
        fn polygon(&mut self, _polygon: &Polygon, _state: &TurtleState) {
            self.calls.push("polygon");
        }
        fn draw_object(&mut self, _module: &Module, _args: &[Value], _state: &TurtleState, _contact_point: Vec3) {
            self.calls.push("object");
        }
    }

    #[test]
    fn default_lifecycle_methods_are_no_ops_unless_overridden() {
        let mut gen = RecordingGenerator::default();
        gen.start_graphics();
        gen.flush_graphics();
        assert_eq!(gen.calls, vec!["start", "flush"]);
    }
}

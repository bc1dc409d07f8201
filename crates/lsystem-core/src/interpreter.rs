//! Turtle interpretation: walks an instantiated module list, driving the turtle, the
//! polygon stack, and a [`Generator`] through the matching draw-state machine.

use crate::{
    actions::{Action, ActionTable},
    diagnostics::DiagnosticSink,
    generator::Generator,
    intern::RIGHT_BRACKET,
    module::Module,
    polygon::PolygonStack,
    turtle::{Color, TropismState, TurtleConfig, TurtleStack, TurtleState},
    value::Value,
    vector::{BoundingBox, Vec3},
};

/// Where the interpreter is with respect to graphics output: drawing hasn't started, a
/// line is being built, or a polygon is being built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DrawState {
    Start,
    Drawing,
    Polygon,
}

const WIDTH_EPSILON: f64 = 1e-6;

/// Drives one full module-list walk. Holds the "don't re-emit a state change that didn't
/// change" memoization scoped to one interpreter instance so two runs never see each
/// other's history.
pub struct Interpreter {
    actions: ActionTable,
    config: TurtleConfig,
    draw_state: DrawState,
    last_width: Option<f64>,
    last_color: Option<Color>,
    last_color_back: Option<Color>,
    last_texture: Option<i64>,
}

impl Interpreter {
    #[must_use]
    pub fn new(actions: ActionTable, config: TurtleConfig) -> Self {
        Self {
            actions,
            config,
            draw_state: DrawState::Start,
            last_width: None,
            last_color: None,
            last_color_back: None,
            last_texture: None,
        }
    }

    /// Interprets `modules` against a fresh turtle seeded by `width_scale`/`default_turn`/
    /// `default_distance`, returning the bounding box of every point visited.
    #[allow(clippy::too_many_arguments)]
    pub fn interpret(
        &mut self,
        modules: &[Module],
        width_scale: f64,
        default_turn_degrees: f64,
        default_distance: f64,
        max_stack_depth: usize,
        generator: &mut dyn Generator,
        sink: &mut dyn DiagnosticSink,
    ) -> BoundingBox {
        let mut turtle = TurtleState::initial(width_scale, default_turn_degrees, default_distance);
        let mut stack = TurtleStack::new(max_stack_depth);
        let mut polygons = PolygonStack::new(crate::polygon::DEFAULT_MAX_DEPTH);
        let mut bbox = BoundingBox::empty();
        bbox.extend(turtle.position);

        let mut i = 0usize;
        while i < modules.len() {
            let module = &modules[i];
            match self.actions.lookup(module.name) {
                Some(action) => {
                    i = self.dispatch(action, modules, i, &mut turtle, &mut stack, &mut polygons, &mut bbox, generator, sink);
                }
                None => {
                    sink.report(crate::diagnostics::Diagnostic::UnknownAction(module.name));
                }
            }
            i += 1;
        }

        bbox
    }

    #[allow(clippy::too_many_arguments)]
    fn dispatch(
        &mut self,
        action: Action,
        modules: &[Module],
        i: usize,
        turtle: &mut TurtleState,
        stack: &mut TurtleStack,
        polygons: &mut PolygonStack,
        bbox: &mut BoundingBox,
        generator: &mut dyn Generator,
        sink: &mut dyn DiagnosticSink,
    ) -> usize {
        let module = &modules[i];
        match action {
            Action::Move => self.draw_or_move(module, turtle, polygons, bbox, generator, false),
            Action::MoveHalf => {
                let half = 0.5 * turtle.default_distance;
                let half_module = Module::new(module.name, vec![crate::expr::Expression::Value(Value::Float(half))]);
                self.draw_or_move(&half_module, turtle, polygons, bbox, generator, false);
            }
            Action::Draw => self.draw_or_move(module, turtle, polygons, bbox, generator, true),
            Action::DrawHalf => {
                let half = 0.5 * turtle.default_distance;
                let half_module = Module::new(module.name, vec![crate::expr::Expression::Value(Value::Float(half))]);
                self.draw_or_move(&half_module, turtle, polygons, bbox, generator, true);
            }
            Action::TurnLeft => turtle.turn(signed_angle(module, turtle.default_turn_radians, 1.0)),
            Action::TurnRight => turtle.turn(signed_angle(module, turtle.default_turn_radians, -1.0)),
            Action::PitchDown => turtle.pitch(signed_angle(module, turtle.default_turn_radians, 1.0)),
            Action::PitchUp => turtle.pitch(signed_angle(module, turtle.default_turn_radians, -1.0)),
            Action::RollRight => turtle.roll(signed_angle(module, turtle.default_turn_radians, 1.0)),
            Action::RollLeft => turtle.roll(signed_angle(module, turtle.default_turn_radians, -1.0)),
            Action::Reverse => turtle.reverse(),
            Action::Push => stack.push(turtle, sink),
            Action::Pop => {
                if let Some(restored) = stack.pop(sink) {
                    *turtle = restored;
                }
                // Look ahead: if the next module isn't itself a Pop, refresh width/color
                // and reposition the generator. Deep ]] nesting skips this churn.
                if let Some(next) = modules.get(i + 1) {
                    if next.name != RIGHT_BRACKET {
                        self.sync_width(turtle, generator);
                        self.sync_color(turtle, generator);
                        self.sync_color_back(turtle, generator);
                        generator.move_to(turtle);
                    }
                }
            }
            Action::RollHorizontal => turtle.roll_horizontal(self.config.gravity),
            Action::StartPolygon => {
                if self.draw_state == DrawState::Drawing {
                    generator.flush_graphics();
                }
                self.draw_state = DrawState::Polygon;
                polygons.start(sink);
            }
            Action::PolygonVertex => {
                if let Some(top) = polygons.top_mut() {
                    top.push_vertex(turtle.position);
                }
            }
            Action::PolygonMove => {
                let distance = module.arg_float(0).unwrap_or(turtle.default_distance);
                turtle.move_forward(distance, bbox);
            }
            Action::EndPolygon => {
                if let Some(polygon) = polygons.finish() {
                    generator.polygon(&polygon, turtle);
                }
                if polygons.is_empty() {
                    self.draw_state = DrawState::Start;
                }
            }
            Action::MultiplyDefaultDistance => {
                let factor = module.arg_float(0).unwrap_or(1.1);
                turtle.default_distance *= factor;
            }
            Action::MultiplyDefaultTurnAngle => {
                let factor = module.arg_float(0).unwrap_or(1.1);
                turtle.default_turn_radians *= factor;
            }
            Action::MultiplyWidth => {
                let factor = module.arg_float(0).unwrap_or(1.4);
                turtle.width *= factor;
                self.sync_width(turtle, generator);
            }
            Action::ChangeWidth => {
                turtle.width = module.arg_float(0).unwrap_or(turtle.width);
                self.sync_width(turtle, generator);
            }
            Action::ChangeColor => {
                set_color_from_args(module, turtle);
                self.sync_color(turtle, generator);
                self.sync_color_back(turtle, generator);
            }
            Action::ChangeTexture => {
                if let Some(t) = module.arg(0).and_then(Value::as_int) {
                    turtle.texture = t;
                }
                self.sync_texture(turtle, generator);
            }
            Action::DrawObject => {
                let args: Vec<Value> = module.params.iter().filter_map(|p| match p {
                    crate::expr::Expression::Value(v) => Some(*v),
                    _ => None,
                }).collect();
                generator.draw_object(module, &args, turtle, turtle.position);
            }
            // Step back one from the matching `]` so the outer loop's `i += 1` lands
            // exactly on it, letting the next dispatch pop it normally. If the branch is
            // unbalanced (no matching `]`), land on the last module instead of looping.
            Action::CutBranch => {
                let target = find_branch_cut_target(modules, i);
                return if target > i { target - 1 } else { target };
            }
            Action::Tropism => apply_tropism(module, turtle),
        }
        i
    }

    fn draw_or_move(
        &mut self,
        module: &Module,
        turtle: &mut TurtleState,
        polygons: &mut PolygonStack,
        bbox: &mut BoundingBox,
        generator: &mut dyn Generator,
        is_draw: bool,
    ) {
        let distance = module.arg_float(0).unwrap_or(turtle.default_distance);

        if self.draw_state == DrawState::Polygon {
            let before = turtle.position;
            if let Some(top) = polygons.top_mut() {
                if top.last_vertex() != Some(before) {
                    top.push_vertex(before);
                }
            }
            turtle.move_forward(distance, bbox);
            if let Some(top) = polygons.top_mut() {
                top.push_vertex(turtle.position);
            }
            return;
        }

        if is_draw && self.draw_state == DrawState::Start {
            generator.start_graphics();
            self.draw_state = DrawState::Drawing;
        }

        let from = turtle.position;
        turtle.move_forward(distance, bbox);
        if is_draw {
            generator.line_to(from, turtle);
        } else {
            generator.move_to(turtle);
        }
    }

    fn sync_width(&mut self, turtle: &TurtleState, generator: &mut dyn Generator) {
        if self.last_width.is_some_and(|w| (w - turtle.width).abs() < WIDTH_EPSILON) {
            return;
        }
        if self.draw_state == DrawState::Drawing {
            generator.flush_graphics();
            self.draw_state = DrawState::Start;
        }
        generator.set_width(turtle);
        self.last_width = Some(turtle.width);
    }

    fn sync_color(&mut self, turtle: &TurtleState, generator: &mut dyn Generator) {
        if self.last_color == Some(turtle.color) {
            return;
        }
        if self.draw_state == DrawState::Drawing {
            generator.flush_graphics();
            self.draw_state = DrawState::Start;
        }
        generator.set_color(turtle);
        self.last_color = Some(turtle.color);
    }

    fn sync_color_back(&mut self, turtle: &TurtleState, generator: &mut dyn Generator) {
        if self.last_color_back == Some(turtle.color_back) {
            return;
        }
        if self.draw_state == DrawState::Drawing {
            generator.flush_graphics();
            self.draw_state = DrawState::Start;
        }
        generator.set_back_color(turtle);
        self.last_color_back = Some(turtle.color_back);
    }

    fn sync_texture(&mut self, turtle: &TurtleState, generator: &mut dyn Generator) {
        if self.last_texture == Some(turtle.texture) {
            return;
        }
        if self.draw_state == DrawState::Drawing {
            generator.flush_graphics();
            self.draw_state = DrawState::Start;
        }
        generator.set_texture(turtle);
        self.last_texture = Some(turtle.texture);
    }
}

/// Picks the turn/pitch/roll angle: the explicit argument in degrees if given (converted to
/// radians), or the turtle's current default-turn magnitude otherwise. `sign` captures
/// whether this action turns positive or negative, applied uniformly to both cases —
/// matching e.g. `TurnLeftImpl`'s unsigned explicit arg vs `TurnRightImpl`'s negated one.
fn signed_angle(module: &Module, default_radians: f64, sign: f64) -> f64 {
    match module.arg_float(0) {
        Some(degrees) => sign * degrees.to_radians(),
        None => sign * default_radians,
    }
}

fn set_color_from_args(module: &Module, turtle: &mut TurtleState) {
    let args: Vec<f64> = (0..3).filter_map(|n| module.arg_float(n)).collect();
    match args.len() {
        3 => turtle.color = Color::Rgb(Vec3::new(args[0], args[1], args[2])),
        2 => {
            turtle.color = Color::Index(args[0] as i64);
            turtle.color_back = Color::Index(args[1] as i64);
        }
        1 => turtle.color = Color::Index(args[0] as i64),
        _ => {
            if let Color::Index(i) = turtle.color {
                turtle.color = Color::Index(i + 1);
            }
        }
    }
}

fn apply_tropism(module: &Module, turtle: &mut TurtleState) {
    let args: Vec<f64> = (0..4).filter_map(|n| module.arg_float(n)).collect();
    match args.len() {
        1 => {
            if args[0].abs() < 1e-9 {
                turtle.tropism.enabled = false;
            } else {
                turtle.tropism.enabled = true;
                turtle.tropism.susceptibility = args[0];
            }
        }
        4 => {
            turtle.tropism = TropismState {
                vector: Vec3::new(args[0], args[1], args[2]),
                susceptibility: args[3],
                enabled: true,
            };
        }
        _ => {}
    }
}

/// Finds the index of the `]` that truncates the current branch, scanning forward from
/// `start + 1` and tracking nesting depth so an inner `[...]` pair doesn't stop the scan
/// early (see `DESIGN.md` for why this walk isn't shared with the context matcher's).
fn find_branch_cut_target(modules: &[Module], start: usize) -> usize {
    let mut brackets = 0i32;
    let mut idx = start + 1;
    while idx < modules.len() {
        let candidate = &modules[idx];
        if candidate.is_right_bracket() {
            if brackets == 0 {
                return idx;
            }
            brackets -= 1;
        } else if candidate.is_left_bracket() {
            brackets += 1;
        }
        idx += 1;
    }
    modules.len().saturating_sub(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::RecordingSink;
    use crate::expr::Expression;
    use crate::intern::{Interner, LEFT_BRACKET};

    #[derive(Default)]
    struct CountingGenerator {
        lines: usize,
        moves: usize,
        starts: usize,
    }

    impl Generator for CountingGenerator {
        fn start_graphics(&mut self) {
            self.starts += 1;
        }
        fn move_to(&mut self, _state: &TurtleState) {
            self.moves += 1;
        }
        fn line_to(&mut self, _from: Vec3, _state: &TurtleState) {
            self.lines += 1;
        }
        fn set_width(&mut self, _state: &TurtleState) {}
        fn set_color(&mut self, _state: &TurtleState) {}
        fn set_back_color(&mut self, _state: &TurtleState) {}
        fn set_texture(&mut self, _state: &TurtleState) {}
        fn polygon(&mut self, _polygon: &crate::polygon::Polygon, _state: &TurtleState) {}
        fn draw_object(&mut self, _module: &Module, _args: &[Value], _state: &TurtleState, _contact_point: Vec3) {}
    }

    fn config() -> TurtleConfig {
        TurtleConfig { width_scale: 1.0, gravity: Vec3::new(0.0, 0.0, -1.0) }
    }

    #[test]
    fn draw_action_emits_start_then_line() {
        let mut interner = Interner::new();
        let actions = ActionTable::with_defaults(&mut interner);
        let mut interp = Interpreter::new(actions, config());
        let f = Module::new(interner.intern("F"), vec![Expression::Value(Value::Float(1.0))]);
        let mut generator = CountingGenerator::default();
        let mut sink = RecordingSink::default();

        let bbox = interp.interpret(&[f], 1.0, 90.0, 1.0, 100, &mut generator, &mut sink);
        assert_eq!(generator.starts, 1);
        assert_eq!(generator.lines, 1);
        assert!(!bbox.is_empty());
    }

    #[test]
    fn move_action_never_starts_graphics() {
        let mut interner = Interner::new();
        let actions = ActionTable::with_defaults(&mut interner);
        let mut interp = Interpreter::new(actions, config());
        let f = Module::new(interner.intern("f"), vec![Expression::Value(Value::Float(1.0))]);
        let mut generator = CountingGenerator::default();
        let mut sink = RecordingSink::default();

        interp.interpret(&[f], 1.0, 90.0, 1.0, 100, &mut generator, &mut sink);
        assert_eq!(generator.starts, 0);
        assert_eq!(generator.moves, 1);
    }

    #[test]
    fn cut_branch_skips_to_the_matching_close_bracket() {
        let mut interner = Interner::new();
        let percent = Module::new(interner.intern("%"), vec![]);
        let b = Module::new(interner.intern("B"), vec![]);
        let lb = Module::new(LEFT_BRACKET, vec![]);
        let c = Module::new(interner.intern("C"), vec![]);
        let rb_inner = Module::new(crate::intern::RIGHT_BRACKET, vec![]);
        let d = Module::new(interner.intern("D"), vec![]);
        let rb_outer = Module::new(crate::intern::RIGHT_BRACKET, vec![]);

        let modules = vec![percent, b, lb, c, rb_inner, d, rb_outer];
        let target = find_branch_cut_target(&modules, 0);
        assert_eq!(target, 6); // the outer closing bracket, not the inner one
    }
}

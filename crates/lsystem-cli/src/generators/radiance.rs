//! The Radiance-like back-end: `Start_Object_Group`/`End_Object_Group` framing around
//! `cone`/`sphere`/`polygon`/`object` primitives, with coordinates reverted to a
//! right-handed system.

use std::io::{self, Write};

use lsystem_core::{BoundingBox, Color, Generator, Interner, Module, Polygon, TurtleState, Value, Vec3};

use super::format_component;

/// Writes the Radiance-like scene format to `out`, and a `start`/`bounds` summary to
/// `bounds_out` once the run finishes. Holds the run's [`Interner`] so `draw_object` can
/// resolve a module's interned name back into the object identifier it names.
pub struct RadianceGenerator<'a, O: Write, B: Write> {
    out: O,
    bounds_out: B,
    interner: &'a Interner,
    group: usize,
    last_position: Vec3,
    last_width: f64,
    bbox: BoundingBox,
}

impl<'a, O: Write, B: Write> RadianceGenerator<'a, O, B> {
    #[must_use]
    pub fn new(out: O, bounds_out: B, interner: &'a Interner) -> Self {
        Self {
            out,
            bounds_out,
            interner,
            group: 0,
            last_position: Vec3::ZERO,
            last_width: 0.0,
            bbox: BoundingBox::empty(),
        }
    }

    fn next_group(&mut self) -> usize {
        self.group += 1;
        self.group
    }

    fn write_attributes(&mut self, state: &TurtleState) -> io::Result<()> {
        writeln!(self.out, " FrontMaterial: {}", color_index(state.color))?;
        writeln!(self.out, " FrontTexture: {}", state.texture)?;
        writeln!(self.out, " BackMaterial: {}", color_index(state.color_back))?;
        writeln!(self.out, " BackTexture: {}", state.texture)?;
        writeln!(self.out)
    }
}

fn color_index(color: Color) -> i64 {
    match color {
        Color::Index(i) => i,
        Color::Rgb(_) => 0,
    }
}

/// Reverts to a right-handed coordinate system: `(-z, y, -x)`, the convention this
/// `OutputVec`.
fn format_revert(v: Vec3) -> String {
    format!("{} {} {}", format_component(-v.z), format_component(v.y), format_component(-v.x))
}

impl<'a, O: Write, B: Write> Generator for RadianceGenerator<'a, O, B> {
    fn prelude(&mut self) {
        self.group = 0;
    }

    fn postscript(&mut self) {
        let start = Vec3::ZERO;
        let _ = writeln!(self.bounds_out, "start");
        let _ = writeln!(self.bounds_out, "  {}", format_revert(start));
        let _ = writeln!(self.bounds_out);
        let _ = writeln!(self.bounds_out, "bounds");
        let _ = writeln!(
            self.bounds_out,
            "  min: {:>12.5} {:>12.5} {:>12.5}",
            self.bbox.min.x, self.bbox.min.y, self.bbox.min.z
        );
        let _ = writeln!(
            self.bounds_out,
            "  max: {:>12.5} {:>12.5} {:>12.5}",
            self.bbox.max.x, self.bbox.max.y, self.bbox.max.z
        );
        let _ = writeln!(self.bounds_out, "\n");
        let _ = writeln!(self.out, "\nRADEND");
    }

    fn move_to(&mut self, state: &TurtleState) {
        self.bbox.extend(state.position);
        self.last_position = state.position;
    }

    fn line_to(&mut self, from: Vec3, state: &TurtleState) {
        self.bbox.extend(state.position);
        let length = (state.position - from).length();
        let start_radius = 0.5 * self.last_width * length / 100.0;
        let end_radius = 0.5 * state.width * length / 100.0;

        let group = self.next_group();
        let _ = writeln!(self.out, "Start_Object_Group {group}");
        let _ = self.write_attributes(state);
        let _ = writeln!(self.out, "  cone");
        let _ = writeln!(self.out, "    {}", format_revert(from));
        let _ = writeln!(self.out, "    {}", format_revert(state.position));
        let _ = writeln!(self.out, "    {start_radius:.5} {end_radius:.5}\n");
        let _ = writeln!(self.out, "  sphere");
        let _ = writeln!(self.out, "    {}", format_revert(state.position));
        let _ = writeln!(self.out, "    {end_radius:.5}\n");
        let _ = writeln!(self.out, "End_Object_Group {group}\n");

        self.last_position = state.position;
        self.last_width = state.width;
    }

    fn set_width(&mut self, _state: &TurtleState) {}
    fn set_color(&mut self, _state: &TurtleState) {}
    fn set_back_color(&mut self, _state: &TurtleState) {}
    fn set_texture(&mut self, _state: &TurtleState) {}

    fn polygon(&mut self, polygon: &Polygon, state: &TurtleState) {
        for &v in polygon.vertices() {
            self.bbox.extend(v);
        }
        let group = self.next_group();
        let _ = writeln!(self.out, "Start_Object_Group {group}");
        let _ = self.write_attributes(state);
        let _ = writeln!(self.out, "  polygon");
        let _ = writeln!(self.out, "  vertices: {}", polygon.vertices().len());
        for v in polygon.vertices() {
            let _ = writeln!(self.out, "    {}", format_revert(*v));
        }
        let _ = writeln!(self.out);
        let _ = writeln!(self.out, "End_Object_Group {group}\n");
    }

    fn draw_object(&mut self, module: &Module, args: &[Value], state: &TurtleState, contact_point: Vec3) {
        self.bbox.extend(contact_point);
        let group = self.next_group();
        let _ = writeln!(self.out, "Start_Object_Group {group}");
        let _ = self.write_attributes(state);
        let _ = writeln!(self.out, " object");
        let _ = writeln!(self.out, "  Name: {}", module_object_name(module, self.interner));
        let _ = writeln!(self.out, "  LineWidth: {:.5}", state.width);
        let _ = writeln!(self.out, "  LineDistance: {:.5}", state.default_distance);
        let _ = writeln!(self.out, "  ContactPoint: {}", format_revert(contact_point));
        let _ = writeln!(self.out, "  Heading: {}", format_revert(state.frame.h));
        let _ = writeln!(self.out, "  Left: {}", format_revert(state.frame.l));
        let _ = writeln!(self.out, "  Up:{}", format_revert(state.frame.u));
        let _ = writeln!(self.out, "  nargs: {}", args.len());
        for arg in args {
            let _ = writeln!(self.out, "    {arg}");
        }
        let _ = writeln!(self.out);
        let _ = writeln!(self.out, "End_Object_Group {group}\n");
    }
}

fn module_object_name(module: &Module, interner: &Interner) -> String {
    interner.resolve(module.name).trim_start_matches('~').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use lsystem_core::{Frame3, TropismState};

    fn sample_state() -> TurtleState {
        TurtleState {
            frame: Frame3::IDENTITY,
            position: Vec3::new(1.0, 2.0, 3.0),
            tropism: TropismState::default(),
            width: 1.0,
            color: Color::Index(2),
            color_back: Color::Index(0),
            texture: 0,
            default_distance: 1.0,
            default_turn_radians: std::f64::consts::FRAC_PI_2,
        }
    }

    #[test]
    fn line_to_emits_a_cone_and_a_sphere() {
        let interner = Interner::new();
        let mut out = Vec::new();
        let mut bounds = Vec::new();
        let mut gen = RadianceGenerator::new(&mut out, &mut bounds, &interner);
        gen.line_to(Vec3::ZERO, &sample_state());
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Start_Object_Group 1"));
        assert!(text.contains("cone"));
        assert!(text.contains("sphere"));
        assert!(text.contains("End_Object_Group 1"));
    }

    #[test]
    fn polygon_emits_exact_vertex_count_without_closing_repeat() {
        let interner = Interner::new();
        let mut out = Vec::new();
        let mut bounds = Vec::new();
        let mut gen = RadianceGenerator::new(&mut out, &mut bounds, &interner);
        let mut polygon = Polygon::new();
        polygon.push_vertex(Vec3::new(0.0, 0.0, 0.0));
        polygon.push_vertex(Vec3::new(1.0, 0.0, 0.0));
        polygon.push_vertex(Vec3::new(0.0, 1.0, 0.0));
        gen.polygon(&polygon, &sample_state());
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("vertices: 3"));
    }

    #[test]
    fn postscript_writes_radend_and_bounds() {
        let interner = Interner::new();
        let mut out = Vec::new();
        let mut bounds = Vec::new();
        let mut gen = RadianceGenerator::new(&mut out, &mut bounds, &interner);
        gen.move_to(&sample_state());
        gen.postscript();
        assert!(String::from_utf8(out).unwrap().contains("RADEND"));
        assert!(String::from_utf8(bounds).unwrap().contains("bounds"));
    }

    #[test]
    fn draw_object_resolves_module_name_stripping_tilde_sigil() {
        let mut interner = Interner::new();
        let name = interner.intern("~lamp");
        let mut out = Vec::new();
        let mut bounds = Vec::new();
        let mut gen = RadianceGenerator::new(&mut out, &mut bounds, &interner);
        let module = Module::new(name, vec![]);
        gen.draw_object(&module, &[], &sample_state(), Vec3::ZERO);
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Name: lamp"));
    }
}

//! The "generic" text back-end: an attribute-tagged group-per-primitive dump, plus a
//! companion bounds file.

use std::io::{self, Write};

use lsystem_core::{BoundingBox, Color, Generator, Interner, Module, Polygon, TurtleState, Value, Vec3};

use super::format_vec;

const INDENT: &str = "  ";

/// Writes the generic group-per-primitive format to `out`, and a separate `start`/`bounds`
/// summary to `bounds_out` once the run finishes. Holds the run's [`Interner`] so `draw_object`
/// can turn a module's interned name back into the object identifier it names.
pub struct GenericGenerator<'a, O: Write, B: Write> {
    out: O,
    bounds_out: B,
    interner: &'a Interner,
    group: usize,
    bbox: BoundingBox,
    header: Option<String>,
}

impl<'a, O: Write, B: Write> GenericGenerator<'a, O, B> {
    #[must_use]
    pub fn new(out: O, bounds_out: B, interner: &'a Interner) -> Self {
        Self { out, bounds_out, interner, group: 0, bbox: BoundingBox::empty(), header: None }
    }

    fn next_group(&mut self) -> usize {
        self.group += 1;
        self.group
    }

    fn write_attributes(&mut self, state: &TurtleState, with_width: bool) -> io::Result<()> {
        writeln!(self.out, "{INDENT}FrontMaterial: {}", color_index(state.color))?;
        writeln!(self.out, "{INDENT}FrontTexture: {}", state.texture)?;
        writeln!(self.out, "{INDENT}BackMaterial: {}", color_index(state.color_back))?;
        writeln!(self.out, "{INDENT}BackTexture: {}", state.texture)?;
        if with_width {
            writeln!(self.out, "{INDENT}Width: {:.5}", state.width)?;
        }
        Ok(())
    }
}

fn color_index(color: Color) -> i64 {
    match color {
        Color::Index(i) => i,
        // The generic format only has an indexed material slot; an explicit RGB color
        // falls back to index 0 rather than inventing a material table entry on the fly.
        Color::Rgb(_) => 0,
    }
}

impl<'a, O: Write, B: Write> Generator for GenericGenerator<'a, O, B> {
    fn prelude(&mut self) {
        if let Some(header) = self.header.clone() {
            let _ = writeln!(self.out, "Start Header\n{header}\nEnd Header\n\n");
        }
    }

    fn postscript(&mut self) {
        let _ = writeln!(self.bounds_out, "start");
        let _ = writeln!(self.bounds_out, "  {{0.00000 0.00000 0.00000}}");
        let _ = writeln!(self.bounds_out);
        let _ = writeln!(self.bounds_out, "bounds");
        let _ = writeln!(self.bounds_out, "  min: {{{}}}", format_vec(self.bbox.min));
        let _ = writeln!(self.bounds_out, "  max: {{{}}}", format_vec(self.bbox.max));
        let _ = writeln!(self.bounds_out);
        let _ = writeln!(self.out, "End File");
    }

    fn move_to(&mut self, state: &TurtleState) {
        self.bbox.extend(state.position);
    }

    fn line_to(&mut self, from: Vec3, state: &TurtleState) {
        self.bbox.extend(state.position);
        let group = self.next_group();
        let _ = writeln!(self.out, "Start Group {group}");
        let _ = self.write_attributes(state, true);
        let _ = writeln!(self.out, "line");
        let _ = writeln!(self.out, "{{{}}}", format_vec(from));
        let _ = writeln!(self.out, "{{{}}}", format_vec(state.position));
        let _ = writeln!(self.out, "End Group {group}\n");
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
        let _ = writeln!(self.out, "Start Group {group}");
        let _ = self.write_attributes(state, false);
        let _ = writeln!(self.out, "polygon");
        let _ = writeln!(self.out, "vertices: {}", polygon.vertices().len() + 1);
        for v in polygon.vertices() {
            let _ = writeln!(self.out, "{{{}}}", format_vec(*v));
        }
        if let Some(first) = polygon.vertices().first() {
            let _ = writeln!(self.out, "{{{}}}", format_vec(*first));
        }
        let _ = writeln!(self.out, "End Group {group}\n");
    }

    fn draw_object(&mut self, module: &Module, args: &[Value], state: &TurtleState, contact_point: Vec3) {
        self.bbox.extend(contact_point);
        let group = self.next_group();
        let _ = writeln!(self.out, "Start Group {group}");
        let _ = self.write_attributes(state, true);
        let _ = writeln!(self.out, "object");
        let _ = writeln!(self.out, "{INDENT}Name: {}", module_object_name(module, self.interner));
        let _ = writeln!(self.out, "{INDENT}LineWidth: {:.5}", state.width);
        let _ = writeln!(self.out, "{INDENT}LineDistance: {:.5}", state.default_distance);
        let _ = writeln!(self.out, "{INDENT}ContactPoint: {{{}}}", format_vec(contact_point));
        let _ = writeln!(self.out, "{INDENT}Heading: {{{}}}", format_vec(state.frame.h));
        let _ = writeln!(self.out, "{INDENT}Left: {{{}}}", format_vec(state.frame.l));
        let _ = writeln!(self.out, "{INDENT}Up: {{{}}}", format_vec(state.frame.u));
        let _ = writeln!(self.out, "{INDENT}nargs: {}", args.len());
        for arg in args {
            let _ = writeln!(self.out, "{INDENT}{arg}");
        }
        let _ = writeln!(self.out, "End Group {group}\n");
    }

    fn set_header(&mut self, header: &str) {
        self.header = Some(header.to_string());
    }
}

/// Strips the leading `~` sigil a draw-object module's name conventionally carries, since
/// the symbol itself is just the action-table trigger, not part of the referenced name.
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
    fn line_to_emits_one_group_with_both_endpoints() {
        let interner = Interner::new();
        let mut out = Vec::new();
        let mut bounds = Vec::new();
        let mut gen = GenericGenerator::new(&mut out, &mut bounds, &interner);
        gen.line_to(Vec3::ZERO, &sample_state());
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Start Group 1"));
        assert!(text.contains("line"));
        assert!(text.contains("End Group 1"));
    }

    #[test]
    fn postscript_writes_bounds_after_a_move() {
        let interner = Interner::new();
        let mut out = Vec::new();
        let mut bounds = Vec::new();
        let mut gen = GenericGenerator::new(&mut out, &mut bounds, &interner);
        gen.move_to(&sample_state());
        gen.postscript();
        let text = String::from_utf8(bounds).unwrap();
        assert!(text.contains("bounds"));
        assert!(text.contains("max:"));
    }

    #[test]
    fn polygon_emits_closing_repeat_of_first_vertex() {
        let interner = Interner::new();
        let mut out = Vec::new();
        let mut bounds = Vec::new();
        let mut gen = GenericGenerator::new(&mut out, &mut bounds, &interner);
        let mut polygon = Polygon::new();
        polygon.push_vertex(Vec3::new(0.0, 0.0, 0.0));
        polygon.push_vertex(Vec3::new(1.0, 0.0, 0.0));
        polygon.push_vertex(Vec3::new(0.0, 1.0, 0.0));
        gen.polygon(&polygon, &sample_state());
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("vertices: 4"));
    }

    #[test]
    fn draw_object_resolves_module_name_stripping_tilde_sigil() {
        let mut interner = Interner::new();
        let name = interner.intern("~chair");
        let mut out = Vec::new();
        let mut bounds = Vec::new();
        let mut gen = GenericGenerator::new(&mut out, &mut bounds, &interner);
        let module = Module::new(name, vec![]);
        gen.draw_object(&module, &[], &sample_state(), Vec3::ZERO);
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Name: chair"));
    }
}

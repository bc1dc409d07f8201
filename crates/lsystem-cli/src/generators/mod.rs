//! Concrete [`lsystem_core::Generator`] back-ends: a plain-text "generic" dump and a
//! Radiance-like scene format. Both write their attribute state (width/color/texture) into
//! every group they emit rather than as separate change events, so their `set_width`/
//! `set_color`/`set_back_color`/`set_texture` implementations are no-ops — the attributes are
//! always read fresh off the turtle state passed to `line_to`/`polygon`/`draw_object`.

pub mod generic;
pub mod radiance;

use lsystem_core::Vec3;

fn format_component(v: f64) -> String {
    format!("{v:>10.5}")
}

fn format_vec(v: Vec3) -> String {
    format!("{} {} {}", format_component(v.x), format_component(v.y), format_component(v.z))
}

//! Polygons built from `{`/`.`/`}` actions, and the stack that lets them nest.

use crate::{
    diagnostics::{Diagnostic, DiagnosticSink},
    vector::Vec3,
};

/// The default nesting limit. Exposed here
/// as a constant rather than baked into `PolygonStack::new` so callers can raise it.
pub const DEFAULT_MAX_DEPTH: usize = 100;

/// A closed polygon accumulated from turtle positions.
#[derive(Debug, Clone, Default)]
pub struct Polygon {
    vertices: Vec<Vec3>,
}

impl Polygon {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_vertex(&mut self, point: Vec3) {
        self.vertices.push(point);
    }

    #[must_use]
    pub fn last_vertex(&self) -> Option<Vec3> {
        self.vertices.last().copied()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    #[must_use]
    pub fn vertices(&self) -> &[Vec3] {
        &self.vertices
    }
}

/// Nested `{ ... }` polygons, one level per open `{`.
#[derive(Debug, Clone)]
pub struct PolygonStack {
    polygons: Vec<Polygon>,
    max_depth: usize,
}

impl PolygonStack {
    #[must_use]
    pub fn new(max_depth: usize) -> Self {
        Self { polygons: Vec::new(), max_depth }
    }

    /// Opens a new polygon. Reports [`Diagnostic::PolygonStackOverflow`] and refuses to push
    /// past `max_depth`, returning `false` — the caller should treat the `{` as a no-op in
    /// that case rather than silently drawing into the wrong level.
    pub fn start(&mut self, sink: &mut dyn DiagnosticSink) -> bool {
        if self.polygons.len() >= self.max_depth {
            sink.report(Diagnostic::PolygonStackOverflow { depth: self.max_depth });
            return false;
        }
        self.polygons.push(Polygon::new());
        true
    }

    /// Mutable access to the innermost open polygon, if any.
    pub fn top_mut(&mut self) -> Option<&mut Polygon> {
        self.polygons.last_mut()
    }

    /// Closes and returns the innermost open polygon.
    pub fn finish(&mut self) -> Option<Polygon> {
        self.polygons.pop()
    }

    #[must_use]
    pub fn depth(&self) -> usize {
        self.polygons.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.polygons.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::RecordingSink;

    #[test]
    fn start_and_finish_round_trip_a_polygon() {
        let mut stack = PolygonStack::new(DEFAULT_MAX_DEPTH);
        let mut sink = RecordingSink::default();
        assert!(stack.start(&mut sink));
        stack.top_mut().unwrap().push_vertex(Vec3::ZERO);
        let polygon = stack.finish().unwrap();
        assert_eq!(polygon.vertices().len(), 1);
        assert!(stack.is_empty());
    }

    #[test]
    fn nesting_past_max_depth_reports_overflow() {
        let mut stack = PolygonStack::new(1);
        let mut sink = RecordingSink::default();
        assert!(stack.start(&mut sink));
        assert!(!stack.start(&mut sink));
        assert_eq!(sink.events.len(), 1);
    }
}

//! Top-level entry point: ties name interning, the PRNG stream, and diagnostics together
//! around a [`Model`], so an embedder drives a full derive-then-interpret run through one
//! object instead of threading those three pieces by hand at every call site.

use crate::{
    diagnostics::DiagnosticSink,
    generator::Generator,
    intern::Interner,
    model::Model,
    module::ModuleList,
    rewrite::derive,
    rng::Rng,
    turtle::TurtleConfig,
    vector::{BoundingBox, Vec3},
};

/// Bundles the pieces a run needs that outlive a single derivation or interpretation call:
/// the interner backing every [`crate::intern::NameId`] in the model, and the single PRNG
/// stream shared by stochastic productions and the `rand`/`srand` builtins.
pub struct Engine {
    pub interner: Interner,
    pub rng: Rng,
}

impl Engine {
    #[must_use]
    pub fn new(interner: Interner, rng: Rng) -> Self {
        Self { interner, rng }
    }

    /// Runs `generations` rewrite passes over `model`'s axiom against its productions,
    /// reporting non-fatal match/probability failures through `sink`.
    #[must_use]
    pub fn derive(&mut self, model: &Model, generations: u32, sink: &mut dyn DiagnosticSink) -> ModuleList {
        derive(&model.axiom, &model.productions, &model.globals, generations, &mut self.rng, sink)
    }

    /// Interprets a derived module list with the turtle, emitting into `generator` and
    /// returning the bounding box of every point the turtle visited.
    #[allow(clippy::too_many_arguments)]
    pub fn interpret(
        &mut self,
        interpreter: &mut crate::interpreter::Interpreter,
        modules: &[crate::module::Module],
        width_scale: f64,
        default_turn_degrees: f64,
        default_distance: f64,
        max_stack_depth: usize,
        generator: &mut dyn Generator,
        sink: &mut dyn DiagnosticSink,
    ) -> BoundingBox {
        interpreter.interpret(modules, width_scale, default_turn_degrees, default_distance, max_stack_depth, generator, sink)
    }

    /// Convenience: derive then interpret in one call, reading `delta`/`width`/`distance`
    /// and the turtle-stack depth from the model's globals,
    /// falling back to `defaults` for anything the grammar left unset.
    #[allow(clippy::too_many_arguments)]
    pub fn run(
        &mut self,
        model: &Model,
        actions: crate::actions::ActionTable,
        generations: u32,
        defaults: &EngineDefaults,
        generator: &mut dyn Generator,
        sink: &mut dyn DiagnosticSink,
    ) -> BoundingBox {
        let derived = self.derive(model, generations, sink);
        let width_scale = model.global_float(self.width_name(), defaults.width_scale);
        let default_turn = model.global_float(self.delta_name(), defaults.default_turn_degrees);
        let distance = model.global_float(self.distance_name(), defaults.distance);
        let config = TurtleConfig { width_scale, gravity: defaults.gravity };
        let mut interpreter = crate::interpreter::Interpreter::new(actions, config);
        generator.prelude();
        let bbox = self.interpret(
            &mut interpreter,
            derived.as_slice(),
            width_scale,
            default_turn,
            distance,
            defaults.max_stack_depth,
            generator,
            sink,
        );
        generator.postscript();
        bbox
    }

    fn width_name(&mut self) -> crate::intern::NameId {
        self.interner.intern("width")
    }

    fn delta_name(&mut self) -> crate::intern::NameId {
        self.interner.intern("delta")
    }

    fn distance_name(&mut self) -> crate::intern::NameId {
        self.interner.intern("distance")
    }
}

/// Fallback tuning values for a run, used whenever the grammar's globals don't set them.
#[derive(Debug, Clone, Copy)]
pub struct EngineDefaults {
    pub width_scale: f64,
    pub default_turn_degrees: f64,
    pub distance: f64,
    pub gravity: Vec3,
    pub max_stack_depth: usize,
}

impl Default for EngineDefaults {
    fn default() -> Self {
        Self {
            width_scale: 1.0,
            default_turn_degrees: 90.0,
            distance: 1.0,
            gravity: Vec3::new(0.0, 0.0, -1.0),
            max_stack_depth: 100,
        }
    }
}

//! A parametric L-system rewriting engine and turtle-graphics interpreter, after the
//! classic `cpfg`/`lsys` line of Lindenmayer-system tools: parallel string rewriting with
//! context-sensitive, parametric, conditional, and stochastic productions; a 3D turtle that
//! walks the derived module string, building polygons and a bounding box as it goes.

mod actions;
mod diagnostics;
mod engine;
mod env;
mod expr;
mod generator;
mod intern;
mod interpreter;
mod model;
mod module;
mod polygon;
mod production;
mod rewrite;
mod rng;
mod turtle;
mod value;
mod vector;

pub use crate::{
    actions::{Action, ActionTable},
    diagnostics::{Diagnostic, DiagnosticSink, NullSink, RecordingSink, StderrSink},
    engine::{Engine, EngineDefaults},
    env::{Env, IgnoreSet, SymbolTable},
    expr::{BinOp, Builtin, Expression, UnOp},
    generator::Generator,
    intern::{Interner, NameId, LEFT_BRACKET, RIGHT_BRACKET},
    interpreter::Interpreter,
    model::{Model, Program},
    module::{Module, ModuleList, ParamList},
    polygon::{Polygon, PolygonStack},
    production::{Predecessor, Production, Successor},
    rewrite::{derive, rewrite},
    rng::Rng,
    turtle::{Color, Direction, TropismState, TurtleConfig, TurtleStack, TurtleState},
    value::Value,
    vector::{BoundingBox, CardinalAxis, Frame3, Vec3},
};

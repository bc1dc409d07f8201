//! The action table: maps module names to the canonical turtle actions they trigger.

use ahash::AHashMap;

use crate::intern::{Interner, NameId};

/// One canonical turtle/generator action, named for what it does rather
/// than after their default symbol (a module's symbol is just its default binding in the
/// table below; grammars are free to rebind a different symbol to the same action).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Move,
    MoveHalf,
    Draw,
    DrawHalf,
    TurnLeft,
    TurnRight,
    PitchDown,
    PitchUp,
    RollLeft,
    RollRight,
    Reverse,
    Push,
    Pop,
    RollHorizontal,
    StartPolygon,
    PolygonVertex,
    PolygonMove,
    EndPolygon,
    MultiplyDefaultDistance,
    MultiplyDefaultTurnAngle,
    MultiplyWidth,
    ChangeWidth,
    ChangeColor,
    ChangeTexture,
    DrawObject,
    CutBranch,
    Tropism,
}

/// Maps interned module names to the [`Action`] they trigger. Starts pre-populated with the
/// default symbol bindings; a grammar may rebind symbols freely since
/// dispatch always goes through this table rather than hardcoded characters.
#[derive(Debug, Clone, Default)]
pub struct ActionTable {
    bindings: AHashMap<NameId, Action>,
}

impl ActionTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the table with the default module-name-to-action bindings
    /// (`Actions.cpp`'s `GetActionSymbolTable`): `F`/`f` move, `+`/`-` turn, `&`/`^` pitch,
    /// `\`/`/` roll, `|` reverse, `[`/`]` push/pop, `$` roll-horizontal, `{`/`.`/`G`/`}`
    /// polygon, `@md`/`@ma`/`@mw`/`!`/`'`/`@Tx` the parameter multipliers, `~` draw-object,
    /// `%` cut-branch, `t` tropism, `z`/`Z` half-distance move/draw.
    #[must_use]
    pub fn with_defaults(interner: &mut Interner) -> Self {
        let mut table = Self::new();
        let bind = [
            ("F", Action::Draw),
            ("Fl", Action::Draw),
            ("Fr", Action::Draw),
            ("f", Action::Move),
            ("z", Action::MoveHalf),
            ("Z", Action::DrawHalf),
            ("+", Action::TurnLeft),
            ("-", Action::TurnRight),
            ("&", Action::PitchDown),
            ("^", Action::PitchUp),
            ("\\", Action::RollRight),
            ("/", Action::RollLeft),
            ("|", Action::Reverse),
            ("[", Action::Push),
            ("]", Action::Pop),
            ("$", Action::RollHorizontal),
            ("{", Action::StartPolygon),
            (".", Action::PolygonVertex),
            ("G", Action::PolygonMove),
            ("}", Action::EndPolygon),
            ("@md", Action::MultiplyDefaultDistance),
            ("@ma", Action::MultiplyDefaultTurnAngle),
            ("@mw", Action::MultiplyWidth),
            ("!", Action::ChangeWidth),
            ("'", Action::ChangeColor),
            ("@Tx", Action::ChangeTexture),
            ("~", Action::DrawObject),
            ("%", Action::CutBranch),
            ("t", Action::Tropism),
        ];
        for (symbol, action) in bind {
            table.bindings.insert(interner.intern(symbol), action);
        }
        table
    }

    pub fn bind(&mut self, name: NameId, action: Action) {
        self.bindings.insert(name, action);
    }

    #[must_use]
    pub fn lookup(&self, name: NameId) -> Option<Action> {
        self.bindings.get(&name).copied()
    }
}

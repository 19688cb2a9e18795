// Copyright 2025 The Modlin Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

//! The slot model: one `Slot` per declared input parameter, collected into
//! a `SlotTable` per call-site resolution.  A table is exclusively owned by
//! one resolution and discarded when the call expression is materialized.

use crate::common::{Ident, ResolveResult};
use crate::datamodel::{
    Component, Direction, FunctionDecl, FunctionKind, ParamDecl, Type, TypedExpr, Variability,
};
use crate::resolve_err;

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum SlotKind {
    /// may only be filled positionally
    Positional,
    /// may only be filled by name
    Named,
    /// may be filled either way
    Generic,
}

impl SlotKind {
    pub(crate) fn fillable_by_position(&self) -> bool {
        matches!(self, SlotKind::Positional | SlotKind::Generic)
    }

    pub(crate) fn fillable_by_name(&self) -> bool {
        matches!(self, SlotKind::Named | SlotKind::Generic)
    }
}

/// Slot is one declared parameter's binding state for one call-site
/// resolution.
#[derive(Clone, PartialEq, Debug)]
pub struct Slot {
    pub name: Ident,
    pub kind: SlotKind,
    pub expected_ty: Type,
    pub expected_variability: Variability,
    pub default: Option<TypedExpr>,
    pub supplied: Option<TypedExpr>,
    /// 1-based declaration order; dense and strictly increasing within a
    /// table.
    pub position: u16,
}

/// SlotTable owns the ordered slots of a single function for a single
/// call-site resolution.  Slot order is exactly declaration order, and that
/// order is also the argument order of the materialized call, regardless of
/// how the caller supplied arguments.
#[derive(Clone, PartialEq, Debug)]
pub struct SlotTable {
    pub function: Ident,
    pub slots: Vec<Slot>,
}

impl SlotTable {
    /// new flattens the function's instantiated parameter tree into a slot
    /// table: a depth-first walk over extends/composition nodes, keeping
    /// input components only.  Builtin functions have no decomposable
    /// parameter list, so they produce an empty table -- the builtin
    /// signature table takes over for those.
    pub fn new(decl: &FunctionDecl) -> SlotTable {
        let mut slots: Vec<Slot> = Vec::new();
        if decl.kind == FunctionKind::UserDefined {
            push_input_slots(&decl.params, &mut slots);
        }
        let mut table = SlotTable {
            function: decl.name.clone(),
            slots,
        };
        table.assign_positions();
        table
    }

    /// with_slots builds a table directly from pre-built slots; used by the
    /// builtin signature table, which shares this binder rather than
    /// carrying its own argument-indexing logic.
    pub(crate) fn with_slots(function: Ident, slots: Vec<Slot>) -> SlotTable {
        let mut table = SlotTable { function, slots };
        table.assign_positions();
        table
    }

    fn assign_positions(&mut self) {
        for (i, slot) in self.slots.iter_mut().enumerate() {
            slot.position = (i + 1) as u16;
        }
    }

    /// bind maps the call's positional and named arguments onto slots.
    /// Positional arguments fill the leading positionally-fillable slots in
    /// table order; named arguments target slots by name and may never
    /// re-target a slot that is already bound.  Slot order and kind are
    /// never altered; unbound slots keep `supplied: None`.
    pub fn bind(
        &mut self,
        positional: Vec<TypedExpr>,
        named: Vec<(Ident, TypedExpr)>,
    ) -> ResolveResult<()> {
        let mut args = positional.into_iter();
        let mut n_bound = 0usize;
        for slot in self
            .slots
            .iter_mut()
            .filter(|s| s.kind.fillable_by_position())
        {
            match args.next() {
                Some(arg) => {
                    slot.supplied = Some(arg);
                    n_bound += 1;
                }
                None => break,
            }
        }
        if let Some(extra) = args.next() {
            return resolve_err!(
                TooManyPositionalArguments,
                extra.expr.get_loc(),
                "{} takes at most {} positional arguments",
                self.function,
                n_bound
            );
        }

        for (name, arg) in named {
            let loc = arg.expr.get_loc();
            let slot = self
                .slots
                .iter_mut()
                .find(|s| s.kind.fillable_by_name() && s.name == name);
            match slot {
                None => {
                    return resolve_err!(
                        NoSuchArgument,
                        loc,
                        "{} has no argument named '{}'",
                        self.function,
                        name
                    );
                }
                Some(slot) if slot.supplied.is_some() => {
                    return resolve_err!(
                        SlotAlreadyFilled,
                        loc,
                        "argument '{}' of {} specified more than once",
                        name,
                        self.function
                    );
                }
                Some(slot) => {
                    slot.supplied = Some(arg);
                }
            }
        }

        Ok(())
    }
}

fn push_input_slots(nodes: &[ParamDecl], slots: &mut Vec<Slot>) {
    for node in nodes {
        match node {
            ParamDecl::Component(c) => {
                if c.direction == Direction::Input {
                    slots.push(slot_for(c));
                }
            }
            ParamDecl::Extends(children) => push_input_slots(children, slots),
        }
    }
}

fn slot_for(c: &Component) -> Slot {
    Slot {
        name: c.name.clone(),
        kind: SlotKind::Generic,
        expected_ty: c.ty.clone(),
        expected_variability: c.variability,
        default: c.default.clone(),
        supplied: None,
        position: 0, // assigned once the whole table is flattened
    }
}

// Copyright 2025 The Modlin Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

//! Call resolution: binds a call site's arguments to a function's slot
//! table, checks type and variability compatibility, and materializes the
//! resolved call -- either as a single call expression, or as an array of
//! per-index calls when an argument carries more array dimensions than its
//! parameter expects.

use crate::ast::{Expr, Loc, print_expr};
use crate::common::{Ident, ResolveResult};
use crate::datamodel::{
    Dims, ElementType, FunctionDecl, FunctionKind, Type, TypedExpr, Variability,
};
use crate::slot::{Slot, SlotTable};
use crate::{builtins, resolve_err};

/// SlotResolution is the checked state of one slot: where its value came
/// from and whether it was lifted to carry the vectorization plan's
/// dimensions.
#[derive(Clone, PartialEq, Debug)]
pub(crate) enum SlotResolution {
    Unfilled,
    Defaulted(TypedExpr),
    Bound(TypedExpr),
    BoundLifted(TypedExpr),
}

impl SlotResolution {
    fn value(&self) -> &TypedExpr {
        match self {
            SlotResolution::Unfilled => {
                unreachable!("internal error: unfilled slot survived checking")
            }
            SlotResolution::Defaulted(v)
            | SlotResolution::Bound(v)
            | SlotResolution::BoundLifted(v) => v,
        }
    }

    fn variability(&self) -> Option<Variability> {
        match self {
            SlotResolution::Unfilled => None,
            SlotResolution::Defaulted(v)
            | SlotResolution::Bound(v)
            | SlotResolution::BoundLifted(v) => Some(v.variability),
        }
    }
}

fn element_compatible(actual: ElementType, expected: ElementType) -> bool {
    actual == expected
        || (actual == ElementType::Integer && expected == ElementType::Real)
}

/// match_element_types matches the argument against the expected type with
/// all array dimensions stripped, applying standard numeric widening
/// (Integer to Real).  The result keeps the argument's actual dimensions.
fn match_element_types(arg: &TypedExpr, expected: &Type) -> Option<TypedExpr> {
    if !element_compatible(arg.ty.element, expected.element) {
        return None;
    }
    let element = if arg.ty.element == ElementType::Integer
        && expected.element == ElementType::Real
    {
        ElementType::Real
    } else {
        arg.ty.element
    };
    Some(TypedExpr {
        expr: arg.expr.clone(),
        ty: Type {
            element,
            dims: arg.ty.dims.clone(),
        },
        variability: arg.variability,
    })
}

/// match_types is the full type match: element compatibility plus exact
/// dimension equality.
fn match_types(arg: &TypedExpr, expected: &Type) -> Option<TypedExpr> {
    if arg.ty.dims != expected.dims {
        return None;
    }
    match_element_types(arg, expected)
}

fn check_variability(function: &str, slot: &Slot, arg: &TypedExpr) -> ResolveResult<()> {
    if arg.variability <= slot.expected_variability {
        Ok(())
    } else {
        resolve_err!(
            VariabilityMismatch,
            arg.expr.get_loc(),
            "argument '{}' to {}: '{}' is {}, but at most a {} expression is allowed",
            slot.name,
            function,
            print_expr(&arg.expr),
            arg.variability,
            slot.expected_variability
        )
    }
}

enum SlotCheck {
    Resolved(SlotResolution),
    /// element types are compatible but the argument carries array
    /// dimensions the parameter does not expect
    DimMismatch,
}

fn check_slot_direct(function: &str, slot: &Slot) -> ResolveResult<SlotCheck> {
    if let Some(arg) = &slot.supplied {
        check_variability(function, slot, arg)?;
        if let Some(matched) = match_types(arg, &slot.expected_ty) {
            return Ok(SlotCheck::Resolved(SlotResolution::Bound(matched)));
        }
        if match_element_types(arg, &slot.expected_ty).is_some() {
            return Ok(SlotCheck::DimMismatch);
        }
        resolve_err!(
            ArgumentTypeMismatch,
            arg.expr.get_loc(),
            "argument {} ('{}') to {}: expected {}, got {}",
            slot.position,
            slot.name,
            function,
            slot.expected_ty,
            arg.ty
        )
    } else if let Some(default) = &slot.default {
        // defaults come from the declaration itself and are trusted
        Ok(SlotCheck::Resolved(SlotResolution::Defaulted(
            default.clone(),
        )))
    } else {
        Ok(SlotCheck::Resolved(SlotResolution::Unfilled))
    }
}

enum DirectOutcome {
    Resolved(Vec<SlotResolution>),
    /// index of the first slot whose argument needs vectorizing
    NeedsVectorization(usize),
}

/// check_direct is the first checking pass: every slot must match its
/// declared type exactly.  A dimension mismatch on any slot hands control
/// to the vectorization planner for the whole table.
fn check_direct(table: &SlotTable, loc: Loc) -> ResolveResult<DirectOutcome> {
    let mut resolved = Vec::with_capacity(table.slots.len());
    for (i, slot) in table.slots.iter().enumerate() {
        match check_slot_direct(&table.function, slot)? {
            SlotCheck::DimMismatch => return Ok(DirectOutcome::NeedsVectorization(i)),
            SlotCheck::Resolved(SlotResolution::Unfilled) => {
                return resolve_err!(
                    UnfilledSlot,
                    loc,
                    "missing argument '{}' in call to {}",
                    slot.name,
                    table.function
                );
            }
            SlotCheck::Resolved(r) => resolved.push(r),
        }
    }
    Ok(DirectOutcome::Resolved(resolved))
}

/// find_vectorization_dims computes the extra leading dimensions an actual
/// argument carries beyond its expected type.  `None` means the shapes
/// cannot be reconciled.
pub(crate) fn find_vectorization_dims(actual: &[u32], expected: &[u32]) -> Option<Dims> {
    if expected.is_empty() {
        return Some(Dims::from_slice(actual));
    }
    if actual == expected {
        return Some(Dims::new());
    }
    if actual.len() > expected.len() && actual.ends_with(expected) {
        return Some(Dims::from_slice(&actual[..actual.len() - expected.len()]));
    }
    None
}

/// lift wraps a value in nested array literals so that its type carries the
/// plan's dimensions as a prefix: the replicated value is broadcast to every
/// index of the vectorized call.
fn lift(value: TypedExpr, plan: &[u32]) -> TypedExpr {
    let loc = value.expr.get_loc();
    let mut expr = value.expr;
    let mut ty = value.ty;
    for &size in plan.iter().rev() {
        expr = Expr::Array(vec![expr; size as usize], loc);
        ty = ty.lifted(size);
    }
    TypedExpr {
        expr,
        ty,
        variability: value.variability,
    }
}

fn carries_plan(value: &TypedExpr, plan: &[u32], expected: &Type) -> bool {
    value.ty.dims.len() == plan.len() + expected.dims.len()
        && value.ty.dims.starts_with(plan)
        && value.ty.dims.ends_with(&expected.dims)
}

/// check_vectorized is the second checking pass, over the same immutable
/// table, under a fixed vectorization plan.  All direct-mode results are
/// discarded: a mismatch on one slot changes how every other slot must be
/// interpreted.  After this pass every resolved value carries the plan's
/// dimensions, either natively or by lifting.
fn check_vectorized(
    table: &SlotTable,
    plan: &Dims,
    loc: Loc,
) -> ResolveResult<Vec<SlotResolution>> {
    let mut resolved = Vec::with_capacity(table.slots.len());
    for slot in table.slots.iter() {
        let r = if let Some(arg) = &slot.supplied {
            check_variability(&table.function, slot, arg)?;
            let Some(matched) = match_element_types(arg, &slot.expected_ty) else {
                return resolve_err!(
                    ArgumentTypeMismatch,
                    arg.expr.get_loc(),
                    "argument {} ('{}') to {}: expected {}, got {}",
                    slot.position,
                    slot.name,
                    table.function,
                    slot.expected_ty,
                    arg.ty
                );
            };
            match find_vectorization_dims(&arg.ty.dims, &slot.expected_ty.dims) {
                Some(extra) if extra.is_empty() => {
                    SlotResolution::BoundLifted(lift(matched, plan))
                }
                Some(extra) if extra == *plan => SlotResolution::Bound(matched),
                _ => {
                    return resolve_err!(
                        VectorizationDimensionMismatch,
                        arg.expr.get_loc(),
                        "argument {} ('{}') to {}: {} does not agree with vectorizing {} over {}",
                        slot.position,
                        slot.name,
                        table.function,
                        arg.ty,
                        slot.expected_ty,
                        Type::array(slot.expected_ty.element, plan)
                    );
                }
            }
        } else if let Some(default) = &slot.default {
            if carries_plan(default, plan, &slot.expected_ty) {
                SlotResolution::Defaulted(default.clone())
            } else {
                SlotResolution::Defaulted(lift(default.clone(), plan))
            }
        } else {
            return resolve_err!(
                UnfilledSlot,
                loc,
                "missing argument '{}' in call to {}",
                slot.name,
                table.function
            );
        };
        resolved.push(r);
    }
    Ok(resolved)
}

fn materialize_single(function: &Ident, values: &[SlotResolution], loc: Loc) -> Expr {
    let args: Vec<Expr> = values.iter().map(|r| r.value().expr.clone()).collect();
    Expr::App(function.clone(), args, loc)
}

/// materialize_vectorized expands the resolved slots into a nested array
/// literal of scalar calls, one per index tuple of the plan's Cartesian
/// product, outer dimension outermost.  Every resolved value carries the
/// plan's dimensions by now, so every argument is subscripted with the full
/// 1-based index tuple.
fn materialize_vectorized(
    function: &Ident,
    values: &[SlotResolution],
    plan: &[u32],
    loc: Loc,
) -> Expr {
    let mut idx: Vec<u32> = Vec::with_capacity(plan.len());
    expand_calls(function, values, plan, &mut idx, loc)
}

fn expand_calls(
    function: &Ident,
    values: &[SlotResolution],
    plan: &[u32],
    idx: &mut Vec<u32>,
    loc: Loc,
) -> Expr {
    let depth = idx.len();
    if depth == plan.len() {
        let args: Vec<Expr> = values
            .iter()
            .map(|r| {
                let indices: Vec<Expr> = idx
                    .iter()
                    .map(|&i| Expr::Const(i.to_string(), i as f64, loc))
                    .collect();
                Expr::Subscript(Box::new(r.value().expr.clone()), indices, loc)
            })
            .collect();
        Expr::App(function.clone(), args, loc)
    } else {
        let elements: Vec<Expr> = (1..=plan[depth])
            .map(|i| {
                idx.push(i);
                let element = expand_calls(function, values, plan, idx, loc);
                idx.pop();
                element
            })
            .collect();
        Expr::Array(elements, loc)
    }
}

fn result_variability(values: &[SlotResolution]) -> Variability {
    values
        .iter()
        .filter_map(|r| r.variability())
        .max()
        .unwrap_or(Variability::Constant)
}

/// resolve_call resolves one call site against one function declaration:
/// it binds positional and named arguments, fills defaults, checks type and
/// variability compatibility, and materializes either a single call or a
/// vectorized array of calls.  The first fatal condition aborts the whole
/// resolution.
pub fn resolve_call(
    decl: &FunctionDecl,
    target_subscripts: &[Expr],
    positional: Vec<TypedExpr>,
    named: Vec<(Ident, TypedExpr)>,
    loc: Loc,
) -> ResolveResult<TypedExpr> {
    if !target_subscripts.is_empty() {
        return resolve_err!(
            SubscriptedCallTarget,
            loc,
            "the name in a call to {} cannot be subscripted",
            decl.name
        );
    }

    let (table, ret_ty) = match decl.kind {
        FunctionKind::UserDefined => {
            let ret_ty = decl
                .return_type()
                .unwrap_or_else(|| Type::scalar(ElementType::Real));
            (SlotTable::new(decl), ret_ty)
        }
        FunctionKind::Builtin => match builtins::signature(&decl.name) {
            Some(sig) => (builtins::slot_table(sig), Type::scalar(sig.result)),
            None => {
                return resolve_err!(UnknownBuiltin, loc, "unknown builtin {}", decl.name);
            }
        },
    };

    resolve_with_table(table, ret_ty, positional, named, loc)
}

fn resolve_with_table(
    mut table: SlotTable,
    ret_ty: Type,
    positional: Vec<TypedExpr>,
    named: Vec<(Ident, TypedExpr)>,
    loc: Loc,
) -> ResolveResult<TypedExpr> {
    table.bind(positional, named)?;
    // binding is the only mutation; checking happens over a snapshot
    let table = table;

    match check_direct(&table, loc)? {
        DirectOutcome::Resolved(values) => Ok(TypedExpr {
            expr: materialize_single(&table.function, &values, loc),
            ty: ret_ty,
            variability: result_variability(&values),
        }),
        DirectOutcome::NeedsVectorization(i) => {
            let slot = &table.slots[i];
            let Some(arg) = slot.supplied.as_ref() else {
                unreachable!("internal error: dimension mismatch without a supplied argument")
            };
            let Some(plan) =
                find_vectorization_dims(&arg.ty.dims, &slot.expected_ty.dims)
            else {
                return resolve_err!(
                    VectorizationFailure,
                    arg.expr.get_loc(),
                    "argument {} ('{}') to {}: cannot vectorize {} over expected {}",
                    slot.position,
                    slot.name,
                    table.function,
                    arg.ty,
                    slot.expected_ty
                );
            };
            let values = check_vectorized(&table, &plan, loc)?;
            let mut ty = ret_ty;
            for &d in plan.iter().rev() {
                ty = ty.lifted(d);
            }
            Ok(TypedExpr {
                expr: materialize_vectorized(&table.function, &values, &plan, loc),
                ty,
                variability: result_variability(&values),
            })
        }
    }
}

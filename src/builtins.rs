// Copyright 2025 The Modlin Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

//! The builtin signature table: the special operators of the modeling
//! language have fixed, language-defined argument lists that never come
//! from a declaration.  Resolution of a builtin call reuses the generic
//! slot table and binder -- only the table of names, bounds, and defaults
//! lives here.

use std::collections::HashMap;

use lazy_static::lazy_static;

use crate::ast::{Expr, Loc};
use crate::datamodel::{ElementType, Type, TypedExpr, Variability};
use crate::slot::{Slot, SlotKind, SlotTable};

#[derive(Clone, Debug)]
pub struct BuiltinParam {
    pub name: &'static str,
    pub kind: SlotKind,
    pub element: ElementType,
    /// the least-restrictive variability an argument may have
    pub variability: Variability,
    pub default: Option<f64>,
}

#[derive(Clone, Debug)]
pub struct BuiltinSignature {
    pub name: &'static str,
    pub params: &'static [BuiltinParam],
    pub result: ElementType,
}

use crate::datamodel::ElementType::{Boolean, Integer, Real};
use crate::datamodel::Variability::{Constant, Continuous, Discrete, Parameter};
use crate::slot::SlotKind::{Generic, Named};

const fn param(name: &'static str, element: ElementType, variability: Variability) -> BuiltinParam {
    BuiltinParam {
        name,
        kind: Generic,
        element,
        variability,
        default: None,
    }
}

static BUILTIN_SIGNATURES: &[BuiltinSignature] = &[
    BuiltinSignature {
        name: "der",
        params: &[param("u", Real, Continuous)],
        result: Real,
    },
    BuiltinSignature {
        name: "pre",
        params: &[param("u", Real, Discrete)],
        result: Real,
    },
    BuiltinSignature {
        name: "edge",
        params: &[param("b", Boolean, Discrete)],
        result: Boolean,
    },
    BuiltinSignature {
        name: "change",
        params: &[param("u", Real, Discrete)],
        result: Boolean,
    },
    BuiltinSignature {
        name: "sample",
        params: &[
            param("start", Real, Parameter),
            param("interval", Real, Parameter),
        ],
        result: Boolean,
    },
    BuiltinSignature {
        name: "delay",
        params: &[
            param("u", Real, Continuous),
            param("delay_time", Real, Parameter),
            // 0 disables the bound
            BuiltinParam {
                name: "delay_max",
                kind: Named,
                element: Real,
                variability: Parameter,
                default: Some(0.0),
            },
        ],
        result: Real,
    },
    BuiltinSignature {
        name: "smooth",
        params: &[
            param("order", Integer, Constant),
            param("u", Real, Continuous),
        ],
        result: Real,
    },
    BuiltinSignature {
        name: "homotopy",
        params: &[
            param("actual", Real, Continuous),
            param("simplified", Real, Continuous),
        ],
        result: Real,
    },
    BuiltinSignature {
        name: "semilinear",
        params: &[
            param("x", Real, Continuous),
            param("positive_slope", Real, Continuous),
            param("negative_slope", Real, Continuous),
        ],
        result: Real,
    },
    BuiltinSignature {
        name: "noevent",
        params: &[param("u", Real, Continuous)],
        result: Real,
    },
    BuiltinSignature {
        name: "initial",
        params: &[],
        result: Boolean,
    },
    BuiltinSignature {
        name: "terminal",
        params: &[],
        result: Boolean,
    },
];

lazy_static! {
    static ref BUILTINS_BY_NAME: HashMap<&'static str, &'static BuiltinSignature> =
        BUILTIN_SIGNATURES.iter().map(|sig| (sig.name, sig)).collect();
}

pub fn signature(name: &str) -> Option<&'static BuiltinSignature> {
    BUILTINS_BY_NAME.get(name).copied()
}

pub fn is_builtin_fn(name: &str) -> bool {
    signature(name).is_some()
}

pub fn is_0_arity_builtin_fn(name: &str) -> bool {
    matches!(signature(name), Some(sig) if sig.params.is_empty())
}

/// slot_table builds the slot table for one builtin call site from the
/// signature table, exactly as `SlotTable::new` builds one from a
/// declaration.
pub(crate) fn slot_table(sig: &BuiltinSignature) -> SlotTable {
    let slots: Vec<Slot> = sig
        .params
        .iter()
        .map(|p| Slot {
            name: p.name.to_string(),
            kind: p.kind,
            expected_ty: Type::scalar(p.element),
            expected_variability: p.variability,
            default: p.default.map(|n| TypedExpr {
                expr: Expr::Const(format!("{n}"), n, Loc::default()),
                ty: Type::scalar(p.element),
                variability: Variability::Constant,
            }),
            supplied: None,
            position: 0,
        })
        .collect();
    SlotTable::with_slots(sig.name.to_string(), slots)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_builtin_fn() {
        assert!(is_builtin_fn("der"));
        assert!(is_builtin_fn("sample"));
        assert!(is_builtin_fn("semilinear"));
        assert!(!is_builtin_fn("derp"));
        assert!(!is_builtin_fn("lookup"));
    }

    #[test]
    fn test_is_0_arity_builtin_fn() {
        assert!(is_0_arity_builtin_fn("initial"));
        assert!(is_0_arity_builtin_fn("terminal"));
        assert!(!is_0_arity_builtin_fn("der"));
        assert!(!is_0_arity_builtin_fn("no_such_fn"));
    }

    #[test]
    fn test_slot_table_from_signature() {
        let table = slot_table(signature("delay").unwrap());
        assert_eq!("delay", table.function);
        let names: Vec<&str> = table.slots.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(vec!["u", "delay_time", "delay_max"], names);
        let positions: Vec<u16> = table.slots.iter().map(|s| s.position).collect();
        assert_eq!(vec![1, 2, 3], positions);

        assert_eq!(SlotKind::Named, table.slots[2].kind);
        assert!(table.slots[2].default.is_some());
        assert_eq!(Variability::Parameter, table.slots[1].expected_variability);
    }

    #[test]
    fn test_signature_results() {
        assert_eq!(ElementType::Boolean, signature("edge").unwrap().result);
        assert_eq!(ElementType::Real, signature("der").unwrap().result);
    }
}

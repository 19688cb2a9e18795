// Copyright 2025 The Modlin Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

use crate::ast::{Expr, Loc};
use crate::datamodel::{
    Component, Direction, ElementType, FunctionDecl, FunctionKind, ParamDecl, Type, TypedExpr,
    Variability,
};

pub(crate) fn real() -> Type {
    Type::scalar(ElementType::Real)
}

pub(crate) fn real_array(dims: &[u32]) -> Type {
    Type::array(ElementType::Real, dims)
}

pub(crate) fn const_arg(n: f64) -> TypedExpr {
    TypedExpr {
        expr: Expr::Const(format!("{n}"), n, Loc::default()),
        ty: real(),
        variability: Variability::Constant,
    }
}

pub(crate) fn string_arg(s: &str) -> TypedExpr {
    TypedExpr {
        expr: Expr::StringConst(s.to_string(), Loc::default()),
        ty: Type::scalar(ElementType::String),
        variability: Variability::Constant,
    }
}

pub(crate) fn var_arg(name: &str, ty: Type, variability: Variability) -> TypedExpr {
    TypedExpr {
        expr: Expr::Var(name.to_string(), Loc::default()),
        ty,
        variability,
    }
}

pub(crate) fn component(name: &str, direction: Direction, ty: Type) -> Component {
    Component {
        name: name.to_string(),
        direction,
        ty,
        variability: Variability::Continuous,
        default: None,
    }
}

pub(crate) fn input(name: &str, ty: Type) -> ParamDecl {
    ParamDecl::Component(component(name, Direction::Input, ty))
}

pub(crate) fn input_with_variability(name: &str, ty: Type, variability: Variability) -> ParamDecl {
    let mut c = component(name, Direction::Input, ty);
    c.variability = variability;
    ParamDecl::Component(c)
}

pub(crate) fn input_default(name: &str, ty: Type, default: f64) -> ParamDecl {
    let mut c = component(name, Direction::Input, ty);
    c.default = Some(const_arg(default));
    ParamDecl::Component(c)
}

pub(crate) fn output(name: &str, ty: Type) -> ParamDecl {
    ParamDecl::Component(component(name, Direction::Output, ty))
}

pub(crate) fn extends(children: Vec<ParamDecl>) -> ParamDecl {
    ParamDecl::Extends(children)
}

pub(crate) fn decl(name: &str, params: Vec<ParamDecl>) -> FunctionDecl {
    FunctionDecl {
        name: name.to_string(),
        kind: FunctionKind::UserDefined,
        params,
    }
}

// Copyright 2025 The Modlin Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

//! The instantiated-declaration data model: what the instantiator hands the
//! call resolver.  These are pure data types; all checking logic lives in
//! the slot and resolve modules.

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::ast::Expr;
use crate::common::Ident;

/// Dims is an ordered list of array dimension sizes, outermost first.
pub type Dims = SmallVec<[u32; 4]>;

#[derive(Copy, Clone, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
pub enum ElementType {
    Real,
    Integer,
    Boolean,
    String,
}

impl Display for ElementType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ElementType::Real => "Real",
            ElementType::Integer => "Integer",
            ElementType::Boolean => "Boolean",
            ElementType::String => "String",
        };
        write!(f, "{name}")
    }
}

#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct Type {
    pub element: ElementType,
    pub dims: Dims,
}

impl Type {
    pub fn scalar(element: ElementType) -> Self {
        Type {
            element,
            dims: Dims::new(),
        }
    }

    pub fn array(element: ElementType, dims: &[u32]) -> Self {
        Type {
            element,
            dims: Dims::from_slice(dims),
        }
    }

    pub fn is_scalar(&self) -> bool {
        self.dims.is_empty()
    }

    /// element_type strips all array dimensions.
    pub fn element_type(&self) -> Type {
        Type::scalar(self.element)
    }

    /// lifted returns this type with an additional outermost dimension.
    pub fn lifted(&self, size: u32) -> Type {
        let mut dims = Dims::with_capacity(self.dims.len() + 1);
        dims.push(size);
        dims.extend_from_slice(&self.dims);
        Type {
            element: self.element,
            dims,
        }
    }
}

impl Display for Type {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.dims.is_empty() {
            write!(f, "{}", self.element)
        } else {
            let dims: Vec<String> = self.dims.iter().map(|d| d.to_string()).collect();
            write!(f, "{}[{}]", self.element, dims.join(", "))
        }
    }
}

/// Variability classifies how early a value's definiteness is known.  The
/// declaration order is load-bearing: the derived `Ord` gives
/// `Constant < Parameter < Discrete < Continuous`, and an argument is
/// acceptable for a slot when its variability is `<=` the slot's bound.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug, Hash, Serialize, Deserialize)]
pub enum Variability {
    Constant,
    Parameter,
    Discrete,
    Continuous,
}

impl Display for Variability {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Variability::Constant => "constant",
            Variability::Parameter => "parameter",
            Variability::Discrete => "discrete",
            Variability::Continuous => "continuous",
        };
        write!(f, "{name}")
    }
}

#[derive(Copy, Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum Direction {
    Input,
    Output,
    Local,
}

/// TypedExpr is the (expression, type, variability) triple the Typer
/// produces for every elaborated expression.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct TypedExpr {
    pub expr: Expr,
    pub ty: Type,
    pub variability: Variability,
}

/// Component is one declared component of a function: a parameter, result,
/// or local, with its optional default binding.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct Component {
    pub name: Ident,
    pub direction: Direction,
    pub ty: Type,
    pub variability: Variability,
    pub default: Option<TypedExpr>,
}

/// ParamDecl is one node of the instantiated parameter tree.  Components
/// inherited through base-class composition arrive as nested `Extends`
/// subtrees and are flattened by the slot table builder.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub enum ParamDecl {
    Component(Component),
    Extends(Vec<ParamDecl>),
}

#[derive(Copy, Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum FunctionKind {
    UserDefined,
    /// Builtin functions have no decomposable parameter list; their fixed
    /// signatures come from the builtin table instead.
    Builtin,
}

#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct FunctionDecl {
    pub name: Ident,
    pub kind: FunctionKind,
    pub params: Vec<ParamDecl>,
}

impl FunctionDecl {
    /// return_type is the type of the first output component, walking the
    /// parameter tree in declaration order.
    pub fn return_type(&self) -> Option<Type> {
        fn find(nodes: &[ParamDecl]) -> Option<Type> {
            for node in nodes {
                match node {
                    ParamDecl::Component(c) if c.direction == Direction::Output => {
                        return Some(c.ty.clone());
                    }
                    ParamDecl::Component(_) => {}
                    ParamDecl::Extends(children) => {
                        if let Some(ty) = find(children) {
                            return Some(ty);
                        }
                    }
                }
            }
            None
        }
        find(&self.params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_display() {
        assert_eq!("Real", format!("{}", Type::scalar(ElementType::Real)));
        assert_eq!(
            "Integer[3]",
            format!("{}", Type::array(ElementType::Integer, &[3]))
        );
        assert_eq!(
            "Real[2, 3]",
            format!("{}", Type::array(ElementType::Real, &[2, 3]))
        );
    }

    #[test]
    fn test_type_lifted() {
        let ty = Type::array(ElementType::Real, &[4, 2]);
        assert_eq!(Type::array(ElementType::Real, &[3, 4, 2]), ty.lifted(3));
        assert_eq!(
            Type::array(ElementType::Real, &[5]),
            Type::scalar(ElementType::Real).lifted(5)
        );
    }

    #[test]
    fn test_variability_ordering() {
        use Variability::*;
        assert!(Constant < Parameter);
        assert!(Parameter < Discrete);
        assert!(Discrete < Continuous);
        assert!(Constant <= Constant);
    }

    #[test]
    fn test_element_type_strips_dims() {
        let ty = Type::array(ElementType::Boolean, &[7, 7]);
        assert_eq!(Type::scalar(ElementType::Boolean), ty.element_type());
        assert!(ty.element_type().is_scalar());
    }
}

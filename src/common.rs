// Copyright 2025 The Modlin Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

use std::fmt;
use std::{error, result};

use crate::ast::Loc;

pub type Ident = String;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    NoError, // will never be produced
    UnknownBuiltin,
    SubscriptedCallTarget,
    UnfilledSlot,
    SlotAlreadyFilled,
    NoSuchArgument,
    TooManyPositionalArguments,
    VariabilityMismatch,
    ArgumentTypeMismatch,
    VectorizationFailure,
    VectorizationDimensionMismatch,
    Generic,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use ErrorCode::*;
        let name = match self {
            NoError => "no_error",
            UnknownBuiltin => "unknown_builtin",
            SubscriptedCallTarget => "subscripted_call_target",
            UnfilledSlot => "unfilled_slot",
            SlotAlreadyFilled => "slot_already_filled",
            NoSuchArgument => "no_such_argument",
            TooManyPositionalArguments => "too_many_positional_arguments",
            VariabilityMismatch => "variability_mismatch",
            ArgumentTypeMismatch => "argument_type_mismatch",
            VectorizationFailure => "vectorization_failure",
            VectorizationDimensionMismatch => "vectorization_dimension_mismatch",
            Generic => "generic",
        };

        write!(f, "{name}")
    }
}

/// ResolveError is the single fatal diagnostic produced when resolution
/// of a call site fails.  There is no partial recovery: the first error
/// aborts the whole call-site resolution and is propagated to the driver.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ResolveError {
    pub code: ErrorCode,
    pub loc: Loc,
    pub details: Option<String>,
}

impl ResolveError {
    pub fn new(code: ErrorCode, loc: Loc, details: Option<String>) -> Self {
        ResolveError { code, loc, details }
    }

    pub fn get_details(&self) -> Option<String> {
        self.details.clone()
    }
}

impl fmt::Display for ResolveError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.details {
            Some(ref details) => write!(f, "{}:{} -- {}", self.loc, self.code, details),
            None => write!(f, "{}:{}", self.loc, self.code),
        }
    }
}

impl error::Error for ResolveError {}

pub type ResolveResult<T> = result::Result<T, ResolveError>;

#[macro_export]
macro_rules! resolve_err(
    ($code:tt, $loc:expr) => {{
        use $crate::common::{ErrorCode, ResolveError};
        Err(ResolveError::new(ErrorCode::$code, $loc, None))
    }};
    ($code:tt, $loc:expr, $($arg:tt)+) => {{
        use $crate::common::{ErrorCode, ResolveError};
        Err(ResolveError::new(ErrorCode::$code, $loc, Some(format!($($arg)+))))
    }};
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ResolveError::new(ErrorCode::UnfilledSlot, Loc::new(3, 9), None);
        assert_eq!("3:9:unfilled_slot", format!("{err}"));

        let err = ResolveError::new(
            ErrorCode::ArgumentTypeMismatch,
            Loc::new(0, 4),
            Some("expected Real, got String".to_owned()),
        );
        assert_eq!(
            "0:4:argument_type_mismatch -- expected Real, got String",
            format!("{err}")
        );
    }

    #[test]
    fn test_resolve_err_macro() {
        let err: ResolveResult<()> = resolve_err!(NoSuchArgument, Loc::new(1, 2), "'{}'", "z");
        let err = err.unwrap_err();
        assert_eq!(ErrorCode::NoSuchArgument, err.code);
        assert_eq!(Some("'z'".to_owned()), err.get_details());
    }
}

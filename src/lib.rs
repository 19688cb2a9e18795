// Copyright 2025 The Modlin Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

//! Call resolution for the modeling language's semantic-analysis phase:
//! given a function declaration and a call site's already-typed arguments,
//! bind arguments to parameter slots, fill defaults, check type and
//! variability compatibility, and vectorize the call when an argument
//! carries extra array dimensions.

#![forbid(unsafe_code)]

pub mod ast;
pub mod builtins;
pub mod common;
pub mod datamodel;
mod resolve;
pub mod slot;

#[cfg(test)]
mod testutils;

pub use self::common::{ErrorCode, Ident, ResolveError, ResolveResult};
pub use self::resolve::resolve_call;

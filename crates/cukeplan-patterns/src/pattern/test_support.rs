//! Test helpers for asserting compilation outcomes.
use super::CompiledPattern;
use crate::kind::{BuiltinKind, PlaceholderKind};

pub(crate) fn builtin(name: &str) -> Option<PlaceholderKind> {
    BuiltinKind::from_name(name).map(PlaceholderKind::Builtin)
}

pub(crate) fn compile_ok(pattern: &str) -> CompiledPattern {
    match CompiledPattern::compile(pattern, builtin) {
        Ok(compiled) => compiled,
        Err(err) => panic!("pattern should compile: {err}"),
    }
}

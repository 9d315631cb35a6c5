//! # recognizer-core
//!
//! Membership testing for regular languages given by deterministic finite
//! automata.
//!
//! This crate provides:
//! - The extended transition function and the membership decision built on it
//! - Accepting-set queries over sets, maps, slices, predicates and bit-sets
//! - Table-driven DFA definitions loaded from JSON or YAML

pub mod accept;
pub mod definition;
pub mod error;
pub mod evaluator;

pub use accept::{Accept, Predicate, StateSet};
pub use definition::{Dfa, DfaDefinitionRaw, MissingTransition, State, StateId, TransitionRule};
pub use error::CoreError;
pub use evaluator::{recognize, run, try_recognize, try_run, Transition};

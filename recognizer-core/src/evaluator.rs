//! Extended transition function evaluation.
//!
//! Given a start state `q`, a one-step transition `δ` and an input `w`, the
//! extended transition function is
//!
//! - `δ*(q, ε) = q`
//! - `δ*(q, a·w) = δ*(δ(q, a), w)`
//!
//! and `w` is accepted iff `δ*(q, w)` is an accepting state. The recursion is
//! evaluated as a left fold, so stack usage is constant and every symbol
//! costs exactly one transition call.
//!
//! ```
//! use recognizer_core::recognize;
//! use std::collections::HashSet;
//!
//! // Even number of '1's: two states that swap on '1' and loop on anything else.
//! let flip = |q: u8, a: u8| if a == b'1' { 3 - q } else { q };
//! let accept: HashSet<u8> = [1].into_iter().collect();
//!
//! assert!(recognize(1, &flip, &accept, "1010".bytes()));
//! assert!(!recognize(1, &flip, &accept, "111".bytes()));
//! ```
//!
//! The evaluator validates nothing. A transition that panics outside its
//! domain unwinds straight through [`recognize`]; a fallible transition used
//! with [`try_recognize`] has its first error returned as-is.

use crate::accept::Accept;

/// One-step transition rule of a DFA.
///
/// Implemented for every `Fn(S, A) -> S`, so plain functions and closures can
/// be passed directly.
pub trait Transition<S, A> {
    /// Returns the state reached from `state` on `symbol`.
    fn step(&self, state: S, symbol: A) -> S;
}

impl<S, A, F> Transition<S, A> for F
where
    F: Fn(S, A) -> S,
{
    fn step(&self, state: S, symbol: A) -> S {
        self(state, symbol)
    }
}

/// Computes `δ*(start, input)`: the state reached after consuming every symbol.
pub fn run<S, A, T, I>(start: S, transition: &T, input: I) -> S
where
    T: Transition<S, A> + ?Sized,
    I: IntoIterator<Item = A>,
{
    input
        .into_iter()
        .fold(start, |state, symbol| transition.step(state, symbol))
}

/// Returns true if `input` drives the automaton from `start` into an accepting state.
///
/// With empty input the result is `accept.accepts(&start)` and `transition`
/// is never called.
pub fn recognize<S, A, T, P, I>(start: S, transition: &T, accept: &P, input: I) -> bool
where
    T: Transition<S, A> + ?Sized,
    P: Accept<S> + ?Sized,
    I: IntoIterator<Item = A>,
{
    accept.accepts(&run(start, transition, input))
}

/// [`run`] for a fallible transition. Stops at the first error.
pub fn try_run<S, A, E, F, I>(start: S, transition: F, input: I) -> Result<S, E>
where
    F: FnMut(S, A) -> Result<S, E>,
    I: IntoIterator<Item = A>,
{
    input.into_iter().try_fold(start, transition)
}

/// [`recognize`] for a fallible transition.
///
/// The first error from `transition` is returned unchanged; no further
/// symbols are consumed after it.
pub fn try_recognize<S, A, E, F, P, I>(
    start: S,
    transition: F,
    accept: &P,
    input: I,
) -> Result<bool, E>
where
    F: FnMut(S, A) -> Result<S, E>,
    P: Accept<S> + ?Sized,
    I: IntoIterator<Item = A>,
{
    let state = try_run(start, transition, input)?;
    Ok(accept.accepts(&state))
}

//! Table-driven DFA definitions.
//!
//! A DFA can be described as data instead of code:
//!
//! ```json
//! {
//!   "states": ["even", "odd"],
//!   "initial": "even",
//!   "accepting": ["even"],
//!   "transitions": [
//!     {"from": "even", "on": "1", "to": "odd"},
//!     {"from": "odd", "on": "1", "to": "even"},
//!     {"from": ["even", "odd"], "on": "0", "to": "even"}
//!   ],
//!   "on_missing": "stay"
//! }
//! ```
//!
//! `from` is a single state or a list of states. Every character of `on` gets
//! the transition, so `"on": "0123456789"` covers all ASCII digits. The DFA
//! reads bytes, so `on` must be ASCII. `on_missing` picks what happens for a
//! `(state, byte)` pair with no transition; see [`MissingTransition`].
//!
//! The definition is validated and compiled into a dense table with one row
//! of 256 entries per state. Evaluation goes through
//! [`try_run`](crate::try_run) and [`try_recognize`](crate::try_recognize).
//!
//! Definitions are a way for callers to build a transition rule and an
//! accepting set from data; the evaluator itself never reads files.

use crate::accept::{Accept, StateSet};
use crate::error::CoreError;
use crate::evaluator::{try_recognize, try_run};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet, VecDeque};
use std::fmt;
use std::path::Path;

const SYMBOLS: usize = 256;

/// Implicit dead state. `from_raw` rejects definitions large enough to reach it.
const DEAD: StateId = StateId(u32::MAX);

/// A named state in a definition.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct State(pub String);

impl State {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for State {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for State {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Dense index of a state in a compiled [`Dfa`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StateId(u32);

impl StateId {
    pub fn index(self) -> usize {
        self.0 as usize
    }

    pub fn as_u32(self) -> u32 {
        self.0
    }
}

impl fmt::Display for StateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "q{}", self.0)
    }
}

impl Accept<StateId> for StateSet {
    fn accepts(&self, state: &StateId) -> bool {
        self.contains(state.index())
    }
}

/// What a [`Dfa`] does on a `(state, byte)` pair with no transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingTransition {
    /// Move to an implicit dead state that never accepts.
    #[default]
    Reject,
    /// Stay in the current state.
    Stay,
    /// Fail the evaluation with [`CoreError::InvalidTransition`].
    Error,
}

/// A transition rule in a definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransitionRule {
    /// Source state(s). Can be a single state or multiple.
    #[serde(deserialize_with = "deserialize_from_states")]
    pub from: Vec<State>,

    /// Input bytes that trigger this transition.
    pub on: String,

    /// Target state.
    pub to: State,
}

fn deserialize_from_states<'de, D>(deserializer: D) -> Result<Vec<State>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::{self, Visitor};

    struct FromStatesVisitor;

    impl<'de> Visitor<'de> for FromStatesVisitor {
        type Value = Vec<State>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a string or array of strings")
        }

        fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(vec![State(v.to_string())])
        }

        fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
        where
            A: de::SeqAccess<'de>,
        {
            let mut states = Vec::new();
            while let Some(s) = seq.next_element::<String>()? {
                states.push(State(s));
            }
            Ok(states)
        }
    }

    deserializer.deserialize_any(FromStatesVisitor)
}

/// Raw DFA definition as stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DfaDefinitionRaw {
    /// All states, in index order.
    pub states: Vec<String>,

    /// Start state.
    pub initial: String,

    /// Accepting states.
    #[serde(default)]
    pub accepting: Vec<String>,

    /// Transitions.
    #[serde(default)]
    pub transitions: Vec<TransitionRule>,

    /// Policy for undefined transitions.
    #[serde(default)]
    pub on_missing: MissingTransition,

    /// Optional metadata.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<serde_json::Value>,
}

/// Validated and compiled DFA.
#[derive(Debug, Clone)]
pub struct Dfa {
    /// State names, indexed by `StateId`.
    states: Vec<State>,

    /// Name -> id lookup.
    index: HashMap<State, StateId>,

    initial: StateId,

    accepting: StateSet,

    /// `states.len() * 256` entries; row `q` holds the targets of state `q`.
    table: Vec<Option<StateId>>,

    on_missing: MissingTransition,

    /// Original raw definition.
    raw: DfaDefinitionRaw,
}

impl Dfa {
    /// Parses and validates a definition from a JSON value.
    pub fn from_json(json: &serde_json::Value) -> Result<Self, CoreError> {
        let raw = DfaDefinitionRaw::deserialize(json)?;
        Self::from_raw(raw)
    }

    /// Parses and validates a definition from JSON text.
    pub fn from_json_str(s: &str) -> Result<Self, CoreError> {
        let raw: DfaDefinitionRaw = serde_json::from_str(s)?;
        Self::from_raw(raw)
    }

    /// Parses and validates a definition from YAML text.
    pub fn from_yaml_str(s: &str) -> Result<Self, CoreError> {
        let raw: DfaDefinitionRaw = serde_yaml::from_str(s)?;
        Self::from_raw(raw)
    }

    /// Loads a definition file. `.yaml` and `.yml` files are read as YAML,
    /// anything else as JSON.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, CoreError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| CoreError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let is_yaml = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"));

        if is_yaml {
            Self::from_yaml_str(&content)
        } else {
            Self::from_json_str(&content)
        }
    }

    /// Validates a raw definition and compiles its transition table.
    pub fn from_raw(raw: DfaDefinitionRaw) -> Result<Self, CoreError> {
        if raw.states.is_empty() {
            return Err(CoreError::InvalidDefinition {
                reason: "states list is empty".to_string(),
            });
        }

        // The last id is reserved for the dead state
        if u32::try_from(raw.states.len()).map_or(true, |n| n >= DEAD.0) {
            return Err(CoreError::InvalidDefinition {
                reason: format!("too many states: {}", raw.states.len()),
            });
        }

        // Build state index
        let mut states = Vec::with_capacity(raw.states.len());
        let mut index = HashMap::with_capacity(raw.states.len());
        for (i, name) in raw.states.iter().enumerate() {
            let state = State(name.clone());
            if index.insert(state.clone(), StateId(i as u32)).is_some() {
                return Err(CoreError::InvalidDefinition {
                    reason: format!("duplicate state '{}'", name),
                });
            }
            states.push(state);
        }

        let lookup = |name: &State, role: &str| -> Result<StateId, CoreError> {
            index
                .get(name)
                .copied()
                .ok_or_else(|| CoreError::InvalidDefinition {
                    reason: format!("{} state '{}' not in states list", role, name.as_str()),
                })
        };

        // Validate initial and accepting states
        let initial = lookup(&State(raw.initial.clone()), "initial")?;

        let mut accepting = StateSet::with_capacity(states.len());
        for name in &raw.accepting {
            let id = lookup(&State(name.clone()), "accepting")?;
            accepting.insert(id.index());
        }

        // Build and validate transitions
        let mut table = vec![None; states.len() * SYMBOLS];
        for t in &raw.transitions {
            let to = lookup(&t.to, "transition target")?;

            if t.from.is_empty() {
                return Err(CoreError::InvalidDefinition {
                    reason: format!("transition to '{}' has no source states", t.to.as_str()),
                });
            }
            if t.on.is_empty() {
                return Err(CoreError::InvalidDefinition {
                    reason: format!("transition to '{}' has no symbols", t.to.as_str()),
                });
            }
            if !t.on.is_ascii() {
                return Err(CoreError::InvalidDefinition {
                    reason: format!(
                        "transition to '{}' has non-ASCII symbols '{}'",
                        t.to.as_str(),
                        t.on
                    ),
                });
            }

            // Repeating a byte within one rule names the same move twice
            let mut symbols = t.on.as_bytes().to_vec();
            symbols.sort_unstable();
            symbols.dedup();

            for from in &t.from {
                let from_id = lookup(from, "transition source")?;

                for &symbol in &symbols {
                    let slot = &mut table[from_id.index() * SYMBOLS + symbol as usize];
                    if slot.is_some() {
                        return Err(CoreError::InvalidDefinition {
                            reason: format!(
                                "duplicate transition from '{}' on symbol '{}'",
                                from.as_str(),
                                symbol.escape_ascii()
                            ),
                        });
                    }
                    *slot = Some(to);
                }
            }
        }

        let dfa = Self {
            states,
            index,
            initial,
            accepting,
            table,
            on_missing: raw.on_missing,
            raw,
        };

        if dfa.accepting.is_empty() {
            tracing::warn!(
                "DFA starting at '{}' has no accepting states",
                dfa.initial_name()
            );
        }

        let unreachable = dfa.unreachable_states();
        if !unreachable.is_empty() {
            tracing::warn!(
                "DFA has states unreachable from '{}': {:?}",
                dfa.initial_name(),
                unreachable
            );
        }

        tracing::debug!(
            "Compiled DFA starting at '{}': {} states, {} accepting, on_missing={:?}",
            dfa.initial_name(),
            dfa.states.len(),
            dfa.accepting.len(),
            dfa.on_missing
        );

        Ok(dfa)
    }

    fn initial_name(&self) -> &str {
        self.states[self.initial.index()].as_str()
    }

    /// Names of states with no path from the initial state.
    fn unreachable_states(&self) -> Vec<&str> {
        let mut seen = StateSet::with_capacity(self.states.len());
        let mut queue = VecDeque::from([self.initial]);
        seen.insert(self.initial.index());

        while let Some(state) = queue.pop_front() {
            let row = &self.table[state.index() * SYMBOLS..(state.index() + 1) * SYMBOLS];
            for next in row.iter().flatten() {
                if seen.insert(next.index()) {
                    queue.push_back(*next);
                }
            }
        }

        self.states
            .iter()
            .enumerate()
            .filter(|(i, _)| !seen.contains(*i))
            .map(|(_, s)| s.as_str())
            .collect()
    }

    /// Applies one transition.
    pub fn step(&self, state: StateId, symbol: u8) -> Result<StateId, CoreError> {
        if state == DEAD {
            return Ok(state);
        }
        if state.index() >= self.states.len() {
            return Err(CoreError::UnknownState { id: state.as_u32() });
        }

        if let Some(next) = self.table[state.index() * SYMBOLS + symbol as usize] {
            return Ok(next);
        }

        match self.on_missing {
            MissingTransition::Reject => Ok(DEAD),
            MissingTransition::Stay => Ok(state),
            MissingTransition::Error => Err(CoreError::InvalidTransition {
                state: self.states[state.index()].as_str().to_string(),
                symbol: symbol.escape_ascii().to_string(),
            }),
        }
    }

    /// Runs the DFA over `input` from the initial state and returns the final state.
    pub fn run(&self, input: impl AsRef<[u8]>) -> Result<StateId, CoreError> {
        try_run(
            self.initial,
            |state, symbol| self.step(state, symbol),
            input.as_ref().iter().copied(),
        )
    }

    /// Returns true if the DFA accepts `input`.
    pub fn recognize(&self, input: impl AsRef<[u8]>) -> Result<bool, CoreError> {
        let input = input.as_ref();
        let accepted = try_recognize(
            self.initial,
            |state, symbol| self.step(state, symbol),
            self,
            input.iter().copied(),
        )?;

        tracing::trace!(
            "DFA {} input of {} bytes",
            if accepted { "accepted" } else { "rejected" },
            input.len()
        );

        Ok(accepted)
    }

    pub fn initial(&self) -> StateId {
        self.initial
    }

    /// Looks up a state by name.
    pub fn state_id(&self, name: &str) -> Option<StateId> {
        self.index.get(&State::from(name)).copied()
    }

    /// Returns the name of a state. The dead state has no name.
    pub fn state_name(&self, id: StateId) -> Option<&str> {
        self.states.get(id.index()).map(|s| s.as_str())
    }

    /// Returns true if `id` is the implicit dead state.
    pub fn is_dead(&self, id: StateId) -> bool {
        id == DEAD
    }

    pub fn is_accepting(&self, id: StateId) -> bool {
        self.accepting.contains(id.index())
    }

    /// Number of named states (the dead state is not counted).
    pub fn state_count(&self) -> usize {
        self.states.len()
    }

    pub fn accepting(&self) -> &StateSet {
        &self.accepting
    }

    pub fn on_missing(&self) -> MissingTransition {
        self.on_missing
    }

    /// Returns all bytes with an explicit transition out of `id`.
    pub fn symbols_from(&self, id: StateId) -> Vec<u8> {
        if id.index() >= self.states.len() {
            return Vec::new();
        }
        let row = &self.table[id.index() * SYMBOLS..(id.index() + 1) * SYMBOLS];
        row.iter()
            .enumerate()
            .filter(|(_, next)| next.is_some())
            .map(|(symbol, _)| symbol as u8)
            .collect()
    }

    pub fn raw(&self) -> &DfaDefinitionRaw {
        &self.raw
    }

    /// Returns the raw definition as JSON.
    pub fn to_json(&self) -> Result<serde_json::Value, CoreError> {
        Ok(serde_json::to_value(&self.raw)?)
    }

    /// Names of all states, in index order.
    pub fn state_names(&self) -> impl Iterator<Item = &str> {
        self.states.iter().map(|s| s.as_str())
    }

    /// Names of the accepting states.
    pub fn accepting_names(&self) -> HashSet<&str> {
        self.accepting
            .iter()
            .filter_map(|i| self.states.get(i))
            .map(|s| s.as_str())
            .collect()
    }
}

impl Accept<StateId> for Dfa {
    fn accepts(&self, state: &StateId) -> bool {
        self.is_accepting(*state)
    }
}

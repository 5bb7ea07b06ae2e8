//! Every operation in this module takes its input automata by reference and builds a new automaton,
//! the inputs are never modified. When two automata are combined, their states are first copied
//! into the result, so the states of the result are never shared with the inputs.

mod regular;

mod product;
pub use product::{CommonLabels, PartialSynchronization, Synchronization, Synchronous};

mod determinize;

mod reduce;

mod normalize;

mod epsilon;

mod prune;

mod morphism;

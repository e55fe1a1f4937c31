//! Council domain
//!
//! Modes, roles, rounds and the pure decision logic of a run: mode selection,
//! payload building, triage, critique parsing and emergent-idea extraction.

pub mod emergent;
pub mod entities;
pub mod mode;
pub mod role;
pub mod round_builder;
pub mod triage;
pub mod value_objects;
pub mod verdict;

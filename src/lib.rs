//! Implant Market Simulation Library
//!
//! An agent-based model of additive versus subtractive implant manufacturers
//! competing through healthcare providers for patients.

pub mod simulation;

//! Behaviour tests for the evaluation engine.

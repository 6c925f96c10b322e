//! Tests for the unit lifecycle state machine

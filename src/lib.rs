//! Dermassist - Interactive Skin Type Assessment
//!
//! This crate drives the Baumann 4-axis questionnaire through a per-subject
//! conversation state machine, reconciles the quiz-derived code with an
//! imaging-derived code, and keeps one durable record per subject.

pub mod adapters;
pub mod config;
pub mod domain;
pub mod ports;

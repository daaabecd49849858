//! Symptom Guide - Conversational Symptom Triage
//!
//! This crate implements a multi-turn symptom-triage conversation: symptom
//! extraction from free text, evidence-ranked condition matching, targeted
//! follow-up questions, and a guarded final summary.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;

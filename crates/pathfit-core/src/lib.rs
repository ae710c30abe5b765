//! pathfit-core: scoring engine, question catalogs and recommendations.
//!
//! This crate defines the assessment data model, the normalization and
//! aggregation rules, and the recommendation synthesis that the pathfit CLI
//! builds on.

pub mod aggregate;
pub mod catalog;
pub mod config;
pub mod engine;
pub mod error;
pub mod model;
pub mod normalize;
pub mod parser;
pub mod recommend;
pub mod report;
pub mod session;
pub mod statistics;

//! revanchor — place generated review feedback on pull-request diffs (library crate).
//!
//! The planning core is a linear pipeline of pure stages: anchor candidates
//! from the diff ([`diff::anchors`]), source sections ([`sections`]),
//! document parts ([`document`]), rule findings ([`rules`]), anchor mapping
//! with actionability repair ([`mapping`], [`actionable`]) and capping
//! ([`assemble`]). [`pipeline`] wires them together; [`publish`] and
//! [`github`] deliver the result.

pub mod actionable;
pub mod assemble;
pub mod config;
pub mod constants;
pub mod diff;
pub mod document;
pub mod env;
pub mod github;
pub mod mapping;
pub mod models;
pub mod output;
pub mod pipeline;
pub mod publish;
pub mod rules;
pub mod sections;

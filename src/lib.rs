//! Weighted multi-factor scoring for childcare center decisions.
//!
//! Candidates (sites, accreditations, marketing strategies) carry 1-10
//! ratings per factor. The [`scoring`] engine turns them into normalized,
//! ranked scores either by weighted category averages or by an explicit
//! formula of weighted terms, and lists each candidate's weakest factors.
//! The remaining modules wrap the engine in a command-line tool.

pub mod config;
pub mod history;
pub mod output;
pub mod scoring;
pub mod telemetry;

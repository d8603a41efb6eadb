//! clinreport - a clinical data reporting CLI for PostgreSQL.
//!
//! Runs a fixed catalog of analytical reports over a clinical schema
//! (patients, encounters, observations, practitioners, medication
//! requests) and prints each result set as a bordered table.
//!
//! This library exposes the core modules for use in integration tests.

pub mod catalog;
pub mod cli;
pub mod config;
pub mod db;
pub mod error;
pub mod report;

//! Shortify - two small web utilities sharing one binary
//!
//! # Modes
//! - **shortener**: in-memory URL shortener. Keys are a truncated MD5 of the
//!   normalized URL, the table is last-write-wins, known keys answer with a
//!   303 redirect.
//! - **relay**: accepts a PDF upload, extracts its text with an external tool
//!   (`pdftotext`) when available and returns it as a LaTeX document.
//!
//! # Architecture
//! - `registry`: key derivation and the shared link table
//! - `relay`: temp-file handling, extractor backends, LaTeX escaping
//! - `api`: HTTP handlers, templates and middleware
//! - `config`: TOML + environment configuration
//! - `runtime`: CLI parsing, mode runners and shutdown
//! - `system`: logging

pub mod api;
pub mod config;
pub mod errors;
pub mod registry;
pub mod relay;
pub mod runtime;
pub mod system;

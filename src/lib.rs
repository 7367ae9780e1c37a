#![warn(clippy::all, clippy::pedantic)]
#![allow(
    clippy::cast_possible_truncation,
    clippy::cast_possible_wrap,
    clippy::cast_precision_loss,
    clippy::cast_sign_loss,
    clippy::doc_markdown,
    clippy::float_cmp,
    clippy::items_after_statements,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::similar_names,
    clippy::single_match_else,
    clippy::struct_field_names,
    clippy::too_many_lines,
    clippy::uninlined_format_args
)]

//! MCP server for the Reachy Mini desktop robot.
//!
//! Exposes movement, expression, audio, and vision capabilities as MCP
//! tools over stdio, plus read-only metadata resources and canned prompt
//! templates. The `debug` module drives the full capability surface as a
//! sequential hardware diagnostics run.

pub mod debug;
pub mod motion;
pub mod prompts;
pub mod resources;
pub mod robot;
pub mod server;
pub mod tools;
pub mod tts;
pub mod vision;

//! launchpad: launcher for a docker compose AI stack
//!
//! Reads flat `KEY=value` config files (LLM backend selector, service toggles),
//! resolves the ordered set of compose fragment files, and dispatches a fixed
//! set of verbs to `docker compose`.
//!
//! Layers, innermost first:
//! - `domain`: pure types and the fragment resolver
//! - `application`: services orchestrating config, session state and docker
//! - `infrastructure`: I/O boundary traits and the service container
//! - `cli`: argument parsing, dispatch, terminal output

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;

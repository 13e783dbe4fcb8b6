//! A tiny sequencing command shell.
//!
//! This crate provides the building blocks of a minimal interactive shell:
//! it splits input lines into command segments at `;` and `&`, runs the
//! `cd` and `exit` builtins in-process, launches everything else as a child
//! process, waits for foreground children, and sweeps finished background
//! children after every line so none of them linger as zombies.
//!
//! The main entry point is [`Interpreter`], which executes lines read from a
//! [`input::LineSource`]. The public modules [`command`], [`env`], [`input`]
//! and [`parser`] expose the traits and types the interpreter is built from.

mod builtin;
pub mod command;
pub mod env;
mod external;
pub mod input;
mod interpreter;
mod jobs;
pub mod parser;

pub use interpreter::{Interpreter, LineOutcome};

//! A small interactive verb shell.
//!
//! One line of input is split into tokens (quoted spans with escaped quotes are
//! kept together), the tokens after the verb word are resolved into an option
//! mapping using a short/long option grammar, and the mapping is applied to
//! the verb's own setter bindings before its action runs.
//!
//! The main entry point is [`Processor`], which keeps a registry of verbs and
//! runs them line by line. The lower-level pieces ([`lexer`], [`options`],
//! [`binding`], [`dispatch`]) can be used on their own.

pub mod binding;
pub mod builtin;
pub mod convert;
pub mod dispatch;
pub mod error;
pub mod lexer;
pub mod options;
pub mod processor;
pub mod verb;

/// Just a convenient re-export of the interactive verb shell.
///
/// See [`Processor`] for the high-level API and examples.
pub use processor::Processor;
pub use verb::Verb;

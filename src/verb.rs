//! The verb abstraction: a command that exposes help text, a binding table
//! and an action.

use crate::binding::BindingTable;
use crate::dispatch::{self, UnknownOption};
use crate::error::Result;
use crate::options::ResolvedOptions;

/// Help text reported by verbs that do not provide their own.
pub const DEFAULT_VERB_HELP: &str = "This action does not include any help documentation.";

/// A user-defined command.
///
/// A verb is constructed fresh for every dispatch. Its constructor populates
/// its own [`BindingTable`]; the dispatcher then applies the resolved options
/// through those bindings and runs [`Verb::call`] exactly once.
pub trait Verb: Sized {
    /// Help text shown by `help <verb>`.
    fn help(&self) -> &str {
        DEFAULT_VERB_HELP
    }

    /// The bindings populated when this verb was constructed.
    fn bindings(&self) -> &BindingTable<Self>;

    /// Runs the action with the options applied so far and returns its result.
    fn call(&mut self) -> String;
}

/// Object-safe view of a [`Verb`], used where verbs of different types are
/// handled together.
///
/// Implemented for every `Verb` via a blanket impl.
pub trait Command {
    fn help_text(&self) -> &str;

    /// Applies `options` and runs the action. See [`dispatch::call`].
    fn dispatch(
        &mut self,
        options: &ResolvedOptions,
        notices: &mut dyn FnMut(UnknownOption),
    ) -> Result<String>;
}

impl<V: Verb> Command for V {
    fn help_text(&self) -> &str {
        Verb::help(self)
    }

    fn dispatch(
        &mut self,
        options: &ResolvedOptions,
        notices: &mut dyn FnMut(UnknownOption),
    ) -> Result<String> {
        dispatch::call(options, self, notices)
    }
}

/// Constructs fresh verb instances.
///
/// Implemented for any `Fn() -> V`, so a verb's constructor (`Greet::new`) or
/// a closure can be registered directly.
pub trait VerbFactory {
    fn create(&self) -> Box<dyn Command>;
}

impl<F, V> VerbFactory for F
where
    F: Fn() -> V,
    V: Verb + 'static,
{
    fn create(&self) -> Box<dyn Command> {
        Box::new(self())
    }
}

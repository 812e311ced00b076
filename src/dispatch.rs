//! Applies resolved options to a verb's bindings and runs its action.

use crate::error::{Error, Result};
use crate::options::ResolvedOptions;
use crate::verb::Verb;
use log::{error, warn};
use std::fmt;

/// Notice emitted for an option key the verb has no binding for.
///
/// Informational only: the remaining options and the action still run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownOption {
    pub key: String,
}

impl fmt::Display for UnknownOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "No {} option found!", self.key)
    }
}

/// Dispatches `options` against `verb`.
///
/// Every known key is passed to its setter in resolution order; every unknown
/// key is reported through `notices`. The action then runs exactly once, even
/// with no options or with unknown ones, and its result is returned.
///
/// A failing setter aborts the dispatch: options applied before it stay
/// applied and the action is not run.
pub fn call<V: Verb>(
    options: &ResolvedOptions,
    verb: &mut V,
    notices: &mut dyn FnMut(UnknownOption),
) -> Result<String> {
    for (key, value) in options.iter() {
        let Some(setter) = verb.bindings().get(key).cloned() else {
            warn!("unknown option `{key}`");
            notices(UnknownOption {
                key: key.to_string(),
            });
            continue;
        };

        setter(&mut *verb, value).map_err(|source| {
            error!("option `{key}` rejected {value:?}: {source}");
            Error::Conversion {
                key: key.to_string(),
                source,
            }
        })?;
    }

    Ok(verb.call())
}

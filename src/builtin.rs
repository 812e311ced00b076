//! Verbs shipped with the `sally` binary.

use crate::binding::BindingTable;
use crate::convert::{convert_bool, convert_double, convert_int, require};
use crate::error::Result;
use crate::processor::Processor;
use crate::verb::Verb;

/// Registers every built-in verb on `processor`.
pub fn register(processor: &mut Processor) -> Result<()> {
    processor
        .add_verb("test", Test::new)?
        .add_verb("echo", Echo::new)?
        .add_verb("sum", Sum::new)?;
    Ok(())
}

/// Exercises a toggle, a string and an integer option.
pub struct Test {
    switch: bool,
    text: Option<String>,
    num: i64,
    bindings: BindingTable<Self>,
}

impl Test {
    pub fn new() -> Self {
        let mut bindings = BindingTable::<Self>::new();
        bindings
            .bind_both('s', "switch", |verb: &mut Self, _| {
                verb.switch = !verb.switch;
                Ok(())
            })
            .bind_both('t', "text", |verb: &mut Self, value| {
                verb.text = Some(require(value)?.to_string());
                Ok(())
            })
            .bind_both('n', "num", |verb: &mut Self, value| {
                verb.num = convert_int(value)?;
                Ok(())
            });
        Self {
            switch: false,
            text: None,
            num: 0,
            bindings,
        }
    }
}

impl Default for Test {
    fn default() -> Self {
        Self::new()
    }
}

impl Verb for Test {
    fn help(&self) -> &str {
        "This verb is a test of the shell processor.\n\
         options: -s/--switch, -t/--text <TEXT>, -n/--num <INT>"
    }

    fn bindings(&self) -> &BindingTable<Self> {
        &self.bindings
    }

    fn call(&mut self) -> String {
        format!(
            "Switch on? {}\nText entered: {}\nNumber entered: {} + 10 = {}\nSuccess!",
            self.switch,
            self.text.as_deref().unwrap_or("<none>"),
            self.num,
            self.num.saturating_add(10)
        )
    }
}

/// Echoes text, optionally upper-cased and repeated.
pub struct Echo {
    text: String,
    upper: bool,
    repeat: i64,
    bindings: BindingTable<Self>,
}

impl Echo {
    pub fn new() -> Self {
        let mut bindings = BindingTable::<Self>::new();
        bindings
            .bind_both('t', "text", |verb: &mut Self, value| {
                verb.text = require(value)?.to_string();
                Ok(())
            })
            .bind_both('u', "upper", |verb: &mut Self, value| {
                verb.upper = convert_bool(value)?;
                Ok(())
            })
            .bind_both('r', "repeat", |verb: &mut Self, value| {
                verb.repeat = convert_int(value)?;
                Ok(())
            });
        Self {
            text: String::new(),
            upper: false,
            repeat: 1,
            bindings,
        }
    }
}

impl Default for Echo {
    fn default() -> Self {
        Self::new()
    }
}

impl Verb for Echo {
    fn help(&self) -> &str {
        "Print text back.\noptions: -t/--text <TEXT>, -u/--upper [BOOL], -r/--repeat <INT>"
    }

    fn bindings(&self) -> &BindingTable<Self> {
        &self.bindings
    }

    fn call(&mut self) -> String {
        let text = if self.upper {
            self.text.to_uppercase()
        } else {
            self.text.clone()
        };
        let times = usize::try_from(self.repeat).unwrap_or(0);
        vec![text; times].join(" ")
    }
}

/// Adds two numbers.
pub struct Sum {
    left: f64,
    right: f64,
    bindings: BindingTable<Self>,
}

impl Sum {
    pub fn new() -> Self {
        let mut bindings = BindingTable::<Self>::new();
        bindings
            .bind_both('a', "left", |verb: &mut Self, value| {
                verb.left = convert_double(value)?;
                Ok(())
            })
            .bind_both('b', "right", |verb: &mut Self, value| {
                verb.right = convert_double(value)?;
                Ok(())
            });
        Self {
            left: 0.0,
            right: 0.0,
            bindings,
        }
    }
}

impl Default for Sum {
    fn default() -> Self {
        Self::new()
    }
}

impl Verb for Sum {
    fn help(&self) -> &str {
        "Add two numbers.\noptions: -a/--left <NUM>, -b/--right <NUM>"
    }

    fn bindings(&self) -> &BindingTable<Self> {
        &self.bindings
    }

    fn call(&mut self) -> String {
        format!("{}", self.left + self.right)
    }
}

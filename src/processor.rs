use crate::error::{Error, Result};
use crate::lexer::{self, Token};
use crate::options;
use crate::verb::{Verb, VerbFactory};
use log::{debug, info};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::io::Write;

/// Verb that ends the session.
pub const EXIT: &str = "exit";
/// Verb that prints processor or verb help.
pub const HELP: &str = "help";

/// Help text reported by processors that are not given any.
pub const DEFAULT_PROCESSOR_HELP: &str =
    "There is no help documentation available for this shell interface.";

/// Name and top-level help of a [`Processor`].
#[derive(Debug, Clone)]
pub struct ProcessorConfig {
    /// Shown in the prompt as `{name}#: `.
    pub name: String,
    /// Printed by a bare `help`.
    pub help: String,
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self {
            name: String::new(),
            help: DEFAULT_PROCESSOR_HELP.to_string(),
        }
    }
}

/// What the hosting loop should do after a line was executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

/// An interactive verb shell.
///
/// The processor keeps a registry of verb factories keyed by name. Each
/// executed line constructs a fresh verb, resolves the options that follow the
/// verb word and dispatches them, so no state survives between lines.
///
/// `help` and `exit` are reserved and handled by the processor itself.
///
/// Example
/// ```
/// use sally::binding::BindingTable;
/// use sally::processor::{Processor, ProcessorConfig};
/// use sally::verb::Verb;
///
/// struct Hello {
///     loud: bool,
///     bindings: BindingTable<Self>,
/// }
///
/// impl Hello {
///     fn new() -> Self {
///         let mut bindings = BindingTable::<Self>::new();
///         bindings.bind_both('l', "loud", |verb: &mut Self, _| {
///             verb.loud = !verb.loud;
///             Ok(())
///         });
///         Self { loud: false, bindings }
///     }
/// }
///
/// impl Verb for Hello {
///     fn bindings(&self) -> &BindingTable<Self> {
///         &self.bindings
///     }
///
///     fn call(&mut self) -> String {
///         if self.loud { "HELLO".into() } else { "hello".into() }
///     }
/// }
///
/// let mut sh = Processor::new(ProcessorConfig::default());
/// sh.add_verb("hello", Hello::new).unwrap();
///
/// let mut out = Vec::new();
/// sh.execute("hello -l", &mut out).unwrap();
/// assert_eq!(String::from_utf8(out).unwrap(), "HELLO\n");
/// ```
pub struct Processor {
    name: String,
    help: String,
    verbs: HashMap<String, Box<dyn VerbFactory>>,
}

impl Processor {
    pub fn new(config: ProcessorConfig) -> Self {
        Self {
            name: config.name,
            help: config.help,
            verbs: HashMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn help(&self) -> &str {
        &self.help
    }

    /// Registers a verb under `name`.
    ///
    /// `help` and `exit` (in any case) are rejected. If `name` is already
    /// registered the first registration is kept.
    pub fn add_verb<F, V>(&mut self, name: impl Into<String>, factory: F) -> Result<&mut Self>
    where
        F: Fn() -> V + 'static,
        V: Verb + 'static,
    {
        let name = name.into();
        if name.eq_ignore_ascii_case(HELP) || name.eq_ignore_ascii_case(EXIT) {
            return Err(Error::ReservedVerb(name));
        }

        match self.verbs.entry(name) {
            Entry::Occupied(entry) => {
                debug!("verb `{}` already registered, keeping the first one", entry.key());
            }
            Entry::Vacant(entry) => {
                info!("registered verb `{}`", entry.key());
                entry.insert(Box::new(factory));
            }
        }
        Ok(self)
    }

    /// Registered verb names, sorted.
    pub fn verbs(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.verbs.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn contains_verb(&self, name: &str) -> bool {
        self.verbs.contains_key(name)
    }

    /// Executes one raw line, writing everything user-visible to `out`.
    ///
    /// The verb word is the first whitespace-delimited word, taken as is;
    /// quoting only applies to the words after it.
    ///
    /// Unknown-option notices precede the verb's result. A conversion failure
    /// is reported and does not end the session; only I/O errors on `out` are
    /// returned.
    pub fn execute(&self, line: &str, out: &mut dyn Write) -> anyhow::Result<Flow> {
        let words = lexer::split_words(line);
        let Some((&verb, rest)) = words.split_first() else {
            return Ok(Flow::Continue);
        };
        let args = lexer::link_quoted(rest);
        debug!("verb = {verb:?}, args = {args:?}");

        match verb {
            EXIT => return Ok(Flow::Exit),
            HELP => writeln!(out, "{}", self.help_for(&args))?,
            name => match self.verbs.get(name) {
                Some(factory) => self.run_verb(factory.as_ref(), &args, out)?,
                None => writeln!(out, "{name} is not a known command.")?,
            },
        }
        Ok(Flow::Continue)
    }

    fn run_verb(
        &self,
        factory: &dyn VerbFactory,
        args: &[Token],
        out: &mut dyn Write,
    ) -> anyhow::Result<()> {
        let options = options::resolve(args);
        let mut command = factory.create();

        let mut notices = Vec::new();
        let outcome = command.dispatch(&options, &mut |notice| notices.push(notice));

        for notice in &notices {
            writeln!(out, "ERROR: {notice}")?;
        }
        match outcome {
            Ok(result) => writeln!(out, "{result}")?,
            Err(err) => writeln!(out, "ERROR: {err}")?,
        }
        Ok(())
    }

    fn help_for(&self, args: &[Token]) -> String {
        match args.first() {
            None => self.help.clone(),
            Some(name) => match self.verbs.get(name.as_str()) {
                Some(factory) => factory.create().help_text().to_string(),
                None => format!("{name} not recognized."),
            },
        }
    }

    /// Interactive Read-Eval-Print Loop on standard input and output.
    ///
    /// Runs until `exit`, Ctrl-C or end of input.
    pub fn repl(&self) -> anyhow::Result<()> {
        let mut rl = DefaultEditor::new()?;
        let prompt = format!("{}#: ", self.name);
        info!("session `{}` started", self.name);

        loop {
            match rl.readline(&prompt) {
                Ok(line) => {
                    if !line.trim().is_empty() {
                        rl.add_history_entry(line.as_str())?;
                    }
                    let mut stdout = std::io::stdout().lock();
                    if self.execute(&line, &mut stdout)? == Flow::Exit {
                        break;
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    println!("Interrupted");
                    break;
                }
                Err(ReadlineError::Eof) => {
                    println!("Eof");
                    break;
                }
                Err(err) => return Err(err.into()),
            }
        }

        info!("session `{}` ended", self.name);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binding::BindingTable;
    use crate::convert;

    struct Greet {
        name: String,
        times: i64,
        bindings: BindingTable<Self>,
    }

    impl Greet {
        fn new() -> Self {
            let mut bindings = BindingTable::<Self>::new();
            bindings
                .bind_both('n', "name", |verb: &mut Self, value| {
                    verb.name = convert::require(value)?.to_string();
                    Ok(())
                })
                .bind_both('x', "times", |verb: &mut Self, value| {
                    verb.times = convert::convert_int(value)?;
                    Ok(())
                });
            Self {
                name: "world".into(),
                times: 1,
                bindings,
            }
        }
    }

    impl Verb for Greet {
        fn help(&self) -> &str {
            "greet someone"
        }

        fn bindings(&self) -> &BindingTable<Self> {
            &self.bindings
        }

        fn call(&mut self) -> String {
            vec![format!("hello {}", self.name); self.times.max(0) as usize].join(" ")
        }
    }

    struct Silent {
        bindings: BindingTable<Self>,
    }

    impl Verb for Silent {
        fn bindings(&self) -> &BindingTable<Self> {
            &self.bindings
        }

        fn call(&mut self) -> String {
            "ok".into()
        }
    }

    fn processor() -> Processor {
        let mut sh = Processor::new(ProcessorConfig {
            name: "test".into(),
            help: "top-level help".into(),
        });
        sh.add_verb("greet", Greet::new).unwrap();
        sh
    }

    fn run(sh: &Processor, line: &str) -> (Flow, String) {
        let mut out = Vec::new();
        let flow = sh.execute(line, &mut out).unwrap();
        (flow, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_runs_registered_verb_with_defaults() {
        let (flow, out) = run(&processor(), "greet");
        assert_eq!(flow, Flow::Continue);
        assert_eq!(out, "hello world\n");
    }

    #[test]
    fn test_runs_registered_verb_with_options() {
        let (_, out) = run(&processor(), r#"greet --name "Ada Lovelace" -x 2"#);
        assert_eq!(out, "hello Ada Lovelace hello Ada Lovelace\n");
    }

    #[test]
    fn test_no_state_leaks_between_lines() {
        let sh = processor();
        run(&sh, "greet -n Ada");
        let (_, out) = run(&sh, "greet");
        assert_eq!(out, "hello world\n");
    }

    #[test]
    fn test_unknown_options_are_reported_before_result() {
        let (_, out) = run(&processor(), "greet -q --loud -n Bob");
        assert_eq!(
            out,
            "ERROR: No q option found!\nERROR: No loud option found!\nhello Bob\n"
        );
    }

    #[test]
    fn test_conversion_failure_is_reported_and_session_continues() {
        let sh = processor();
        let (flow, out) = run(&sh, "greet --times many");
        assert_eq!(flow, Flow::Continue);
        assert_eq!(out, "ERROR: option `times`: `many` is not an integer\n");

        let (_, out) = run(&sh, "greet");
        assert_eq!(out, "hello world\n");
    }

    #[test]
    fn test_exit_and_blank_lines() {
        let sh = processor();
        assert_eq!(run(&sh, "exit"), (Flow::Exit, String::new()));
        assert_eq!(run(&sh, "   "), (Flow::Continue, String::new()));
    }

    #[test]
    fn test_unknown_verb() {
        let (_, out) = run(&processor(), "frobnicate -x");
        assert_eq!(out, "frobnicate is not a known command.\n");
    }

    #[test]
    fn test_verb_word_is_taken_verbatim() {
        let sh = processor();
        assert_eq!(run(&sh, "'greet'").1, "'greet' is not a known command.\n");
        assert_eq!(
            run(&sh, r#""greet -n Ada"#).1,
            "\"greet is not a known command.\n"
        );
        assert_eq!(run(&sh, "  greet   -n  'Ada  L'").1, "hello Ada L\n");
    }

    #[test]
    fn test_help() {
        let sh = processor();
        assert_eq!(run(&sh, "help").1, "top-level help\n");
        assert_eq!(run(&sh, "help greet").1, "greet someone\n");
        assert_eq!(run(&sh, "help nope").1, "nope not recognized.\n");
    }

    #[test]
    fn test_reserved_verbs_are_rejected() {
        let mut sh = processor();
        for name in ["help", "EXIT", "Help"] {
            let err = sh.add_verb(name, Greet::new).err().unwrap();
            assert!(matches!(err, Error::ReservedVerb(_)));
        }
        assert_eq!(sh.verbs(), ["greet"]);
    }

    #[test]
    fn test_first_verb_registration_wins() {
        let mut sh = processor();
        sh.add_verb("greet", || Silent {
            bindings: BindingTable::new(),
        })
        .unwrap()
        .add_verb("silent", || Silent {
            bindings: BindingTable::new(),
        })
        .unwrap();

        assert_eq!(sh.verbs(), ["greet", "silent"]);
        assert_eq!(run(&sh, "greet").1, "hello world\n");
        assert_eq!(run(&sh, "silent --anything").1, "ERROR: No anything option found!\nok\n");
        assert_eq!(run(&sh, "help silent").1, format!("{}\n", crate::verb::DEFAULT_VERB_HELP));
    }

    #[test]
    fn test_default_config() {
        let sh = Processor::new(ProcessorConfig::default());
        assert_eq!(sh.name(), "");
        assert_eq!(sh.help(), DEFAULT_PROCESSOR_HELP);
        assert!(!sh.contains_verb("greet"));
    }
}

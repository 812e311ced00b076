use argh::FromArgs;
use sally::processor::{DEFAULT_PROCESSOR_HELP, Flow, ProcessorConfig};
use sally::{Processor, builtin};

#[derive(FromArgs)]
/// Interactive verb shell. Type `help` for help and `exit` to leave.
struct Args {
    #[argh(option, default = "String::from(\"sally\")")]
    /// name shown in the prompt.
    name: String,

    #[argh(option)]
    /// text printed by a bare `help`.
    help_text: Option<String>,

    #[argh(option, short = 'c')]
    /// run this line instead of starting the prompt; may be repeated.
    command: Vec<String>,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args: Args = argh::from_env();
    let mut processor = Processor::new(ProcessorConfig {
        name: args.name,
        help: args
            .help_text
            .unwrap_or_else(|| DEFAULT_PROCESSOR_HELP.to_string()),
    });
    builtin::register(&mut processor)?;

    if args.command.is_empty() {
        return processor.repl();
    }

    let mut stdout = std::io::stdout().lock();
    for line in &args.command {
        if processor.execute(line, &mut stdout)? == Flow::Exit {
            break;
        }
    }
    Ok(())
}

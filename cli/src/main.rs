use std::io::BufRead;
use std::io::BufReader;
use std::path::PathBuf;

use clap::Parser;
use hostjs::{
    Context, ContextOptions, Error, HostValue, ModuleLoader, ProxyMode, ReturnPolicy, Variables,
    render_error,
};
use miette::{IntoDiagnostic, Result};
use reedline::{
    DefaultCompleter, DefaultPrompt, DefaultPromptSegment, DescriptionMode, EditCommand, Emacs,
    ExampleHighlighter, IdeMenu, KeyCode, KeyModifiers, Keybindings, MenuBuilder, Reedline,
    ReedlineEvent, ReedlineMenu, Signal, default_emacs_keybindings,
};

/// hostjs - evaluate JavaScript against host values
#[derive(Parser, Debug)]
#[command(name = "hostjs")]
#[command(about = "Evaluate JavaScript with host bindings", long_about = None)]
struct Args {
    /// Variable exposed to scripts as `host.<name>`, given as NAME=JSON
    #[arg(long = "var", value_name = "NAME=JSON", value_parser = parse_var)]
    vars: Vec<(String, serde_json::Value)>,

    /// Directory searched by `require` for `<id>.js` (repeatable)
    #[arg(long = "module-path", value_name = "DIR")]
    module_paths: Vec<PathBuf>,

    /// Heap size limit in bytes
    #[arg(long)]
    memory_limit: Option<usize>,

    /// Let scripts assign and delete properties of host objects
    #[arg(long)]
    read_write: bool,

    /// Print wrapper statistics on exit
    #[arg(long)]
    stats: bool,

    /// Source to evaluate (if not provided, reads from stdin)
    expression: Option<String>,
}

fn parse_var(arg: &str) -> std::result::Result<(String, serde_json::Value), String> {
    let (name, json) = arg
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=JSON, got '{arg}'"))?;
    let value = serde_json::from_str(json).map_err(|e| format!("invalid JSON for '{name}': {e}"))?;
    Ok((name.to_string(), value))
}

const KEYWORDS: &[&str] = &[
    "function", "return", "var", "let", "const", "typeof", "require", "print", "host",
];

fn add_menu_keybindings(keybindings: &mut Keybindings) {
    keybindings.add_binding(
        KeyModifiers::NONE,
        KeyCode::Tab,
        ReedlineEvent::UntilFound(vec![
            ReedlineEvent::Menu("completion_menu".to_string()),
            ReedlineEvent::MenuNext,
        ]),
    );
    keybindings.add_binding(
        KeyModifiers::ALT,
        KeyCode::Enter,
        ReedlineEvent::Edit(vec![EditCommand::InsertNewline]),
    );
}

fn setup_reedline() -> (Reedline, DefaultPrompt) {
    let commands: Vec<String> = KEYWORDS.iter().map(|k| k.to_string()).collect();

    let completer = Box::new({
        let mut completions = DefaultCompleter::with_inclusions(&['_', '$']);
        completions.insert(commands.clone());
        completions
    });

    let ide_menu = IdeMenu::default()
        .with_name("completion_menu")
        .with_min_completion_width(0)
        .with_max_completion_width(50)
        .with_max_completion_height(u16::MAX)
        .with_padding(0)
        .with_cursor_offset(0)
        .with_description_mode(DescriptionMode::PreferRight)
        .with_min_description_width(0)
        .with_max_description_width(50)
        .with_description_offset(1)
        .with_correct_cursor_pos(false);

    let mut keybindings = default_emacs_keybindings();
    add_menu_keybindings(&mut keybindings);

    let line_editor = Reedline::create()
        .with_highlighter(Box::new(ExampleHighlighter::new(commands)))
        .with_completer(completer)
        .with_menu(ReedlineMenu::EngineCompleter(Box::new(ide_menu)))
        .with_edit_mode(Box::new(Emacs::new(keybindings)));

    let prompt = DefaultPrompt::new(DefaultPromptSegment::Empty, DefaultPromptSegment::Empty);

    (line_editor, prompt)
}

/// `print(...)`: write the arguments to stdout, text unquoted.
fn print_callable() -> HostValue {
    HostValue::function("print", |args| {
        let line = args
            .iter()
            .map(|arg| match arg.as_str() {
                Some(text) => text.to_string(),
                None => arg.to_string(),
            })
            .collect::<Vec<_>>()
            .join(" ");
        println!("{line}");
        Ok(HostValue::None)
    })
}

fn create_context(args: &Args) -> Result<Context> {
    let options = ContextOptions {
        memory_limit: args.memory_limit,
        proxy_mode: if args.read_write {
            ProxyMode::ReadWrite
        } else {
            ProxyMode::ReportOnly
        },
        ..ContextOptions::default()
    };
    let context = Context::with_options(options).into_diagnostic()?;
    context
        .bind_callable_with("print", &print_callable(), ReturnPolicy::Discard)
        .into_diagnostic()?;

    let loader = args
        .module_paths
        .iter()
        .fold(ModuleLoader::new(), |loader, dir| loader.with_search_path(dir));
    context.install_require(loader).into_diagnostic()?;
    Ok(context)
}

fn interpret_input(context: &Context, input: &str, variables: &str) -> Result<()> {
    match context.evaluate(input, variables) {
        Ok(HostValue::None) => {}
        Ok(value) => println!("{value}"),
        Err(Error::Fatal(message)) => {
            // The context is gone; nothing further can run.
            return Err(miette::miette!("fatal engine error: {message}"));
        }
        Err(e) => render_error(&e, input),
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging subscriber
    use tracing_subscriber::{EnvFilter, fmt};

    // Use RUST_LOG to control log level, WARN if not set
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("warn"))
        .into_diagnostic()?;

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let mut variables = Variables::new();
    for (name, value) in &args.vars {
        variables.insert(name.as_str(), value).into_diagnostic()?;
    }
    let variables = variables.to_json();
    tracing::debug!(%variables, "variable bundle");

    let context = create_context(&args)?;

    if let Some(expr) = &args.expression {
        interpret_input(&context, expr, &variables)?;
    } else if atty::is(atty::Stream::Stdin) {
        // Interactive REPL mode
        let (mut line_editor, prompt) = setup_reedline();

        println!("hostjs REPL - Type JavaScript to evaluate (Ctrl+D or Ctrl+C to exit)");

        loop {
            let sig = match line_editor.read_line(&prompt) {
                Ok(s) => s,
                Err(e) => {
                    eprintln!("Reedline error: {e}");
                    break;
                }
            };

            match sig {
                Signal::Success(buffer) => interpret_input(&context, &buffer, &variables)?,
                Signal::CtrlD | Signal::CtrlC => {
                    println!("\nGoodbye!");
                    break;
                }
            }
        }
    } else {
        // Pipe/stdin mode
        let stdin = std::io::stdin();
        let reader = BufReader::new(stdin.lock());

        for line in reader.lines() {
            let line = match line {
                Ok(l) => l,
                Err(e) => {
                    eprintln!("Error reading line from stdin: {}", e);
                    break;
                }
            };

            interpret_input(&context, &line, &variables)?;
        }
    }

    if args.stats {
        let stats = context.stats();
        eprintln!(
            "wrappers: {} created, {} released, {} live",
            stats.wrappers_created,
            stats.wrappers_released,
            stats.live_wrappers()
        );
    }
    Ok(())
}

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use order_droid::line_editor::{LineEditor, ReadResult};
use order_droid::nl::dialogue::{Chooser, OrderTaker, RandomChooser, Session};
use order_droid::nl::lexicon::{self, Lexicon};
use order_droid::nl::vocab;
use order_droid::types::Result;
use order_droid::ui;

#[derive(Parser)]
#[command(author, version, about = "Rule-based fast-food order taker")]
struct Cli {
    /// Directory with stop_words_english.txt, lemmatization-en.txt and word_tags.txt
    #[arg(long, value_name = "DIR")]
    data_dir: Option<PathBuf>,

    /// Seed for reply selection
    #[arg(long, value_name = "N")]
    seed: Option<u64>,

    /// Log pipeline output and intent scores to stderr
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", ui::error(&e.to_string()));
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "order_droid=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: &Cli) -> Result<()> {
    let loaded;
    let lexicon: &Lexicon = match &cli.data_dir {
        Some(dir) => {
            loaded = Lexicon::load_dir(dir)?;
            &loaded
        }
        None => lexicon::default_lexicon(),
    };

    let chooser = match cli.seed {
        Some(seed) => RandomChooser::seeded(seed),
        None => RandomChooser::new(),
    };
    let mut taker = OrderTaker::new(lexicon, vocab::vocab(), chooser);
    let mut editor = LineEditor::new()?;

    println!("{}", ui::banner("ORDER DROID", concat!("v", env!("CARGO_PKG_VERSION")), "type your order"));
    println!("{}", ui::bullet(&ui::dim("/order shows the order, /reset starts over, /quit leaves")));
    println!();

    repl(&mut taker, &mut editor);
    Ok(())
}

fn repl<C: Chooser>(taker: &mut OrderTaker<'_, C>, editor: &mut LineEditor) {
    let mut session = Session::new();
    println!("{}", ui::droid_says(&taker.greet()));

    let prompt = format!("{}{}", ui::prompt(), ui::reset());
    loop {
        let line = match editor.read_line(&prompt) {
            ReadResult::Line(line) => line,
            ReadResult::Interrupted => continue,
            ReadResult::Eof => break,
        };
        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        editor.add_history(input);

        match input {
            "/quit" | "/exit" => break,
            "/reset" => println!("{}", ui::droid_says(&taker.reset(&mut session))),
            "/order" => print_order(&session),
            _ if input.starts_with('/') => println!("{}", ui::warning(&format!("unknown command: {}", input))),
            _ => {
                let response = taker.respond(input, &mut session);
                println!("{}", ui::droid_says(response.text()));
                if session.is_closed() {
                    println!("{}", ui::info("order closed; /reset to take another"));
                }
            }
        }
    }
}

fn print_order(session: &Session) {
    println!("{}", ui::kv("state", &ui::state_badge(&session.state.to_string())));
    println!("{}", ui::kv("turns", &session.turn_count.to_string()));
    println!("{}", ui::order_list(&session.items()));
}

use std::process;

use clap::{App, Arg};

use rustyline::error::ReadlineError;
use rustyline::Editor;

mod collector;
mod console;
mod demo;
mod error;
mod heap;
mod object;
mod printer;
mod stack;
mod vm;

use console::Session;

/// Read a command at a time, driving a single VM session
fn console_loop() -> Result<(), ReadlineError> {
    // establish a console input history file path
    let history_file = match dirs::home_dir() {
        Some(mut path) => {
            path.push(".tinygc_history");
            path.to_str().map(String::from)
        }
        None => None,
    };

    // () means no completion support
    let mut reader = Editor::<()>::new();

    // try to load the history file, failing silently if it can't be read
    if let Some(ref path) = history_file {
        if let Err(_) = reader.load_history(&path) { /* ignore absence or unreadability */ }
    }

    let mut session = Session::new();
    println!("tinygc console (`help` for commands, `quit` to leave)");

    let result = loop {
        match reader.readline("tinygc> ") {
            Ok(line) => {
                reader.add_history_entry(&line);

                if line.trim() == "quit" {
                    break Ok(());
                }

                let output = session.exec_line(&line);
                if !output.is_empty() {
                    println!("{}", output);
                }
            }

            // some kind of session termination condition
            Err(e) => break Err(e),
        }
    };

    if let Some(ref path) = history_file {
        reader.save_history(&path).unwrap_or_else(|err| {
            println!("could not save input history in {}: {}", path, err);
        });
    }

    // drop every root and collect whatever is left behind
    session.teardown();

    result
}

fn main() {
    let matches = App::new("tinygc")
        .about("A toy stack machine with a mark-and-sweep garbage collector")
        .arg(
            Arg::with_name("demo")
                .long("demo")
                .help("Run the scripted demonstration scenarios and exit"),
        )
        .get_matches();

    if matches.is_present("demo") {
        demo::run_all().unwrap_or_else(|err| {
            println!("error: {}", err);
            process::exit(1);
        });
    } else {
        console_loop().unwrap_or_else(|err| {
            println!("exited because: {}", err);
            process::exit(0);
        });
    }
}

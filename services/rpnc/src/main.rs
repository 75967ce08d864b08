#[macro_use]
extern crate lazy_static;
#[macro_use]
extern crate log;

use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use crate::session::Session;

mod config;
mod session;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let config: config::Config = config::figment().extract()?;
    debug!("Loaded {:?}", config);

    let session = Session::new(&config);
    let mut editor = DefaultEditor::new()?;

    println!("Reverse Polish Notation Calculator");
    println!("Press CTRL+C to exit.");

    loop {
        match editor.readline(&config.prompt) {
            Ok(line) => {
                if config.history {
                    editor.add_history_entry(line.as_str())?;
                }
                println!("{}", session.execute(&line));
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(e) => return Err(e.into()),
        }
    }

    match telemetry::encode() {
        Ok(metrics) => debug!("Session metrics:\n{}", metrics),
        Err(e) => warn!("Failed to encode metrics: {}", e),
    }

    Ok(())
}

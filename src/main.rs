//! Interactive terminal surface for the SUPT continuum monitor.
//!
//! Runs one cycle at startup, then waits for input:
//!   Enter  refresh
//!   v      verify feeds
//!   q      quit

use std::error::Error;
use std::io::{self, BufRead, Write};

use supt_monitor::config::MonitorConfig;
use supt_monitor::cycle::run_cycle;
use supt_monitor::ingest::build_client;
use supt_monitor::logging::{self, DataSource};
use supt_monitor::report::render_text;
use supt_monitor::verify::{print_summary, verify_feeds};

fn main() -> Result<(), Box<dyn Error>> {
    let config = MonitorConfig::from_env()?;

    logging::init_logger(
        config.logging.min_level(),
        config.logging.file.as_deref(),
        config.logging.console_timestamps,
    );
    logging::info(
        DataSource::System,
        None,
        &format!("Starting SUPT continuum monitor for region '{}'", config.seismic.region),
    );

    let client = build_client(&config.feeds)?;

    println!("{}", render_text(&run_cycle(&client, &config)));

    let stdin = io::stdin();
    loop {
        print!("[Enter] refresh  [v] verify feeds  [q] quit > ");
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }

        match line.trim() {
            "q" | "quit" => break,
            "v" | "verify" => print_summary(&verify_feeds(&client, &config)),
            _ => println!("{}", render_text(&run_cycle(&client, &config))),
        }
    }

    Ok(())
}

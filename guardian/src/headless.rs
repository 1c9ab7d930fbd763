//! Headless mode for the GuardianNet console.
//!
//! Reads one command per line from stdin and prints tagged response lines,
//! for scripted demos and automated checks.

use anyhow::Result;
use guardian_core::{GuardianSession, HeadlessConsole, KeyValueStore};
use tokio::io::{self, AsyncBufReadExt, BufReader};

/// Run the line protocol until `#quit` or end of input.
pub async fn run_headless<S: KeyValueStore>(session: GuardianSession<S>) -> Result<()> {
    let mut console = HeadlessConsole::new(session);

    for line in console.banner() {
        println!("{line}");
    }
    println!();

    let mut lines = BufReader::new(io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let output = console.execute_line(&line).await;
        for out in &output.lines {
            println!("{out}");
        }
        if output.quit {
            return Ok(());
        }
    }

    // End of input without #quit still closes every machine
    console.execute_line("#quit").await;
    Ok(())
}

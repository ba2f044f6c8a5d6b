//! threadhub - threaded discussions in the terminal
//!
//! Posts, nested comment threads and votes, stored locally.
//!
//! ## Quick Start
//!
//! ```bash
//! # Initialize in the current directory
//! threadhub init --user alice
//!
//! # Start a discussion
//! threadhub post create --title "Hello" --body "First post"
//!
//! # Comment, reply, vote
//! threadhub comment add <post-id> "Nice"
//! threadhub vote up comment <comment-id>
//!
//! # Read it
//! threadhub thread <post-id>
//! threadhub browse <post-id>
//! ```

mod commands;

fn main() {
    if let Err(err) = commands::run() {
        eprintln!("Error: {:#}", err);
        std::process::exit(1);
    }
}

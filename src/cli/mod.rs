use clap::Subcommand;

use crate::connector::api::DEFAULT_PORT;

#[derive(Subcommand)]
pub enum Commands {
    /// Run the HTTP service (default when no command is given)
    Serve {
        /// Port to listen on
        #[arg(short, long, env = "PORT", default_value_t = DEFAULT_PORT)]
        port: u16,

        /// Bind to 0.0.0.0 instead of 127.0.0.1, exposing the server on all network interfaces
        #[arg(long)]
        public: bool,
    },

    /// Generate one diagram and print its JSON to stdout
    Generate {
        prompt: String,

        /// Print the JSON on a single line
        #[arg(long)]
        compact: bool,
    },

    /// Print the system instruction sent to the provider
    Prompt,
}

use clap::Parser;

#[derive(clap::Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable detailed debug logging (global)
    #[arg(long, default_value_t = false)]
    pub debug: bool,

    /// Enable verbose logging (global)
    #[arg(long, default_value_t = false)]
    pub verbose: bool,
}

#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Scan a URL or a file with newline-delimited URLs
    Scan {
        /// Target URL (e.g. https://example.com/app) or path to file with
        /// newline-delimited targets
        target: String,

        /// Output directory
        #[arg(short = 'o', long, default_value = "./results")]
        out: String,

        /// Fetch/probe worker pool width
        #[arg(short = 'c', long, default_value_t = 10)]
        concurrency: usize,

        /// Request timeout in seconds
        #[arg(long, default_value_t = 10_u64)]
        timeout: u64,

        /// Run active probe checks (CORS, headers, IDOR, verb tampering,
        /// rate limiting, GraphQL introspection, API docs)
        #[arg(long, default_value_t = false)]
        checks: bool,

        /// Requests issued by the rate-limit probe
        #[arg(long, default_value_t = 50)]
        rate_limit_requests: usize,
    },
}

pub fn parse_cli() -> Cli {
    Cli::parse()
}

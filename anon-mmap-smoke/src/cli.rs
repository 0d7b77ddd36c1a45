use anon_mmap::config::DEFAULT_SLOTS;
use clap::Parser;

/// Map an anonymous private region, poke a few bytes into it and unmap it
#[derive(Parser)]
pub struct Cli {
    /// Number of machine-word-sized slots to map
    #[arg(long, short = 'n', default_value_t = DEFAULT_SLOTS)]
    pub slots: usize,

    /// Value written to byte 0
    #[arg(long, default_value_t = 99)]
    pub first: u8,

    /// Value written to byte 1
    #[arg(long, default_value_t = 101)]
    pub second: u8,

    /// Map a single no-access placeholder page instead
    #[arg(long)]
    pub no_access: bool,
}

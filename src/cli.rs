use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(
    name = "vidtrack",
    version,
    about = "Track playback progress of recently watched videos and resume them"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    #[command(about = "Feed one progress sample for a video url")]
    Record {
        url: String,
        #[arg(help = "Current playback position in seconds")]
        time: f64,
        #[arg(long, help = "Total video length in seconds, when known")]
        duration: Option<f64>,
        #[arg(long, help = "Record even when the sample falls off the 5-second grid")]
        flush: bool,
    },
    #[command(about = "Print the recent playback history")]
    List,
    #[command(about = "Resume a history entry in the player (1-based position, default 1)")]
    Resume { index: Option<usize> },
    #[command(about = "Drop the whole playback history")]
    Clear,
    #[command(about = "Interactive history browser")]
    Tui,
}

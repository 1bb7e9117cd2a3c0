use clap::Parser;

#[derive(Parser)]
#[clap(author, version, about)]
pub struct Cli {
    /// A position notation to load - if omitted, the starting position is used
    #[clap(long, value_parser, value_name = "NOTATION")]
    pub position: Option<String>,
    /// Space-separated coordinate moves to apply in order, e.g. "e3e5 j22j20"
    #[clap(long, value_parser, value_name = "MOVES")]
    pub moves: Option<String>,
    /// Print a board diagram instead of the position notation
    #[clap(short, long)]
    pub diagram: bool,
    /// Check that the loaded notation serializes back to itself
    #[clap(long)]
    pub roundtrip: bool,
}

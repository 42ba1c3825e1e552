use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "identity-hub")]
#[command(about = "Multi-tenant wallet and social identity binding server")]
pub struct Args {
    /// Configuration file path
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: String,

    /// Listen port override
    #[arg(long)]
    pub port: Option<u16>,
}

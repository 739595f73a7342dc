use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "paysim-core")]
#[command(about = "Simulated UPI payment flow - intent parsing, resolution and receipts", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP server (default)
    Serve,

    /// Parse a raw scanned payload into a canonical payment intent
    Parse {
        /// Raw QR payload: intent URL, JSON object, or key-value pairs
        raw: String,
    },

    /// Submit a one-off payment through the remote/local orchestrator
    Pay {
        /// Amount to pay
        #[arg(long)]
        amount: String,

        /// Merchant display name
        #[arg(long)]
        payee: Option<String>,

        /// Merchant UPI id, e.g. demo@upi
        #[arg(long)]
        upi_id: Option<String>,
    },
}

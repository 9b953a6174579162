//! AegisRPC CLI Client
//!
//! Command-line interface for interacting with an AegisRPC server. Each
//! invocation performs a single request/response exchange.

use clap::{Parser, Subcommand};

use aegisrpc::network::Client;
use aegisrpc::{Identity, Role, Token};

/// AegisRPC CLI
#[derive(Parser, Debug)]
#[command(name = "aegis-cli")]
#[command(about = "CLI for the AegisRPC authenticated RPC server")]
#[command(version)]
struct Args {
    /// Server address
    #[arg(short, long, default_value = "127.0.0.1:8080")]
    server: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Authenticate and print a token
    Authenticate {
        /// Username to authenticate as
        username: String,

        /// Secret credential
        secret: String,
    },

    /// Register a new identity (admin only)
    AddUser {
        /// Username of the new identity
        username: String,

        /// Secret credential of the new identity
        secret: String,

        /// Display name
        #[arg(short, long, default_value = "")]
        name: String,

        /// Contact addresses (repeatable)
        #[arg(short, long)]
        email: Vec<String>,

        /// Role: ordinary or admin
        #[arg(short, long, default_value = "ordinary")]
        role: Role,

        /// Admin token, as printed by `authenticate`
        #[arg(short, long)]
        token: Token,
    },

    /// Fetch an identity by username (admin only)
    GetUser {
        /// Username to look up
        username: String,

        /// Admin token, as printed by `authenticate`
        #[arg(short, long)]
        token: Token,
    },

    /// Replace an existing identity (admin only)
    UpdateUser {
        /// Username of the identity to replace
        username: String,

        /// New secret credential
        secret: String,

        /// New display name
        #[arg(short, long, default_value = "")]
        name: String,

        /// New contact addresses (repeatable)
        #[arg(short, long)]
        email: Vec<String>,

        /// New role: ordinary or admin
        #[arg(short, long, default_value = "ordinary")]
        role: Role,

        /// Admin token, as printed by `authenticate`
        #[arg(short, long)]
        token: Token,
    },

    /// Remove an identity (admin only)
    RemoveUser {
        /// Username to remove
        username: String,

        /// Admin token, as printed by `authenticate`
        #[arg(short, long)]
        token: Token,
    },
}

fn main() {
    let args = Args::parse();
    let client = Client::new(&args.server);

    let outcome = match args.command {
        Commands::Authenticate { username, secret } => client
            .authenticate(&username, &secret)
            .map(|token| format!("{}", token)),

        Commands::AddUser {
            username,
            secret,
            name,
            email,
            role,
            token,
        } => client
            .add_user(Identity::new(&username, email, name, role, secret), token)
            .map(|_| format!("added {}", username)),

        Commands::GetUser { username, token } => client
            .get_user(&username, token)
            .map(|identity| format!("{:#?}", identity)),

        Commands::UpdateUser {
            username,
            secret,
            name,
            email,
            role,
            token,
        } => client
            .update_user(Identity::new(&username, email, name, role, secret), token)
            .map(|_| format!("updated {}", username)),

        Commands::RemoveUser { username, token } => client
            .remove_user(&username, token)
            .map(|identity| format!("removed {:#?}", identity)),
    };

    match outcome {
        Ok(message) => println!("{}", message),
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(1);
        }
    }
}

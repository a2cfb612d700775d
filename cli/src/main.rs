//! omnibus — entry point for preparing and submitting governance votes.

use std::path::PathBuf;

use clap::Parser;

use omnibus_chain::{Deployment, JsonRpcClient};
use omnibus_types::{Address, NetworkId, TxParams};
use omnibus_voting::votes::{deposit_module_rotation, payouts_and_limit};
use omnibus_voting::{Confirm, StdioConfirm, VoteOutcome};

mod logging;

use logging::LogFormat;

#[derive(Parser)]
#[command(name = "omnibus", about = "Prepare and submit omnibus governance votes")]
struct Cli {
    /// Network to prepare the vote against: "mainnet", "testnet", or "dev".
    #[arg(long, default_value = "mainnet", env = "OMNIBUS_NETWORK")]
    network: NetworkId,

    /// JSON-RPC endpoint of the node (or local fork) to submit through.
    #[arg(long, default_value = "http://127.0.0.1:8545", env = "OMNIBUS_RPC_URL")]
    rpc_url: String,

    /// Sender account of the vote-creating transaction.
    #[arg(long, env = "OMNIBUS_DEPLOYER")]
    from: Address,

    /// Gas price in wei (the node chooses when omitted).
    #[arg(long, env = "OMNIBUS_GAS_PRICE")]
    gas_price: Option<u128>,

    /// Submit without the interactive preview confirmation.
    #[arg(long)]
    silent: bool,

    /// Path to a TOML deployment file overriding the built-in address
    /// table (forks and staging setups).
    #[arg(long)]
    deployment: Option<PathBuf>,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, default_value = "info", env = "OMNIBUS_LOG_LEVEL")]
    log_level: String,

    /// Emit logs as newline-delimited JSON.
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// November payouts to the finance multisig and the node-operator #12
    /// staking-limit raise.
    PayoutsAndLimit,
    /// Deposit-security-module rotation and the staking-app 3.0.1 version
    /// push.
    DepositModuleRotation,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let format = if cli.json_logs {
        LogFormat::Json
    } else {
        LogFormat::Human
    };
    logging::init_logging(format, &cli.log_level);

    let deployment = match &cli.deployment {
        Some(path) => {
            let deployment = Deployment::from_toml_file(path)?;
            tracing::info!(path = %path.display(), "loaded deployment override");
            deployment
        }
        None => Deployment::for_network(cli.network),
    };
    tracing::info!(
        network = deployment.network.as_str(),
        rpc_url = %cli.rpc_url,
        from = %cli.from,
        "preparing omnibus vote"
    );

    let chain = JsonRpcClient::new(&cli.rpc_url);
    let mut tx = TxParams::from_sender(cli.from);
    if let Some(gas_price) = cli.gas_price {
        tx = tx.with_gas_price(gas_price);
    }

    let mut prompt = StdioConfirm::terminal();
    let confirm: Option<&mut dyn Confirm> = if cli.silent {
        None
    } else {
        Some(&mut prompt)
    };

    let outcome = match cli.command {
        Command::PayoutsAndLimit => {
            payouts_and_limit::start_vote(&chain, &deployment, &tx, confirm)?
        }
        Command::DepositModuleRotation => deposit_module_rotation::start_vote(
            &chain,
            &deployment,
            &deposit_module_rotation::RotationParams::mainnet(),
            &tx,
            confirm,
        )?,
    };

    match outcome {
        VoteOutcome::Created { vote_id, receipt } => {
            println!("Vote created: {vote_id} (tx {}).", receipt.tx_hash);
            Ok(())
        }
        VoteOutcome::Declined => {
            println!("Exit without running.");
            std::process::exit(1);
        }
    }
}

use std::io::stdout;
use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::bail;
use anyhow::Result;
use clap::CommandFactory;
use clap::Parser;
use clap_complete::generate;
use clap_complete::Shell;
use serde_json::json;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::FmtSubscriber;
use verdigris_cli::data_directory::DataDirectory;
use verdigris_cli::draft::builder::TransactionBuilder;
use verdigris_cli::draft::selector::UtxoFilter;
use verdigris_cli::draft::session::StagingSession;
use verdigris_cli::draft::store::TransactionStore;
use verdigris_cli::draft::store::SCRATCH_TX_ID;
use verdigris_cli::draft::Addressee;
use verdigris_cli::draft::DraftError;
use verdigris_cli::draft::DraftTransaction;
use verdigris_cli::draft::Utxo;
use verdigris_cli::draft::UtxoStrategy;
use verdigris_cli::engine::RemoteEngine;

use crate::command::tx::InputsCommand;
use crate::command::tx::OutputsCommand;
use crate::command::tx::TxCommand;
use crate::command::Command;

mod command;

/// Top-level CLI args.
#[derive(Debug, Parser)]
#[clap(name = "verdigris-cli", about = "A wallet engine rpc client")]
struct Config {
    /// Sets the wallet engine rpc address to connect to.
    #[clap(long, default_value = "127.0.0.1:9399", value_name = "address")]
    engine_addr: SocketAddr,

    /// Data directory holding staged transactions.
    #[clap(long)]
    data_dir: Option<PathBuf>,

    #[clap(subcommand)]
    command: Command,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args: Config = Config::parse();

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(env_filter)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    // Completions need neither local state nor an engine connection.
    let command = match args.command {
        Command::Completions => {
            if let Some(shell) = Shell::from_env() {
                generate(shell, &mut Config::command(), "verdigris-cli", &mut stdout());
                return Ok(());
            }
            bail!("Unknown shell. Shell completions not available.")
        }
        Command::Tx { command } => command,
    };

    let data_dir = DataDirectory::get(args.data_dir.clone())?;
    let store = TransactionStore::new(data_dir);

    // Commands that only read local state skip the engine connection.
    let command = match command {
        None => {
            print_summary(&store.load(SCRATCH_TX_ID, true)?);
            return Ok(());
        }
        Some(TxCommand::Dump) => {
            println!("{}", serde_json::to_string(&store.load(SCRATCH_TX_ID, true)?)?);
            return Ok(());
        }
        Some(TxCommand::Raw) => {
            let draft = store.load(SCRATCH_TX_ID, false)?;
            match draft.transaction {
                Some(transaction) => println!("{transaction}"),
                None => return Err(DraftError::NotBuilt.into()),
            }
            return Ok(());
        }
        Some(TxCommand::Outputs { command: None }) => {
            print_outputs(&store.load(SCRATCH_TX_ID, true)?);
            return Ok(());
        }
        Some(TxCommand::Inputs { command: None }) => {
            print_coins(&store.load(SCRATCH_TX_ID, true)?);
            return Ok(());
        }
        Some(command) => command,
    };

    // Everything else round-trips through the wallet engine.
    let engine = RemoteEngine::connect(args.engine_addr).await?;
    let draft = match command {
        TxCommand::New { subaccount } => {
            let draft = TransactionBuilder::new(&engine)
                .build_details(json!({ "subaccount": subaccount }))
                .await?;
            store.save(&draft, SCRATCH_TX_ID)?;
            draft
        }
        TxCommand::Load { file } => {
            let details = serde_json::from_str(&std::fs::read_to_string(&file)?)?;
            let draft = TransactionBuilder::new(&engine).build_details(details).await?;
            store.save(&draft, SCRATCH_TX_ID)?;
            draft
        }
        TxCommand::SetFeeRate { sat_per_kb } => {
            StagingSession::editing(&store, &engine)
                .run(|draft| {
                    draft.fee_rate = Some(sat_per_kb);
                    Ok(())
                })
                .await?
        }
        TxCommand::Outputs { command: Some(command) } => {
            run_outputs_command(&store, &engine, command).await?
        }
        TxCommand::Inputs { command: Some(command) } => {
            run_inputs_command(&store, &engine, command).await?
        }
        TxCommand::Sign => StagingSession::finalizing(&store, &engine).sign().await?,
        TxCommand::Send => StagingSession::finalizing(&store, &engine).send().await?,

        // Handled before the engine connection.
        TxCommand::Dump
        | TxCommand::Raw
        | TxCommand::Outputs { command: None }
        | TxCommand::Inputs { command: None } => return Ok(()),
    };

    report(&draft);
    Ok(())
}

async fn run_outputs_command(
    store: &TransactionStore,
    engine: &RemoteEngine,
    command: OutputsCommand,
) -> Result<DraftTransaction, DraftError> {
    let session = StagingSession::editing(store, engine);
    match command {
        OutputsCommand::Add {
            address,
            satoshi,
            send_all,
        } => {
            let addressee = if send_all {
                Addressee::send_all(address)
            } else {
                Addressee::new(address, satoshi.unwrap_or_default())
            };
            session.run(move |draft| draft.add_output(addressee)).await
        }
        OutputsCommand::Rm { address } => {
            session
                .run(move |draft| {
                    draft.remove_outputs(&address);
                    Ok(())
                })
                .await
        }
        OutputsCommand::Clear => {
            session
                .run(|draft| {
                    draft.clear_outputs();
                    Ok(())
                })
                .await
        }
    }
}

async fn run_inputs_command(
    store: &TransactionStore,
    engine: &RemoteEngine,
    command: InputsCommand,
) -> Result<DraftTransaction, DraftError> {
    let session = StagingSession::editing(store, engine);
    match command {
        InputsCommand::Auto => {
            session
                .run(|draft| {
                    draft.set_utxo_strategy(UtxoStrategy::Default);
                    Ok(())
                })
                .await
        }
        InputsCommand::Add { txid, vout, asset } => {
            let filter = UtxoFilter::new(txid.as_deref(), vout);
            session
                .run(move |draft| {
                    draft.set_utxo_strategy(UtxoStrategy::Manual);
                    let candidates: Vec<Utxo> = filter
                        .filter(draft.spendable_utxos(&asset))
                        .into_iter()
                        .cloned()
                        .collect();
                    for candidate in &candidates {
                        draft.select_utxo(candidate);
                    }
                    Ok(())
                })
                .await
        }
        InputsCommand::Rm { txid, vout } => {
            let filter = UtxoFilter::new(Some(&txid), vout);
            session
                .run(move |draft| {
                    draft.set_utxo_strategy(UtxoStrategy::Manual);
                    draft.deselect_utxos(&filter);
                    Ok(())
                })
                .await
        }
        InputsCommand::Clear => {
            session
                .run(|draft| {
                    draft.set_utxo_strategy(UtxoStrategy::Manual);
                    draft.used_utxos.clear();
                    Ok(())
                })
                .await
        }
    }
}

/// Outcome of a staging command: a soft engine error, a final txhash, or
/// nothing to say.
fn report(draft: &DraftTransaction) {
    if draft.has_error() {
        println!("ERROR: {}", draft.error);
    } else if let Some(txhash) = &draft.txhash {
        println!("{txhash}");
    }
}

fn print_summary(draft: &DraftTransaction) {
    if draft.has_error() {
        println!("ERROR: {}", draft.error);
    }
    if let Some(txhash) = &draft.txhash {
        println!("txhash: {txhash}");
    }
    println!("user signed: {}", draft.user_signed);
    println!("server signed: {}", draft.server_signed);
    print_outputs(draft);
    for (asset, amount) in &draft.satoshi {
        println!("total {asset}: {amount}");
    }
    if let Some(fee) = draft.fee {
        println!("fee: {fee} sat");
    }
    if let Some(fee_rate) = draft.calculated_fee_rate {
        println!("fee rate: {fee_rate} sat/kb");
    }
}

fn print_outputs(draft: &DraftTransaction) {
    for addressee in &draft.addressees {
        if addressee.send_all {
            println!("output: {} all", addressee.address);
        } else {
            println!("output: {} {}", addressee.address, addressee.satoshi);
        }
    }
}

fn print_coins(draft: &DraftTransaction) {
    println!("strategy: {}", draft.utxo_strategy);

    let mut selected = 0u64;
    println!("selected:");
    for utxo in &draft.used_utxos {
        println!(
            "\t{} {} {} {}:{}",
            utxo.satoshi,
            utxo.address_type,
            utxo.confs_str(),
            utxo.txhash,
            utxo.pt_idx
        );
        selected += utxo.satoshi;
    }
    println!("\ttotal: {selected}");

    println!("available:");
    for (asset, utxos) in &draft.utxos {
        let mut available = 0u64;
        for utxo in utxos {
            println!(
                "\t{} {} {} {}:{}",
                utxo.satoshi,
                utxo.address_type,
                utxo.confs_str(),
                utxo.txhash,
                utxo.pt_idx
            );
            available += utxo.satoshi;
        }
        println!("\t{asset} total: {available}");
    }
}

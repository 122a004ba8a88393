//! Command dispatch: bridges CLI args -> API calls -> output formatting.

pub mod config_cmd;
pub mod datanodes;
pub mod devices;
pub mod enterprises;
pub mod process;
pub mod quota;
pub mod util;

use iotticket_api::IoTTicketClient;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a server-bound command to the appropriate handler.
pub async fn dispatch(
    cmd: Command,
    client: &IoTTicketClient,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Devices(args) => devices::handle(client, args, global).await,
        Command::Datanodes(args) => datanodes::handle(client, args, global).await,
        Command::Write(args) => process::write(client, args, global).await,
        Command::Read(args) => process::read(client, args, global).await,
        Command::Stats(args) => process::stats(client, args, global).await,
        Command::Enterprises(args) => enterprises::handle(client, args, global).await,
        Command::Quota(args) => quota::handle(client, args, global).await,
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => unreachable!(),
    }
}

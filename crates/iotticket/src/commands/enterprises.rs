//! Enterprise hierarchy browsing.

use tabled::Tabled;

use iotticket_api::{Enterprise, IoTTicketClient};

use crate::cli::{EnterprisesArgs, EnterprisesCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

#[derive(Tabled)]
struct EnterpriseRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Sub-enterprises")]
    has_subs: String,
}

impl From<&Enterprise> for EnterpriseRow {
    fn from(e: &Enterprise) -> Self {
        Self {
            id: e.resource_id.clone(),
            name: e.name.clone(),
            has_subs: if e.has_sub_enterprises { "yes" } else { "no" }.into(),
        }
    }
}

pub async fn handle(
    client: &IoTTicketClient,
    args: EnterprisesArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let (page, offset) = match args.command {
        EnterprisesCommand::List(list) => (
            client.get_root_enterprises(list.limit, list.offset).await?,
            list.offset,
        ),
        EnterprisesCommand::Sub { id, list } => (
            client
                .get_sub_enterprises(&id, list.limit, list.offset)
                .await?,
            list.offset,
        ),
    };

    let out = output::render_list(
        global.output,
        &page.result,
        |e| EnterpriseRow::from(e),
        |e| e.resource_id.clone(),
    )?;
    output::print_output(&out, global.quiet);
    output::print_page_footer(page.len(), offset, page.total_count, global.quiet);
    Ok(())
}

//! Datanode listing.

use tabled::Tabled;

use iotticket_api::{DatanodeDetail, IoTTicketClient};

use crate::cli::{DatanodesArgs, GlobalOpts};
use crate::error::CliError;
use crate::output;

#[derive(Tabled)]
struct DatanodeRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Type")]
    data_type: String,
    #[tabled(rename = "Unit")]
    unit: String,
    #[tabled(rename = "URL")]
    url: String,
}

impl From<&DatanodeDetail> for DatanodeRow {
    fn from(d: &DatanodeDetail) -> Self {
        Self {
            name: d.name.clone(),
            data_type: d.data_type.clone(),
            unit: output::or_dash(d.unit.as_deref()),
            url: d.url.clone(),
        }
    }
}

pub async fn handle(
    client: &IoTTicketClient,
    args: DatanodesArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let page = client
        .get_datanodes(&args.device_id, args.list.limit, args.list.offset)
        .await?;
    let out = output::render_list(
        global.output,
        &page.result,
        |d| DatanodeRow::from(d),
        |d| d.name.clone(),
    )?;
    output::print_output(&out, global.quiet);
    output::print_page_footer(page.len(), args.list.offset, page.total_count, global.quiet);
    Ok(())
}

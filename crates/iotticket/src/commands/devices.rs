//! Device command handlers.

use tabled::Tabled;

use iotticket_api::{Device, DeviceDetails, IoTTicketClient};

use crate::cli::{DevicesArgs, DevicesCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct DeviceRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Manufacturer")]
    manufacturer: String,
    #[tabled(rename = "Type")]
    dtype: String,
    #[tabled(rename = "Created")]
    created: String,
}

impl From<&DeviceDetails> for DeviceRow {
    fn from(d: &DeviceDetails) -> Self {
        Self {
            id: d.id.clone(),
            name: d.device.name.clone(),
            manufacturer: d.device.manufacturer.clone(),
            dtype: output::or_dash(d.device.device_type.as_deref()),
            created: d.creation_date.to_rfc3339(),
        }
    }
}

fn detail(d: &DeviceDetails) -> String {
    let mut lines = vec![
        format!("ID:           {}", d.id),
        format!("Name:         {}", d.device.name),
        format!("Manufacturer: {}", d.device.manufacturer),
        format!(
            "Type:         {}",
            output::or_dash(d.device.device_type.as_deref())
        ),
        format!(
            "Description:  {}",
            output::or_dash(d.device.description.as_deref())
        ),
        format!("Created:      {}", d.creation_date.to_rfc3339()),
        format!("URL:          {}", d.url),
    ];
    if !d.device.attributes.is_empty() {
        lines.push("Attributes:".into());
        for attr in &d.device.attributes {
            lines.push(format!("  {} = {}", attr.key, attr.value));
        }
    }
    lines.join("\n")
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    client: &IoTTicketClient,
    args: DevicesArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        DevicesCommand::List(list) => {
            let page = client.get_devices(list.limit, list.offset).await?;
            let out = output::render_list(
                global.output,
                &page.result,
                |d| DeviceRow::from(d),
                |d| d.id.clone(),
            )?;
            output::print_output(&out, global.quiet);
            output::print_page_footer(page.len(), list.offset, page.total_count, global.quiet);
            Ok(())
        }

        DevicesCommand::Get { id } => {
            let device = client.get_device(&id).await?;
            let out = output::render_single(global.output, &device, detail, |d| d.id.clone())?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        DevicesCommand::Register {
            name,
            manufacturer,
            device_type,
            description,
            attributes,
        } => {
            let mut device = Device::new(name, manufacturer);
            if let Some(device_type) = device_type {
                device = device.with_type(device_type);
            }
            if let Some(description) = description {
                device = device.with_description(description);
            }
            for raw in &attributes {
                let (key, value) = util::parse_key_value(raw)?;
                device = device.with_attribute(key, value);
            }

            let registered = client.register_device(&device).await?;
            tracing::info!(device_id = %registered.id, "device registered");
            let out =
                output::render_single(global.output, &registered, detail, |d| d.id.clone())?;
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}

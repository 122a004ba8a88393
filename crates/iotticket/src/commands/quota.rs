//! Quota reporting.

use iotticket_api::{DeviceQuota, IoTTicketClient, Quota};

use crate::cli::{GlobalOpts, QuotaArgs, QuotaCommand};
use crate::error::CliError;
use crate::output;

fn quota_detail(q: &Quota) -> String {
    [
        format!(
            "Devices:              {} / {}",
            q.total_device_count, q.max_device_count
        ),
        format!("Datanodes per device: {}", q.max_datanode_count_per_device),
        format!(
            "Storage:              {} / {} bytes",
            q.used_storage_bytes, q.max_storage_bytes
        ),
    ]
    .join("\n")
}

fn device_quota_detail(q: &DeviceQuota) -> String {
    [
        format!("Device:          {}", q.device_id),
        format!(
            "Reads today:     {} / {}",
            q.request_count_today, q.max_read_request_count_per_day
        ),
        format!("Datanodes:       {}", q.datanode_count),
        format!("Storage:         {} bytes", q.used_storage_bytes),
    ]
    .join("\n")
}

pub async fn handle(
    client: &IoTTicketClient,
    args: QuotaArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let out = match args.command {
        None => {
            let quota = client.get_quota().await?;
            output::render_single(global.output, &quota, quota_detail, |q| {
                q.total_device_count.to_string()
            })?
        }
        Some(QuotaCommand::Device { id }) => {
            let quota = client.get_device_quota(&id).await?;
            output::render_single(global.output, &quota, device_quota_detail, |q| {
                q.request_count_today.to_string()
            })?
        }
    };
    output::print_output(&out, global.quiet);
    Ok(())
}

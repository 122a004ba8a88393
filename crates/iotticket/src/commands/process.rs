//! Process data: write datapoints, read raw values and statistics.

use tabled::Tabled;

use iotticket_api::{
    DatanodeQueryCriteria, DatanodeWritableValue, IoTTicketClient, ProcessValues,
    StatisticalDataQueryCriteria, StatisticalValues, WriteResult,
};

use crate::cli::{GlobalOpts, ReadArgs, StatsArgs, WriteArgs};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
struct ValueRow {
    #[tabled(rename = "Path")]
    path: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Timestamp")]
    timestamp: String,
    #[tabled(rename = "Value")]
    value: String,
    #[tabled(rename = "Unit")]
    unit: String,
}

#[derive(Tabled)]
struct StatRow {
    #[tabled(rename = "Path")]
    path: String,
    #[tabled(rename = "Bucket")]
    bucket: String,
    #[tabled(rename = "Count")]
    count: u64,
    #[tabled(rename = "Min")]
    min: String,
    #[tabled(rename = "Max")]
    max: String,
    #[tabled(rename = "Avg")]
    avg: String,
    #[tabled(rename = "Sum")]
    sum: f64,
}

/// Flatten every datanode's values into rows. Values that fail to decode
/// are shown raw; structured output keeps the server's text regardless.
fn value_rows(values: &ProcessValues) -> Vec<ValueRow> {
    values
        .datanodes
        .iter()
        .flat_map(|node| {
            node.values.iter().map(move |data| ValueRow {
                path: node.path.clone(),
                name: node.name.clone(),
                timestamp: util::format_millis(data.timestamp_millis),
                value: data
                    .decode(&node.data_type)
                    .map_or_else(|_| output::or_dash(data.raw.as_deref()), |v| v.to_string()),
                unit: output::or_dash(node.unit.as_deref()),
            })
        })
        .collect()
}

fn stat_rows(values: &StatisticalValues) -> Vec<StatRow> {
    values
        .datanodes
        .iter()
        .flat_map(|node| {
            node.values.iter().map(move |data| StatRow {
                path: node.path.clone(),
                bucket: util::format_millis(data.timestamp_millis),
                count: data.count,
                min: output::opt_num(data.minimum),
                max: output::opt_num(data.maximum),
                avg: output::opt_num(data.average),
                sum: data.sum,
            })
        })
        .collect()
}

fn write_detail(result: &WriteResult) -> String {
    let mut lines = vec![format!("Written: {}", result.total_write_count)];
    for item in &result.datapoint_write_results {
        lines.push(format!("  {} ({})", item.url, item.write_count));
    }
    lines.join("\n")
}

// ── Handlers ────────────────────────────────────────────────────────

pub async fn write(
    client: &IoTTicketClient,
    args: WriteArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let value = util::parse_value(&args.value, args.value_type)?;
    let mut datapoint = DatanodeWritableValue::new(args.name, args.path, value);
    if let Some(unit) = args.unit {
        datapoint = datapoint.with_unit(unit);
    }
    if let Some(ref raw) = args.timestamp {
        datapoint = datapoint.with_timestamp(util::parse_instant("timestamp", raw)?);
    }

    let result = client.write_datapoint(&args.device_id, &datapoint).await?;
    tracing::info!(written = result.total_write_count, "datapoint written");
    let out = output::render_single(global.output, &result, write_detail, |r| {
        r.total_write_count.to_string()
    })?;
    output::print_output(&out, global.quiet);
    Ok(())
}

pub async fn read(
    client: &IoTTicketClient,
    args: ReadArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let mut criteria = DatanodeQueryCriteria::new(args.device_id, args.datanodes)?
        .with_sort_order(util::sort_order(args.order));
    if let Some(limit) = args.limit {
        criteria = criteria.with_count(limit);
    }
    if let Some(ref from) = args.from {
        criteria = criteria.with_start_date(util::parse_instant("from", from)?);
    }
    if let Some(ref to) = args.to {
        criteria = criteria.with_end_date(util::parse_instant("to", to)?);
    }

    let values = client.read_process_data(&criteria).await?;
    let out = output::render_rows(global.output, &values, value_rows, |row| {
        row.value.clone()
    })?;
    output::print_output(&out, global.quiet);
    Ok(())
}

pub async fn stats(
    client: &IoTTicketClient,
    args: StatsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let start = util::parse_instant("from", &args.from)?;
    let end = util::parse_instant("to", &args.to)?;
    let criteria = StatisticalDataQueryCriteria::new(
        args.device_id,
        util::grouping(args.grouping),
        start,
        end,
        args.datanodes,
    )?
    .with_sort_order(util::sort_order(args.order))
    .with_vtags(args.vtags);

    let values = client.read_statistical_data(&criteria).await?;
    let out = output::render_rows(global.output, &values, stat_rows, |row| {
        row.avg.clone()
    })?;
    output::print_output(&out, global.quiet);
    Ok(())
}

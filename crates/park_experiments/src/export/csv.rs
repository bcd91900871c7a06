use crate::metrics::ReplicationResult;

const FIXED_COLUMNS: [&str; 14] = [
    "policy",
    "replication",
    "seed",
    "events_processed",
    "arrived_groups",
    "completed_groups",
    "unresolved_groups",
    "average_wait_minutes",
    "average_rating",
    "total_revenue",
    "ticket_revenue",
    "express_revenue",
    "food_revenue",
    "photo_revenue",
];

pub(crate) fn export_to_csv_impl(
    results: &[ReplicationResult],
    label: &str,
    file: std::fs::File,
) -> Result<(), Box<dyn std::error::Error>> {
    let facility_names: Vec<&str> = results[0]
        .summary
        .facilities
        .iter()
        .map(|f| f.name.as_str())
        .collect();

    let mut wtr = csv::Writer::from_writer(file);

    let mut header: Vec<String> = FIXED_COLUMNS.iter().map(|c| c.to_string()).collect();
    header.extend(facility_names.iter().map(|name| format!("wait_minutes:{name}")));
    wtr.write_record(&header)?;

    for result in results {
        let summary = &result.summary;
        if summary.facilities.len() != facility_names.len() {
            return Err(format!(
                "Replication {} has {} facilities, expected {}",
                result.index,
                summary.facilities.len(),
                facility_names.len()
            )
            .into());
        }

        let mut row = vec![
            label.to_string(),
            result.index.to_string(),
            result.seed.to_string(),
            summary.events_processed.to_string(),
            summary.arrived_groups.to_string(),
            summary.completed_groups.to_string(),
            summary.unresolved_groups.to_string(),
            result.average_wait_minutes.to_string(),
            summary.average_rating.to_string(),
            summary.total_revenue.to_string(),
            summary.revenue.tickets.to_string(),
            summary.revenue.express.to_string(),
            summary.revenue.food.to_string(),
            summary.revenue.photos.to_string(),
        ];
        row.extend(
            summary
                .facilities
                .iter()
                .map(|f| f.average_wait_minutes.to_string()),
        );
        wtr.write_record(&row)?;
    }

    wtr.flush()?;
    Ok(())
}

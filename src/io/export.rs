//! CSV export for energy production rows and savings calculations.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::error::SolterraResult;
use crate::records::{EnergyProductionRecord, SavingsCalculation};

/// Column header for production CSV export.
const HEADER: &str = "system_id,timestamp,production_kwh,consumption_kwh,\
                      battery_percentage,weather_condition";

/// Column header for savings CSV export.
const SAVINGS_HEADER: &str = "user_id,system_size_kw,estimated_production_kwh_year,\
                              estimated_savings_year,co2_reduction_tons_year,\
                              installation_cost,payback_period_years";

/// Exports production rows to a CSV file at the given path.
///
/// Rows are written in the order given; an absent battery percentage is an
/// empty field.
///
/// # Errors
///
/// Returns an error if file creation or writing fails.
pub fn export_csv(rows: &[EnergyProductionRecord], path: &Path) -> SolterraResult<()> {
    let file = File::create(path)?;
    let buf = io::BufWriter::new(file);
    write_csv(rows, buf)
}

/// Writes production rows as CSV to any writer.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_csv(rows: &[EnergyProductionRecord], writer: impl Write) -> SolterraResult<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);

    wtr.write_record(HEADER.split(',').map(str::trim))?;

    for r in rows {
        wtr.write_record(&[
            r.system_id.clone(),
            r.timestamp.to_rfc3339(),
            format!("{:.2}", r.production_kwh),
            format!("{:.2}", r.consumption_kwh),
            r.battery_percentage
                .map(|pct| format!("{pct:.1}"))
                .unwrap_or_default(),
            r.weather_condition.as_str().to_string(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

/// Exports savings calculations to a CSV file at the given path.
///
/// # Errors
///
/// Returns an error if file creation or writing fails.
pub fn export_savings_csv(rows: &[SavingsCalculation], path: &Path) -> SolterraResult<()> {
    let file = File::create(path)?;
    write_savings_csv(rows, io::BufWriter::new(file))
}

/// Writes savings calculations as CSV; a system that never pays back has an
/// empty payback field.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_savings_csv(rows: &[SavingsCalculation], writer: impl Write) -> SolterraResult<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);

    wtr.write_record(SAVINGS_HEADER.split(',').map(str::trim))?;

    for r in rows {
        wtr.write_record(&[
            r.user_id.clone(),
            format!("{:.2}", r.system_size_kw),
            format!("{:.2}", r.estimated_production_kwh_year),
            format!("{:.2}", r.estimated_savings_year),
            format!("{:.2}", r.co2_reduction_tons_year),
            format!("{:.2}", r.installation_cost),
            r.payback_period_years
                .map(|years| format!("{years:.1}"))
                .unwrap_or_default(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::telemetry::WeatherCondition;
    use chrono::{TimeZone, Utc};

    fn make_row(hour: u32) -> EnergyProductionRecord {
        EnergyProductionRecord {
            system_id: "demo".to_string(),
            timestamp: Utc.with_ymd_and_hms(2024, 6, 1, hour, 0, 0).unwrap(),
            production_kwh: 4.5,
            consumption_kwh: 1.25,
            battery_percentage: (hour % 2 == 0).then_some(61.2),
            weather_condition: WeatherCondition::for_hour(hour),
        }
    }

    #[test]
    fn header_matches_columns() {
        let mut buf = Vec::new();
        write_csv(&[make_row(0)], &mut buf).ok();
        let output = String::from_utf8(buf).ok();
        let first_line = output.as_deref().unwrap_or("").lines().next().unwrap_or("");
        assert_eq!(
            first_line,
            "system_id,timestamp,production_kwh,consumption_kwh,battery_percentage,weather_condition"
        );
    }

    #[test]
    fn row_count_matches_sample_count() {
        let rows: Vec<EnergyProductionRecord> = (0..24).map(make_row).collect();
        let mut buf = Vec::new();
        write_csv(&rows, &mut buf).ok();
        let output = String::from_utf8(buf).ok();
        let lines: Vec<&str> = output.as_deref().unwrap_or("").lines().collect();
        // 1 header + 24 data rows
        assert_eq!(lines.len(), 25);
    }

    #[test]
    fn missing_battery_is_empty_field() {
        let mut buf = Vec::new();
        write_csv(&[make_row(0), make_row(1)], &mut buf).ok();

        let mut rdr = csv::ReaderBuilder::new().from_reader(buf.as_slice());
        let records: Vec<csv::StringRecord> = rdr.records().filter_map(Result::ok).collect();
        assert_eq!(records.len(), 2);
        assert_eq!(&records[0][4], "61.2");
        assert_eq!(&records[1][4], "");
        assert_eq!(&records[0][5], "clear");
        assert_eq!(&records[0][2], "4.50");
    }

    #[test]
    fn savings_rows_leave_infinite_payback_empty() {
        use crate::estimator::{EstimatorInput, RoofType, estimate};

        let mut input = EstimatorInput {
            roof_area_sq_ft: 500.0,
            monthly_bill: 2500.0,
            sunlight_hours_per_day: 5.0,
            roof_type: RoofType::Flat,
            electricity_rate_per_kwh: 2.5,
        };
        let paying = SavingsCalculation::new("u-1", &estimate(&input).unwrap());
        input.electricity_rate_per_kwh = 0.0;
        let never = SavingsCalculation::new("u-2", &estimate(&input).unwrap());

        let mut buf = Vec::new();
        write_savings_csv(&[paying, never], &mut buf).unwrap();
        let mut rdr = csv::ReaderBuilder::new().from_reader(buf.as_slice());
        assert_eq!(rdr.headers().unwrap().len(), 7);
        let records: Vec<csv::StringRecord> = rdr.records().filter_map(Result::ok).collect();
        assert_eq!(&records[0][3], "3421.88");
        assert_eq!(&records[0][6], "9.9");
        assert_eq!(&records[1][6], "");
    }
}

//! Test fixtures for LibreView parser testing


pub const MMOL_BANNER: &str = "Glucose Data,Generated on,16-01-2023 10:00 UTC,Generated by,Test User";
pub const MGDL_BANNER: &str =
    "Glucose Data (mg/dL),Generated on,16-01-2023 10:00 UTC,Generated by,Test User";
pub const VENDOR_HEADER: &str = "Device,Serial Number,Device Timestamp,Record Type,\
Historic Glucose mmol/L,Scan Glucose mmol/L,Non-numeric Rapid-Acting Insulin,\
Rapid-Acting Insulin (units),Non-numeric Food,Carbohydrates (grams),Carbohydrates (servings),\
Non-numeric Long-Acting Insulin,Long-Acting Insulin Value (units),Notes,Strip Glucose mmol/L,\
Ketone mmol/L,Meal Insulin (units),Correction Insulin (units),User Change Insulin (units)";

/// Build a 19-column LibreView row
pub fn libre_row(device: &str, timestamp: &str, record_type: &str, historic: &str, notes: &str) -> String {
    let mut fields = vec![String::new(); 19];
    fields[0] = device.to_string();
    fields[1] = "ABC123".to_string();
    fields[2] = timestamp.to_string();
    fields[3] = record_type.to_string();
    fields[4] = historic.to_string();
    fields[13] = notes.to_string();
    fields.join(",")
}

/// Assemble a complete export from a banner and rows
pub fn libre_export(banner: &str, rows: &[String]) -> String {
    let mut lines = vec![banner.to_string(), VENDOR_HEADER.to_string()];
    lines.extend(rows.iter().cloned());
    lines.join("\n")
}

/// Export with historic, scan, note and out-of-year rows
pub fn create_test_export() -> String {
    libre_export(
        MMOL_BANNER,
        &[
            libre_row("FreeStyle LibreLink", "15-03-2022 08:30", "0", "7.2", ""),
            libre_row("FreeStyle LibreLink", "15-03-2022 08:35", "1", "", ""),
            libre_row("FreeStyle LibreLink", "15-03-2022 08:45", "0", "7.8", ""),
            libre_row(
                "FreeStyle LibreLink",
                "15-03-2022 09:00",
                "6",
                "",
                "\"Lunch, with friends\"",
            ),
            libre_row("FreeStyle LibreLink", "31-12-2021 23:45", "0", "6.1", ""),
        ],
    )
}

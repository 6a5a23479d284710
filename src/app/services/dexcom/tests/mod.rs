//! Test fixtures for Dexcom Clarity parser testing


pub fn dexcom_header(unit: &str) -> String {
    format!(
        "Index,Timestamp (YYYY-MM-DDThh:mm:ss),Event Type,Event Subtype,Patient Info,Device Info,\
Source Device ID,Glucose Value ({unit}),Insulin Value (u),Carb Value (grams),Duration (hh:mm:ss),\
Glucose Rate of Change ({unit}/min),Transmitter Time (Long Integer),Transmitter ID"
    )
}

/// Build a 14-column Clarity row
pub fn dexcom_row(index: &str, timestamp: &str, event_type: &str, glucose: &str) -> String {
    let mut fields = vec![String::new(); 14];
    fields[0] = index.to_string();
    fields[1] = timestamp.to_string();
    fields[2] = event_type.to_string();
    fields[7] = glucose.to_string();
    if event_type == "EGV" {
        fields[6] = "Android G6".to_string();
        fields[13] = "8ABCDE".to_string();
    }
    fields.join(",")
}

/// Patient and device rows that open every Clarity export
pub fn patient_rows() -> Vec<String> {
    vec![
        "1,,FirstName,,Test,,,,,,,,,".to_string(),
        "2,,LastName,,User,,,,,,,,,".to_string(),
        "3,,Device,,,G6 Mobile App,Android G6,,,,,,,".to_string(),
    ]
}

/// `count` EGV rows five minutes apart starting at `start` (HH:MM on 2022-06-01)
pub fn egv_rows(first_index: usize, count: usize, glucose: &str) -> Vec<String> {
    (0..count)
        .map(|i| {
            let minutes = i * 5;
            dexcom_row(
                &(first_index + i).to_string(),
                &format!("2022-06-01T{:02}:{:02}:00", 10 + minutes / 60, minutes % 60),
                "EGV",
                glucose,
            )
        })
        .collect()
}

/// Assemble an export from a header and rows
pub fn dexcom_export(unit: &str, rows: &[String]) -> String {
    let mut lines = vec![dexcom_header(unit)];
    lines.extend(rows.iter().cloned());
    lines.join("\n")
}

/// A standard mg/dL export: patient rows, 12 EGVs, a calibration and an insulin event
pub fn create_test_export() -> String {
    let mut rows = patient_rows();
    rows.extend(egv_rows(4, 12, "108"));
    rows.push(dexcom_row("16", "2022-06-01T11:05:00", "Calibration", "110"));
    rows.push(dexcom_row("17", "2022-06-01T11:10:00", "Insulin", ""));
    dexcom_export("mg/dL", &rows)
}

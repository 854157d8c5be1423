//! CSV export of prediction results.

use abpx_peptide::ScreenedPeptide;

use crate::error::WebError;

pub const CSV_FILE_NAME: &str = "prediction_results.csv";
pub const CSV_HEADER: [&str; 4] = ["Index", "Peptide Sequence", "Predicted Probability", "Class Label"];

/// One row per predicted entry; invalid entries are left out.
pub fn results_csv(results: &[ScreenedPeptide]) -> Result<String, WebError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(CSV_HEADER)?;

    for entry in results {
        if let Some(p) = entry.prediction() {
            writer.write_record([
                entry.index.to_string(),
                entry.sequence.clone(),
                p.probability.to_string(),
                p.label.to_string(),
            ])?;
        }
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| WebError::Csv(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| WebError::Csv(e.to_string()))
}

// Cercanos - core/export.rs
//
// CSV and JSON export of the filtered roster.
// Core layer: writes to any Write trait object.

use crate::core::model::Professional;
use crate::util::constants::INSURANCE_LIST_SEPARATOR;
use crate::util::error::ExportError;
use std::io::Write;

/// Export professionals to CSV.
///
/// Writes: id, name, specialty, rating, review_count, address, phone, insurances.
/// `target` names the destination in error messages.
pub fn export_csv<W: Write>(
    professionals: &[&Professional],
    writer: W,
    target: &str,
) -> Result<usize, ExportError> {
    let csv_err = |e| ExportError::Csv {
        target: target.to_string(),
        source: e,
    };
    let mut csv_writer = csv::Writer::from_writer(writer);

    csv_writer
        .write_record([
            "id",
            "name",
            "specialty",
            "rating",
            "review_count",
            "address",
            "phone",
            "insurances",
        ])
        .map_err(csv_err)?;

    let mut count = 0;
    for prof in professionals {
        csv_writer
            .write_record([
                prof.id.as_str(),
                prof.name.as_str(),
                prof.specialty.as_str(),
                prof.rating_label().as_str(),
                prof.review_count.to_string().as_str(),
                prof.address.as_str(),
                prof.phone.as_str(),
                prof.insurances.join(INSURANCE_LIST_SEPARATOR).as_str(),
            ])
            .map_err(csv_err)?;
        count += 1;
    }

    csv_writer.flush().map_err(|e| ExportError::Io {
        target: target.to_string(),
        source: e,
    })?;

    Ok(count)
}

/// Export professionals as a pretty-printed JSON array of full records.
pub fn export_json<W: Write>(
    professionals: &[&Professional],
    writer: W,
    target: &str,
) -> Result<usize, ExportError> {
    serde_json::to_writer_pretty(writer, professionals).map_err(|e| ExportError::Json {
        target: target.to_string(),
        source: e,
    })?;
    Ok(professionals.len())
}

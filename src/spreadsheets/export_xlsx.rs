// src/spreadsheets/export_xlsx.rs

use crate::domain::{keyword_columns, PropertyRecord};
use crate::errors::PipelineError;
use crate::pipeline::RunSummary;
use rust_xlsxwriter::{Workbook, Worksheet};
use std::path::Path;

const FIXED_HEADERS: [&str; 9] = [
    "street",
    "pid",
    "legal_description",
    "sqft",
    "price",
    "lot_size_acres",
    "post_date",
    "source",
    "jurisdiction",
];

/// Writes the accepted record set as a workbook: one rectangular
/// `Raw Data` sheet (the stable-column contract with downstream
/// consumers), a `Keyword Summary` of properties with matches, and an
/// `Overview` of run metrics.
pub fn export_records_xlsx(
    records: &[PropertyRecord],
    summary: &RunSummary,
    path: &Path,
) -> Result<(), PipelineError> {
    let mut workbook = Workbook::new();

    write_raw_data(workbook.add_worksheet(), records)?;
    write_keyword_summary(workbook.add_worksheet(), records)?;
    write_overview(workbook.add_worksheet(), records, summary)?;

    workbook
        .save(path)
        .map_err(|e| PipelineError::Xlsx(format!("Failed to save workbook: {e}")))?;
    Ok(())
}

fn xlsx_err(context: &str) -> impl Fn(rust_xlsxwriter::XlsxError) -> PipelineError + '_ {
    move |e| PipelineError::Xlsx(format!("Failed to write {context}: {e}"))
}

fn write_raw_data(worksheet: &mut Worksheet, records: &[PropertyRecord]) -> Result<(), PipelineError> {
    worksheet
        .set_name("Raw Data")
        .map_err(xlsx_err("sheet name"))?;

    let keyword_cols = keyword_columns();
    let mut col: u16 = 0;
    for header in FIXED_HEADERS {
        worksheet
            .write_string(0, col, header)
            .map_err(xlsx_err("header"))?;
        col += 1;
    }
    for header in &keyword_cols {
        worksheet
            .write_string(0, col, header)
            .map_err(xlsx_err("keyword header"))?;
        col += 1;
    }

    for (i, record) in records.iter().enumerate() {
        let r = (i + 1) as u32;

        worksheet
            .write_string(r, 0, &record.street)
            .map_err(xlsx_err("street"))?;
        worksheet
            .write_string(r, 1, &record.pid)
            .map_err(xlsx_err("pid"))?;
        worksheet
            .write_string(r, 2, &record.legal_description)
            .map_err(xlsx_err("legal description"))?;
        if let Some(sqft) = record.sqft {
            worksheet
                .write_number(r, 3, sqft as f64)
                .map_err(xlsx_err("sqft"))?;
        }
        if let Some(price) = record.price {
            worksheet
                .write_number(r, 4, price as f64)
                .map_err(xlsx_err("price"))?;
        }
        worksheet
            .write_number(r, 5, record.lot_size_acres)
            .map_err(xlsx_err("lot size"))?;
        if let Some(date) = record.post_date {
            worksheet
                .write_string(r, 6, date.format("%m/%d/%Y").to_string())
                .map_err(xlsx_err("post date"))?;
        }
        worksheet
            .write_string(r, 7, &record.source)
            .map_err(xlsx_err("source"))?;
        worksheet
            .write_string(r, 8, record.jurisdiction.to_string())
            .map_err(xlsx_err("jurisdiction"))?;

        for (k, key) in keyword_cols.iter().enumerate() {
            worksheet
                .write_number(r, (9 + k) as u16, record.keywords.get(key) as f64)
                .map_err(xlsx_err("keyword count"))?;
        }
    }

    Ok(())
}

fn write_keyword_summary(
    worksheet: &mut Worksheet,
    records: &[PropertyRecord],
) -> Result<(), PipelineError> {
    worksheet
        .set_name("Keyword Summary")
        .map_err(xlsx_err("sheet name"))?;

    let headers = [
        "street",
        "pid",
        "legal_description",
        "total_keyword_matches",
        "keywords_found",
    ];
    for (col, header) in headers.iter().enumerate() {
        worksheet
            .write_string(0, col as u16, *header)
            .map_err(xlsx_err("header"))?;
    }

    let mut r: u32 = 1;
    for record in records {
        let found = record.keywords.non_zero();
        if found.is_empty() {
            continue;
        }

        let digest = found
            .iter()
            .map(|(k, v)| format!("{k}({v})"))
            .collect::<Vec<_>>()
            .join(", ");
        let total: u32 = found.iter().map(|(_, v)| v).sum();

        worksheet
            .write_string(r, 0, &record.street)
            .map_err(xlsx_err("street"))?;
        worksheet
            .write_string(r, 1, &record.pid)
            .map_err(xlsx_err("pid"))?;
        worksheet
            .write_string(r, 2, truncate(&record.legal_description, 100))
            .map_err(xlsx_err("legal description"))?;
        worksheet
            .write_number(r, 3, total as f64)
            .map_err(xlsx_err("total"))?;
        worksheet
            .write_string(r, 4, &digest)
            .map_err(xlsx_err("digest"))?;
        r += 1;
    }

    Ok(())
}

fn write_overview(
    worksheet: &mut Worksheet,
    records: &[PropertyRecord],
    summary: &RunSummary,
) -> Result<(), PipelineError> {
    worksheet
        .set_name("Overview")
        .map_err(xlsx_err("sheet name"))?;

    let with_keywords = records.iter().filter(|r| r.keywords.total() > 0).count();
    let metrics: [(&str, String); 6] = [
        ("Total Properties Found", summary.total_found.to_string()),
        ("Successfully Accepted", summary.accepted.to_string()),
        ("Failed Lookups", summary.failed_lookups.to_string()),
        (
            "Rejected (short/long plat)",
            summary.plat_rejected.to_string(),
        ),
        (
            "Rejected (jurisdiction/lot size)",
            (summary.jurisdiction_rejected + summary.undersized_rejected).to_string(),
        ),
        ("Properties with Keywords", with_keywords.to_string()),
    ];

    worksheet
        .write_string(0, 0, "Metric")
        .map_err(xlsx_err("header"))?;
    worksheet
        .write_string(0, 1, "Value")
        .map_err(xlsx_err("header"))?;
    for (i, (metric, value)) in metrics.iter().enumerate() {
        let r = (i + 1) as u32;
        worksheet
            .write_string(r, 0, *metric)
            .map_err(xlsx_err("metric"))?;
        worksheet
            .write_string(r, 1, value)
            .map_err(xlsx_err("value"))?;
    }

    Ok(())
}

fn truncate(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

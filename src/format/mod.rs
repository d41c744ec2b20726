//! Output formatting for comparison reports (table, JSON, markdown, CSV).

use crate::comparator::ComparisonRecord;
use crate::config::OutputFormat;
use crate::pricing::CleanedPrice;
use crate::steam::Region;
use rust_decimal::Decimal;
use serde::Serialize;

/// Record field names of the eight price columns, in report order.
pub const PRICE_FIELDS: [&str; 8] = [
    "standard_price_home",
    "discount_price_home",
    "standard_price_foreign",
    "standard_price_foreign_converted",
    "difference_standard",
    "discount_price_foreign",
    "discount_price_foreign_converted",
    "difference_discount",
];

/// Column headers for a report, labelled with the region names.
pub fn column_headers(home: Region, foreign: Region) -> [String; 9] {
    let (home, foreign) = (home.name(), foreign.name());
    [
        "Game Name".to_string(),
        format!("Standard Price ({})", home),
        format!("Discount Price ({})", home),
        format!("Standard Price ({})", foreign),
        format!("Standard Converted Price ({})", foreign),
        "Difference (Standard)".to_string(),
        format!("Discount Price ({})", foreign),
        format!("Discount Converted Price ({})", foreign),
        "Difference (Discount)".to_string(),
    ]
}

/// Sums every price column, counting `N/A` as zero.
///
/// A column whose sum overflows is unavailable.
pub fn totals(records: &[ComparisonRecord]) -> [CleanedPrice; 8] {
    let mut sums = [Some(Decimal::ZERO); 8];
    for record in records {
        for (sum, price) in sums.iter_mut().zip(record.prices()) {
            *sum = sum.and_then(|s| s.checked_add(price.value_or_zero()));
        }
    }
    sums.map(|sum| sum.map_or(CleanedPrice::Unavailable, CleanedPrice::amount))
}

/// One parsed listing as shown by the search command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListingRow {
    pub title: String,
    pub normalized: String,
    pub standard: CleanedPrice,
    pub discount: CleanedPrice,
}

/// Formats reports for output.
pub struct Formatter {
    format: OutputFormat,
    home: Region,
    foreign: Region,
}

impl Formatter {
    /// Creates a new formatter labelling columns with the given regions.
    pub fn new(format: OutputFormat, home: Region, foreign: Region) -> Self {
        Self { format, home, foreign }
    }

    /// Formats comparison records followed by the column totals.
    pub fn format_records(&self, records: &[ComparisonRecord]) -> String {
        let headers = column_headers(self.home, self.foreign);
        let totals = totals(records);

        if records.is_empty() {
            return match self.format {
                OutputFormat::Json => self.json_records(records, &totals),
                OutputFormat::Csv => csv_line(&headers),
                _ => "No games matched.".to_string(),
            };
        }

        let rows: Vec<Vec<String>> = records.iter().map(record_cells).collect();
        let total_row = total_cells(&totals);

        match self.format {
            OutputFormat::Json => self.json_records(records, &totals),
            OutputFormat::Table => {
                let mut out = String::from("Game Price Comparison Results:\n\n");
                out.push_str(&table(&headers, &rows));
                out.push_str("\n\nTotal Summary:\n\n");
                let summary: Vec<String> = headers[1..]
                    .iter()
                    .zip(&totals)
                    .map(|(header, total)| format!("{}: {}", header, total))
                    .collect();
                out.push_str(&summary.join("\n"));
                out
            }
            OutputFormat::Markdown => {
                let mut all = rows;
                all.push(total_row.into_iter().map(|c| format!("**{}**", c)).collect());
                let mut out = markdown(&headers, &all);
                out.push_str(&format!("\n\n*{} games compared*", records.len()));
                out
            }
            OutputFormat::Csv => {
                let mut all = rows;
                all.push(total_row);
                csv(&headers, &all)
            }
        }
    }

    /// Formats the listings of one search page.
    pub fn format_listings(&self, region: Region, listings: &[ListingRow]) -> String {
        if listings.is_empty() {
            return match self.format {
                OutputFormat::Json => "[]".to_string(),
                OutputFormat::Csv => csv_line(&listing_headers(region)),
                _ => "No listings found.".to_string(),
            };
        }

        let headers = listing_headers(region);
        let rows: Vec<Vec<String>> = listings
            .iter()
            .map(|l| {
                vec![
                    l.title.clone(),
                    l.normalized.clone(),
                    l.standard.to_string(),
                    l.discount.to_string(),
                ]
            })
            .collect();

        match self.format {
            OutputFormat::Json => {
                serde_json::to_string_pretty(listings).unwrap_or_else(|_| "[]".to_string())
            }
            OutputFormat::Table => {
                format!("{}\n\nTotal: {} listings", table(&headers, &rows), listings.len())
            }
            OutputFormat::Markdown => {
                format!("{}\n\n*{} listings found*", markdown(&headers, &rows), listings.len())
            }
            OutputFormat::Csv => csv(&headers, &rows),
        }
    }

    fn json_records(&self, records: &[ComparisonRecord], totals: &[CleanedPrice; 8]) -> String {
        let totals: serde_json::Map<String, serde_json::Value> = PRICE_FIELDS
            .iter()
            .zip(totals)
            .map(|(field, total)| (field.to_string(), total.to_string().into()))
            .collect();

        let report = serde_json::json!({
            "home_region": self.home,
            "foreign_region": self.foreign,
            "records": records,
            "totals": totals,
        });

        serde_json::to_string_pretty(&report).unwrap_or_else(|_| "{}".to_string())
    }
}

fn listing_headers(region: Region) -> [String; 4] {
    [
        "Title".to_string(),
        "Normalized".to_string(),
        format!("Standard ({})", region.currency()),
        format!("Discount ({})", region.currency()),
    ]
}

fn record_cells(record: &ComparisonRecord) -> Vec<String> {
    std::iter::once(record.product_name.clone())
        .chain(record.prices().iter().map(ToString::to_string))
        .collect()
}

fn total_cells(totals: &[CleanedPrice; 8]) -> Vec<String> {
    std::iter::once("Total".to_string()).chain(totals.iter().map(ToString::to_string)).collect()
}

// Table formatting

fn table<H: AsRef<str>>(headers: &[H], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.as_ref().chars().count()).collect();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let border = format!(
        "+{}+",
        widths.iter().map(|w| "-".repeat(w + 2)).collect::<Vec<_>>().join("+")
    );

    let mut lines = vec![border.clone()];
    lines.push(format!(
        "| {} |",
        headers
            .iter()
            .zip(&widths)
            .map(|(h, &w)| format!("{:^w$}", h.as_ref()))
            .collect::<Vec<_>>()
            .join(" | ")
    ));
    lines.push(border.clone());

    for row in rows {
        let cells: Vec<String> = row
            .iter()
            .zip(&widths)
            .enumerate()
            .map(|(i, (cell, &w))| {
                if i == 0 {
                    format!("{:<w$}", cell)
                } else {
                    format!("{:>w$}", cell)
                }
            })
            .collect();
        lines.push(format!("| {} |", cells.join(" | ")));
    }

    lines.push(border);
    lines.join("\n")
}

// Markdown formatting

fn markdown<H: AsRef<str>>(headers: &[H], rows: &[Vec<String>]) -> String {
    let mut lines = Vec::new();

    let header_cells: Vec<&str> = headers.iter().map(|h| h.as_ref()).collect();
    lines.push(format!("| {} |", header_cells.join(" | ")));
    lines.push(format!("|{}|", vec!["---"; headers.len()].join("|")));

    for row in rows {
        let cells: Vec<String> = row.iter().map(|c| c.replace('|', "\\|")).collect();
        lines.push(format!("| {} |", cells.join(" | ")));
    }

    lines.join("\n")
}

// CSV formatting

fn csv<H: AsRef<str>>(headers: &[H], rows: &[Vec<String>]) -> String {
    let mut lines = vec![csv_line(headers)];
    lines.extend(rows.iter().map(|row| csv_line(row.as_slice())));
    lines.join("\n")
}

fn csv_line<S: AsRef<str>>(cells: &[S]) -> String {
    cells.iter().map(|c| csv_escape(c.as_ref())).collect::<Vec<_>>().join(",")
}

fn csv_escape(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comparator::Comparator;
    use crate::steam::RawListing;

    fn make_records() -> Vec<ComparisonRecord> {
        let comparator = Comparator::default();
        let hades = comparator
            .compare(
                "Hades",
                &[RawListing::new("Hades", "₹2500")],
                &[RawListing::new("Hades", "₴999")],
            )
            .unwrap();
        let portal =
            comparator.compare("Portal", &[RawListing::new("Portal", "₹199")], &[]).unwrap();
        vec![hades, portal]
    }

    fn formatter(format: OutputFormat) -> Formatter {
        Formatter::new(format, Region::In, Region::Ua)
    }

    #[test]
    fn test_column_headers() {
        let headers = column_headers(Region::In, Region::Ua);
        assert_eq!(headers[0], "Game Name");
        assert_eq!(headers[1], "Standard Price (India)");
        assert_eq!(headers[4], "Standard Converted Price (Ukraine)");
        assert_eq!(headers[8], "Difference (Discount)");

        let swapped = column_headers(Region::Ua, Region::In);
        assert_eq!(swapped[1], "Standard Price (Ukraine)");
    }

    #[test]
    fn test_totals_count_na_as_zero() {
        let totals = totals(&make_records());
        assert_eq!(totals[0].to_string(), "26.99");
        assert_eq!(totals[2].to_string(), "9.99");
        assert_eq!(totals[4].to_string(), "4.72");
    }

    #[test]
    fn test_totals_overflow_is_unavailable() {
        let mut records = make_records();
        for record in &mut records {
            record.standard_price_home = CleanedPrice::Amount(Decimal::MAX);
        }

        let totals = totals(&records);
        assert!(totals[0].is_unavailable());
        assert_eq!(totals[2].to_string(), "9.99");
    }

    #[test]
    fn test_totals_empty() {
        assert!(totals(&[]).iter().all(|t| t.to_string() == "0.00"));
    }

    #[test]
    fn test_table_records() {
        let output = formatter(OutputFormat::Table).format_records(&make_records());

        assert!(output.contains("Game Price Comparison Results:"));
        assert!(output.contains("Standard Price (India)"));
        assert!(output.contains("| Hades "));
        assert!(output.contains("N/A"));
        assert!(output.contains("Total Summary:"));
        assert!(output.contains("Standard Price (India): 26.99"));
        assert!(output.contains("Difference (Standard): 4.72"));
    }

    #[test]
    fn test_table_rows_align() {
        let output = formatter(OutputFormat::Table).format_records(&make_records());
        let table_lines: Vec<&str> =
            output.lines().filter(|l| l.starts_with('|') || l.starts_with('+')).collect();

        let width = table_lines[0].chars().count();
        assert!(table_lines.iter().all(|l| l.chars().count() == width));
    }

    #[test]
    fn test_empty_records() {
        assert_eq!(formatter(OutputFormat::Table).format_records(&[]), "No games matched.");
        assert_eq!(formatter(OutputFormat::Markdown).format_records(&[]), "No games matched.");

        let csv = formatter(OutputFormat::Csv).format_records(&[]);
        assert!(csv.starts_with("Game Name,Standard Price (India)"));
        assert_eq!(csv.lines().count(), 1);

        let json: serde_json::Value =
            serde_json::from_str(&formatter(OutputFormat::Json).format_records(&[])).unwrap();
        assert!(json["records"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_json_records() {
        let output = formatter(OutputFormat::Json).format_records(&make_records());
        let json: serde_json::Value = serde_json::from_str(&output).unwrap();

        assert_eq!(json["home_region"], "in");
        assert_eq!(json["foreign_region"], "ua");
        assert_eq!(json["records"][0]["product_name"], "Hades");
        assert_eq!(json["records"][0]["standard_price_foreign_converted"], "20.28");
        assert_eq!(json["records"][1]["difference_standard"], "N/A");
        assert_eq!(json["totals"]["standard_price_home"], "26.99");
    }

    #[test]
    fn test_markdown_records() {
        let output = formatter(OutputFormat::Markdown).format_records(&make_records());

        assert!(output.starts_with("| Game Name | Standard Price (India) |"));
        assert!(output.contains("|---|---|"));
        assert!(output.contains("| Hades | 25.00 | 25.00 | 9.99 | 20.28 | 4.72 |"));
        assert!(output.contains("| **Total** | **26.99** |"));
        assert!(output.contains("*2 games compared*"));
    }

    #[test]
    fn test_csv_records() {
        let output = formatter(OutputFormat::Csv).format_records(&make_records());
        let lines: Vec<&str> = output.lines().collect();

        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("Game Name,"));
        assert_eq!(lines[1], "Hades,25.00,25.00,9.99,20.28,4.72,9.99,20.28,4.72");
        assert_eq!(lines[2], "Portal,1.99,1.99,N/A,N/A,N/A,N/A,N/A,N/A");
        assert!(lines[3].starts_with("Total,26.99,26.99,9.99"));
    }

    #[test]
    fn test_csv_escape() {
        assert_eq!(csv_escape("simple"), "simple");
        assert_eq!(csv_escape("with,comma"), "\"with,comma\"");
        assert_eq!(csv_escape("with\"quote"), "\"with\"\"quote\"");
        assert_eq!(csv_escape("with\nnewline"), "\"with\nnewline\"");
    }

    #[test]
    fn test_markdown_escapes_pipes() {
        let output = markdown(&["Title"], &[vec!["A | B".to_string()]]);
        assert!(output.contains("A \\| B"));
    }

    fn make_listings() -> Vec<ListingRow> {
        vec![ListingRow {
            title: "Half-Life 2".to_string(),
            normalized: "HALF-LIFE 2".to_string(),
            standard: CleanedPrice::Amount(Decimal::new(999, 2)),
            discount: CleanedPrice::Unavailable,
        }]
    }

    #[test]
    fn test_format_listings() {
        let table = formatter(OutputFormat::Table).format_listings(Region::In, &make_listings());
        assert!(table.contains("Standard (INR)"));
        assert!(table.contains("HALF-LIFE 2"));
        assert!(table.contains("Total: 1 listings"));

        let csv = formatter(OutputFormat::Csv).format_listings(Region::Ua, &make_listings());
        assert_eq!(
            csv,
            "Title,Normalized,Standard (UAH),Discount (UAH)\nHalf-Life 2,HALF-LIFE 2,9.99,N/A"
        );

        let json = formatter(OutputFormat::Json).format_listings(Region::In, &make_listings());
        assert!(json.contains("\"standard\": \"9.99\""));

        let md = formatter(OutputFormat::Markdown).format_listings(Region::In, &make_listings());
        assert!(md.contains("*1 listings found*"));
    }

    #[test]
    fn test_format_listings_empty() {
        assert_eq!(formatter(OutputFormat::Json).format_listings(Region::In, &[]), "[]");
        assert_eq!(
            formatter(OutputFormat::Table).format_listings(Region::In, &[]),
            "No listings found."
        );
    }
}

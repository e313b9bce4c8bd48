// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::ExportError;
use crate::escape::escape_xml;
use epc_sync::OutputRecord;
use std::fmt::Write;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc2822;

pub const CHANNEL_TITLE: &str = "EPC Updates";
pub const CHANNEL_LINK: &str = "https://find-energy-certificate.service.gov.uk";
pub const CHANNEL_DESCRIPTION: &str = "Energy performance certificate changes";

fn item_description(record: &OutputRecord) -> String {
    let fields = record.record.fields();
    if record.removed {
        return String::from("removed from the register");
    }
    format!(
        "{}: rating {}, postcode {}",
        record.change,
        fields.rating.as_deref().unwrap_or("unknown"),
        fields.post_code.as_deref().unwrap_or("unknown")
    )
}

/// Renders records as an RSS 2.0 channel with one item per record.
///
/// # Arguments
///
/// * `records` - The records to publish
/// * `generated_at` - Used as the channel's `lastBuildDate`
///
/// # Errors
///
/// Returns an error if `generated_at` cannot be formatted.
pub fn render_rss(
    records: &[OutputRecord],
    generated_at: OffsetDateTime,
) -> Result<String, ExportError> {
    let mut xml: String = String::new();
    xml.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    xml.push_str("<rss version=\"2.0\">\n<channel>\n");
    let _ = writeln!(xml, "  <title>{CHANNEL_TITLE}</title>");
    let _ = writeln!(xml, "  <link>{CHANNEL_LINK}</link>");
    let _ = writeln!(xml, "  <description>{CHANNEL_DESCRIPTION}</description>");
    let _ = writeln!(
        xml,
        "  <lastBuildDate>{}</lastBuildDate>",
        generated_at.format(&Rfc2822)?
    );

    for output in records {
        let record = &output.record;
        let title: &str = record
            .fields()
            .address
            .as_deref()
            .unwrap_or_else(|| record.id().value());
        let link: &str = if record.url().is_empty() {
            CHANNEL_LINK
        } else {
            record.url()
        };

        xml.push_str("  <item>\n");
        let _ = writeln!(xml, "    <title>{}</title>", escape_xml(title));
        let _ = writeln!(xml, "    <link>{}</link>", escape_xml(link));
        let _ = writeln!(
            xml,
            "    <description>{}</description>",
            escape_xml(&item_description(output))
        );
        let _ = writeln!(
            xml,
            "    <guid isPermaLink=\"false\">{}</guid>",
            escape_xml(record.id().value())
        );
        xml.push_str("  </item>\n");
    }

    xml.push_str("</channel>\n</rss>\n");
    Ok(xml)
}

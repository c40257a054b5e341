//! Serialization of row records to the supported output formats.

use serde_json::Value;

use crate::query::{Format, RequestClass};
use crate::record::Row;
use crate::{Error, Result};

/// Encode rows of one class in the given format.
pub fn encode(class: RequestClass, rows: &[Row], format: Format) -> Result<Vec<u8>> {
    match format {
        Format::Json => Ok(serde_json::to_vec_pretty(rows)?),
        Format::Xml => Ok(encode_xml(class, rows).into_bytes()),
        Format::Csv => encode_csv(rows),
        Format::Html => Ok(encode_html(class, rows).into_bytes()),
    }
}

/// Root element name used for XML documents of a class.
pub fn xml_root(class: RequestClass) -> &'static str {
    match class {
        RequestClass::Gp => "spacetrack-tle",
        RequestClass::Decay => "spacetrack-decay",
        RequestClass::CdmPublic => "spacetrack-cdm",
    }
}

fn cell(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
    out
}

fn encode_xml(class: RequestClass, rows: &[Row]) -> String {
    let root = xml_root(class);
    let mut out = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    out.push_str(&format!("<{}>\n", root));
    for row in rows {
        out.push_str("  <item>\n");
        for (key, value) in row {
            out.push_str(&format!("    <{0}>{1}</{0}>\n", key, escape(&cell(value))));
        }
        out.push_str("  </item>\n");
    }
    out.push_str(&format!("</{}>\n", root));
    out
}

fn encode_csv(rows: &[Row]) -> Result<Vec<u8>> {
    let Some(first) = rows.first() else {
        return Ok(Vec::new());
    };
    let header: Vec<&String> = first.keys().collect();

    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(&header)?;
    for row in rows {
        writer.write_record(header.iter().map(|key| row.get(*key).map(cell).unwrap_or_default()))?;
    }
    writer.into_inner().map_err(|e| Error::Io(e.into_error()))
}

fn encode_html(class: RequestClass, rows: &[Row]) -> String {
    let mut out = String::from("<!DOCTYPE html>\n<html>\n<head>\n");
    out.push_str("<meta charset=\"utf-8\">\n");
    out.push_str(&format!("<title>{}</title>\n", xml_root(class)));
    out.push_str("</head>\n<body>\n<table>\n");

    if let Some(first) = rows.first() {
        out.push_str("<tr>");
        for key in first.keys() {
            out.push_str(&format!("<th>{}</th>", escape(key)));
        }
        out.push_str("</tr>\n");

        for row in rows {
            out.push_str("<tr>");
            for key in first.keys() {
                let text = row.get(key).map(cell).unwrap_or_default();
                out.push_str(&format!("<td>{}</td>", escape(&text)));
            }
            out.push_str("</tr>\n");
        }
    }

    out.push_str("</table>\n</body>\n</html>\n");
    out
}

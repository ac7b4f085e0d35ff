use std::io::Write;

use chrono::{DateTime, SecondsFormat};
use colored::Colorize;
use serde::Serialize;

use certchain_ledger::{Block, ChainSummary, RecordListing, SearchHit};
use certchain_types::{Record, Timestamp};

pub fn json(out: &mut impl Write, value: &impl Serialize) -> anyhow::Result<()> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)?;
    Ok(())
}

pub fn timestamp(ts: Timestamp) -> String {
    i64::try_from(ts.as_millis())
        .ok()
        .and_then(DateTime::from_timestamp_millis)
        .map(|dt| dt.to_rfc3339_opts(SecondsFormat::Millis, true))
        .unwrap_or_else(|| ts.to_string())
}

fn record_line(record: &Record) -> String {
    let fields: Vec<String> = record
        .fields
        .iter()
        .map(|(k, v)| format!("{}: {v}", k.bold()))
        .collect();
    match &record.id {
        Some(id) => format!("[{}] {}", id.to_string().cyan(), fields.join(", ")),
        None => fields.join(", "),
    }
}

pub fn issued(out: &mut impl Write, record: &Record, name_field: &str, pending: usize) -> anyhow::Result<()> {
    let who = record.get(name_field).unwrap_or("record");
    writeln!(
        out,
        "{} Certificate for {} added to pending list ({} pending).",
        "✓".green().bold(),
        who.bold(),
        pending
    )?;
    Ok(())
}

pub fn mined(out: &mut impl Write, block: &Block) -> anyhow::Result<()> {
    writeln!(
        out,
        "{} Block #{} mined successfully!",
        "✓".green().bold(),
        block.index()
    )?;
    self::block(out, block)
}

pub fn block(out: &mut impl Write, block: &Block) -> anyhow::Result<()> {
    writeln!(out, "{}", format!("Block #{}", block.index()).yellow().bold())?;
    writeln!(out, "  Timestamp:     {}", timestamp(block.timestamp()))?;
    writeln!(out, "  Previous Hash: {}", block.previous_hash().to_hex().dimmed())?;
    if block.records().is_empty() {
        writeln!(out, "  Certificates:  {}", "(none)".dimmed())?;
    } else {
        writeln!(out, "  Certificates:")?;
        for record in block.records() {
            writeln!(out, "    - {}", record_line(record))?;
        }
    }
    writeln!(out, "  Block Hash:    {}", block.hash().to_hex())?;
    Ok(())
}

pub fn hit(out: &mut impl Write, hit: &SearchHit) -> anyhow::Result<()> {
    writeln!(out, "{} Certificate found!", "✓".green().bold())?;
    for (key, value) in &hit.record.fields {
        writeln!(out, "  {}: {value}", key.bold())?;
    }
    if let Some(id) = &hit.record.id {
        writeln!(out, "  {}: {id}", "id".bold())?;
    }
    writeln!(out, "  Block #:    {}", hit.block_index())?;
    writeln!(out, "  Block Hash: {}", hit.block.hash().to_hex())?;
    Ok(())
}

pub fn not_found(out: &mut impl Write) -> anyhow::Result<()> {
    writeln!(out, "{} Certificate not found.", "✗".red().bold())?;
    Ok(())
}

pub fn pending(out: &mut impl Write, records: &[Record]) -> anyhow::Result<()> {
    if records.is_empty() {
        writeln!(out, "No pending certificates.")?;
    }
    for (i, record) in records.iter().enumerate() {
        writeln!(out, "{:>3}. {}", i + 1, record_line(record))?;
    }
    Ok(())
}

pub fn listing(out: &mut impl Write, rows: &[RecordListing]) -> anyhow::Result<()> {
    if rows.is_empty() {
        writeln!(out, "No sealed certificates.")?;
    }
    for row in rows {
        writeln!(
            out,
            "{} {}  {}",
            format!("#{}", row.block_index).yellow(),
            row.block_hash.short_hex().dimmed(),
            record_line(&row.record)
        )?;
    }
    Ok(())
}

pub fn summary(out: &mut impl Write, summary: &ChainSummary) -> anyhow::Result<()> {
    writeln!(
        out,
        "Ledger: {} blocks, {} sealed certificates, {} pending",
        summary.block_count.to_string().bold(),
        summary.record_count.to_string().bold(),
        summary.pending_count.to_string().bold()
    )?;
    writeln!(
        out,
        "Head: Block #{} {}",
        summary.head_index,
        summary.head_hash.to_hex().yellow()
    )?;
    Ok(())
}

pub fn notice(out: &mut impl Write, message: &str) -> anyhow::Result<()> {
    writeln!(out, "{} {message}", "ℹ".blue().bold())?;
    Ok(())
}

pub fn warning(out: &mut impl Write, message: &str) -> anyhow::Result<()> {
    writeln!(out, "{} {message}", "⚠".yellow().bold())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timestamp_renders_rfc3339() {
        assert_eq!(
            timestamp(Timestamp::from_millis(1_700_000_000_123)),
            "2023-11-14T22:13:20.123Z"
        );
    }

    #[test]
    fn out_of_range_timestamp_falls_back_to_raw_value() {
        let ts = Timestamp::from_millis(u64::MAX);
        assert_eq!(timestamp(ts), ts.to_string());
    }
}

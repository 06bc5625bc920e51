//! Human-readable rendering for terminal output.

use anyhow::Context;
use invoicer_core::models::{InvoiceRecord, InvoiceSummary, Notification, NotificationLevel};
use invoicer_core::Page;
use invoicer_worker::{BatchSummary, QueueEntry};
use serde::Serialize;
use std::fmt::Write;

const EMPTY: &str = "-";

/// Truncate a string to max_len characters, appending "..." if truncated.
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

pub fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    let out = serde_json::to_string_pretty(value).context("Serialize response")?;
    println!("{}", out);
    Ok(())
}

/// `$1550.00`, or `-` when the amount is unknown.
pub fn format_amount(amount: Option<f64>) -> String {
    amount
        .map(|a| format!("${:.2}", a))
        .unwrap_or_else(|| EMPTY.to_string())
}

fn text_or_dash(value: Option<&str>) -> &str {
    match value {
        Some(v) if !v.trim().is_empty() => v,
        _ => EMPTY,
    }
}

/// Long form date (`January 15, 2024`); unparseable dates are shown raw.
pub fn format_date_long(raw: Option<&str>) -> String {
    match raw {
        Some(raw) => invoicer_core::models::parse_invoice_date(raw)
            .map(|d| d.format("%B %-d, %Y").to_string())
            .unwrap_or_else(|| raw.to_string()),
        None => EMPTY.to_string(),
    }
}

pub fn render_notification(notification: &Notification) -> String {
    let tag = match notification.level {
        NotificationLevel::Success => "ok",
        NotificationLevel::Info => "info",
        NotificationLevel::Error => "error",
    };
    format!("[{}] {}", tag, notification.message)
}

pub fn render_invoice_page(title: &str, page: &Page<InvoiceSummary>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "\n=== {} ===\n", title);

    if page.items.is_empty() {
        if page.total_items == 0 {
            let _ = writeln!(out, "No invoices found.");
        } else {
            let _ = writeln!(
                out,
                "Page {} is empty ({} invoices over {} pages).",
                page.page, page.total_items, page.total_pages
            );
        }
        return out;
    }

    let first = (page.page - 1) * page.per_page + 1;
    let last = first + page.items.len() - 1;
    let _ = writeln!(
        out,
        "Showing {} to {} of {} invoices (page {} of {})\n",
        first, last, page.total_items, page.page, page.total_pages
    );

    let _ = writeln!(
        out,
        "{:<12} {:<24} {:<12} {:<40} {:>12}",
        "Invoice", "Vendor", "Date", "Shipping Address", "Total"
    );
    let _ = writeln!(out, "{}", "-".repeat(104));

    for invoice in &page.items {
        let _ = writeln!(
            out,
            "{:<12} {:<24} {:<12} {:<40} {:>12}",
            truncate_string(&invoice.invoice_id, 12),
            truncate_string(text_or_dash(invoice.vendor_name.as_deref()), 24),
            text_or_dash(invoice.invoice_date.as_deref()),
            truncate_string(text_or_dash(invoice.shipping_address.as_deref()), 40),
            format_amount(invoice.invoice_total),
        );
    }

    if page.has_next() {
        let _ = writeln!(out, "\n... (more invoices available, use --page {})", page.page + 1);
    }

    out
}

pub fn render_invoice_detail(invoice: &InvoiceRecord) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "\n=== Invoice {} ===\n", invoice.invoice_id);
    let _ = writeln!(out, "Date:        {}", format_date_long(invoice.invoice_date.as_deref()));
    let _ = writeln!(out, "Vendor:      {}", text_or_dash(invoice.vendor_name.as_deref()));
    let _ = writeln!(out, "Ship to:     {}", text_or_dash(invoice.shipping_address.as_deref()));
    let _ = writeln!(
        out,
        "Bill to:     {}",
        text_or_dash(invoice.billing_address_recipient.as_deref())
    );

    let _ = writeln!(out, "\nLine items ({})", invoice.items.len());
    if invoice.items.is_empty() {
        let _ = writeln!(out, "  (none)");
    } else {
        let _ = writeln!(
            out,
            "{:<24} {:<36} {:>8} {:>12} {:>12}",
            "Item", "Description", "Qty", "Unit Price", "Amount"
        );
        let _ = writeln!(out, "{}", "-".repeat(96));
        for item in &invoice.items {
            let _ = writeln!(
                out,
                "{:<24} {:<36} {:>8} {:>12} {:>12}",
                truncate_string(text_or_dash(item.name.as_deref()), 24),
                truncate_string(text_or_dash(item.description.as_deref()), 36),
                item.quantity.unwrap_or(0.0),
                format_amount(Some(item.unit_price.unwrap_or(0.0))),
                format_amount(Some(item.amount.unwrap_or(0.0))),
            );
        }
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "Subtotal:    {}", format_amount(Some(invoice.sub_total.unwrap_or(0.0))));
    let _ = writeln!(
        out,
        "Shipping:    {}",
        format_amount(Some(invoice.shipping_cost.unwrap_or(0.0)))
    );
    let _ = writeln!(
        out,
        "Total:       {}",
        format_amount(Some(invoice.invoice_total.unwrap_or(0.0)))
    );
    out
}

pub fn render_queue(entries: &[QueueEntry], summary: &BatchSummary) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "\n=== Uploads ===\n");
    let _ = writeln!(
        out,
        "{:<32} {:>10} {:<10} {}",
        "File", "Size (MB)", "Status", "Result"
    );
    let _ = writeln!(out, "{}", "-".repeat(90));

    for entry in entries {
        let result = entry
            .record
            .invoice_link()
            .or_else(|| entry.record.message.clone())
            .unwrap_or_default();
        let _ = writeln!(
            out,
            "{:<32} {:>10.2} {:<10} {}",
            truncate_string(&entry.file_name, 32),
            entry.byte_size as f64 / (1024.0 * 1024.0),
            entry.record.state.as_str(),
            result,
        );
    }

    let _ = writeln!(
        out,
        "\n{} succeeded, {} failed",
        summary.succeeded, summary.failed
    );
    out
}

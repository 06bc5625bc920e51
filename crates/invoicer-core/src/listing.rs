//! Client-side sorting and pagination of invoice lists.

use chrono::NaiveDate;
use serde::Serialize;
use std::cmp::Ordering;
use std::str::FromStr;

use crate::models::InvoiceSummary;

/// Rows per page in invoice listings.
pub const DEFAULT_PAGE_SIZE: usize = 10;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortKey {
    /// Newest first. Missing or unparseable dates sort as the epoch.
    #[default]
    Date,
    /// Largest total first. Missing totals count as zero.
    Amount,
    /// Vendor name A to Z, ignoring case.
    Vendor,
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "date" => Ok(SortKey::Date),
            "amount" => Ok(SortKey::Amount),
            "vendor" => Ok(SortKey::Vendor),
            other => Err(format!(
                "Invalid sort key '{}'. Must be: date, amount, or vendor",
                other
            )),
        }
    }
}

fn date_or_epoch(item: &InvoiceSummary) -> NaiveDate {
    item.invoice_date_parsed().unwrap_or_else(epoch)
}

fn epoch() -> NaiveDate {
    NaiveDate::from_ymd_opt(1970, 1, 1).unwrap_or_default()
}

fn compare(a: &InvoiceSummary, b: &InvoiceSummary, key: SortKey) -> Ordering {
    match key {
        SortKey::Date => date_or_epoch(b).cmp(&date_or_epoch(a)),
        SortKey::Amount => {
            let a_total = a.invoice_total.unwrap_or(0.0);
            let b_total = b.invoice_total.unwrap_or(0.0);
            b_total.total_cmp(&a_total)
        }
        SortKey::Vendor => {
            let a_vendor = a.vendor_name.as_deref().unwrap_or("").to_lowercase();
            let b_vendor = b.vendor_name.as_deref().unwrap_or("").to_lowercase();
            a_vendor.cmp(&b_vendor)
        }
    }
}

/// Sort invoices in place. The sort is stable, so ties keep server order.
pub fn sort_invoices(items: &mut [InvoiceSummary], key: SortKey) {
    items.sort_by(|a, b| compare(a, b, key));
}

/// One page of a sorted list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// 1-based page number as requested (clamped to at least 1).
    pub page: usize,
    pub per_page: usize,
    pub total_items: usize,
    pub total_pages: usize,
}

impl<T> Page<T> {
    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }
}

/// Slice out a 1-based page. Pages past the end are empty.
pub fn paginate<T: Clone>(items: &[T], page: usize, per_page: usize) -> Page<T> {
    let per_page = per_page.max(1);
    let page = page.max(1);
    let total_items = items.len();
    let total_pages = total_items.div_ceil(per_page);

    let start = (page - 1).saturating_mul(per_page).min(total_items);
    let end = start.saturating_add(per_page).min(total_items);

    Page {
        items: items[start..end].to_vec(),
        page,
        per_page,
        total_items,
        total_pages,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(id: &str, vendor: Option<&str>, date: Option<&str>, total: Option<f64>) -> InvoiceSummary {
        InvoiceSummary {
            invoice_id: id.to_string(),
            vendor_name: vendor.map(String::from),
            invoice_date: date.map(String::from),
            shipping_address: None,
            invoice_total: total,
        }
    }

    fn ids(items: &[InvoiceSummary]) -> Vec<&str> {
        items.iter().map(|i| i.invoice_id.as_str()).collect()
    }

    #[test]
    fn test_sort_by_date_newest_first() {
        let mut items = vec![
            summary("A", None, Some("2024-01-15"), None),
            summary("B", None, None, None),
            summary("C", None, Some("2024-02-20"), None),
            summary("D", None, Some("garbage"), None),
        ];
        sort_invoices(&mut items, SortKey::Date);
        assert_eq!(ids(&items), vec!["C", "A", "B", "D"]);
    }

    #[test]
    fn test_sort_by_amount_largest_first() {
        let mut items = vec![
            summary("A", None, None, Some(1550.0)),
            summary("B", None, None, None),
            summary("C", None, None, Some(4650.0)),
        ];
        sort_invoices(&mut items, SortKey::Amount);
        assert_eq!(ids(&items), vec!["C", "A", "B"]);
    }

    #[test]
    fn test_sort_by_vendor_case_insensitive() {
        let mut items = vec![
            summary("A", Some("superStore"), None, None),
            summary("B", Some("Acme Corp"), None, None),
            summary("C", None, None, None),
            summary("D", Some("aaron Bergman"), None, None),
        ];
        sort_invoices(&mut items, SortKey::Vendor);
        assert_eq!(ids(&items), vec!["C", "D", "B", "A"]);
    }

    #[test]
    fn test_sort_key_from_str() {
        assert_eq!("Amount".parse::<SortKey>(), Ok(SortKey::Amount));
        assert_eq!(" vendor ".parse::<SortKey>(), Ok(SortKey::Vendor));
        assert!("price".parse::<SortKey>().is_err());
    }

    #[test]
    fn test_paginate_pages() {
        let items: Vec<u32> = (1..=23).collect();

        let first = paginate(&items, 1, DEFAULT_PAGE_SIZE);
        assert_eq!(first.items, (1..=10).collect::<Vec<_>>());
        assert_eq!(first.total_pages, 3);
        assert!(first.has_next());
        assert!(!first.has_previous());

        let last = paginate(&items, 3, DEFAULT_PAGE_SIZE);
        assert_eq!(last.items, vec![21, 22, 23]);
        assert!(!last.has_next());

        let beyond = paginate(&items, 9, DEFAULT_PAGE_SIZE);
        assert!(beyond.items.is_empty());
        assert_eq!(beyond.total_items, 23);
    }

    #[test]
    fn test_paginate_empty_and_zero_page() {
        let empty: Vec<u32> = vec![];
        let page = paginate(&empty, 1, DEFAULT_PAGE_SIZE);
        assert!(page.items.is_empty());
        assert_eq!(page.total_pages, 0);

        let items = vec![1, 2, 3];
        let clamped = paginate(&items, 0, 2);
        assert_eq!(clamped.page, 1);
        assert_eq!(clamped.items, vec![1, 2]);
    }
}

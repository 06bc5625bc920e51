//! Seed data: seven invoices from four vendors.

use invoicer_core::models::{InvoiceRecord, LineItem};

fn item(id: &str, name: &str, description: &str, quantity: f64, unit_price: f64) -> LineItem {
    LineItem {
        id: Some(id.to_string()),
        name: Some(name.to_string()),
        description: Some(description.to_string()),
        quantity: Some(quantity),
        unit_price: Some(unit_price),
        amount: Some(quantity * unit_price),
    }
}

#[allow(clippy::too_many_arguments)]
fn invoice(
    id: &str,
    vendor: &str,
    date: &str,
    recipient: &str,
    address: &str,
    sub_total: f64,
    shipping: f64,
    items: Vec<LineItem>,
) -> InvoiceRecord {
    InvoiceRecord {
        invoice_id: id.to_string(),
        vendor_name: Some(vendor.to_string()),
        invoice_date: Some(date.to_string()),
        billing_address_recipient: Some(recipient.to_string()),
        shipping_address: Some(address.to_string()),
        sub_total: Some(sub_total),
        shipping_cost: Some(shipping),
        invoice_total: Some(sub_total + shipping),
        items,
    }
}

pub fn seed_invoices() -> Vec<InvoiceRecord> {
    vec![
        invoice(
            "INV-001",
            "Aaron Bergman",
            "2024-01-15",
            "John Smith",
            "123 Main St, New York, NY 10001",
            1500.0,
            50.0,
            vec![
                item("1", "Office Supplies", "Box of pens and pencils", 10.0, 50.0),
                item("2", "Desk Lamp", "LED desk lamp", 5.0, 200.0),
            ],
        ),
        invoice(
            "INV-002",
            "Acme Corp",
            "2024-01-20",
            "Jane Doe",
            "456 Oak Ave, Los Angeles, CA 90001",
            3000.0,
            100.0,
            vec![item("1", "Server Hardware", "Enterprise server", 2.0, 1500.0)],
        ),
        invoice(
            "INV-003",
            "TechSupply Inc",
            "2024-01-25",
            "Bob Johnson",
            "789 Pine Rd, Chicago, IL 60601",
            800.0,
            25.0,
            vec![item("1", "Computer Parts", "RAM and SSD", 4.0, 200.0)],
        ),
        invoice(
            "INV-004",
            "Aaron Bergman",
            "2024-02-05",
            "Alice White",
            "321 Elm St, Boston, MA 02101",
            2200.0,
            75.0,
            vec![item("1", "Furniture", "Office chairs", 4.0, 550.0)],
        ),
        invoice(
            "INV-005",
            "SuperStore",
            "2024-02-10",
            "Mike Wilson",
            "555 Market St, San Francisco, CA 94102",
            4500.0,
            150.0,
            vec![item(
                "1",
                "Bulk Supplies",
                "Office equipment and accessories",
                50.0,
                90.0,
            )],
        ),
        invoice(
            "INV-006",
            "SuperStore",
            "2024-02-15",
            "Sarah Davis",
            "789 Commerce St, Seattle, WA 98101",
            2800.0,
            80.0,
            vec![
                item("1", "Printers", "Network printers", 3.0, 800.0),
                item("2", "Paper Supplies", "A4 and A3 paper reams", 20.0, 20.0),
            ],
        ),
        invoice(
            "INV-007",
            "SuperStore",
            "2024-02-20",
            "Tom Brown",
            "222 Industrial Way, Denver, CO 80202",
            3200.0,
            120.0,
            vec![item(
                "1",
                "Office Furniture",
                "Desks and shelving units",
                8.0,
                400.0,
            )],
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_totals_add_up() {
        let invoices = seed_invoices();
        assert_eq!(invoices.len(), 7);
        for invoice in &invoices {
            assert_eq!(
                invoice.invoice_total,
                Some(invoice.sub_total.unwrap() + invoice.shipping_cost.unwrap())
            );
        }
        assert_eq!(invoices[0].invoice_total, Some(1550.0));
        assert_eq!(invoices[4].invoice_total, Some(4650.0));
    }
}

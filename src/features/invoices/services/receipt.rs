//! Plain-text receipt for thermal printers.

use crate::modules::backend::Invoice;
use crate::shared::constants::RECEIPT_WIDTH;
use crate::shared::dates::format_optional_datetime;
use crate::shared::money::{format_currency, format_vnd};
use rust_decimal::Decimal;

fn width_of(text: &str) -> usize {
    text.chars().count()
}

fn truncate(text: &str, width: usize) -> String {
    text.chars().take(width).collect()
}

fn center(text: &str) -> String {
    let text = truncate(text, RECEIPT_WIDTH);
    let pad = (RECEIPT_WIDTH - width_of(&text)) / 2;
    format!("{}{}", " ".repeat(pad), text)
}

/// `left` flush left, `right` flush right on one line
fn spread(left: &str, right: &str) -> String {
    let right = truncate(right, RECEIPT_WIDTH - 1);
    let right_width = width_of(&right);
    let left = truncate(left, RECEIPT_WIDTH.saturating_sub(right_width + 1));
    let gap = RECEIPT_WIDTH.saturating_sub(width_of(&left) + right_width).max(1);
    format!("{}{}{}", left, " ".repeat(gap), right)
}

/// Render an invoice as a fixed-width receipt
pub fn render_receipt(invoice: &Invoice, shop_name: &str) -> String {
    let rule = "-".repeat(RECEIPT_WIDTH);
    let mut lines = vec![
        center(shop_name),
        center("HÓA ĐƠN BÁN HÀNG"),
        rule.clone(),
        spread("Mã hóa đơn:", &invoice.display_code()),
        spread("Khách hàng:", &invoice.customer_name),
        spread("Ngày bán:", &format_optional_datetime(invoice.sale_date.as_ref())),
        rule.clone(),
    ];

    for item in &invoice.items {
        let name = item.product_name.as_deref().unwrap_or("-");
        lines.push(truncate(name, RECEIPT_WIDTH));
        lines.push(spread(
            &format!("  {} x {}", item.quantity, format_currency(item.unit_price())),
            &format_currency(item.line_total()),
        ));
    }

    lines.push(rule.clone());
    lines.push(spread("Tổng cộng:", &format_vnd(invoice.total())));
    if invoice.debt() > Decimal::ZERO {
        lines.push(spread("Nợ cũ:", &format_vnd(invoice.debt())));
        lines.push(spread("Phải trả:", &format_vnd(invoice.amount_due())));
    }
    lines.push(rule);
    lines.push(center("Cảm ơn quý khách!"));

    let mut receipt = lines.join("\n");
    receipt.push('\n');
    receipt
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::backend::InvoiceItem;

    fn invoice() -> Invoice {
        Invoice {
            invoice_code: Some("HD001".to_string()),
            customer_name: "Chị Lan".to_string(),
            items: vec![InvoiceItem {
                product_id: Some(1),
                product_name: Some("Bia Hà Nội".to_string()),
                sale_price: Some(Decimal::from(15000)),
                quantity: 24,
            }],
            ..Default::default()
        }
    }

    #[test]
    fn test_receipt_lines_fit_width() {
        let mut invoice = invoice();
        invoice.items[0].product_name = Some("Nước ngọt có ga vị cam loại chai lớn 1.5 lít".to_string());
        invoice.debt_amount = Some(Decimal::from(20000));

        let receipt = render_receipt(&invoice, "Cửa hàng Tạp hóa Bình Minh");
        for line in receipt.lines() {
            assert!(line.chars().count() <= RECEIPT_WIDTH, "too wide: {:?}", line);
        }
    }

    #[test]
    fn test_receipt_content() {
        let receipt = render_receipt(&invoice(), "Tạp hóa");

        assert!(receipt.contains("Bia Hà Nội"));
        assert!(receipt.contains("  24 x 15.000"));
        assert!(receipt.lines().any(|l| l.starts_with("Tổng cộng:") && l.ends_with("360.000 VND")));
        assert!(!receipt.contains("Nợ cũ"));
        assert!(receipt.lines().any(|l| l.ends_with("HD001")));
    }

    #[test]
    fn test_debt_lines() {
        let mut invoice = invoice();
        invoice.debt_amount = Some(Decimal::from(40000));

        let receipt = render_receipt(&invoice, "Tạp hóa");
        assert!(receipt.lines().any(|l| l.starts_with("Nợ cũ:") && l.ends_with("40.000 VND")));
        assert!(receipt.lines().any(|l| l.starts_with("Phải trả:") && l.ends_with("400.000 VND")));
    }
}

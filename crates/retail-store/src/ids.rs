//! Document numbers stamped onto actions before they are dispatched.
//!
//! The engine never generates identifiers; these helpers produce them at
//! the boundary. Each is a prefix plus the first 8 hex digits of a v4 UUID
//! (`INV-3F2A9C1B`), which is plenty for a single demo session.

use uuid::Uuid;

fn stamp(prefix: &str) -> String {
    let uuid = Uuid::new_v4().simple().to_string().to_uppercase();
    format!("{}-{}", prefix, &uuid[..8])
}

pub fn invoice_number() -> String {
    stamp("INV")
}

pub fn parked_invoice_number() -> String {
    stamp("PARK")
}

pub fn adjustment_id() -> String {
    stamp("ADJ")
}

pub fn purchase_order_id() -> String {
    stamp("PO")
}

pub fn grn_id() -> String {
    stamp("GRN")
}

pub fn refund_id() -> String {
    stamp("REF")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shape() {
        let invoice = invoice_number();
        assert!(invoice.starts_with("INV-"));
        assert_eq!(invoice.len(), "INV-".len() + 8);
        assert!(invoice[4..].chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_ids_are_distinct() {
        assert_ne!(grn_id(), grn_id());
        assert!(refund_id().starts_with("REF-"));
        assert!(purchase_order_id().starts_with("PO-"));
    }
}

//! Back-office report.
//!
//! Pure read-side aggregation over the fetched collections plus the
//! `admin-report.pdf` export. Collections are assumed to fit in memory; the
//! backend has no pagination on the admin list endpoints.

use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference};

use meridian_core::Money;

use crate::api::{Order, Product, User};

const PAGE_WIDTH_MM: f32 = 210.0;
const PAGE_HEIGHT_MM: f32 = 297.0;
const MARGIN_MM: f32 = 20.0;
const LINE_HEIGHT_MM: f32 = 7.0;

/// Aggregate counts over the admin collections.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportSummary {
    pub total_products: usize,
    pub total_orders: usize,
    pub total_users: usize,
    /// Products whose stock is exactly zero.
    pub out_of_stock: usize,
    /// Sum of every order's grand total.
    pub total_sales: Money,
}

impl ReportSummary {
    /// Aggregate the already-fetched collections.
    #[must_use]
    pub fn aggregate(products: &[Product], orders: &[Order], users: &[User]) -> Self {
        let out_of_stock = products.iter().filter(|p| p.stock == 0).count();
        let total_sales = orders.iter().map(|o| o.amounts.grand_total).sum();

        Self {
            total_products: products.len(),
            total_orders: orders.len(),
            total_users: users.len(),
            out_of_stock,
            total_sales,
        }
    }
}

/// A top-down text cursor that adds pages as it runs off the bottom.
struct TextCursor<'a> {
    doc: &'a PdfDocumentReference,
    layer: printpdf::PdfLayerReference,
    font: &'a IndirectFontRef,
    y: f32,
}

impl<'a> TextCursor<'a> {
    fn new(
        doc: &'a PdfDocumentReference,
        layer: printpdf::PdfLayerReference,
        font: &'a IndirectFontRef,
    ) -> Self {
        Self {
            doc,
            layer,
            font,
            y: PAGE_HEIGHT_MM - MARGIN_MM,
        }
    }

    fn line(&mut self, size: f32, text: &str) {
        if self.y < MARGIN_MM {
            let (page, layer) = self
                .doc
                .add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "report");
            self.layer = self.doc.get_page(page).get_layer(layer);
            self.y = PAGE_HEIGHT_MM - MARGIN_MM;
        }
        self.layer
            .use_text(text, size, Mm(MARGIN_MM), Mm(self.y), self.font);
        self.y -= LINE_HEIGHT_MM;
    }

    fn heading(&mut self, text: &str) {
        self.y -= LINE_HEIGHT_MM / 2.0;
        self.line(13.0, text);
    }
}

/// Render the admin report as PDF bytes: the overview plus product, order,
/// and user tables.
///
/// # Errors
///
/// Returns an error if the document cannot be assembled.
pub fn render_admin_report(
    products: &[Product],
    orders: &[Order],
    users: &[User],
    summary: &ReportSummary,
) -> Result<Vec<u8>, printpdf::Error> {
    let (doc, page, layer) = PdfDocument::new(
        "Admin Report",
        Mm(PAGE_WIDTH_MM),
        Mm(PAGE_HEIGHT_MM),
        "report",
    );
    let font = doc.add_builtin_font(BuiltinFont::Helvetica)?;
    let layer = doc.get_page(page).get_layer(layer);

    let mut cursor = TextCursor::new(&doc, layer, &font);
    cursor.line(16.0, "Admin Report");

    cursor.heading("Overview");
    cursor.line(10.0, &format!("Total Products: {}", summary.total_products));
    cursor.line(10.0, &format!("Total Orders: {}", summary.total_orders));
    cursor.line(10.0, &format!("Total Users: {}", summary.total_users));
    cursor.line(
        10.0,
        &format!("Total Sales Amount: ${}", summary.total_sales),
    );
    cursor.line(
        10.0,
        &format!("Out of Stock Products: {}", summary.out_of_stock),
    );

    cursor.heading("Products Report");
    cursor.line(10.0, "Product Name | Stock | Price");
    for product in products {
        cursor.line(
            10.0,
            &format!("{} | {} | ${}", product.name, product.stock, product.price),
        );
    }

    cursor.heading("Order Report");
    cursor.line(10.0, "Order ID | Total Price | Status");
    for order in orders {
        cursor.line(
            10.0,
            &format!(
                "{} | ${} | {}",
                order.id, order.amounts.grand_total, order.status
            ),
        );
    }

    cursor.heading("User Report");
    cursor.line(10.0, "User ID | Name | Email");
    for user in users {
        cursor.line(10.0, &format!("{} | {} | {}", user.id, user.name, user.email));
    }

    doc.save_to_bytes()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use meridian_core::{OrderId, OrderStatus, PaymentStatus, ProductId, Role, UserId};

    use crate::api::{OrderAmounts, OrderItem, PaymentResult, ShippingInfo};

    fn product(id: i64, stock: u32, price: i64) -> Product {
        Product {
            id: ProductId::new(id),
            name: format!("product-{id}"),
            description: String::new(),
            price: Money::from_major(price),
            stock,
            images: vec![],
            category: "misc".to_string(),
            brand: None,
        }
    }

    fn order(id: i64, total: i64) -> Order {
        Order {
            id: OrderId::new(id),
            items: vec![OrderItem {
                product_id: ProductId::new(1),
                name: "x".to_string(),
                price: Money::from_major(total),
                quantity: 1,
                image: None,
            }],
            shipping: ShippingInfo {
                address: "12 Harbor Lane".to_string(),
                city: "Portsmouth".to_string(),
                phone: "555-0142".to_string(),
                postal_code: "03801".to_string(),
                state: "NH".to_string(),
                country: "US".to_string(),
            },
            amounts: OrderAmounts {
                items_total: Money::from_major(total),
                shipping_total: Money::ZERO,
                tax_total: Money::ZERO,
                grand_total: Money::from_major(total),
            },
            payment: PaymentResult {
                id: "pi_test".to_string(),
                status: PaymentStatus::Succeeded,
            },
            status: OrderStatus::Paid,
            created_at: Utc::now(),
        }
    }

    fn user(id: i64) -> User {
        User {
            id: UserId::new(id),
            name: format!("user-{id}"),
            email: format!("user{id}@example.com"),
            role: Role::User,
        }
    }

    #[test]
    fn test_aggregate_counts() {
        let products = vec![product(1, 0, 10), product(2, 5, 20), product(3, 0, 30)];
        let orders = vec![order(1, 100), order(2, 150)];
        let users = vec![user(1)];

        let summary = ReportSummary::aggregate(&products, &orders, &users);
        assert_eq!(summary.total_products, 3);
        assert_eq!(summary.total_orders, 2);
        assert_eq!(summary.total_users, 1);
        assert_eq!(summary.out_of_stock, 2);
        assert_eq!(summary.total_sales, Money::from_major(250));
    }

    #[test]
    fn test_aggregate_empty_collections() {
        let summary = ReportSummary::aggregate(&[], &[], &[]);
        assert_eq!(summary.total_products, 0);
        assert_eq!(summary.out_of_stock, 0);
        assert!(summary.total_sales.is_zero());
    }

    #[test]
    fn test_render_produces_pdf_bytes() {
        let products = vec![product(1, 2, 10)];
        let orders = vec![order(1, 100)];
        let users = vec![user(1)];
        let summary = ReportSummary::aggregate(&products, &orders, &users);

        let bytes = render_admin_report(&products, &orders, &users, &summary).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_render_paginates_large_collections() {
        let products: Vec<Product> = (0..80).map(|i| product(i, 1, 5)).collect();
        let summary = ReportSummary::aggregate(&products, &[], &[]);

        let bytes = render_admin_report(&products, &[], &[], &summary).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }
}

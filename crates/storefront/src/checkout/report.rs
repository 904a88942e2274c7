//! Order summary PDF.
//!
//! Renders the pending order (shipping, lines, quote) as a downloadable
//! `order_report.pdf` from the confirmation step.

use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference};

use crate::checkout::{OrderQuote, ShippingInfo};
use crate::models::cart::CartItem;

const PAGE_WIDTH_MM: f32 = 210.0;
const PAGE_HEIGHT_MM: f32 = 297.0;
const MARGIN_MM: f32 = 20.0;
const LINE_HEIGHT_MM: f32 = 8.0;

/// A simple top-down text cursor over one or more A4 pages.
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

    fn gap(&mut self) {
        self.y -= LINE_HEIGHT_MM / 2.0;
    }
}

/// Render the pending order as PDF bytes.
///
/// # Errors
///
/// Returns an error if the document cannot be assembled.
pub fn render_order_report(
    customer_name: &str,
    shipping: &ShippingInfo,
    items: &[CartItem],
    quote: &OrderQuote,
) -> Result<Vec<u8>, printpdf::Error> {
    let (doc, page, layer) = PdfDocument::new(
        "Order Report",
        Mm(PAGE_WIDTH_MM),
        Mm(PAGE_HEIGHT_MM),
        "report",
    );
    let font = doc.add_builtin_font(BuiltinFont::Helvetica)?;
    let layer = doc.get_page(page).get_layer(layer);

    let mut cursor = TextCursor::new(&doc, layer, &font);
    cursor.line(16.0, "Order Report");
    cursor.gap();
    cursor.line(11.0, &format!("Name: {customer_name}"));
    cursor.line(11.0, &format!("Phone: {}", shipping.phone));
    cursor.line(
        11.0,
        &format!(
            "Address: {}, {}, {}, {}, {}",
            shipping.address, shipping.city, shipping.state, shipping.postal_code, shipping.country
        ),
    );
    cursor.gap();

    cursor.line(12.0, "Items:");
    for (index, item) in items.iter().enumerate() {
        cursor.line(
            11.0,
            &format!(
                "{}. {} - {} x ${}",
                index + 1,
                item.name,
                item.quantity,
                item.price
            ),
        );
    }
    cursor.gap();

    cursor.line(11.0, &format!("Subtotal: ${}", quote.items_total));
    cursor.line(11.0, &format!("Shipping: ${}", quote.shipping_total));
    cursor.line(11.0, &format!("Tax: ${}", quote.tax_total));
    cursor.line(12.0, &format!("Total: ${}", quote.grand_total));

    doc.save_to_bytes()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use meridian_core::{Money, ProductId};

    #[test]
    fn test_render_produces_pdf_bytes() {
        let shipping = ShippingInfo {
            address: "12 Harbor Lane".to_string(),
            city: "Portsmouth".to_string(),
            phone: "555-0142".to_string(),
            postal_code: "03801".to_string(),
            state: "NH".to_string(),
            country: "US".to_string(),
        };
        let items = vec![CartItem {
            product_id: ProductId::new(1),
            name: "Vanta Keyboard".to_string(),
            price: Money::from_major(89),
            quantity: 2,
            image: None,
            stock: 10,
        }];
        let quote = OrderQuote::for_subtotal(Money::from_major(178));

        let bytes = render_order_report("Ada Shopper", &shipping, &items, &quote).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_render_paginates_long_orders() {
        let shipping = ShippingInfo {
            address: "12 Harbor Lane".to_string(),
            city: "Portsmouth".to_string(),
            phone: "555-0142".to_string(),
            postal_code: "03801".to_string(),
            state: "NH".to_string(),
            country: "US".to_string(),
        };
        let items: Vec<CartItem> = (0..60)
            .map(|i| CartItem {
                product_id: ProductId::new(i),
                name: format!("Item {i}"),
                price: Money::from_major(5),
                quantity: 1,
                image: None,
                stock: 10,
            })
            .collect();
        let quote = OrderQuote::for_subtotal(Money::from_major(300));

        let bytes = render_order_report("Ada Shopper", &shipping, &items, &quote).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }
}

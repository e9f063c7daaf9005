//! The embedded product catalog and its filter.
//!
//! The catalog is compiled into the binary and never changes at runtime. The
//! filter is a linear scan that keeps catalog order.

use std::sync::LazyLock;

use crate::types::{Category, CategoryFilter, Price, Product, ProductId};

/// `(id, name, category, price, image, description)` rows of the catalog.
const CATALOG_ROWS: &[(&str, &str, Category, u64, &str, &str)] = &[
    (
        "1",
        "Mochila Cinnamoroll Pastel",
        Category::Backpacks,
        45_000,
        "https://images.unsplash.com/photo-1553062407-98eeb94c6a62?q=80&w=800&auto=format&fit=crop",
        "Mochila reforzada con diseño kawaii. Ideal para el colegio o paseos.",
    ),
    (
        "2",
        "Juguete Antiestrés Pop-It",
        Category::Toys,
        5_500,
        "https://images.unsplash.com/photo-1611996575749-79a3a250f948?q=80&w=800&auto=format&fit=crop",
        "Silicona de alta calidad, lavable y ultra resistente.",
    ),
    (
        "3",
        "Mini Parlante Bluetooth RGB",
        Category::MiniElectronics,
        18_000,
        "https://images.unsplash.com/photo-1608156639585-342c718e37ca?q=80&w=800&auto=format&fit=crop",
        "Sonido 360 con luces LED rítmicas. Batería de larga duración.",
    ),
    (
        "4",
        "Set de Scrunchies Terciopelo",
        Category::Accessories,
        3_200,
        "https://images.unsplash.com/photo-1621235123901-b549079a8385?q=80&w=800&auto=format&fit=crop",
        "Pack de 5 coleros de suave terciopelo en colores pastel.",
    ),
    (
        "5",
        "Lámpara de Escritorio Flex",
        Category::StationeryAndHome,
        12_500,
        "https://images.unsplash.com/photo-1534073828943-f801091bb18c?q=80&w=800&auto=format&fit=crop",
        "Luz LED regulable con brazo flexible. Conexión USB.",
    ),
    (
        "6",
        "Taza Gatito de Cerámica",
        Category::Gifts,
        8_900,
        "https://images.unsplash.com/photo-1514228742587-6b1558fcca3d?q=80&w=800&auto=format&fit=crop",
        "Incluye cuchara y tapa. Perfecta para regalo.",
    ),
    (
        "7",
        "Humidificador Aroma Mist",
        Category::StationeryAndHome,
        22_000,
        "https://images.unsplash.com/photo-1602928321679-560bb453f190?q=80&w=800&auto=format&fit=crop",
        "Mejora el aire de tu habitación. Silencioso y elegante.",
    ),
    (
        "8",
        "Mochila Urban Explorer",
        Category::Backpacks,
        52_000,
        "https://images.unsplash.com/photo-1622560480605-d83c853bc5c3?q=80&w=800&auto=format&fit=crop",
        "Compartimento para notebook y múltiples bolsillos.",
    ),
    (
        "9",
        "Smartwatch Kids Edition",
        Category::MiniElectronics,
        29_500,
        "https://images.unsplash.com/photo-1544117518-30df57809b04?q=80&w=800&auto=format&fit=crop",
        "Reloj inteligente con juegos y recordatorios.",
    ),
    (
        "10",
        "Set Dibujo Profesional",
        Category::StationeryAndHome,
        15_600,
        "https://images.unsplash.com/photo-1513364776144-60967b0f800f?q=80&w=800&auto=format&fit=crop",
        "Lápices, gomas y sacapuntas de alta gama para artistas.",
    ),
];

static CATALOG: LazyLock<Catalog> = LazyLock::new(|| Catalog {
    products: CATALOG_ROWS
        .iter()
        .map(|&(id, name, category, price, image, description)| Product {
            id: ProductId::new(id),
            name: name.to_string(),
            category,
            price: Price::new(price),
            image: image.to_string(),
            description: description.to_string(),
        })
        .collect(),
});

/// An ordered, read-only list of products.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    /// The storefront catalog embedded at build time.
    #[must_use]
    pub fn embedded() -> &'static Self {
        &CATALOG
    }

    /// All products in catalog order.
    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Look up a product by id.
    #[must_use]
    pub fn find(&self, id: &ProductId) -> Option<&Product> {
        self.products.iter().find(|p| &p.id == id)
    }

    /// Products matching the category filter and the search query.
    #[must_use]
    pub fn filter(&self, category: CategoryFilter, query: &str) -> Vec<&Product> {
        filter_products(&self.products, category, query)
    }
}

/// Filter products by category and a case-insensitive substring query.
///
/// A product matches when its category passes `category` and `query` is a
/// substring of its name or of its category label. An empty query matches
/// everything. Catalog order is preserved.
#[must_use]
pub fn filter_products<'a>(
    products: &'a [Product],
    category: CategoryFilter,
    query: &str,
) -> Vec<&'a Product> {
    let needle = query.to_lowercase();
    products
        .iter()
        .filter(|p| category.admits(p.category))
        .filter(|p| {
            p.name.to_lowercase().contains(&needle)
                || p.category.label().to_lowercase().contains(&needle)
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn ids(products: &[&Product]) -> Vec<String> {
        products.iter().map(|p| p.id.to_string()).collect()
    }

    #[test]
    fn test_embedded_catalog_has_ten_unique_products() {
        let catalog = Catalog::embedded();
        assert_eq!(catalog.products().len(), 10);

        let mut ids: Vec<_> = catalog.products().iter().map(|p| p.id.clone()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 10);
    }

    #[test]
    fn test_find() {
        let catalog = Catalog::embedded();
        let product = catalog.find(&ProductId::new("8")).unwrap();
        assert_eq!(product.name, "Mochila Urban Explorer");
        assert_eq!(product.price, Price::new(52_000));
        assert!(catalog.find(&ProductId::new("99")).is_none());
    }

    #[test]
    fn test_all_with_empty_query_returns_everything_in_order() {
        let catalog = Catalog::embedded();
        let result = catalog.filter(CategoryFilter::All, "");
        assert_eq!(
            ids(&result),
            vec!["1", "2", "3", "4", "5", "6", "7", "8", "9", "10"]
        );
    }

    #[test]
    fn test_filter_by_category() {
        let catalog = Catalog::embedded();
        let result = catalog.filter(CategoryFilter::Only(Category::StationeryAndHome), "");
        assert_eq!(ids(&result), vec!["5", "7", "10"]);
    }

    #[test]
    fn test_query_matches_name_case_insensitively() {
        let catalog = Catalog::embedded();
        let result = catalog.filter(CategoryFilter::All, "MOCHILA");
        assert_eq!(ids(&result), vec!["1", "8"]);
    }

    #[test]
    fn test_query_matches_category_label() {
        let catalog = Catalog::embedded();
        let result = catalog.filter(CategoryFilter::All, "electrónicos");
        assert_eq!(ids(&result), vec!["3", "9"]);
    }

    #[test]
    fn test_category_and_query_combine() {
        let catalog = Catalog::embedded();
        let result = catalog.filter(CategoryFilter::Only(Category::Backpacks), "urban");
        assert_eq!(ids(&result), vec!["8"]);

        let result = catalog.filter(CategoryFilter::Only(Category::Toys), "urban");
        assert!(result.is_empty());
    }

    #[test]
    fn test_filter_products_borrows_from_slice_only() {
        let products = Catalog::embedded().products().to_vec();
        let matches = {
            let query = String::from("set");
            filter_products(&products, CategoryFilter::All, &query)
        };
        assert_eq!(ids(&matches), vec!["4", "10"]);
    }

    #[test]
    fn test_no_match_returns_empty() {
        let catalog = Catalog::embedded();
        assert!(catalog.filter(CategoryFilter::All, "zzz-nothing").is_empty());
    }
}

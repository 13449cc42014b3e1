// core/src/models/product.rs

use super::cart::CartItem;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
  pub id: String,
  pub name: String,
  pub description: String,
  pub price: i64,
  pub image: String,
  pub category: String,
  /// Human-readable pack size, e.g. "8 pieces".
  pub pack_size: String,
}

impl Product {
  /// Denormalized line item for adding `quantity` of this product to a cart.
  pub fn to_cart_item(&self, quantity: i64) -> CartItem {
    CartItem::new(self.id.clone(), self.name.clone(), self.price, quantity).with_image(self.image.clone())
  }
}

/// Read-only product list backing the browse pages.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
  products: Vec<Product>,
}

const RELATED_LIMIT: usize = 4;

impl Catalog {
  pub fn new(products: Vec<Product>) -> Self {
    Self { products }
  }

  pub fn all(&self) -> &[Product] {
    &self.products
  }

  pub fn find(&self, id: &str) -> Option<&Product> {
    self.products.iter().find(|p| p.id == id)
  }

  /// Distinct categories in first-seen order.
  pub fn categories(&self) -> Vec<&str> {
    let mut seen: Vec<&str> = Vec::new();
    for product in &self.products {
      if !seen.contains(&product.category.as_str()) {
        seen.push(product.category.as_str());
      }
    }
    seen
  }

  pub fn by_category<'a>(&'a self, category: &'a str) -> impl Iterator<Item = &'a Product> + 'a {
    self.products.iter().filter(move |p| p.category == category)
  }

  /// Up to four other products from the same category.
  pub fn related(&self, id: &str) -> Vec<&Product> {
    let Some(product) = self.find(id) else {
      return Vec::new();
    };
    self
      .products
      .iter()
      .filter(|p| p.id != product.id && p.category == product.category)
      .take(RELATED_LIMIT)
      .collect()
  }

  /// The shop's standing assortment.
  pub fn bakery_default() -> Self {
    let cookie = |id: &str, name: &str, description: &str, image: &str| Product {
      id: id.to_string(),
      name: name.to_string(),
      description: description.to_string(),
      price: 200,
      image: image.to_string(),
      category: "Cat Cookies".to_string(),
      pack_size: "8 pieces".to_string(),
    };
    let gift_box = |id: &str, name: &str, description: &str, price: i64, image: &str, pack_size: &str| Product {
      id: id.to_string(),
      name: name.to_string(),
      description: description.to_string(),
      price,
      image: image.to_string(),
      category: "Gift Boxes".to_string(),
      pack_size: pack_size.to_string(),
    };

    Self::new(vec![
      cookie(
        "1",
        "Orange Tabby Butter Cookies",
        "Classic butter cookies with cocoa spots. Sweet, crumbly and the safest pick.",
        "/image/cat1.png",
      ),
      cookie(
        "2",
        "Tiger Stripe Cocoa Butter Cookies",
        "Cocoa tiger stripes over butter dough with a hint of caramel.",
        "/image/cat2.png",
      ),
      cookie(
        "3",
        "Calico Berry Butter Cookies",
        "Butter cookies swirled with berry and cocoa patches.",
        "/image/cat3.png",
      ),
      cookie(
        "4",
        "Tuxedo Black and White Butter Cookies",
        "Half cocoa, half vanilla butter cookies.",
        "/image/cat4.png",
      ),
      gift_box(
        "5",
        "Cat Cookie Gift Box",
        "An assortment of all four cat cookies in a gift tin.",
        680,
        "/image/cat1.png",
        "8 pieces",
      ),
      gift_box(
        "6",
        "Cat Birthday Party Gift Box",
        "Party-sized box of cat cookies with a birthday card.",
        880,
        "/image/cat3.png",
        "12 pieces",
      ),
    ])
  }
}

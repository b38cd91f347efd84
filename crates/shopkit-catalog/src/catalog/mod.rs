//! Catalog entities.
//!
//! Categories form a parent-pointer tree; products belong to exactly one
//! category. The structs here are plain data - the store assigns ids and
//! timestamps and enforces the relational invariants.

mod category;
mod product;

pub use category::{join_path, Category, CategoryUpdate, NewCategory, PATH_SEPARATOR};
pub use product::{image_upload_path, NewProduct, Product, ProductUpdate};

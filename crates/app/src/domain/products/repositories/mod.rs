//! Product Repositories

mod attributes;
mod categories;
mod products;

pub(crate) use attributes::PgAttributesRepository;
pub(crate) use categories::PgCategoriesRepository;
pub(crate) use products::PgProductsRepository;

mod stats;

pub(crate) use stats::{PgStatsRepository, ProductSales};

mod checkouts;
mod history;

pub(crate) use checkouts::{CheckoutHeader, OrderLine, PendingCheckout, PgCheckoutsRepository};
pub(crate) use history::PgStatusHistoryRepository;

mod statuses;

pub(crate) use statuses::PgStatusesRepository;

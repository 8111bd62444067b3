mod addresses;

pub(crate) use addresses::PgAddressesRepository;

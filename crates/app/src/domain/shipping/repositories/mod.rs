mod shipping_methods;

pub(crate) use shipping_methods::PgShippingMethodsRepository;

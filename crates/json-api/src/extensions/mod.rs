//! Extension traits

mod depot;
mod result;
mod uuid_list;

pub(crate) use depot::DepotExt as _;
pub(crate) use result::ResultExt as _;
pub(crate) use uuid_list::parse_uuid_list;

//! Order Status Data

/// New Order Status Data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrderStatus {
    pub code: String,
    pub title: String,
    pub position: i32,
    pub is_terminal: bool,
}

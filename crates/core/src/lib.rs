//! Order Desk
//!
//! Point-of-sale order building: a cart of line items priced against a promotion catalog,
//! customer details validation, and a small editing/confirming session state machine.

pub mod cart;
pub mod catalog;
pub mod customer;
pub mod discounts;
pub mod order;
pub mod payment;
pub mod prelude;
pub mod prices;
pub mod pricing;
pub mod products;
pub mod promotions;
pub mod session;

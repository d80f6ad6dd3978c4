//! Order Desk prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    cart::{Cart, CartLineItem},
    catalog::{Catalog, CatalogError, ProductCatalog, PromotionCatalog},
    customer::{CustomerField, CustomerInfo, FieldError, FieldErrors},
    discounts::{Discount, DiscountError},
    order::{OrderDraft, PricedLine},
    payment::PaymentMethod,
    prices::{Amount, PriceError, parse_amount, parse_price},
    pricing::{PricingError, cart_total, change_due, discounted_line_price},
    products::{Product, ProductId},
    promotions::{Promotion, PromotionCode},
    session::{Confirmation, OrderSession, Phase, SessionError},
};

pub mod order;
pub mod response;

pub use rust_decimal::Decimal;

pub use order::{
    Buyer, Currency, Env, Goods, GoodsCategory, GoodsType, GoodsUnitAmount, Merchant, Order,
    PersonName, Shipping, ShippingAddress, ShippingAddressType, TerminalType,
};
pub use response::{ApiResponse, CertificateRecord, OrderResult, ResponseStatus};

use bon::Builder;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;
use strum_macros::Display;

/// Request body for `POST /binancepay/openapi/v2/order`.
#[skip_serializing_none]
#[non_exhaustive]
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Builder)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub merchant: Option<Merchant>,
    pub env: Env,
    #[builder(into)]
    pub merchant_trade_no: String,
    /// Serialized as a JSON string to keep full precision.
    pub order_amount: Decimal,
    pub currency: Currency,
    pub goods: Goods,
    pub shipping: Option<Shipping>,
    pub buyer: Option<Buyer>,
    #[builder(into)]
    pub return_url: Option<String>,
    #[builder(into)]
    pub cancel_url: Option<String>,
    /// Unix milliseconds.
    pub order_expire_time: Option<i64>,
    #[builder(into)]
    pub support_pay_currency: Option<String>,
    #[builder(into)]
    pub app_id: Option<String>,
}

#[non_exhaustive]
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Merchant {
    pub sub_merchant_id: String,
}

impl Merchant {
    #[must_use]
    pub fn new(sub_merchant_id: String) -> Self {
        Self { sub_merchant_id }
    }
}

#[skip_serializing_none]
#[non_exhaustive]
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Builder)]
#[serde(rename_all = "camelCase")]
pub struct Env {
    pub terminal_type: TerminalType,
    #[builder(into)]
    pub os_type: Option<String>,
    #[builder(into)]
    pub order_client_ip: Option<String>,
    #[builder(into)]
    pub cookie_id: Option<String>,
}

#[non_exhaustive]
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Display)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum TerminalType {
    App,
    Web,
    Wap,
    MiniProgram,
    Others,
}

#[non_exhaustive]
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Display)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum Currency {
    Busd,
    Usdt,
    Mbox,
}

#[skip_serializing_none]
#[non_exhaustive]
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Builder)]
#[serde(rename_all = "camelCase")]
pub struct Goods {
    pub goods_type: GoodsType,
    pub goods_category: GoodsCategory,
    #[builder(into)]
    pub reference_goods_id: String,
    #[builder(into)]
    pub goods_name: String,
    #[builder(into)]
    pub goods_detail: Option<String>,
    pub goods_unit_amount: Option<GoodsUnitAmount>,
    #[builder(into)]
    pub goods_quantity: Option<String>,
}

#[non_exhaustive]
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Display)]
pub enum GoodsType {
    #[serde(rename = "01")]
    #[strum(serialize = "01")]
    Tangible,
    #[serde(rename = "02")]
    #[strum(serialize = "02")]
    Virtual,
}

#[non_exhaustive]
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Display)]
pub enum GoodsCategory {
    #[serde(rename = "0000")]
    #[strum(serialize = "0000")]
    ElectronicsAndComputers,
    #[serde(rename = "1000")]
    #[strum(serialize = "1000")]
    BooksMusicAndMovies,
    #[serde(rename = "2000")]
    #[strum(serialize = "2000")]
    HomeGardenAndTools,
    #[serde(rename = "3000")]
    #[strum(serialize = "3000")]
    ClothesShoesAndBags,
    #[serde(rename = "4000")]
    #[strum(serialize = "4000")]
    ToysKidsAndBaby,
    #[serde(rename = "5000")]
    #[strum(serialize = "5000")]
    AutomotiveAndAccessories,
    #[serde(rename = "6000")]
    #[strum(serialize = "6000")]
    GameAndRecharge,
    #[serde(rename = "7000")]
    #[strum(serialize = "7000")]
    EntertainmentAndCollection,
    #[serde(rename = "8000")]
    #[strum(serialize = "8000")]
    Jewelry,
    #[serde(rename = "9000")]
    #[strum(serialize = "9000")]
    DomesticService,
    #[serde(rename = "A000")]
    #[strum(serialize = "A000")]
    BeautyCare,
    #[serde(rename = "B000")]
    #[strum(serialize = "B000")]
    Pharmacy,
    #[serde(rename = "C000")]
    #[strum(serialize = "C000")]
    SportsAndOutdoors,
    #[serde(rename = "D000")]
    #[strum(serialize = "D000")]
    FoodGroceryAndHealth,
    #[serde(rename = "E000")]
    #[strum(serialize = "E000")]
    PetSupplies,
    #[serde(rename = "F000")]
    #[strum(serialize = "F000")]
    IndustryAndScience,
    #[serde(rename = "Z000")]
    #[strum(serialize = "Z000")]
    Others,
}

#[non_exhaustive]
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GoodsUnitAmount {
    pub currency: String,
    pub amount: Decimal,
}

impl GoodsUnitAmount {
    #[must_use]
    pub fn new(currency: String, amount: Decimal) -> Self {
        Self { currency, amount }
    }
}

#[skip_serializing_none]
#[non_exhaustive]
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Shipping {
    pub shipping_name: Option<PersonName>,
    pub shipping_address: Option<ShippingAddress>,
    pub shipping_phone_no: Option<String>,
}

#[skip_serializing_none]
#[non_exhaustive]
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PersonName {
    pub first_name: String,
    pub middle_name: Option<String>,
    pub last_name: String,
}

impl PersonName {
    #[must_use]
    pub fn new(first_name: String, last_name: String) -> Self {
        Self {
            first_name,
            middle_name: None,
            last_name,
        }
    }

    #[must_use]
    pub fn with_middle_name(mut self, middle_name: String) -> Self {
        self.middle_name = Some(middle_name);
        self
    }
}

#[skip_serializing_none]
#[non_exhaustive]
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Builder)]
#[serde(rename_all = "camelCase")]
pub struct ShippingAddress {
    #[builder(into)]
    pub region: String,
    #[builder(into)]
    pub state: Option<String>,
    #[builder(into)]
    pub city: Option<String>,
    #[builder(into)]
    pub address: Option<String>,
    #[builder(into)]
    pub zip_code: Option<String>,
    pub shipping_address_type: Option<ShippingAddressType>,
}

#[non_exhaustive]
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Display)]
pub enum ShippingAddressType {
    #[serde(rename = "01")]
    #[strum(serialize = "01")]
    Office,
    #[serde(rename = "02")]
    #[strum(serialize = "02")]
    Home,
    #[serde(rename = "03")]
    #[strum(serialize = "03")]
    Others,
    #[serde(rename = "04")]
    #[strum(serialize = "04")]
    Reserved,
}

#[skip_serializing_none]
#[non_exhaustive]
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Builder)]
#[serde(rename_all = "camelCase")]
pub struct Buyer {
    #[builder(into)]
    pub reference_buyer_id: String,
    pub buyer_name: PersonName,
    #[builder(into)]
    pub buyer_phone_country_code: Option<String>,
    #[builder(into)]
    pub buyer_phone_no: Option<String>,
    #[builder(into)]
    pub buyer_email: Option<String>,
    /// Unix milliseconds.
    pub buyer_registration_time: Option<i64>,
    #[builder(into)]
    pub buyer_browser_language: Option<String>,
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;
    use serde_json::json;

    use super::*;

    fn minimal_order() -> Order {
        Order::builder()
            .env(Env::builder().terminal_type(TerminalType::Web).build())
            .merchant_trade_no("9825382937292")
            .order_amount(dec!(25.17))
            .currency(Currency::Busd)
            .goods(
                Goods::builder()
                    .goods_type(GoodsType::Tangible)
                    .goods_category(GoodsCategory::ElectronicsAndComputers)
                    .reference_goods_id("7876763A3B")
                    .goods_name("Ice Cream")
                    .build(),
            )
            .build()
    }

    #[test]
    fn minimal_order_omits_absent_fields() -> anyhow::Result<()> {
        let value = serde_json::to_value(minimal_order())?;

        assert_eq!(
            value,
            json!({
                "env": {"terminalType": "WEB"},
                "merchantTradeNo": "9825382937292",
                "orderAmount": "25.17",
                "currency": "BUSD",
                "goods": {
                    "goodsType": "01",
                    "goodsCategory": "0000",
                    "referenceGoodsId": "7876763A3B",
                    "goodsName": "Ice Cream"
                }
            })
        );
        Ok(())
    }

    #[test]
    fn full_order_uses_camel_case_and_codes() -> anyhow::Result<()> {
        let order = Order {
            merchant: Some(Merchant::new("98765987".to_owned())),
            shipping: Some(Shipping {
                shipping_name: Some(
                    PersonName::new("Satoshi".to_owned(), "Nakamoto".to_owned())
                        .with_middle_name("B".to_owned()),
                ),
                shipping_address: Some(
                    ShippingAddress::builder()
                        .region("SG")
                        .zip_code("018956")
                        .shipping_address_type(ShippingAddressType::Home)
                        .build(),
                ),
                shipping_phone_no: None,
            }),
            buyer: Some(
                Buyer::builder()
                    .reference_buyer_id("buyer-1")
                    .buyer_name(PersonName::new("Ada".to_owned(), "Lovelace".to_owned()))
                    .buyer_registration_time(1_600_000_000_000)
                    .build(),
            ),
            order_expire_time: Some(1_700_000_600_000),
            ..minimal_order()
        };

        let value = serde_json::to_value(&order)?;

        assert_eq!(value["merchant"], json!({"subMerchantId": "98765987"}));
        assert_eq!(
            value["shipping"],
            json!({
                "shippingName": {"firstName": "Satoshi", "middleName": "B", "lastName": "Nakamoto"},
                "shippingAddress": {"region": "SG", "zipCode": "018956", "shippingAddressType": "02"}
            })
        );
        assert_eq!(value["buyer"]["buyerRegistrationTime"], 1_600_000_000_000_i64);
        assert_eq!(value["orderExpireTime"], 1_700_000_600_000_i64);

        let back: Order = serde_json::from_value(value)?;
        assert_eq!(back, order);
        Ok(())
    }

    #[test]
    fn enum_display_matches_wire_codes() {
        assert_eq!(TerminalType::MiniProgram.to_string(), "MINI_PROGRAM");
        assert_eq!(Currency::Usdt.to_string(), "USDT");
        assert_eq!(GoodsType::Virtual.to_string(), "02");
        assert_eq!(GoodsCategory::BeautyCare.to_string(), "A000");
        assert_eq!(ShippingAddressType::Office.to_string(), "01");
    }
}

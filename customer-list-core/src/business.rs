use serde::{Deserialize, Serialize};

/// A customer business as returned by the customers endpoint
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(default)]
pub struct Business {
    pub business_name: String,
    pub city: String,
    pub province: String,
    pub country: String,
    pub phone: Option<String>,
    pub catalog: Option<Vec<String>>,
    pub customer_info: CustomerInfo,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(default)]
pub struct CustomerInfo {
    // Some payloads spell it `last_deliver_date`
    #[serde(alias = "last_deliver_date")]
    pub last_delivery_date: Option<String>,
    pub orders_this_month: Option<u32>,
    pub buyer_average_order: Option<f64>,
    pub sales_this_month: Option<f64>,
    pub sales_total: Option<f64>,
}

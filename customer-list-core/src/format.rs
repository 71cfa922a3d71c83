use time::macros::format_description;

use crate::business::Business;

const NOT_AVAILABLE: &str = "N/A";

/// Line shown for a business in the list view
pub fn summary_line(business: &Business) -> String {
    format!(
        "{} ({}, {})",
        business.business_name, business.city, business.province
    )
}

pub fn format_location(business: &Business) -> String {
    format!("{}, {}", business.city, business.province)
}

pub fn format_phone(business: &Business) -> String {
    match business.phone.as_deref() {
        Some(phone) if !phone.is_empty() => phone.to_string(),
        _ => NOT_AVAILABLE.to_string(),
    }
}

/// Render the last delivery date as e.g. `Thu Apr 12 2018`.
///
/// Only the leading `YYYY-MM-DD` part is read, so both plain dates and
/// RFC 3339 timestamps work. Anything else shows as `N/A`.
pub fn format_last_delivery(business: &Business) -> String {
    let Some(raw) = business.customer_info.last_delivery_date.as_deref() else {
        return NOT_AVAILABLE.to_string();
    };
    let Some(date_part) = raw.get(..10) else {
        return NOT_AVAILABLE.to_string();
    };

    time::Date::parse(date_part, format_description!("[year]-[month]-[day]"))
        .ok()
        .and_then(|date| {
            date.format(format_description!(
                "[weekday repr:short] [month repr:short] [day] [year]"
            ))
            .ok()
        })
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

pub fn format_average_order(business: &Business) -> String {
    match business.customer_info.buyer_average_order {
        Some(average) => format!("${:.2}", average),
        None => "$0.00".to_string(),
    }
}

fn format_dollars(amount: Option<f64>) -> Option<String> {
    amount
        .filter(|amount| *amount != 0.0)
        .map(|amount| format!("${:.2}", amount))
}

pub fn format_sales_this_month(business: &Business) -> String {
    format_dollars(business.customer_info.sales_this_month).unwrap_or_else(|| "$0.00".to_string())
}

/// Total sales, or this month's sales when no total is recorded
pub fn format_total_sales(business: &Business) -> String {
    let info = &business.customer_info;
    format_dollars(info.sales_total)
        .or_else(|| format_dollars(info.sales_this_month))
        .unwrap_or_else(|| "$0.00".to_string())
}

pub fn format_orders_this_month(business: &Business) -> String {
    business
        .customer_info
        .orders_this_month
        .unwrap_or(0)
        .to_string()
}

pub fn format_catalog(business: &Business) -> String {
    match business.catalog.as_deref() {
        Some(options) if !options.is_empty() => options.join(", "),
        _ => "Select a Catalog".to_string(),
    }
}

/// Month used for the "orders this month" label
pub fn current_month() -> time::Month {
    time::OffsetDateTime::now_utc().month()
}

/// Full popup text for a business
pub fn format_detail(business: &Business, month: time::Month) -> String {
    [
        business.business_name.clone(),
        format!("  Location:        {}", format_location(business)),
        format!("  Phone:           {}", format_phone(business)),
        format!("  Product Catalog: {}", format_catalog(business)),
        format!("  Last Delivery:   {}", format_last_delivery(business)),
        format!("  Average Order:   {}", format_average_order(business)),
        format!(
            "  {} Orders: {}",
            month,
            format_orders_this_month(business)
        ),
        format!("  {} Sales:  {}", month, format_sales_this_month(business)),
        format!("  Total Sales:     {}", format_total_sales(business)),
    ]
    .join("\n")
}

use std::fmt;

use chrono::{Local, TimeZone};

use crate::domain::TickerSnapshot;

/// Field order of the rendered ticker table.
pub const FIELD_ORDER: [&str; 15] = [
    "id",
    "name",
    "symbol",
    "rank",
    "price_usd",
    "price_btc",
    "24h_volume_usd",
    "market_cap_usd",
    "available_supply",
    "total_supply",
    "max_supply",
    "percent_change_1h",
    "percent_change_24h",
    "percent_change_7d",
    "last_updated",
];

/// One coin's share of the email: a plain-text body and its HTML alternative.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub text: String,
    pub html: String,
}

pub fn format_timestamp<Tz>(epoch: i64, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    match tz.timestamp_opt(epoch, 0).single() {
        Some(dt) => dt.format("%c").to_string(),
        None => epoch.to_string(),
    }
}

/// `(field, value)` pairs in `FIELD_ORDER`, with `last_updated` shown in `tz`.
pub fn snapshot_rows<Tz>(snapshot: &TickerSnapshot, tz: &Tz) -> Vec<(&'static str, String)>
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    // Numbers show as the upstream sent them, falling back to the parsed value.
    let shown = |field: &str, parsed: &dyn fmt::Display| {
        snapshot
            .raw(field)
            .map(str::to_string)
            .unwrap_or_else(|| parsed.to_string())
    };
    let max_supply = match &snapshot.max_supply {
        Some(v) => shown("max_supply", v),
        None => "n/a".to_string(),
    };

    let values = [
        snapshot.id.clone(),
        snapshot.name.clone(),
        snapshot.symbol.clone(),
        shown("rank", &snapshot.rank),
        shown("price_usd", &snapshot.price_usd),
        shown("price_btc", &snapshot.price_btc),
        shown("24h_volume_usd", &snapshot.volume_usd_24h),
        shown("market_cap_usd", &snapshot.market_cap_usd),
        shown("available_supply", &snapshot.available_supply),
        shown("total_supply", &snapshot.total_supply),
        max_supply,
        shown("percent_change_1h", &snapshot.percent_change_1h),
        shown("percent_change_24h", &snapshot.percent_change_24h),
        shown("percent_change_7d", &snapshot.percent_change_7d),
        format_timestamp(snapshot.last_updated, tz),
    ];

    FIELD_ORDER.into_iter().zip(values).collect()
}

pub fn render_section(snapshot: &TickerSnapshot) -> Section {
    render_section_in(snapshot, &Local)
}

pub fn render_section_in<Tz>(snapshot: &TickerSnapshot, tz: &Tz) -> Section
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    let rows = snapshot_rows(snapshot, tz);

    let mut text = format!("{} ({})\n", snapshot.symbol, snapshot.id);
    let mut table = String::from("<table>\n");
    for (key, value) in &rows {
        text.push_str(&format!("{key}: {value}\n"));
        table.push_str(&format!(
            "            <tr>\n                <th> {} </th>\n                <td> {} </td>\n            </tr>\n",
            key,
            escape_html(value)
        ));
    }
    table.push_str("        </table>");

    let html = format!(
        "<html>\n    <head></head>\n    <body>\n        {table}\n    </body>\n</html>\n"
    );

    Section { text, html }
}

fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

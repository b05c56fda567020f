//! HTML rendering.
//!
//! `render_page` is a pure function of a [`BoardView`]. The whole page is
//! rebuilt on every request.

use std::fmt::Write;

use crate::engine::{BoardView, Notice};
use crate::types::StakeRow;

pub fn render_page(view: &BoardView) -> String {
    let mut html = String::with_capacity(8 * 1024);

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    html.push_str("<title>Stakeboard</title>\n");
    if view.prefs.auto_refresh_enabled {
        let _ = writeln!(
            html,
            "<meta http-equiv=\"refresh\" content=\"{}\">",
            view.prefs.effective_secs()
        );
    }
    html.push_str(STYLE);
    html.push_str("</head>\n<body>\n<h1>Stakeboard</h1>\n");

    if let Some(notice) = &view.notice {
        html.push_str(&render_notice(notice));
    }

    html.push_str(&render_settings(view));
    html.push_str(&render_filters(view));

    let updated = view
        .model
        .as_ref()
        .map(|m| m.updated_at.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| "never".to_string());
    let _ = writeln!(
        html,
        "<div class=\"toolbar\"><form method=\"post\" action=\"/refresh\">\
         <button type=\"submit\">Refresh</button></form>\
         <span id=\"last-updated\">Last updated: {}</span></div>",
        escape(&updated)
    );

    html.push_str(&render_table(view));
    html.push_str("</body>\n</html>\n");
    html
}

fn render_notice(notice: &Notice) -> String {
    match notice {
        Notice::Error(msg) => format!(
            "<div class=\"notice error\" role=\"alert\">{}</div>\n",
            escape(msg)
        ),
        Notice::Info(msg) => format!(
            "<div class=\"notice info\" role=\"status\">{}</div>\n",
            escape(msg)
        ),
    }
}

fn render_settings(view: &BoardView) -> String {
    let (kelly, min, max, limit) = match &view.model {
        Some(m) => (
            format_number(m.settings.kelly_pct()),
            format_number(m.settings.stake_min),
            format_number(m.settings.stake_max),
            m.settings.page_limit.to_string(),
        ),
        None => Default::default(),
    };
    let checked = if view.prefs.auto_refresh_enabled { " checked" } else { "" };

    format!(
        "<form id=\"settings\" method=\"post\" action=\"/settings\">\n\
         <label>Kelly %<input name=\"kelly_pct\" type=\"number\" step=\"any\" value=\"{kelly}\"></label>\n\
         <label>Min stake<input name=\"stake_min\" type=\"number\" step=\"0.01\" value=\"{min}\"></label>\n\
         <label>Max stake<input name=\"stake_max\" type=\"number\" step=\"0.01\" value=\"{max}\"></label>\n\
         <label>Page limit<input name=\"page_limit\" type=\"number\" step=\"1\" value=\"{limit}\"></label>\n\
         <label><input name=\"auto_refresh\" type=\"checkbox\"{checked}> Auto-refresh</label>\n\
         <label>every<input name=\"auto_refresh_secs\" type=\"number\" min=\"5\" step=\"1\" value=\"{secs}\"> s</label>\n\
         <button type=\"submit\">Save</button>\n\
         </form>\n",
        kelly = escape(&kelly),
        min = escape(&min),
        max = escape(&max),
        limit = escape(&limit),
        secs = view.prefs.auto_refresh_secs,
    )
}

fn render_filters(view: &BoardView) -> String {
    let filter = &view.filter;
    let opt_num = |v: Option<f64>| v.map(format_number).unwrap_or_default();

    format!(
        "<form id=\"filters\" method=\"post\" action=\"/filters\">\n\
         <label>Sport{sport}</label>\n\
         <label>Bookmaker{bookmaker}</label>\n\
         <label>Starts within<input name=\"hours_before\" type=\"number\" min=\"0\" step=\"1\" value=\"{hours}\"> h</label>\n\
         <label>Edge %<input name=\"edge_min\" type=\"number\" step=\"any\" value=\"{edge_min}\"></label>\n\
         <label>to<input name=\"edge_max\" type=\"number\" step=\"any\" value=\"{edge_max}\"></label>\n\
         <button type=\"submit\">Filter</button>\n\
         </form>\n",
        sport = render_select("sport", "Any sport", &view.choices.sports, filter.sport.as_deref()),
        bookmaker = render_select(
            "bookmaker",
            "Any bookmaker",
            &view.choices.bookmakers,
            filter.bookmaker.as_deref()
        ),
        hours = filter.hours_before.map(|h| h.to_string()).unwrap_or_default(),
        edge_min = opt_num(filter.edge_min),
        edge_max = opt_num(filter.edge_max),
    )
}

/// A select with a blank "any" option. A selected value missing from the
/// choices is still offered so the current filter stays visible.
fn render_select(name: &str, any: &str, choices: &[String], selected: Option<&str>) -> String {
    let mut html = format!("<select name=\"{name}\"><option value=\"\">{any}</option>");
    let mut options: Vec<&str> = choices.iter().map(String::as_str).collect();
    if let Some(current) = selected {
        if !options.contains(&current) {
            options.push(current);
        }
    }
    for option in options {
        let mark = if Some(option) == selected { " selected" } else { "" };
        let value = escape(option);
        let _ = write!(html, "<option value=\"{value}\"{mark}>{value}</option>");
    }
    html.push_str("</select>");
    html
}

fn render_table(view: &BoardView) -> String {
    let mut html = String::from(
        "<table id=\"bets\">\n<thead><tr><th>Event</th><th>Bookmaker</th><th>Market</th>\
         <th>Selection</th><th>Odds</th><th>Edge</th><th>Stake</th></tr></thead>\n<tbody>\n",
    );

    match &view.model {
        Some(model) if !model.rows.is_empty() => {
            for row in &model.rows {
                let busy = view.in_flight.contains(&row.bet.id);
                html.push_str(&render_row(row, busy));
            }
        }
        Some(_) => html.push_str("<tr><td colspan=\"7\">No bets listed.</td></tr>\n"),
        None => html.push_str("<tr><td colspan=\"7\">No data loaded yet.</td></tr>\n"),
    }

    html.push_str("</tbody>\n</table>\n");
    html
}

fn render_row(row: &StakeRow, busy: bool) -> String {
    let bet = &row.bet;
    let id = bet.id.to_string();
    let mut event = escape(&bet.event);
    if let Some(sport) = &bet.sport {
        let _ = write!(event, " <small>{}</small>", escape(sport));
    }
    if let Some(start) = &bet.start_time {
        let _ = write!(event, " <small>{}</small>", escape(start));
    }
    let disabled = if busy { " disabled" } else { "" };

    format!(
        "<tr data-bet-id=\"{id_attr}\"><td>{event}</td><td>{bookmaker}</td><td>{market}</td>\
         <td>{selection}</td><td>{odds:.2}</td><td>{edge:.1}%</td>\
         <td><form method=\"post\" action=\"/register/{kind}/{id_path}\">\
         <input name=\"stake\" type=\"number\" min=\"0\" step=\"0.01\" value=\"{stake:.2}\">\
         <button type=\"submit\"{disabled}>Register</button></form></td></tr>\n",
        id_attr = escape(&id),
        kind = bet.id.kind(),
        id_path = urlencoding::encode(&id),
        bookmaker = escape(&bet.bookmaker),
        market = escape(&bet.market),
        selection = escape(&bet.selection),
        odds = bet.odds,
        edge = bet.edge * 100.0,
        stake = row.suggested_stake,
    )
}

/// Up to four decimals with trailing zeros trimmed, so float noise such as
/// `7.000000000000001` never lands in a form field.
pub fn format_number(value: f64) -> String {
    let fixed = format!("{value:.4}");
    let trimmed = fixed.trim_end_matches('0').trim_end_matches('.');
    if trimmed == "-0" {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Escape text for HTML element content and quoted attributes.
pub fn escape(raw: &str) -> String {
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

const STYLE: &str = "<style>\n\
body{font-family:sans-serif;margin:1.5rem}\n\
table{border-collapse:collapse;width:100%}\n\
th,td{border-bottom:1px solid #ddd;padding:.3rem .5rem;text-align:left}\n\
.notice{padding:.6rem;margin:.6rem 0}\n\
.error{background:#fdd}\n\
.info{background:#def}\n\
#settings label{margin-right:.8rem}\n\
.toolbar{margin:.8rem 0}\n\
</style>\n";

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

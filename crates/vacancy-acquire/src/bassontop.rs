use crate::fetch::Fetch;
use crate::output;
use crate::types::{AcquiredCalendar, DayAvailability, SourceInfo};
use anyhow::{Context, Result};
use regex::Regex;
use scraper::{ElementRef, Html, Node, Selector};
use std::ops::Deref;
use std::sync::OnceLock;
use vacancy_model::{aggregate, extract_rooms, extract_time_labels, reconstruct, RawCell, RawRow};

pub const BASE_URL: &str = "http://bassontop.tokyo.jp/a-cappella/yoyaku/takadanobaba/";

/// Acquire the availability calendar from the Bass On Top a-cappella
/// reservation pages.
///
/// Fetches the index page, follows the sidebar calendar frame, iterates the
/// linked days sequentially (the fetcher's rate limiter governs pacing), and
/// writes the aggregated calendar to `output_dir`. A day that fails to fetch
/// or parse is logged and skipped; the remaining days continue.
pub async fn acquire(fetcher: &dyn Fetch, base_url: &str, output_dir: &str) -> Result<()> {
    let calendar = collect_calendar(fetcher, base_url).await?;
    output::write_calendar(&calendar, output_dir)?;
    Ok(())
}

/// Fetch and parse every discoverable day, without touching the filesystem.
pub async fn collect_calendar(fetcher: &dyn Fetch, base_url: &str) -> Result<AcquiredCalendar> {
    // Day and frame links are joined by concatenation, so a missing slash
    // would mangle every URL on the site.
    anyhow::ensure!(
        base_url.ends_with('/'),
        "base URL must end with '/': {base_url}"
    );

    tracing::info!(url = %base_url, "Fetching reservation index");
    let index_html = fetcher.fetch(base_url).await?;
    let calendar_src =
        find_calendar_frame(&index_html).context("Could not find the sidebar calendar frame")?;

    // Day links are relative to the reservation index.
    let calendar_url = format!("{base_url}{calendar_src}");
    let calendar_html = fetcher.fetch(&calendar_url).await?;
    let day_links = extract_day_links(&calendar_html);
    tracing::info!(days = day_links.len(), "Discovered day links");

    let mut days = Vec::new();
    for (idx, link) in day_links.iter().enumerate() {
        let Some(date) = extract_date(link) else {
            tracing::warn!(link = %link, "Day link carries no date, skipping");
            continue;
        };
        match acquire_day(fetcher, base_url, link, &date).await {
            Ok(day) => {
                tracing::info!(date = %date, "{}/{} done", idx + 1, day_links.len());
                days.push(day);
            }
            Err(err) => {
                tracing::warn!(date = %date, error = %err, "Skipping day");
            }
        }
    }

    Ok(AcquiredCalendar {
        source: SourceInfo {
            url: base_url.to_string(),
            site: "bassontop.tokyo.jp".to_string(),
            fetched_at: chrono::Utc::now().to_rfc3339(),
        },
        days,
    })
}

/// Fetch one day's reservation table and reduce it to per-room timelines.
async fn acquire_day(
    fetcher: &dyn Fetch,
    base_url: &str,
    link: &str,
    date: &str,
) -> Result<DayAvailability> {
    let html = fetcher.fetch(&format!("{base_url}{link}")).await?;
    parse_day_page(&html, date)
}

/// Parse a day page's reservation table into a [`DayAvailability`].
///
/// Table layout on this site: row 0 is the header; each following row is one
/// time slot, its `<th>` holding the slot label and its `<td>` cells the
/// per-room status (rowspan = length of a continuous reservation); the last
/// data row repeats the room names.
fn parse_day_page(html: &str, date: &str) -> Result<DayAvailability> {
    let (raw_rows, header_texts) = parse_table(html);
    anyhow::ensure!(!raw_rows.is_empty(), "day page has no table rows");

    let time_labels = extract_time_labels(&header_texts);
    let rooms = extract_rooms(raw_rows.last().context("day page has no table rows")?);

    // Data rows start after the header; any trailing room-label row is
    // outside the time-slot range and ignored by the reconstruction.
    let data_rows: Vec<RawRow> = raw_rows
        .iter()
        .skip(1)
        .take(time_labels.len())
        .cloned()
        .collect();

    let grid = reconstruct(&data_rows, time_labels.len())
        .with_context(|| format!("reconstructing grid for {date}"))?;
    let schedules = aggregate(&grid, &rooms, &time_labels)
        .with_context(|| format!("aggregating schedules for {date}"))?;

    tracing::debug!(
        date = %date,
        rooms = schedules.len(),
        slots = time_labels.len(),
        "Parsed day table"
    );

    Ok(DayAvailability {
        date: date.to_string(),
        rooms: schedules,
    })
}

/// Collect every `<tr>`'s `<td>` cells (text + rowspan) and every `<th>` text.
fn parse_table(html: &str) -> (Vec<RawRow>, Vec<String>) {
    let document = Html::parse_document(html);
    let tr_sel = Selector::parse("tr").expect("valid selector");
    let td_sel = Selector::parse("td").expect("valid selector");
    let th_sel = Selector::parse("th").expect("valid selector");

    let rows = document
        .select(&tr_sel)
        .map(|tr| tr.select(&td_sel).map(raw_cell).collect())
        .collect();

    let headers = document.select(&th_sel).map(|th| cell_text(th)).collect();

    (rows, headers)
}

fn raw_cell(td: ElementRef) -> RawCell {
    let span = td
        .value()
        .attr("rowspan")
        .unwrap_or("1")
        .parse::<u32>()
        .unwrap_or(1);
    RawCell::new(cell_text(td), span)
}

/// Collect a cell's text, with `<br>` rendered as a line break so adjacent
/// text runs stay separate.
fn cell_text(element: ElementRef) -> String {
    let mut text = String::new();
    for node in element.descendants() {
        match node.value() {
            Node::Text(t) => text.push_str(t.deref()),
            Node::Element(elem) if elem.name() == "br" => text.push('\n'),
            _ => {}
        }
    }
    text.trim().to_string()
}

/// Find the sidebar calendar frame's `src` on the reservation index page.
fn find_calendar_frame(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    let frame_sel = Selector::parse(r#"frame[name="calendar"]"#).expect("valid selector");
    document
        .select(&frame_sel)
        .next()
        .and_then(|frame| frame.value().attr("src"))
        .map(|src| src.to_string())
}

/// Collect every day link (`<a>` inside a calendar `<td>`), in page order.
fn extract_day_links(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);
    let link_sel = Selector::parse("td a").expect("valid selector");
    document
        .select(&link_sel)
        .filter_map(|a| a.value().attr("href"))
        .map(|href| href.to_string())
        .collect()
}

/// Pull the "YYYY/M/D" date string out of a day link.
fn extract_date(link: &str) -> Option<String> {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    let pattern = PATTERN
        .get_or_init(|| Regex::new(r"[0-9]{4}/[0-9]{1,2}/[0-9]{1,2}").expect("valid regex"));
    pattern.find(link).map(|m| m.as_str().to_string())
}

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::{
    config::Config,
    error,
    format::{Renderer, date_str, post_path},
    graph::{
        client::{ConnectionQuery, GraphClient},
        pager::{self, ItemFilter, PageWalker},
    },
    types::Item,
};

use super::spinner;

/// Listing parameters shared by every connection command: the global page
/// limit and the configured renderer.
#[derive(Clone, Copy)]
pub struct PageOptions {
    pub pages: i64,
    pub renderer: Renderer,
}

/// Walks one of `me`'s connections and renders every accepted item,
/// printing `separator` between consecutive items. Any remote error aborts
/// the command; items already printed stay printed.
async fn page_items<F>(
    config: &Config,
    connection: &str,
    params: Vec<(String, String)>,
    opts: &PageOptions,
    separator: Option<&str>,
    filter: Option<ItemFilter>,
    mut render: F,
) where
    F: FnMut(&Item, &Renderer),
{
    let client = match GraphClient::new(config) {
        Ok(c) => c,
        Err(e) => error!("{}", e),
    };

    let source = ConnectionQuery::new(&client, "me", connection, params);
    let mut walker = PageWalker::new(source, opts.pages);
    if let Some(filter) = filter {
        walker = walker.with_filter(filter);
    }

    let fmt = opts.renderer;
    let result = pager::emit_all(&mut walker, separator, |sep, item| {
        if let Some(sep) = sep {
            fmt.write(sep);
        }
        render(item, &fmt);
    })
    .await;

    if let Err(e) = result {
        error!("{}", e);
    }
}

fn str_field<'a>(item: &'a Item, key: &str) -> Option<&'a str> {
    item.get(key).and_then(|v| v.as_str())
}

fn nested_str<'a>(item: &'a Item, outer: &str, inner: &str) -> Option<&'a str> {
    item.get(outer)?.get(inner)?.as_str()
}

/// Pages the user has liked.
pub async fn likes(config: &Config, opts: &PageOptions) {
    page_items(config, "likes", Vec::new(), opts, Some(""), None, |item, fmt| {
        if let Some(name) = str_field(item, "name") {
            fmt.write(name);
        }
        if let Some(id) = str_field(item, "id") {
            fmt.write(&fmt.link(id));
        }
    })
    .await;
}

/// Taggable friends. Graph no longer exposes the full friends list, so
/// this is the closest connection still available.
pub async fn friends(config: &Config, opts: &PageOptions) {
    page_items(config, "taggable_friends", Vec::new(), opts, None, None, |item, fmt| {
        if let Some(name) = str_field(item, "name") {
            fmt.write(name);
        }
    })
    .await;
}

/// Posts on the user's profile.
pub async fn feed(config: &Config, opts: &PageOptions) {
    page_items(config, "feed", Vec::new(), opts, Some("- - -"), None, |item, fmt| {
        if let Some(message) = fmt.visible_field(item, "message") {
            fmt.write(message);
        }
        if let Some(id) = str_field(item, "id") {
            fmt.write(&fmt.link(&post_path(id)));
        }
        if let Some(created) = item.get("created_time") {
            fmt.write(&format!("Created: {}", date_str(created)));
        }
    })
    .await;
}

/// Photos the user uploaded, or (with `tagged`) is tagged in.
pub async fn photos(config: &Config, opts: &PageOptions, tagged: bool) {
    let params = if tagged {
        Vec::new()
    } else {
        vec![("type".to_string(), "uploaded".to_string())]
    };

    page_items(config, "photos", params, opts, Some("- - -"), None, |item, fmt| {
        if let Some(name) = fmt.visible_field(item, "name") {
            fmt.write(name);
            fmt.write("");
        }
        if let Some(id) = str_field(item, "id") {
            fmt.write(&fmt.link(id));
        }
        if let Some(created) = item.get("created_time") {
            fmt.write(&format!("Created: {}", date_str(created)));
        }
    })
    .await;
}

/// Videos the user uploaded, or (with `tagged`) is tagged in.
pub async fn videos(config: &Config, opts: &PageOptions, tagged: bool) {
    let params = if tagged {
        Vec::new()
    } else {
        vec![("type".to_string(), "uploaded".to_string())]
    };

    page_items(config, "videos", params, opts, Some("- - -"), None, |item, fmt| {
        if let Some(description) = fmt.visible_field(item, "description") {
            fmt.write(description);
            fmt.write("");
        }
        if let Some(id) = str_field(item, "id") {
            fmt.write(&fmt.link(id));
        }
        if let Some(updated) = item.get("updated_time") {
            fmt.write(&format!("Updated: {}", date_str(updated)));
        }
    })
    .await;
}

fn start_time(item: &Item) -> Option<DateTime<Utc>> {
    crate::format::parse_graph_time(item.get("start_time")?)
}

/// Events the user responded to, split into upcoming and past by their
/// start time. Events whose start time cannot be parsed are skipped.
pub async fn events(config: &Config, opts: &PageOptions, past: bool) {
    let now = Utc::now();
    let filter: ItemFilter = Box::new(move |item| match start_time(item) {
        Some(starts) => {
            if past {
                starts >= now
            } else {
                starts <= now
            }
        }
        None => true,
    });

    page_items(
        config,
        "events",
        Vec::new(),
        opts,
        Some("- - -"),
        Some(filter),
        render_event,
    )
    .await;
}

fn render_event(item: &Item, fmt: &Renderer) {
    let id = str_field(item, "id").unwrap_or_default();

    fmt.write(&format!(
        "{} ({})",
        str_field(item, "name").unwrap_or_default(),
        id
    ));
    fmt.write("");
    if let Some(place) = nested_str(item, "place", "name") {
        fmt.write(&format!("Location: {}", place));
    }
    if let Some(starts) = item.get("start_time") {
        fmt.write(&format!("Date: {}", date_str(starts)));
    }
    if let Some(hours) = duration_hours(item) {
        fmt.write(&format!("Duration: {} hours", hours));
    }
    if let Some(rsvp) = str_field(item, "rsvp_status") {
        fmt.write(&format!("RSVP: {}", rsvp.replace("unsure", "maybe")));
    }
    fmt.write("");
    fmt.write(&fmt.link(&format!("events/{}", id)));
}

fn duration_hours(item: &Item) -> Option<f64> {
    let starts = start_time(item)?;
    let ends = crate::format::parse_graph_time(item.get("end_time")?)?;
    Some((ends - starts).num_seconds() as f64 / 3600.0)
}

/// Detail view for one or more events, `- - -` between entries.
pub async fn event_details(config: &Config, ids: &[String], fmt: &Renderer) {
    let client = match GraphClient::new(config) {
        Ok(c) => c,
        Err(e) => error!("{}", e),
    };

    const FIELDS: &str = "name,description,place,owner,start_time,end_time,\
                          attending_count,declined_count,maybe_count,is_canceled";

    for (index, id) in ids.iter().enumerate() {
        let pb = spinner(format!("Fetching event {}...", id));
        let item = match client.get_object(id, Some(FIELDS)).await {
            Ok(item) => {
                pb.finish_and_clear();
                item
            }
            Err(e) => {
                pb.finish_and_clear();
                error!("{}", e);
            }
        };

        render_event_details(&item, fmt);
        if index != ids.len() - 1 {
            fmt.write("- - -");
        }
    }
}

fn render_event_details(item: &Item, fmt: &Renderer) {
    let id = str_field(item, "id").unwrap_or_default();
    let canceled = item
        .get("is_canceled")
        .and_then(Value::as_bool)
        .unwrap_or(false);

    fmt.write(&format!(
        "{} ({})",
        str_field(item, "name").unwrap_or_default(),
        id
    ));
    fmt.write("");
    if let Some(place) = nested_str(item, "place", "name") {
        fmt.write(&format!("Location: {}", place));
    }
    if let Some(starts) = item.get("start_time") {
        let canceled_mark = if canceled { " [CANCELED]" } else { "" };
        fmt.write(&format!("Date: {}{}", date_str(starts), canceled_mark));
    }
    if let Some(hours) = duration_hours(item) {
        fmt.write(&format!("Duration: {} hours", hours));
    }
    if let Some(owner) = nested_str(item, "owner", "name") {
        fmt.write(&format!("Created by: {}", owner));
    }
    fmt.write("");
    for (label, key) in [
        ("Attending", "attending_count"),
        ("Maybe", "maybe_count"),
        ("Declined", "declined_count"),
    ] {
        if let Some(count) = item.get(key).and_then(Value::as_i64) {
            fmt.write(&format!("{}: {}", label, count));
        }
    }
    fmt.write("");
    fmt.write(&fmt.link(&format!("events/{}", id)));

    if let Some(description) = fmt.visible_field(item, "description") {
        fmt.write("");
        fmt.write(description);
    }
}

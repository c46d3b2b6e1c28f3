//! Episode list grouped by show, optionally inside an infinite-scroll viewport.

use chrono::{DateTime, Utc};
use handlebars::Handlebars;
use serde::{Deserialize, Serialize};
use tvtrack_core::initials::initials;
use tvtrack_core::models::Episode;

use super::format::{absolute_date, absolute_time, relative_time};
use crate::error::{AppError, AppResult};

const LIST_TEMPLATE: &str = include_str!("templates/episode_list.hbs");
const PAGE_TEMPLATE: &str = include_str!("templates/page.hbs");

/// Viewport width class.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Breakpoint {
    Xs,
    Sm,
    #[default]
    Md,
    Lg,
    Xl,
}

impl Breakpoint {
    pub fn is_small(self) -> bool {
        self == Breakpoint::Xs
    }

    /// Row height the scroll container reserves per element.
    fn element_height(self) -> &'static str {
        if self.is_small() { "118.5" } else { "65.5" }
    }
}

/// Input to [`EpisodeListView::render_list`].
#[derive(Debug, Clone)]
pub struct EpisodeListProps {
    pub episodes: Vec<Episode>,
    pub disable_infinite: bool,
    pub width: Breakpoint,
    /// Reference point for relative times.
    pub now: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
struct AirstampView {
    iso: String,
    relative: String,
    date: String,
    time: String,
}

#[derive(Debug, Serialize)]
struct RowView {
    key: String,
    divider: bool,
    compact: bool,
    image: Option<String>,
    initials: String,
    show_name: String,
    show_url: String,
    episode_url: String,
    episode_number: String,
    episode_name: String,
    airstamp: Option<AirstampView>,
    favorite_show_id: Option<String>,
}

#[derive(Debug, Serialize)]
struct ListView {
    infinite: bool,
    element_height: &'static str,
    rows: Vec<RowView>,
}

impl ListView {
    fn from_props(props: &EpisodeListProps) -> Self {
        let last = props.episodes.len().saturating_sub(1);
        let rows = props
            .episodes
            .iter()
            .enumerate()
            .filter_map(|(i, episode)| row(episode, i == last, props))
            .collect();
        Self {
            infinite: !props.disable_infinite,
            element_height: props.width.element_height(),
            rows,
        }
    }
}

/// One rendered row; episodes without a show render nothing.
fn row(episode: &Episode, is_last: bool, props: &EpisodeListProps) -> Option<RowView> {
    let show = episode.show.as_ref()?;
    let airstamp = episode.airstamp;
    Some(RowView {
        key: format!(
            "{}-{}",
            episode.id,
            airstamp.map(|at| at.timestamp_millis().to_string()).unwrap_or_default()
        ),
        divider: !is_last,
        compact: props.width.is_small(),
        image: show.medium_image().map(str::to_string),
        initials: initials(&show.name),
        show_name: show.name.clone(),
        show_url: format!("/shows/{}", show.id),
        episode_url: format!("/shows/{}/episodes/{}", show.id, episode.id),
        episode_number: episode.number_label(),
        episode_name: episode.name.clone(),
        airstamp: airstamp.map(|at| AirstampView {
            iso: at.to_rfc3339(),
            relative: relative_time(at, props.now),
            date: absolute_date(at),
            time: absolute_time(at),
        }),
        favorite_show_id: show.has_id().then(|| show.id.clone()),
    })
}

#[derive(Serialize)]
struct PageView<'a> {
    title: &'a str,
    list: &'a str,
}

/// Compiled templates, built once and shared.
#[derive(Debug, Clone)]
pub struct EpisodeListView {
    handlebars: Handlebars<'static>,
}

impl EpisodeListView {
    pub fn new() -> AppResult<Self> {
        let mut handlebars = Handlebars::new();
        handlebars
            .register_template_string("episode_list", LIST_TEMPLATE)
            .map_err(|e| AppError::Internal(format!("episode_list template: {e}")))?;
        handlebars
            .register_template_string("page", PAGE_TEMPLATE)
            .map_err(|e| AppError::Internal(format!("page template: {e}")))?;
        Ok(Self { handlebars })
    }

    /// Render the list fragment.
    pub fn render_list(&self, props: &EpisodeListProps) -> AppResult<String> {
        self.handlebars
            .render("episode_list", &ListView::from_props(props))
            .map_err(|e| AppError::Internal(format!("render episode list: {e}")))
    }

    /// Render the list inside a full HTML document with the favorite-toggle script.
    pub fn render_page(&self, title: &str, props: &EpisodeListProps) -> AppResult<String> {
        let list = self.render_list(props)?;
        self.handlebars
            .render("page", &PageView { title, list: &list })
            .map_err(|e| AppError::Internal(format!("render page: {e}")))
    }
}

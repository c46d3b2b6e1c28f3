//! Server-rendered upcoming-episodes page.

use axum::extract::{Query, State};
use axum::response::Html;
use chrono::Utc;
use serde::Deserialize;
use tvtrack_core::store::Page;

use crate::AppState;
use crate::error::AppResult;
use crate::views::{Breakpoint, EpisodeListProps};

/// Default page size for the list.
const DEFAULT_PAGE_SIZE: i32 = 50;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EpisodeListParams {
    #[serde(default)]
    pub width: Breakpoint,
    #[serde(default)]
    pub disable_infinite: bool,
    pub first: Option<i32>,
    pub skip: Option<i32>,
}

/// `GET /episodes`: upcoming episodes as an HTML list.
pub async fn upcoming_episodes_page(
    State(state): State<AppState>,
    Query(params): Query<EpisodeListParams>,
) -> AppResult<Html<String>> {
    let now = Utc::now();
    let page = Page::new(Some(params.first.unwrap_or(DEFAULT_PAGE_SIZE)), params.skip);
    let episodes = state.store.upcoming_episodes(now, page).await?;

    let props = EpisodeListProps {
        episodes,
        disable_infinite: params.disable_infinite,
        width: params.width,
        now,
    };
    Ok(Html(state.views.render_page("Upcoming episodes", &props)?))
}

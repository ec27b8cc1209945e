//! Article handlers.

use super::AppState;
use super::responses::{ArticleCreated, ArticleList, Liked, SearchResults};
use crate::error::{ApiError, ApiResult};
use crate::metrics;
use crate::models::NewArticle;
use axum::Json;
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use serde::Deserialize;
use tracing::{debug, info};

/// Query string of `GET /articles/search`. A missing `q` searches for "".
#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
}

/// `POST /articles`
pub async fn create_article(
    State(state): State<AppState>,
    payload: Result<Json<NewArticle>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<ArticleCreated>)> {
    let Json(input) = payload?;
    let input = input.validate()?;

    let article = state.store.create_article(input).await?;
    metrics::record_article_created();
    info!(id = article.id, author = %article.author, "Article created");

    Ok((
        StatusCode::CREATED,
        Json(ArticleCreated {
            message: "Article created".to_string(),
            id: article.id,
            article,
        }),
    ))
}

/// `GET /articles`
pub async fn list_articles(State(state): State<AppState>) -> ApiResult<Json<ArticleList>> {
    let articles = state.store.list_articles().await?;
    Ok(Json(ArticleList {
        count: articles.len(),
        articles,
    }))
}

/// `POST /articles/{id}/like`
pub async fn like_article(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<Json<Liked>> {
    let Path(id) = id?;
    let likes = state
        .store
        .like_article(id)
        .await?
        .ok_or(ApiError::article_not_found(id))?;
    metrics::record_like();
    debug!(id, likes, "Article liked");

    Ok(Json(Liked {
        message: format!("Like added to article {id}"),
        likes,
    }))
}

/// `GET /articles/search?q=...`
pub async fn search_articles(
    State(state): State<AppState>,
    params: Result<Query<SearchParams>, QueryRejection>,
) -> ApiResult<Json<SearchResults>> {
    let Query(SearchParams { q }) = params?;
    let results = state.store.search_articles(&q).await?;

    Ok(Json(SearchResults {
        query: q,
        count: results.len(),
        results,
    }))
}

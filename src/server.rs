//! Single-page dashboard server.

use crate::charts::{ChartVariant, DonutFigure, StaticChartRenderer};
use crate::config::AppConfig;
use crate::data::LandUseShares;
use anyhow::{Context, Result};
use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Json},
    routing::get,
    Router,
};
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::net::SocketAddr;
use std::sync::Arc;

pub const LAYOUT_ID: &str = "forest-land-use-pie-chart-layout";
pub const CHART_ID: &str = "forest-land-use-pie-chart";

pub struct AppState {
    pub shares: LandUseShares,
    pub default_variant: ChartVariant,
    pub width: u32,
    pub height: u32,
}

#[derive(Deserialize, Default)]
pub struct VariantQuery {
    variant: Option<String>,
}

#[derive(Serialize)]
pub struct VariantInfo {
    name: &'static str,
    legend: crate::charts::LegendPlacement,
    label_format: crate::charts::format::LabelFormat,
}

type ApiResult<T> = std::result::Result<T, (StatusCode, String)>;

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/chart.svg", get(svg_handler))
        .route("/chart.png", get(png_handler))
        .route("/api/figure", get(figure_handler))
        .route("/api/variants", get(variants_handler))
        .with_state(state)
}

pub async fn start_server(config: &AppConfig, shares: LandUseShares) -> Result<()> {
    let state = Arc::new(AppState {
        shares,
        default_variant: config.chart.variant()?,
        width: config.chart.width,
        height: config.chart.height,
    });

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .with_context(|| format!("Invalid server address {}:{}", config.server.host, config.server.port))?;

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!("dashboard listening on http://{}", addr);

    axum::serve(listener, router(state)).await?;
    Ok(())
}

impl AppState {
    fn figure(&self, query: &VariantQuery) -> ApiResult<DonutFigure> {
        let variant = match &query.variant {
            Some(name) => {
                ChartVariant::from_name(name).map_err(|e| (StatusCode::NOT_FOUND, e.to_string()))?
            }
            None => self.default_variant,
        };
        Ok(DonutFigure::build(&self.shares, variant))
    }
}

fn internal(err: impl std::fmt::Display) -> (StatusCode, String) {
    tracing::error!("render failed: {}", err);
    (StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
}

async fn index_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<VariantQuery>,
) -> ApiResult<Html<String>> {
    let figure = state.figure(&query)?;
    let svg = StaticChartRenderer::render_svg(&figure, state.width, state.height).map_err(internal)?;
    Ok(Html(render_page(&figure, &svg)))
}

async fn svg_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<VariantQuery>,
) -> ApiResult<impl IntoResponse> {
    let figure = state.figure(&query)?;
    let svg = StaticChartRenderer::render_svg(&figure, state.width, state.height).map_err(internal)?;
    Ok(([(header::CONTENT_TYPE, "image/svg+xml")], svg))
}

async fn png_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<VariantQuery>,
) -> ApiResult<impl IntoResponse> {
    let figure = state.figure(&query)?;
    let png = StaticChartRenderer::render_png(&figure, state.width, state.height).map_err(internal)?;
    Ok(([(header::CONTENT_TYPE, "image/png")], png))
}

async fn figure_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<VariantQuery>,
) -> ApiResult<Json<DonutFigure>> {
    Ok(Json(state.figure(&query)?))
}

async fn variants_handler() -> Json<Vec<VariantInfo>> {
    Json(
        ChartVariant::ALL
            .iter()
            .map(|v| VariantInfo {
                name: v.name(),
                legend: v.legend(),
                label_format: v.label_format(),
            })
            .collect(),
    )
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// The dashboard page: chart, per-slice hover details, and variant links.
pub fn render_page(figure: &DonutFigure, svg: &str) -> String {
    let mut details = String::new();
    for slice in &figure.slices {
        let _ = write!(
            details,
            "<li title=\"{}\"><span class=\"swatch\" style=\"background:{}\"></span>{}</li>",
            escape_html(&slice.hover),
            slice.color,
            escape_html(&slice.label),
        );
    }

    let mut links = String::new();
    for variant in ChartVariant::ALL {
        let class = if variant.name() == figure.variant { " class=\"active\"" } else { "" };
        let _ = write!(links, "<a href=\"/?variant={0}\"{1}>{0}</a>", variant.name(), class);
    }

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{title}</title>
<style>
body {{ font-family: sans-serif; margin: 0; background: #fff; }}
#{layout} {{ display: flex; flex-direction: column; align-items: center; padding: 16px; }}
nav a {{ margin: 0 8px; color: #555; }}
nav a.active {{ font-weight: bold; color: #000; }}
ul.slices {{ list-style: none; padding: 0; display: flex; flex-wrap: wrap; gap: 12px; }}
ul.slices li {{ cursor: help; }}
.swatch {{ display: inline-block; width: 12px; height: 12px; margin-right: 6px; }}
</style>
</head>
<body>
<div id="{layout}">
<nav>{links}</nav>
<div>
<div id="{chart}">{svg}</div>
</div>
<ul class="slices">{details}</ul>
</div>
</body>
</html>
"#,
        title = escape_html(&figure.title),
        layout = LAYOUT_ID,
        chart = CHART_ID,
        links = links,
        svg = svg,
        details = details,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> Arc<AppState> {
        Arc::new(AppState {
            shares: LandUseShares {
                labels: vec![
                    "Production grassland".to_string(),
                    "Built-up area".to_string(),
                    "Wetland".to_string(),
                ],
                values: vec![600.0, 100.0, 300.0],
            },
            default_variant: ChartVariant::Forest,
            width: 900,
            height: 700,
        })
    }

    fn query(variant: Option<&str>) -> Query<VariantQuery> {
        Query(VariantQuery {
            variant: variant.map(str::to_string),
        })
    }

    #[tokio::test]
    async fn index_renders_layout_and_chart() {
        let Html(page) = index_handler(State(state()), query(None)).await.unwrap();

        assert!(page.contains(&format!("id=\"{}\"", LAYOUT_ID)));
        assert!(page.contains(&format!("id=\"{}\"", CHART_ID)));
        assert!(page.contains("<svg"));
        assert!(page.contains("Production grassland\n60%\nTotal: 600 ha"));
        assert!(page.contains("<a href=\"/?variant=forest\" class=\"active\">"));
    }

    #[tokio::test]
    async fn variant_query_selects_variant() {
        let Json(figure) = figure_handler(State(state()), query(Some("slate")))
            .await
            .unwrap();

        assert_eq!(figure.variant, "slate");
        assert_eq!(figure.slices[0].text, "600 ha");
    }

    #[tokio::test]
    async fn unknown_variant_is_not_found() {
        let err = index_handler(State(state()), query(Some("neon")))
            .await
            .unwrap_err();
        assert_eq!(err.0, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn png_route_serves_png_bytes() {
        let response = png_handler(State(state()), query(Some("earth")))
            .await
            .unwrap()
            .into_response();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "image/png");

        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(body.starts_with(b"\x89PNG"));
        let img = image::load_from_memory(&body).unwrap();
        assert_eq!((img.width(), img.height()), (900, 700));
    }

    #[tokio::test]
    async fn png_route_rejects_unknown_variant() {
        let err = png_handler(State(state()), query(Some("neon"))).await.err().unwrap();
        assert_eq!(err.0, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn lists_all_variants() {
        let Json(variants) = variants_handler().await;
        let names: Vec<_> = variants.iter().map(|v| v.name).collect();
        assert_eq!(names, vec!["forest", "earth", "pastel", "slate"]);
    }

    #[test]
    fn escapes_markup_in_labels() {
        assert_eq!(escape_html("<b>&\"x\"</b>"), "&lt;b&gt;&amp;&quot;x&quot;&lt;/b&gt;");
    }
}

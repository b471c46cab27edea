//! Feed normalization
//!
//! This module contains the per-feed processing logic, including:
//! - Parsing feed documents and enumerating their entries
//! - Tiered image resolution
//! - Normalizing entries into articles
//! - Running a full feed pass (resolve, fetch, normalize, persist)

mod article;
mod document;
mod image;
mod normalize;
mod runner;

pub use article::{Article, RunOverrides};
pub use document::FeedDocument;
pub use image::{absolutize_image_url, select_page_image, ImageResolver};
pub use normalize::{split_keywords, ArticleNormalizer, SiteFields};
pub use runner::{FeedRunReport, FeedRunner};

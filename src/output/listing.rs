//! Site and article listings

use crate::config::SiteConfig;
use crate::feed::Article;
use std::fmt;

/// Formats stored site configurations, one block per site
///
/// # Arguments
///
/// * `sites` - The configurations to display, in storage order
///
/// # Returns
///
/// The formatted listing
pub fn format_sites(sites: &[SiteConfig]) -> String {
    SiteListing(sites).to_string()
}

/// Formats articles, newest first as given
pub fn format_articles(articles: &[Article]) -> String {
    ArticleListing(articles).to_string()
}

struct SiteListing<'a>(&'a [SiteConfig]);

impl fmt::Display for SiteListing<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Site Configurations ({}) ===", self.0.len())?;

        for site in self.0 {
            writeln!(f)?;
            writeln!(f, "{}", site.site_name)?;
            writeln!(f, "  URL pattern: {}", site.url_pattern)?;
            if !site.language.is_empty() {
                writeln!(f, "  Language: {}", site.language)?;
            }
            if !site.categories.is_empty() {
                writeln!(f, "  Categories: {}", site.categories.join(", "))?;
            }
            if !site.countries.is_empty() {
                writeln!(f, "  Countries: {}", site.countries.join(", "))?;
            }
            writeln!(
                f,
                "  Fields: title={} link={} date={} description={}",
                site.title_field, site.link_field, site.date_field, site.description_field
            )?;
            if let Some(image) = &site.image_field {
                writeln!(f, "  Image field: {}", image)?;
            }
            if let Some((namespace, field)) = site.media_enclosure() {
                writeln!(f, "  Media enclosure: {{{}}}{}", namespace, field)?;
            }
            if site.fetch_article_image {
                writeln!(
                    f,
                    "  Article image: {}",
                    site.article_image_selector.as_deref().unwrap_or("img")
                )?;
            }
        }

        Ok(())
    }
}

struct ArticleListing<'a>(&'a [Article]);

impl fmt::Display for ArticleListing<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Articles ({}) ===", self.0.len())?;

        for article in self.0 {
            writeln!(f)?;
            writeln!(f, "[{}] {}", article.source, article.title)?;
            writeln!(f, "  {}", article.link)?;
            if !article.date.is_empty() {
                writeln!(f, "  Published: {}", article.date)?;
            }
            if let Some(author) = &article.author {
                writeln!(f, "  Author: {}", author)?;
            }
            if !article.keywords.is_empty() {
                writeln!(f, "  Keywords: {}", article.keywords.join(", "))?;
            }
            if !article.image.is_empty() {
                writeln!(f, "  Image: {}", article.image)?;
            }
        }

        Ok(())
    }
}

/// Prints stored site configurations to stdout
pub fn print_sites(sites: &[SiteConfig]) {
    print!("{}", format_sites(sites));
}

/// Prints articles to stdout
pub fn print_articles(articles: &[Article]) {
    print!("{}", format_articles(articles));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_sites() {
        let mut site = SiteConfig::new("Le Monde", "lemonde.fr");
        site.language = "fr".to_string();
        site.media_namespace = Some("http://search.yahoo.com/mrss/".to_string());
        site.media_content_field = Some("content".to_string());

        let out = format_sites(&[site]);
        assert!(out.starts_with("=== Site Configurations (1) ==="));
        assert!(out.contains("Le Monde"));
        assert!(out.contains("URL pattern: lemonde.fr"));
        assert!(out.contains("Language: fr"));
        assert!(out.contains("Media enclosure: {http://search.yahoo.com/mrss/}content"));
        assert!(!out.contains("Article image"));
    }

    #[test]
    fn test_format_articles() {
        let article = Article {
            title: "Premier article".to_string(),
            link: "https://www.lemonde.fr/a.html".to_string(),
            source: "Le Monde".to_string(),
            keywords: vec!["Politique".to_string(), "Europe".to_string()],
            ..Article::default()
        };

        let out = format_articles(&[article]);
        assert!(out.contains("[Le Monde] Premier article"));
        assert!(out.contains("https://www.lemonde.fr/a.html"));
        assert!(out.contains("Keywords: Politique, Europe"));
        assert!(!out.contains("Author:"));
    }

    #[test]
    fn test_format_articles_layout() {
        let article = Article {
            title: "Réforme du Sénat".to_string(),
            link: "https://www.lemonde.fr/senat.html".to_string(),
            source: "Le Monde".to_string(),
            date: "Mon, 20 Jan 2025 10:00:00 +0100".to_string(),
            author: Some("Service politique".to_string()),
            ..Article::default()
        };

        assert_eq!(
            format_articles(&[article]),
            "=== Articles (1) ===\n\
             \n\
             [Le Monde] Réforme du Sénat\n  \
             https://www.lemonde.fr/senat.html\n  \
             Published: Mon, 20 Jan 2025 10:00:00 +0100\n  \
             Author: Service politique\n"
        );
    }

    #[test]
    fn test_format_empty() {
        assert_eq!(format_articles(&[]), "=== Articles (0) ===\n");
        assert_eq!(format_sites(&[]), "=== Site Configurations (0) ===\n");
    }
}

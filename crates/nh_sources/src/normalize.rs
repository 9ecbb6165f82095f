use nh_core::Article;

use crate::sources::guardian::GuardianItem;
use crate::sources::newsapi::NewsApiArticle;

/// Number of characters of Guardian body text kept in the description.
const EXCERPT_LEN: usize = 200;

/// Merge both providers' raw shapes into the canonical article list.
///
/// Pure: no I/O, no side effects. NewsAPI entries come first, Guardian
/// entries after, in provider order. Duplicate stories across providers
/// are kept. Entries missing a title or url are dropped so the output
/// always satisfies the normalized invariant.
pub fn normalize(newsapi: Vec<NewsApiArticle>, guardian: Vec<GuardianItem>) -> Vec<Article> {
    let from_newsapi = newsapi.into_iter().map(|article| Article {
        title: article.title,
        description: article.description.unwrap_or_default(),
        source: article.source.name,
        published_at: article.published_at,
        url: article.url,
        image_url: article.url_to_image,
    });

    let from_guardian = guardian.into_iter().map(|item| {
        let fields = item.fields.unwrap_or_default();
        Article {
            title: item.web_title,
            description: fields.body_text.map(excerpt).unwrap_or_default(),
            source: "The Guardian".to_string(),
            published_at: item.web_publication_date,
            url: item.web_url,
            image_url: fields.thumbnail,
        }
    });

    from_newsapi
        .chain(from_guardian)
        .filter(|article| !article.title.is_empty() && !article.url.is_empty())
        .collect()
}

fn excerpt(body: String) -> String {
    let mut excerpt: String = body.chars().take(EXCERPT_LEN).collect();
    excerpt.push_str("...");
    excerpt
}

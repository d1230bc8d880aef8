//! Demo catalog seeding
//!
//! A small studio portfolio catalog for trying the grid end to end. The
//! data is shaped so AND and OR filters over the same terms give visibly
//! different subsets.

use pgrid_common::Result;
use sqlx::{Pool, Sqlite};
use tracing::info;

/// Populate an empty catalog with the demo data set
///
/// A catalog that already holds posts is left alone.
pub async fn seed_demo(pool: &Pool<Sqlite>) -> Result<()> {
    let post_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM posts")
        .fetch_one(pool)
        .await?;
    if post_count > 0 {
        info!("Catalog already populated ({} posts), skipping demo seed", post_count);
        return Ok(());
    }

    let terms = [
        (1, "Branding"),
        (2, "Editorial"),
        (3, "Web"),
        (4, "Motion"),
        (5, "Print"),
    ];
    for (id, name) in terms {
        sqlx::query("INSERT INTO terms (id, name, taxonomy) VALUES (?, ?, 'category')")
            .bind(id)
            .bind(name)
            .execute(pool)
            .await?;
    }

    let posts = [
        (1, "Atlas rebrand", "post", "2024-06-05"),
        (2, "Folio annual report", "post", "2024-05-20"),
        (3, "Nimbus site", "post", "2024-05-02"),
        (4, "Quarterly review", "post", "2024-04-18"),
        (5, "Launch film", "post", "2024-03-30"),
        (6, "Paper goods", "post", "2024-03-11"),
        (7, "Archive spotlight", "post", "2024-02-27"),
        (8, "Studio notes", "post", "2024-02-01"),
        (9, "About the studio", "page", "2024-01-15"),
    ];
    for (id, title, post_type, published_at) in posts {
        sqlx::query("INSERT INTO posts (id, title, post_type, published_at) VALUES (?, ?, ?, ?)")
            .bind(id)
            .bind(title)
            .bind(post_type)
            .bind(published_at)
            .execute(pool)
            .await?;
    }

    let links = [
        (1, 1),
        (1, 3),
        (2, 2),
        (3, 3),
        (4, 2),
        (4, 3),
        (5, 4),
        (6, 1),
        (6, 2),
        (8, 1),
    ];
    for (post_id, term_id) in links {
        sqlx::query("INSERT INTO post_terms (post_id, term_id) VALUES (?, ?)")
            .bind(post_id)
            .bind(term_id)
            .execute(pool)
            .await?;
    }

    info!("Seeded demo catalog: {} posts, {} terms", posts.len(), terms.len());

    Ok(())
}

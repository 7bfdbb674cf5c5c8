use crate::app::{AppContext, Result, RoostError};
use crate::config::DisplayConfig;
use crate::domain::FeedSnapshot;
use crate::feed::{FollowOutcome, RemoveOutcome, MIN_FETCH_SPACING};
use crate::menu::status_title;
use crate::scheduler::{format_interval, parse_interval};
use crate::wrap::wrap;

pub async fn follow(ctx: &AppContext, handle: &str) -> Result<()> {
    match ctx.feeds.follow(handle).await? {
        FollowOutcome::Added { handle, posts } => {
            println!("Following @{} ({} posts)", handle, posts);
        }
        FollowOutcome::AlreadyTracked { handle } => {
            println!("Already following @{}", handle);
        }
    }
    Ok(())
}

pub async fn remove(ctx: &AppContext, handle: &str) -> Result<()> {
    match ctx.feeds.remove(handle).await? {
        RemoveOutcome::Removed { handle } => println!("Removed @{}", handle),
        RemoveOutcome::NotTracked => println!("Not following @{}", handle),
    }
    Ok(())
}

pub fn list(ctx: &AppContext) -> Result<()> {
    let handles = ctx.feeds.tracked_handles();
    if handles.is_empty() {
        println!("Not following anyone");
        return Ok(());
    }

    for handle in handles {
        println!("@{}", handle);
    }
    Ok(())
}

pub async fn sync(ctx: &AppContext) -> Result<()> {
    let report = ctx.feeds.sync_all().await?;
    for handle in &report.failed {
        eprintln!("  Error fetching @{}", handle);
    }

    print!("{}", digest(&ctx.feeds.snapshot(), &ctx.config.display));
    println!(
        "Sync complete: {} refreshed, {} without posts, {} errors",
        report.refreshed,
        report.unresolved.len(),
        report.failed.len()
    );
    Ok(())
}

pub async fn daemon(ctx: &AppContext, interval: &str) -> Result<()> {
    let period = parse_interval(interval).map_err(RoostError::Config)?;
    if period < MIN_FETCH_SPACING {
        tracing::warn!(
            "Interval {} is shorter than the {} fetch spacing; some passes will be skipped",
            format_interval(period.as_secs()),
            format_interval(MIN_FETCH_SPACING.as_secs())
        );
    }

    let scheduler = ctx.scheduler(period);
    scheduler.clone().stop_on_signal();
    scheduler.run().await;
    Ok(())
}

/// Title, then each account with its newest post wrapped underneath.
pub fn digest(snapshot: &FeedSnapshot, display: &DisplayConfig) -> String {
    let mut lines = vec![status_title(snapshot, display.title_chars)];

    for handle in &snapshot.handles {
        lines.push(String::new());
        lines.push(format!("@{}", handle));
        match snapshot.newest(handle) {
            Some(post) => {
                lines.extend(
                    wrap(&post.text, display.wrap_width)
                        .into_iter()
                        .map(|line| format!("  {}", line)),
                );
                lines.push(format!("  {}", post.timestamp.format("%Y-%m-%d %H:%M")));
            }
            None => lines.push("  (no posts)".to_string()),
        }
    }

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Post;
    use chrono::DateTime;

    #[test]
    fn test_digest() {
        let snapshot = FeedSnapshot::new(
            vec!["deals".into(), "quiet".into()],
            [(
                "deals".to_string(),
                vec![Post::new(
                    "1",
                    "deals",
                    "Two pans for the price of one",
                    DateTime::from_timestamp(0, 0).unwrap(),
                )],
            )],
        );
        let display = DisplayConfig {
            wrap_width: 12,
            ..Default::default()
        };

        assert_eq!(
            digest(&snapshot, &display),
            "🐥Two pans for the pri\n\
             \n@deals\n  Two pans for\n  the price of\n  one\n  1970-01-01 00:00\n\
             \n@quiet\n  (no posts)\n"
        );
    }

    #[test]
    fn test_digest_empty() {
        assert_eq!(
            digest(&FeedSnapshot::default(), &DisplayConfig::default()),
            "🐦\n"
        );
    }
}

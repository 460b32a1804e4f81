use anyhow::{Context, Result, bail};

use pathwise_core::video::{BatchVerification, extract_video_id, thumbnail_url_hq};

use crate::config::PathwiseConfig;

/// Execute `pathwise verify`: check every reference and print the results.
pub async fn run_verify(config: &PathwiseConfig, references: &[String], plain: bool) -> Result<()> {
    let Some(lookup) = config.video_lookup()? else {
        bail!(
            "YouTube API key not configured; set YOUTUBE_API_KEY or run `pathwise init --youtube-key <KEY>`"
        );
    };

    let results = lookup.verify_batch(references).await;
    let unusable = results.iter().filter(|r| !r.result.is_public).count();
    tracing::info!(total = results.len(), unusable, "verification complete");

    if plain {
        print!("{}", render_plain(&results));
    } else {
        let json = serde_json::to_string_pretty(&results).context("failed to serialize results")?;
        println!("{json}");
    }
    Ok(())
}

/// One line per reference: status, reference, then details.
fn render_plain(results: &[BatchVerification]) -> String {
    let mut out = String::new();
    for entry in results {
        let result = &entry.result;
        let status = match (result.is_valid, result.is_public) {
            (true, true) => "OK",
            (true, false) => "RESTRICTED",
            (false, _) => "INVALID",
        };
        out.push_str(&format!("{status:<10} {}\n", entry.reference));

        if let Some(title) = &result.title {
            let channel = result.channel_title.as_deref().unwrap_or("?");
            out.push_str(&format!("           {title} ({channel})"));
            match result.duration.as_deref() {
                Some(d) if !d.is_empty() => out.push_str(&format!(" [{d}]\n")),
                _ => out.push('\n'),
            }
        }
        if result.is_public {
            if let Some(id) = extract_video_id(&entry.reference) {
                out.push_str(&format!("           thumbnail: {}\n", thumbnail_url_hq(&id)));
            }
        }
        if let Some(error) = &result.error {
            out.push_str(&format!("           {error}\n"));
        }
    }
    out
}

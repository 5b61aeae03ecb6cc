//! Subcommand execution.

use anyhow::{bail, Context, Result};

use super::{Cli, Command};
use crate::batch::{normalize_url, parse_dealer_line, resolve_batch};
use crate::browser::{BrowserManager, BypassRegistry, HttpBrowser, WarmupBypass};
use crate::config::Config;
use crate::contact::ContactPageStore;
use crate::detection::HtmlFormDetector;
use crate::initialization::init_client;
use crate::resolver::{ContactPageResolver, DealerRequest};
use crate::submission::SubmissionHistory;

/// Runs the parsed command line.
///
/// Returns `Ok(false)` when the command ran but found nothing usable (the
/// binary exits non-zero), `Ok(true)` otherwise.
///
/// # Errors
///
/// Returns an error when the configuration is invalid, the HTTP client cannot
/// be built, input cannot be read or a store cannot be written.
pub async fn run(cli: Cli) -> Result<bool> {
    let config = cli.to_config();
    config.validate().context("Invalid configuration")?;

    match cli.command {
        Command::Resolve {
            dealer_id,
            homepage,
            name,
            contact_url,
            json,
        } => {
            let Some(homepage_url) = normalize_url(&homepage) else {
                bail!("invalid homepage URL: {homepage}");
            };
            let preferred_contact_url = match contact_url {
                Some(url) => match normalize_url(&url) {
                    Some(url) => Some(url),
                    None => bail!("invalid contact URL: {url}"),
                },
                None => None,
            };
            let request = DealerRequest {
                dealer_name: name.unwrap_or_else(|| dealer_id.clone()),
                dealer_id,
                homepage_url,
                preferred_contact_url,
            };

            let mut resolver = build_resolver(&config);
            let browser = HttpBrowser::new(init_client(&config).context("Failed to initialize HTTP client")?);
            let ctx = browser.open_context().await.context("Failed to open browser context")?;

            let outcome = resolver.resolve(ctx.as_ref(), &request).await;
            resolver
                .store_mut()
                .save()
                .context("Failed to save contact page cache")?;
            match outcome {
                Ok(resolution) if json => {
                    println!("{}", serde_json::to_string_pretty(&resolution)?);
                    Ok(true)
                }
                Ok(resolution) => {
                    println!(
                        "{} -> {} (score {:.1}, {} inputs, via {})",
                        resolution.dealer_id,
                        resolution.contact_url,
                        resolution.contact_score,
                        resolution.total_inputs,
                        resolution.source
                    );
                    Ok(true)
                }
                Err(e) => {
                    eprintln!("{e}");
                    Ok(false)
                }
            }
        }

        Command::Batch {
            file,
            respect_cooldown,
        } => {
            let content = tokio::fs::read_to_string(&file)
                .await
                .with_context(|| format!("Failed to read dealer file {}", file.display()))?;
            let requests: Vec<DealerRequest> = content.lines().filter_map(parse_dealer_line).collect();
            log::info!("Loaded {} dealers from {}", requests.len(), file.display());

            let history = respect_cooldown.then(|| {
                SubmissionHistory::load(&config.submission_history_path, config.submission_cooldown())
            });
            let mut resolver = build_resolver(&config);
            let browser = HttpBrowser::new(init_client(&config).context("Failed to initialize HTTP client")?);
            let ctx = browser.open_context().await.context("Failed to open browser context")?;

            let report = resolve_batch(&mut resolver, ctx.as_ref(), &requests, history.as_ref()).await;
            for resolution in &report.resolved {
                println!(
                    "{}\t{}\t{:.1}\t{}",
                    resolution.dealer_id, resolution.source, resolution.contact_score, resolution.contact_url
                );
            }
            for error in report.unresolved.iter().chain(&report.cooling_down) {
                eprintln!("{error}");
            }
            println!("{report}");
            Ok(report.unresolved.is_empty())
        }

        Command::Show { dealer_id } => {
            let store = ContactPageStore::load(&config.contact_cache_path);
            match store.get(&dealer_id) {
                Some(record) => {
                    println!("{}", serde_json::to_string_pretty(record)?);
                    Ok(true)
                }
                None => {
                    eprintln!("No cached contact page for {dealer_id}");
                    Ok(false)
                }
            }
        }

        Command::List { due } => {
            let store = ContactPageStore::load(&config.contact_cache_path);
            let records: Vec<_> = if due {
                store.records_due_for_refresh(chrono::Utc::now(), config.resolver.refresh_interval())
            } else {
                store.records().collect()
            };
            for record in &records {
                println!(
                    "{}\t{}\t{:.1}\t{}\t{}",
                    record.dealer_id,
                    record.status,
                    record.contact_score,
                    record.last_verified_at.format("%Y-%m-%d"),
                    record.contact_url
                );
            }
            log::info!("{} record(s)", records.len());
            Ok(true)
        }

        Command::MarkNoForm { dealer_id, reason } => {
            let mut store = ContactPageStore::load(&config.contact_cache_path);
            if !store.mark_no_form(&dealer_id, &reason, chrono::Utc::now()) {
                bail!("no cached contact page for {dealer_id}");
            }
            store.save().context("Failed to save contact page cache")?;
            println!("Marked {dealer_id} as having no usable form");
            Ok(true)
        }

        Command::Cooldown { slug, status } => {
            let mut history =
                SubmissionHistory::load(&config.submission_history_path, config.submission_cooldown());
            history
                .record(&slug, &status, None)
                .context("Failed to save submission history")?;
            println!(
                "{slug} cooling down for {}h",
                config.submission_cooldown().num_hours()
            );
            Ok(true)
        }

        Command::ClearCooldown { slug } => {
            let mut history =
                SubmissionHistory::load(&config.submission_history_path, config.submission_cooldown());
            history
                .clear(&slug)
                .context("Failed to save submission history")?;
            println!("Cleared cooldown for {slug}");
            Ok(true)
        }
    }
}

/// Resolver over the configured cache, with the scraper detector and the
/// warm-up bypass for configured hosts.
fn build_resolver(config: &Config) -> ContactPageResolver {
    let store = ContactPageStore::load(&config.contact_cache_path);
    let mut bypasses = BypassRegistry::new();
    if !config.bypass_hosts.is_empty() {
        bypasses.register(Box::new(WarmupBypass::new(config.bypass_hosts.clone())));
    }
    ContactPageResolver::new(
        store,
        Box::new(HtmlFormDetector::new()),
        config.resolver.clone(),
    )
    .with_bypasses(bypasses)
}

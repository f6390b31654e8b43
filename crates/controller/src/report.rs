// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Reporting to the review platform.
//!
//! Every reported record gets a commit status on its head SHA. Complete
//! records carrying a pull additionally get comment upkeep: failed and
//! errored builds leave a result comment (edited in place when one already
//! exists), anything else clears the bot's previous comments for the same
//! context.

use gaffer_adapters::{Reviewer, ReviewError, Status, StatusState};
use gaffer_config::{render_record, Config};
use gaffer_core::{JobRecord, JobState};

/// Invisible tag identifying the bot's comment for one status context.
pub(crate) fn comment_marker(context: &str) -> String {
    format!("<!-- gaffer: {context} -->")
}

fn status_state(state: JobState) -> StatusState {
    match state {
        JobState::Triggered | JobState::Pending => StatusState::Pending,
        JobState::Success => StatusState::Success,
        JobState::Failure | JobState::Aborted => StatusState::Failure,
        JobState::Error => StatusState::Error,
    }
}

fn comment_body(config: &Config, record: &JobRecord, marker: &str) -> String {
    let mut body = render_record(&config.report_template, record);
    if !record.spec.rerun_command.is_empty() {
        body.push_str("\n\nRe-run with: ");
        body.push_str(&record.spec.rerun_command);
    }
    body.push_str("\n\n");
    body.push_str(marker);
    body
}

/// Report one record to the review platform.
///
/// Every record gets a status: on the first pull's SHA when pulls exist,
/// otherwise on the base SHA. Comment upkeep needs a pull to comment on,
/// so records without one skip only that step. Errors never mutate the
/// record.
pub(crate) async fn report<R: Reviewer>(
    reviewer: &R,
    config: &Config,
    record: &JobRecord,
) -> Result<(), ReviewError> {
    let refs = &record.spec.refs;
    let sha = refs.pulls.first().map(|p| p.sha.as_str()).unwrap_or(&refs.base_sha);

    reviewer
        .create_status(
            &refs.org,
            &refs.repo,
            sha,
            Status {
                state: status_state(record.status.state),
                description: record.status.description.clone(),
                context: record.spec.report_context().to_string(),
                target_url: record.status.url.clone(),
            },
        )
        .await?;

    if !record.complete() {
        return Ok(());
    }
    let Some(pull) = refs.pulls.first() else {
        return Ok(());
    };

    let bot = reviewer.bot_name().await?;
    let marker = comment_marker(record.spec.report_context());
    let comments = reviewer.list_issue_comments(&refs.org, &refs.repo, pull.number).await?;
    let mut previous = comments.iter().filter(|c| c.author == bot && c.body.contains(&marker));

    match record.status.state {
        JobState::Failure | JobState::Error => {
            let body = comment_body(config, record, &marker);
            match previous.next() {
                Some(existing) => {
                    reviewer.edit_comment(&refs.org, &refs.repo, existing.id, &body).await?;
                }
                None => {
                    reviewer.create_comment(&refs.org, &refs.repo, pull.number, &body).await?;
                }
            }
            for extra in previous {
                reviewer.delete_comment(&refs.org, &refs.repo, extra.id).await?;
            }
        }
        _ => {
            for old in previous {
                reviewer.delete_comment(&refs.org, &refs.repo, old.id).await?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "report_tests.rs"]
mod tests;

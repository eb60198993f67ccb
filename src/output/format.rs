use crate::crawler::CrawlOutcome;

/// Formats the result line of one domain
///
/// # Examples
///
/// ```
/// use mailsweep::crawler::CrawlOutcome;
/// use mailsweep::output::format_result_line;
///
/// let mut outcome = CrawlOutcome::skipped("acme.com");
/// assert_eq!(format_result_line(&outcome), "acme.com");
///
/// outcome.emails = vec!["info@acme.com".to_string(), "me@gmail.com".to_string()];
/// assert_eq!(format_result_line(&outcome), "acme.com,info@acme.com,me@gmail.com");
/// ```
pub fn format_result_line(outcome: &CrawlOutcome) -> String {
    if outcome.emails.is_empty() {
        return outcome.domain.clone();
    }

    format!("{},{}", outcome.domain, outcome.emails.join(","))
}

/// Formats the diagnostics entry of one domain
///
/// `domain : seconds` for successful slots; failed slots append the error
/// record's domain, message and context on their own lines, followed by a
/// trailing newline.
pub fn format_diagnostics(outcome: &CrawlOutcome) -> String {
    let header = format!("{} : {}", outcome.domain, outcome.elapsed_secs);

    match &outcome.error {
        None => header,
        Some(record) => format!(
            "{}\n{}\n{}\n{}\n",
            header, record.domain, record.message, record.context
        ),
    }
}

/// Formats the complete log artifact of a batch
pub fn format_log(total_elapsed_secs: u64, outcomes: &[CrawlOutcome]) -> String {
    let mut log = format!("TOTAL : {}\n", total_elapsed_secs);

    for outcome in outcomes {
        log.push_str(&format_diagnostics(outcome));
        log.push('\n');
    }

    log
}

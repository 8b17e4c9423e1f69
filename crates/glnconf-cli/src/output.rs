use glnconf::core::analysis::frequency::{CopyFrequencies, FrequencyReport};

/// One line per bucket of every copy that has frequencies, in copy order:
/// `<label> [<copy>] <Bucket>: <percentage>`.
pub fn format_report(report: &FrequencyReport, precision: usize) -> Vec<String> {
    report
        .copies()
        .iter()
        .filter_map(|copy| copy.as_ref().ok())
        .flat_map(|copy| format_copy(report.label(), copy, precision))
        .collect()
}

fn format_copy(label: &str, copy: &CopyFrequencies, precision: usize) -> Vec<String> {
    copy.buckets
        .iter()
        .map(|bucket| {
            format!(
                "{} [{}] {}: {:.*}",
                label, copy.label, bucket.conformation, precision, bucket.percentage
            )
        })
        .collect()
}

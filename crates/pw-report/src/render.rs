//! Text rendering of reports for the terminal.

use crate::error::Result;
use crate::generator::StatisticsReport;
use pw_common::{residue_of, OutputFormat, PairKind};
use std::fmt::Write;

/// Render `report` in the requested format.
pub fn render(
    report: &StatisticsReport,
    format: OutputFormat,
    title: Option<&str>,
) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(report)?),
        OutputFormat::Md => Ok(render_markdown(report, title)),
        OutputFormat::Summary => Ok(render_summary(report)),
    }
}

/// Digits grouped in threes with `.` separators, e.g. `1.234.567`.
pub fn group_digits(value: u128) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push('.');
        }
        out.push(ch);
    }
    out
}

/// One-line digest.
pub fn render_summary(report: &StatisticsReport) -> String {
    let p = &report.parameters;
    if report.is_empty {
        return format!(
            "[{} .. {}] no primes in {} buckets",
            group_digits(p.start),
            group_digits(p.end),
            bucket_count(report)
        );
    }
    let s = &report.summary;
    let pairs = &report.special_pairs;
    format!(
        "[{} .. {}] {} primes, density {:.6}% (theory {:.6}%, {:+.6}), gaps {}/{}/{:.2}, twin {} cousin {} sexy {}",
        group_digits(p.start),
        group_digits(p.end),
        group_digits(u128::from(s.count)),
        s.density_real,
        s.density_theoretical,
        s.density_difference,
        group_digits(report.gaps.min),
        group_digits(report.gaps.max),
        report.gaps.mean,
        pairs.twin.count,
        pairs.cousin.count,
        pairs.sexy.count,
    )
}

fn bucket_count(report: &StatisticsReport) -> u128 {
    report.parameters.end.saturating_sub(report.parameters.start) / 60 + 1
}

/// Full markdown report.
pub fn render_markdown(report: &StatisticsReport, title: Option<&str>) -> String {
    let p = &report.parameters;
    let s = &report.summary;
    let mut out = String::new();

    let heading = title
        .map(str::to_string)
        .or_else(|| p.source_id.clone())
        .unwrap_or_else(|| "archive".to_string());
    let _ = writeln!(out, "# Prime statistics: {}", heading);
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "Interval: {} .. {} (width {})",
        group_digits(p.start),
        group_digits(p.end),
        group_digits(p.end.saturating_sub(p.start))
    );
    let _ = writeln!(out, "Primes: {}", group_digits(u128::from(s.count)));
    let _ = writeln!(out, "Root bound: {}", group_digits(p.root_bound));
    if let Some(sha) = &p.source_sha256 {
        let _ = writeln!(out, "Source SHA-256: {}", sha);
    }
    let _ = writeln!(out, "Generated: {}", report.generated_at.to_rfc3339());

    if report.is_empty {
        let _ = writeln!(out);
        let _ = writeln!(out, "The archive lists no primes in this interval.");
        return out;
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "## Density");
    let _ = writeln!(out);
    let _ = writeln!(out, "| Measure | Primes per 100 |");
    let _ = writeln!(out, "|---|---:|");
    let _ = writeln!(out, "| Real | {:.6} |", s.density_real);
    let _ = writeln!(out, "| Theoretical (1/ln) | {:.6} |", s.density_theoretical);
    let _ = writeln!(out, "| Difference | {:+.6} |", s.density_difference);

    let g = &report.gaps;
    let _ = writeln!(out);
    let _ = writeln!(out, "## Gaps");
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "min {} / max {} / mean {:.2}",
        group_digits(g.min),
        group_digits(g.max),
        g.mean
    );

    let _ = writeln!(out);
    let _ = writeln!(out, "## Special pairs");
    let _ = writeln!(out);
    let _ = writeln!(out, "| Kind | Gap | Count | First |");
    let _ = writeln!(out, "|---|---:|---:|---|");
    for kind in PairKind::ALL {
        let stats = report.special_pairs.get(kind);
        let first = stats
            .sample
            .first()
            .map(|pair| format!("({}, {})", group_digits(pair.low), group_digits(pair.high)))
            .unwrap_or_else(|| "-".to_string());
        let _ = writeln!(
            out,
            "| {} | {} | {} | {} |",
            kind.label(),
            kind.gap(),
            group_digits(u128::from(stats.count)),
            first
        );
    }

    let dist = &report.residue_distribution;
    let _ = writeln!(out);
    let _ = writeln!(out, "## Residues mod 60");
    let _ = writeln!(out);
    let _ = writeln!(out, "| Residue | Count | Share |");
    let _ = writeln!(out, "|---:|---:|---:|");
    for (residue, count) in dist.iter() {
        let _ = writeln!(
            out,
            "| {} | {} | {:.2}% |",
            residue,
            group_digits(u128::from(count)),
            dist.percentage(residue)
        );
    }

    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "## Primes (first {} of {})",
        report.prime_sample.len(),
        group_digits(u128::from(s.count))
    );
    let _ = writeln!(out);
    let _ = writeln!(out, "| # | Value | Gap | Residue | Pair |");
    let _ = writeln!(out, "|---:|---:|---:|---:|---|");
    let mut previous: Option<u128> = None;
    for (index, &value) in report.prime_sample.iter().enumerate() {
        let (gap, pair) = match previous {
            None => ("-".to_string(), ""),
            Some(prev) if value > prev => (
                group_digits(value - prev),
                PairKind::from_gap(value - prev).map_or("", |k| k.label()),
            ),
            // Backward step in a leniently decoded archive.
            Some(prev) => (format!("-{}", group_digits(prev - value)), ""),
        };
        let _ = writeln!(
            out,
            "| {} | {} | {} | {} | {} |",
            index + 1,
            group_digits(value),
            gap,
            residue_of(value),
            pair
        );
        previous = Some(value);
    }

    out
}

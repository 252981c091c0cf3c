//! Small text helpers shared by the terminal reports.

/// Percent with two decimals (`0.0312` -> `"3.12%"`).
pub fn fmt_pct(rate: f64) -> String {
    format!("{:.2}%", rate * 100.0)
}

/// Currency with two decimals.
pub fn fmt_cad(amount: f64) -> String {
    format!("${amount:.2}")
}

/// Header plus dashed rule, each trimmed of trailing spaces.
pub fn table_header(columns: &[(&str, usize)]) -> String {
    let mut head = String::new();
    let mut rule = String::new();
    for (i, (name, width)) in columns.iter().enumerate() {
        if i > 0 {
            head.push(' ');
            rule.push(' ');
        }
        if i == 0 {
            head.push_str(&format!("{name:<width$}"));
        } else {
            head.push_str(&format!("{name:>width$}"));
        }
        rule.push_str(&"-".repeat(*width));
    }
    format!("{}\n{}\n", head.trim_end(), rule.trim_end())
}

pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max.saturating_sub(1)).collect();
    out.push('.');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_rates_and_money() {
        assert_eq!(fmt_pct(0.0312), "3.12%");
        assert_eq!(fmt_pct(-0.005), "-0.50%");
        assert_eq!(fmt_cad(387.968), "$387.97");
    }

    #[test]
    fn header_rule_matches_widths() {
        let h = table_header(&[("date", 10), ("value", 8)]);
        assert_eq!(h, "date          value\n---------- --------\n");
    }

    #[test]
    fn truncates_long_labels() {
        assert_eq!(truncate("Supermarché P.A.", 8), "Superma.");
        assert_eq!(truncate("IGA", 8), "IGA");
    }
}

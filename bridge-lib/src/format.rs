use itertools::Itertools;

use crate::waterfall::StepRole;

/// Groups the integer digits of an already formatted, unsigned number: `1234567.5` -> `1,234,567.5`.
fn group_thousands(unsigned: &str) -> String {
    let (int_part, frac_part) = match unsigned.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (unsigned, None),
    };
    let digits = int_part.as_bytes();
    let head = digits.len() % 3;
    let mut groups = Vec::with_capacity(digits.len() / 3 + 1);
    if head > 0 {
        groups.push(&int_part[..head]);
    }
    for start in (head..digits.len()).step_by(3) {
        groups.push(&int_part[start..start + 3]);
    }
    let grouped = groups.into_iter().join(",");
    match frac_part {
        Some(f) => format!("{grouped}.{f}"),
        None => grouped,
    }
}

/// Accounting-style number: thousands separators, negatives in parentheses when
/// `parens_neg`, otherwise with a leading minus before the prefix.
pub fn fmt_num(val: f64, decimals: usize, prefix: &str, suffix: &str, parens_neg: bool) -> String {
    let s = group_thousands(&format!("{:.*}", decimals, val.abs()));
    if val < 0.0 {
        if parens_neg {
            format!("{prefix}({s}){suffix}")
        } else {
            format!("-{prefix}{s}{suffix}")
        }
    } else {
        format!("{prefix}{s}{suffix}")
    }
}

pub fn fmt_pct(val: f64) -> String {
    format!("{val:.1}%")
}

/// Millions with an explicit sign for non-negative values: `+1.52M`, `-0.72M`, `+0.00M`.
pub fn fmt_signed(val: f64, decimals: usize, suffix: &str) -> String {
    if val >= 0.0 {
        format!("+{:.*}{suffix}", decimals, val)
    } else {
        format!("{:.*}{suffix}", decimals, val)
    }
}

/// Label style for bridge bars: `$3.84M` on anchors, `+1.52M` / `-0.72M` on contributions.
#[derive(Debug, Clone)]
pub struct BridgeLabels {
    pub decimals: usize,
    pub prefix: String,
    pub suffix: String,
}

impl Default for BridgeLabels {
    fn default() -> Self {
        Self {
            decimals: 1,
            prefix: "$".to_string(),
            suffix: "M".to_string(),
        }
    }
}

impl BridgeLabels {
    pub fn millions(decimals: usize) -> Self {
        Self {
            decimals,
            ..Default::default()
        }
    }

    pub fn label(&self, role: StepRole, value: f64) -> String {
        match role {
            StepRole::Start | StepRole::End => {
                fmt_num(value, self.decimals, &self.prefix, &self.suffix, false)
            }
            StepRole::Contribution => fmt_signed(value, self.decimals, &self.suffix),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fmt_num() {
        assert_eq!(fmt_num(48250000.0, 0, "", "", true), "48,250,000");
        assert_eq!(fmt_num(-2412500.0, 0, "", "", true), "(2,412,500)");
        assert_eq!(fmt_num(-320.0, 0, "$", "", false), "-$320");
        assert_eq!(fmt_num(999.0, 0, "", "", true), "999");
        assert_eq!(fmt_num(1000.0, 0, "", "", true), "1,000");
        assert_eq!(fmt_num(1234.5, 2, "$", "K", true), "$1,234.50K");
        assert_eq!(fmt_num(0.0, 1, "", "", true), "0.0");
    }

    #[test]
    fn test_fmt_pct_and_signed() {
        assert_eq!(fmt_pct(9.44), "9.4%");
        assert_eq!(fmt_pct(-2.04), "-2.0%");
        assert_eq!(fmt_signed(1.52, 2, "M"), "+1.52M");
        assert_eq!(fmt_signed(-0.72, 2, "M"), "-0.72M");
        assert_eq!(fmt_signed(0.0, 1, "M"), "+0.0M");
    }

    #[test]
    fn test_bridge_labels() {
        let labels = BridgeLabels::millions(2);
        assert_eq!(labels.label(StepRole::Start, 3.84), "$3.84M");
        assert_eq!(labels.label(StepRole::Contribution, -0.35), "-0.35M");
        assert_eq!(labels.label(StepRole::End, 4.73), "$4.73M");
        assert_eq!(BridgeLabels::default().label(StepRole::End, 28.5), "$28.5M");
        // sign goes ahead of the currency on a negative total
        assert_eq!(labels.label(StepRole::Start, -3.0), "-$3.00M");
        assert_eq!(labels.label(StepRole::End, -1250.0), "-$1,250.00M");
    }
}

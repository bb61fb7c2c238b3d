//! Layout for waterfall (bridge) charts.
//!
//! A bridge is an ordered list of steps: the first carries an absolute starting total, the
//! last is a placeholder for the ending total, and everything in between is a signed
//! contribution. [`compute_bars`] turns that list into floating bars whose feet sit on the
//! running total left behind by the previous step.

use itertools::Itertools;
use thiserror::Error;

use crate::color::ColorRole;

#[derive(Debug, Clone, PartialEq)]
pub struct BridgeStep {
    pub label: String,
    pub delta: f64,
}

impl BridgeStep {
    pub fn new(label: impl Into<String>, delta: f64) -> Self {
        Self {
            label: label.into(),
            delta,
        }
    }

    /// First step. `value` is an absolute total, not an increment.
    pub fn start(label: impl Into<String>, value: f64) -> Self {
        Self::new(label, value)
    }

    pub fn delta(label: impl Into<String>, delta: f64) -> Self {
        Self::new(label, delta)
    }

    /// Last step. Its value is filled in by [`compute_bars`].
    pub fn end(label: impl Into<String>) -> Self {
        Self::new(label, 0.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StepRole {
    Start,
    Contribution,
    End,
}

impl StepRole {
    pub fn of(index: usize, len: usize) -> Self {
        if index == 0 {
            StepRole::Start
        } else if index + 1 == len {
            StepRole::End
        } else {
            StepRole::Contribution
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorClass {
    Anchor,
    Increase,
    Decrease,
}

impl ColorClass {
    pub fn role(self) -> ColorRole {
        match self {
            ColorClass::Anchor => ColorRole::Anchor,
            ColorClass::Increase => ColorRole::Increase,
            ColorClass::Decrease => ColorRole::Decrease,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BridgeBar {
    pub label: String,
    pub role: StepRole,
    pub bottom: f64,
    /// Always non-negative.
    pub height: f64,
    pub color_class: ColorClass,
    pub display_value: String,
}

impl BridgeBar {
    pub fn top(&self) -> f64 {
        self.bottom + self.height
    }

    /// The running total once this bar's step has been applied, which is where the
    /// connector to the next bar is drawn.
    pub fn exit_level(&self) -> f64 {
        match self.color_class {
            ColorClass::Increase => self.top(),
            ColorClass::Decrease => self.bottom,
            ColorClass::Anchor if self.bottom < 0.0 => self.bottom,
            ColorClass::Anchor => self.top(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct WaterfallLayout {
    pub bars: Vec<BridgeBar>,
    pub final_total: f64,
}

impl WaterfallLayout {
    /// One `(i, level)` pair per adjacent bar pair `(i, i + 1)`.
    pub fn connectors(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.bars
            .iter()
            .enumerate()
            .tuple_windows()
            .map(|((i, bar), _)| (i, bar.exit_level()))
    }

    pub fn start_total(&self) -> f64 {
        // compute_bars never produces fewer than two bars
        self.bars.first().map(BridgeBar::exit_level).unwrap_or(0.0)
    }

    /// Highest point any bar reaches, never below zero.
    pub fn max_level(&self) -> f64 {
        self.bars.iter().map(BridgeBar::top).fold(0.0, f64::max)
    }

    /// Lowest point any bar reaches, never above zero.
    pub fn min_level(&self) -> f64 {
        self.bars.iter().map(|b| b.bottom).fold(0.0, f64::min)
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum InvalidInput {
    #[error("a bridge needs a start and an end step, got {count} step(s)")]
    TooFewSteps { count: usize },
    #[error("step {index} ({label:?}) has a non-finite value: {delta}")]
    NonFiniteDelta {
        index: usize,
        label: String,
        delta: f64,
    },
    #[error("running total overflows after step {index} ({label:?})")]
    RunningTotalOverflow { index: usize, label: String },
}

fn anchor(step: &BridgeStep, role: StepRole, value: f64, display_value: String) -> BridgeBar {
    BridgeBar {
        label: step.label.clone(),
        role,
        bottom: value.min(0.0),
        height: value.abs(),
        color_class: ColorClass::Anchor,
        display_value,
    }
}

/// Lays out a bridge chart.
///
/// `format` receives each bar's role and the value it should show: the absolute total for
/// the start and end anchors, the signed increment for contributions.
///
/// The end step's `delta` is ignored; its bar is the start value with every contribution
/// folded on, which is also returned as `final_total`.
pub fn compute_bars<F>(steps: &[BridgeStep], format: F) -> Result<WaterfallLayout, InvalidInput>
where
    F: Fn(StepRole, f64) -> String,
{
    let n = steps.len();
    if n < 2 {
        return Err(InvalidInput::TooFewSteps { count: n });
    }
    if let Some((index, step)) = steps[..n - 1]
        .iter()
        .enumerate()
        .find(|(_, s)| !s.delta.is_finite())
    {
        return Err(InvalidInput::NonFiniteDelta {
            index,
            label: step.label.clone(),
            delta: step.delta,
        });
    }

    let mut bars = Vec::with_capacity(n);
    let first = &steps[0];
    let mut running = first.delta;
    bars.push(anchor(
        first,
        StepRole::Start,
        running,
        format(StepRole::Start, running),
    ));

    for (index, step) in steps.iter().enumerate().take(n - 1).skip(1) {
        let delta = step.delta;
        let (bottom, height, color_class) = if delta >= 0.0 {
            (running, delta, ColorClass::Increase)
        } else {
            (running + delta, -delta, ColorClass::Decrease)
        };
        bars.push(BridgeBar {
            label: step.label.clone(),
            role: StepRole::Contribution,
            bottom,
            height,
            color_class,
            display_value: format(StepRole::Contribution, delta),
        });
        running += delta;
        if !running.is_finite() {
            return Err(InvalidInput::RunningTotalOverflow {
                index,
                label: step.label.clone(),
            });
        }
    }

    bars.push(anchor(
        &steps[n - 1],
        StepRole::End,
        running,
        format(StepRole::End, running),
    ));

    Ok(WaterfallLayout {
        bars,
        final_total: running,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::BridgeLabels;
    use approx::assert_abs_diff_eq;
    use proptest::prelude::*;

    fn plain(_: StepRole, v: f64) -> String {
        format!("{v}")
    }

    fn pl_bridge() -> Vec<BridgeStep> {
        vec![
            BridgeStep::start("Prior Year\nNet Income", 3.84),
            BridgeStep::delta("Revenue\nGrowth", 1.52),
            BridgeStep::delta("COGS\nChange", -0.72),
            BridgeStep::delta("OPEX\nChange", -0.35),
            BridgeStep::delta("D&A", 0.12),
            BridgeStep::delta("Interest", -0.08),
            BridgeStep::delta("Tax\nImpact", 0.40),
            BridgeStep::end("Current Year\nNet Income"),
        ]
    }

    #[test]
    fn test_pl_bridge() {
        let labels = BridgeLabels::millions(2);
        let layout = compute_bars(&pl_bridge(), |r, v| labels.label(r, v)).unwrap();

        assert_eq!(layout.bars.len(), 8);
        assert_abs_diff_eq!(layout.final_total, 4.73, epsilon = 1e-9);
        assert_eq!(layout.bars[0].display_value, "$3.84M");
        assert_eq!(layout.bars[2].display_value, "-0.72M");
        assert_eq!(layout.bars[7].display_value, "$4.73M");

        let cogs = &layout.bars[2];
        assert_eq!(cogs.color_class, ColorClass::Decrease);
        assert_abs_diff_eq!(cogs.bottom, 3.84 + 1.52 - 0.72, epsilon = 1e-9);
        assert_abs_diff_eq!(cogs.top(), 3.84 + 1.52, epsilon = 1e-9);

        let end = layout.bars.last().unwrap();
        assert_eq!(end.role, StepRole::End);
        assert_eq!(end.color_class, ColorClass::Anchor);
        assert_eq!(end.bottom, 0.0);
        assert_eq!(end.height, layout.final_total);
    }

    #[test]
    fn test_cash_flow_bridge() {
        let steps = vec![
            BridgeStep::start("Beginning\nCash", 27.7),
            BridgeStep::delta("Operating\nCF", 18.2),
            BridgeStep::delta("Investing\nCF", -12.5),
            BridgeStep::delta("Financing\nCF", -4.1),
            BridgeStep::delta("FX\nEffect", -0.8),
            BridgeStep::end("Ending\nCash"),
        ];
        let layout = compute_bars(&steps, plain).unwrap();
        assert_abs_diff_eq!(layout.final_total, 28.5, epsilon = 1e-9);
        assert_abs_diff_eq!(layout.max_level(), 27.7 + 18.2, epsilon = 1e-9);
        let classes = layout.bars.iter().map(|b| b.color_class).collect_vec();
        assert_eq!(
            classes,
            vec![
                ColorClass::Anchor,
                ColorClass::Increase,
                ColorClass::Decrease,
                ColorClass::Decrease,
                ColorClass::Decrease,
                ColorClass::Anchor,
            ]
        );
    }

    #[test]
    fn test_two_steps() {
        let steps = vec![BridgeStep::start("Start", 10.0), BridgeStep::end("End")];
        let layout = compute_bars(&steps, plain).unwrap();
        assert_eq!(layout.bars.len(), 2);
        for bar in &layout.bars {
            assert_eq!(bar.color_class, ColorClass::Anchor);
            assert_eq!(bar.bottom, 0.0);
            assert_eq!(bar.height, 10.0);
        }
        assert_eq!(layout.final_total, 10.0);
        assert_eq!(layout.connectors().collect_vec(), vec![(0, 10.0)]);
    }

    #[test]
    fn test_end_placeholder_is_ignored() {
        let mut steps = vec![
            BridgeStep::start("Start", 5.0),
            BridgeStep::delta("Up", 2.0),
            BridgeStep::end("End"),
        ];
        steps[2].delta = 999.0;
        let layout = compute_bars(&steps, plain).unwrap();
        assert_eq!(layout.final_total, 7.0);
        assert_eq!(layout.bars[2].height, 7.0);

        steps[2].delta = f64::NAN;
        assert!(compute_bars(&steps, plain).is_ok());
    }

    #[test]
    fn test_zero_delta() {
        let steps = vec![
            BridgeStep::start("Start", 4.0),
            BridgeStep::delta("Flat", 0.0),
            BridgeStep::delta("Down", -1.0),
            BridgeStep::end("End"),
        ];
        let layout = compute_bars(&steps, |r, v| BridgeLabels::default().label(r, v)).unwrap();
        let flat = &layout.bars[1];
        assert_eq!(flat.color_class, ColorClass::Increase);
        assert_eq!(flat.bottom, 4.0);
        assert_eq!(flat.height, 0.0);
        assert_eq!(flat.display_value, "+0.0M");
        // the flat step still connects to both neighbours
        assert_eq!(
            layout.connectors().collect_vec(),
            vec![(0, 4.0), (1, 4.0), (2, 3.0)]
        );
    }

    #[test]
    fn test_negative_totals_keep_heights_positive() {
        let steps = vec![
            BridgeStep::start("Start", 2.0),
            BridgeStep::delta("Loss", -5.0),
            BridgeStep::end("End"),
        ];
        let layout = compute_bars(&steps, plain).unwrap();
        assert_eq!(layout.final_total, -3.0);
        let end = &layout.bars[2];
        assert_eq!(end.bottom, -3.0);
        assert_eq!(end.height, 3.0);
        assert_eq!(end.exit_level(), -3.0);
        assert_eq!(layout.min_level(), -3.0);
    }

    #[test]
    fn test_too_few_steps() {
        assert_eq!(
            compute_bars(&[BridgeStep::start("Only", 1.0)], plain),
            Err(InvalidInput::TooFewSteps { count: 1 })
        );
        assert_eq!(
            compute_bars(&[], plain),
            Err(InvalidInput::TooFewSteps { count: 0 })
        );
    }

    #[test]
    fn test_non_finite_deltas() {
        let steps = vec![BridgeStep::start("Start", f64::NAN), BridgeStep::end("End")];
        match compute_bars(&steps, plain) {
            Err(InvalidInput::NonFiniteDelta { index, label, .. }) => {
                assert_eq!(index, 0);
                assert_eq!(label, "Start");
            }
            other => panic!("expected NonFiniteDelta, got {other:?}"),
        }

        let steps = vec![
            BridgeStep::start("Start", 1.0),
            BridgeStep::delta("Boom", f64::INFINITY),
            BridgeStep::end("End"),
        ];
        assert!(matches!(
            compute_bars(&steps, plain),
            Err(InvalidInput::NonFiniteDelta { index: 1, .. })
        ));
    }

    #[test]
    fn test_running_total_overflow() {
        let steps = vec![
            BridgeStep::start("Start", f64::MAX),
            BridgeStep::delta("Push", f64::MAX),
            BridgeStep::end("End"),
        ];
        assert_eq!(
            compute_bars(&steps, plain),
            Err(InvalidInput::RunningTotalOverflow {
                index: 1,
                label: "Push".to_string(),
            })
        );

        // large but representable totals still lay out
        let steps = vec![
            BridgeStep::start("Start", f64::MAX),
            BridgeStep::delta("Pull", -f64::MAX),
            BridgeStep::end("End"),
        ];
        let layout = compute_bars(&steps, plain).unwrap();
        assert_eq!(layout.final_total, 0.0);
    }

    fn bridge_strategy() -> impl Strategy<Value = Vec<BridgeStep>> {
        (
            -1.0e6..1.0e6f64,
            prop::collection::vec(-1.0e3..1.0e3f64, 0..12),
        )
            .prop_map(|(start, deltas)| {
                let mut steps = vec![BridgeStep::start("start", start)];
                steps.extend(
                    deltas
                        .into_iter()
                        .enumerate()
                        .map(|(i, d)| BridgeStep::delta(format!("step {i}"), d)),
                );
                steps.push(BridgeStep::end("end"));
                steps
            })
    }

    proptest! {
        #[test]
        fn prop_one_bar_per_step(steps in bridge_strategy()) {
            let layout = compute_bars(&steps, plain).unwrap();
            prop_assert_eq!(layout.bars.len(), steps.len());
        }

        #[test]
        fn prop_final_total_folds_interior(steps in bridge_strategy()) {
            let layout = compute_bars(&steps, plain).unwrap();
            let n = steps.len();
            let expected = steps[1..n - 1].iter().fold(steps[0].delta, |acc, s| acc + s.delta);
            prop_assert_eq!(layout.final_total, expected);
            prop_assert_eq!(layout.bars[n - 1].height, expected.abs());
        }

        #[test]
        fn prop_interior_bars_span_running_totals(steps in bridge_strategy()) {
            let layout = compute_bars(&steps, plain).unwrap();
            let n = steps.len();
            let mut before = steps[0].delta;
            for i in 1..n - 1 {
                let after = before + steps[i].delta;
                let bar = &layout.bars[i];
                prop_assert!(bar.height >= 0.0);
                prop_assert!((bar.bottom - before.min(after)).abs() < 1e-6);
                prop_assert!((bar.top() - before.max(after)).abs() < 1e-6);
                prop_assert_eq!(bar.exit_level(), if steps[i].delta >= 0.0 { bar.top() } else { bar.bottom });
                before = after;
            }
        }

        #[test]
        fn prop_repeatable(steps in bridge_strategy()) {
            let a = compute_bars(&steps, plain).unwrap();
            let b = compute_bars(&steps, plain).unwrap();
            prop_assert_eq!(a.final_total.to_bits(), b.final_total.to_bits());
            for (x, y) in a.bars.iter().zip(&b.bars) {
                prop_assert_eq!(x.bottom.to_bits(), y.bottom.to_bits());
                prop_assert_eq!(x.height.to_bits(), y.height.to_bits());
                prop_assert_eq!(x, y);
            }
        }
    }
}

//! Tick step planning and tick number formatting

/// Lengths below this are treated as zero.
pub const MIN_AXIS_LENGTH: f64 = 1e-10;

/// Ticks closer than this fraction of the axis to either end are dropped;
/// the end labels already cover them.
pub const END_CLEARANCE: f64 = 0.05;

/// Fraction of a step within which a tick counts as a whole-step multiple.
pub const MAJOR_TOLERANCE: f64 = 0.01;

/// Spacing chosen for one axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickPlan {
    /// Distance between labeled (major) ticks, always `{1,2,5} x 10^k`.
    pub step: f64,
    /// Whether unlabeled half-step ticks are drawn in between.
    pub show_minor: bool,
}

impl TickPlan {
    /// Increment used when walking the axis.
    pub fn tick_step(&self) -> f64 {
        if self.show_minor {
            self.step * 0.5
        } else {
            self.step
        }
    }
}

/// Pick a "nice" step for an axis of `length` whose labels are about
/// `label_width` wide. Returns `None` for degenerate axes.
pub fn plan_ticks(length: f64, label_width: f64) -> Option<TickPlan> {
    if !length.is_finite() || length < MIN_AXIS_LENGTH {
        return None;
    }

    let spacing = label_width.max(MIN_AXIS_LENGTH) * 1.5;
    let target_divs = (length / spacing).floor().clamp(2.0, 10.0);
    let rough = length / target_divs;
    let mag = 10f64.powf(rough.log10().floor());
    let residual = rough / mag;

    let multiplier = if residual <= 1.5 {
        1.0
    } else if residual <= 3.5 {
        2.0
    } else if residual <= 7.5 {
        5.0
    } else {
        10.0
    };

    let step = multiplier * mag;
    Some(TickPlan {
        step,
        show_minor: step * 0.5 > label_width * 1.2,
    })
}

/// One interior tick along an axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickMark {
    /// Distance from the ruler's zero end.
    pub value: f64,
    pub is_major: bool,
}

/// Interior ticks of an axis, excluding the two ends and anything within
/// [`END_CLEARANCE`] of them.
pub fn tick_marks(length: f64, plan: &TickPlan) -> Vec<TickMark> {
    let tick_step = plan.tick_step();
    if length < MIN_AXIS_LENGTH || tick_step <= 0.0 {
        return Vec::new();
    }

    let lower = length * END_CLEARANCE;
    let upper = length * (1.0 - END_CLEARANCE);
    let mut marks = Vec::new();

    let mut i = 1u32;
    loop {
        let value = f64::from(i) * tick_step;
        if value >= length - MIN_AXIS_LENGTH {
            break;
        }
        i += 1;

        if value < lower || value > upper {
            continue;
        }

        let ratio = value / plan.step;
        let is_major = (ratio - ratio.round()).abs() < MAJOR_TOLERANCE;
        marks.push(TickMark { value, is_major });
    }

    marks
}

/// Render a tick value: integers without a decimal point, everything else to
/// two decimals with trailing zeros removed.
pub fn format_tick_num(value: f64) -> String {
    let rounded = value.round();
    if (value - rounded).abs() < 1e-9 {
        if rounded == 0.0 {
            return "0".to_string();
        }
        return format!("{rounded:.0}");
    }

    let text = format!("{value:.2}");
    let text = text.trim_end_matches('0').trim_end_matches('.');
    if text == "-0" {
        "0".to_string()
    } else {
        text.to_string()
    }
}

/// Estimated world-space width of a label of `text` rendered `height` tall.
pub fn estimate_label_width(text: &str, height: f64) -> f64 {
    height * (0.5 * text.chars().count() as f64 + 1.0)
}
